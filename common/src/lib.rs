//! Site Classifier Common Library
//!
//! 遺跡調査記述の分類エンジン（I/Oを持たない純粋なライブラリ）

pub mod burned_clay;
pub mod classifier;
pub mod delimited;
pub mod error;
pub mod feature;
pub mod filters;
pub mod keywords;
pub mod lookup;
pub mod normalizer;
pub mod period;
pub mod soil;
pub mod types;
pub mod typo;
pub mod typology;
pub mod vocabulary;

pub use classifier::SiteClassifier;
pub use error::{Error, Result};
pub use lookup::{trinomial_key, ArtifactDictionary, ExpertDataset, ExpertEntry};
pub use normalizer::{clean_value, normalize_text};
pub use period::{PeriodResolution, PrehistoricStatus};
pub use types::{ClassificationResult, Record, ResultAudit, ResultView, RESULT_COLUMNS};
pub use vocabulary::{SoilRule, Vocabulary};
