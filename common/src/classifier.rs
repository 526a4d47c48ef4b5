//! 分類エンジン本体
//!
//! 語彙と遺物辞書から全パターンを起動時に一度だけコンパイルし、
//! 以後はレコードごとに純粋関数として分類する。

use crate::burned_clay::BurnedClayClassifier;
use crate::error::Result;
use crate::feature::FeatureClassifier;
use crate::filters::{ExclusionFilter, NegationFilter};
use crate::lookup::ArtifactDictionary;
use crate::normalizer::normalize_text;
use crate::period::TimePeriodResolver;
use crate::soil::SoilContextInferencer;
use crate::types::{ClassificationResult, Record};
use crate::typo::{TypoCorrector, DEFAULT_CACHE_CAPACITY};
use crate::typology::TypologyClassifier;
use crate::vocabulary::Vocabulary;

/// 遺跡記述の分類器（`Send + Sync`、参照で共有する）
#[derive(Debug)]
pub struct SiteClassifier {
    typo: TypoCorrector,
    negation: NegationFilter,
    exclusion: ExclusionFilter,
    features: FeatureClassifier,
    burned_clay: BurnedClayClassifier,
    typology: TypologyClassifier,
    periods: TimePeriodResolver,
    soil: SoilContextInferencer,
}

impl SiteClassifier {
    pub fn new(vocabulary: &Vocabulary, artifacts: &ArtifactDictionary) -> Result<Self> {
        Self::with_cache_capacity(vocabulary, artifacts, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_cache_capacity(
        vocabulary: &Vocabulary,
        artifacts: &ArtifactDictionary,
        cache_capacity: usize,
    ) -> Result<Self> {
        vocabulary.validate()?;

        let classifier = Self {
            typo: TypoCorrector::with_capacity(&vocabulary.typo_targets, cache_capacity),
            negation: NegationFilter::new(&vocabulary.negation_terms, vocabulary.negation_window),
            exclusion: ExclusionFilter::new(&vocabulary.exclusion_terms)?,
            features: FeatureClassifier::new(vocabulary)?,
            burned_clay: BurnedClayClassifier::new(vocabulary)?,
            typology: TypologyClassifier::new(vocabulary)?,
            periods: TimePeriodResolver::new(vocabulary, artifacts)?,
            soil: SoilContextInferencer::new(vocabulary),
        };
        tracing::debug!(
            "classifier ready: {} artifact entries, {} exclusion rules",
            artifacts.len(),
            classifier.exclusion.rules().len()
        );
        Ok(classifier)
    }

    /// 1レコードを分類する
    pub fn classify(&self, record: &Record) -> ClassificationResult {
        let normalized = normalize_text(Some(&record.text));
        let text = self.typo.correct_text(&normalized);

        let features = self.features.classify(&text, &self.negation, &self.exclusion);
        let burned_clay = self.burned_clay.classify(&text);
        let typology = self.typology.classify(&text);
        let period = self
            .periods
            .resolve(&text, record.refined_context.as_deref());
        let soil_inferences = self.soil.infer(&text);

        ClassificationResult {
            normalized_text: text,
            features,
            burned_clay,
            typology,
            is_prehistoric: period.is_prehistoric,
            learned_time_period: period.learned_time_period,
            prehistoric_evidence: period.prehistoric_evidence,
            period_labels: period.matched_labels,
            soil_inferences,
        }
    }

    /// テキストのみで分類する（専門家分類なし）
    pub fn classify_text(&self, text: &str) -> ClassificationResult {
        self.classify(&Record::new(text))
    }

    /// 誤字補正キャッシュの件数
    pub fn typo_cache_len(&self) -> usize {
        self.typo.cached_len()
    }
}
