pub mod batch;
pub mod cli;
pub mod concat;
pub mod config;
pub mod error;
pub mod table;

use config::Config;
use error::Result;
use site_classifier_common::{ArtifactDictionary, ExpertDataset, SiteClassifier, Vocabulary};
use std::path::Path;

/// 語彙ファイルを読む（未指定なら組み込み語彙）。壊れたファイルはエラー
pub fn load_vocabulary(path: Option<&Path>) -> Result<Vocabulary> {
    match path {
        Some(path) => Ok(Vocabulary::from_file(path)?),
        None => Ok(Vocabulary::default()),
    }
}

/// 遺物辞書を読む（読めなければ空）
pub fn load_artifacts(path: Option<&Path>) -> ArtifactDictionary {
    path.map(ArtifactDictionary::load_or_empty).unwrap_or_default()
}

/// 専門家データセットを読む（読めなければ空）
pub fn load_experts(path: Option<&Path>) -> ExpertDataset {
    path.map(ExpertDataset::load_or_empty).unwrap_or_default()
}

/// 設定とコマンドライン指定から分類器を組み立てる
pub fn build_classifier(
    config: &Config,
    vocabulary: Option<&Path>,
    artifacts: Option<&Path>,
) -> Result<SiteClassifier> {
    let vocabulary = load_vocabulary(vocabulary.or(config.vocabulary.as_deref()))?;
    let artifacts = load_artifacts(artifacts.or(config.artifact_db.as_deref()));
    Ok(SiteClassifier::with_cache_capacity(
        &vocabulary,
        &artifacts,
        config.typo_cache_capacity,
    )?)
}
