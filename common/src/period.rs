//! 時期推定
//!
//! 優先順位:
//! 1. 専門家による分類（refined_context）があればそれを採用して終了
//! 2. 明示的な時期キーワードと診断的遺物辞書の一致を和集合にして採用
//! 3. 先史指標語 → "Inferred: Prehistoric"、"historic" → "Inferred: Historic"、
//!    どちらもなければ "Unknown"
//!
//! 先史フラグ（3値）は時期文字列とは独立に求め、最後に時期文字列が
//! 先史を示す場合のみ `Yes` に引き上げる。

use crate::error::Result;
use crate::keywords::{compile_labeled, LabeledPattern};
use crate::lookup::ArtifactDictionary;
use crate::normalizer::normalize;
use crate::vocabulary::Vocabulary;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;

pub const EXPERT_PREFIX: &str = "Prioritized expert classification: ";
pub const INFERRED_PREHISTORIC: &str = "Inferred: Prehistoric";
pub const INFERRED_HISTORIC: &str = "Inferred: Historic";
pub const UNKNOWN_PERIOD: &str = "Unknown";
pub const NO_DATA: &str = "No Data";

/// 先史フラグ（`true` / `false` / `"No Data"`）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrehistoricStatus {
    Yes,
    No,
    #[default]
    NoData,
}

impl PrehistoricStatus {
    /// 表出力用（True / False / No Data）
    pub fn as_table_value(&self) -> &'static str {
        match self {
            PrehistoricStatus::Yes => "True",
            PrehistoricStatus::No => "False",
            PrehistoricStatus::NoData => NO_DATA,
        }
    }
}

impl std::fmt::Display for PrehistoricStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_table_value())
    }
}

impl Serialize for PrehistoricStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            PrehistoricStatus::Yes => serializer.serialize_bool(true),
            PrehistoricStatus::No => serializer.serialize_bool(false),
            PrehistoricStatus::NoData => serializer.serialize_str(NO_DATA),
        }
    }
}

impl<'de> Deserialize<'de> for PrehistoricStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Bool(true) => Ok(PrehistoricStatus::Yes),
            serde_json::Value::Bool(false) => Ok(PrehistoricStatus::No),
            serde_json::Value::String(s) if s.eq_ignore_ascii_case("true") => {
                Ok(PrehistoricStatus::Yes)
            }
            serde_json::Value::String(s) if s.eq_ignore_ascii_case("false") => {
                Ok(PrehistoricStatus::No)
            }
            serde_json::Value::String(s) if s == NO_DATA => Ok(PrehistoricStatus::NoData),
            other => Err(serde::de::Error::custom(format!(
                "invalid prehistoric status: {}",
                other
            ))),
        }
    }
}

/// 時期推定の結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodResolution {
    /// 推定時期（`; ` 区切りの場合あり）
    pub learned_time_period: String,
    pub is_prehistoric: PrehistoricStatus,
    /// 一致した先史指標語（語彙の順）
    pub prehistoric_evidence: Vec<String>,
    /// 一致した時期ラベル（キーワード・遺物辞書の和集合）
    pub matched_labels: BTreeSet<String>,
    /// 専門家分類を採用したか
    pub expert_override: bool,
}

#[derive(Debug, Clone)]
pub struct TimePeriodResolver {
    period_patterns: Vec<LabeledPattern>,
    artifact_patterns: Vec<LabeledPattern>,
    prehistoric_indicators: Vec<String>,
    historic_indicators: Vec<String>,
    period_markers: Vec<String>,
}

impl TimePeriodResolver {
    pub fn new(vocabulary: &Vocabulary, artifacts: &ArtifactDictionary) -> Result<Self> {
        let period_patterns = compile_labeled(
            vocabulary
                .time_periods
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        )?;
        let artifact_patterns = compile_labeled(artifacts.iter())?;
        tracing::debug!(
            "time period patterns: {}, artifact patterns: {}",
            period_patterns.len(),
            artifact_patterns.len()
        );

        Ok(Self {
            period_patterns,
            artifact_patterns,
            prehistoric_indicators: normalized_unique(&vocabulary.prehistoric_indicators),
            historic_indicators: normalized_unique(&vocabulary.historic_indicators),
            period_markers: vocabulary.prehistoric_period_markers.clone(),
        })
    }

    /// 補正済みテキストと専門家分類から時期を推定する
    pub fn resolve(&self, text: &str, refined_context: Option<&str>) -> PeriodResolution {
        let prehistoric_evidence = self.prehistoric_evidence(text);
        let mut status = if !prehistoric_evidence.is_empty() {
            PrehistoricStatus::Yes
        } else if self.historic_indicators.iter().any(|kw| text.contains(kw.as_str())) {
            PrehistoricStatus::No
        } else {
            PrehistoricStatus::NoData
        };

        let mut matched_labels = BTreeSet::new();
        // 空白のみは未指定扱い。採用時は元の文字列をそのまま使う
        let expert = refined_context.filter(|c| !c.trim().is_empty());

        let learned_time_period = if let Some(context) = expert {
            format!("{}{}", EXPERT_PREFIX, context)
        } else {
            matched_labels = self.matched_labels(text);
            if !matched_labels.is_empty() {
                matched_labels.iter().cloned().collect::<Vec<_>>().join("; ")
            } else if !prehistoric_evidence.is_empty() {
                INFERRED_PREHISTORIC.to_string()
            } else if text.contains("historic") {
                INFERRED_HISTORIC.to_string()
            } else {
                UNKNOWN_PERIOD.to_string()
            }
        };

        if self
            .period_markers
            .iter()
            .any(|marker| learned_time_period.contains(marker.as_str()))
        {
            status = PrehistoricStatus::Yes;
        }

        PeriodResolution {
            learned_time_period,
            is_prehistoric: status,
            prehistoric_evidence,
            matched_labels,
            expert_override: expert.is_some(),
        }
    }

    /// 本文に含まれる先史指標語（部分一致）
    pub fn prehistoric_evidence(&self, text: &str) -> Vec<String> {
        self.prehistoric_indicators
            .iter()
            .filter(|kw| text.contains(kw.as_str()))
            .cloned()
            .collect()
    }

    fn matched_labels(&self, text: &str) -> BTreeSet<String> {
        self.period_patterns
            .iter()
            .chain(self.artifact_patterns.iter())
            .filter(|p| p.regex.is_match(text))
            .map(|p| p.label.clone())
            .collect()
    }
}

/// 正規化して重複を除く（順序は保持）
fn normalized_unique(items: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    items
        .iter()
        .map(|s| normalize(s))
        .filter(|s| !s.is_empty() && seen.insert(s.clone()))
        .collect()
}
