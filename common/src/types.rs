//! 分類の入出力型
//!
//! - Record: 1遺跡分の入力（連結済みテキスト + 専門家分類）
//! - ClassificationResult: 1遺跡分の出力（表の列と監査用の一致語）

use crate::burned_clay::BurnedClayMatches;
use crate::feature::FeatureMatches;
use crate::period::PrehistoricStatus;
use crate::typology::TypologyMatches;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 分類対象の1レコード
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    pub text: String,
    pub refined_context: Option<String>,
}

impl Record {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            refined_context: None,
        }
    }

    pub fn with_refined_context(mut self, context: impl Into<String>) -> Self {
        self.refined_context = Some(context.into());
        self
    }
}

/// 出力列（この順で表に書き出す）
pub const RESULT_COLUMNS: [&str; 18] = [
    "Normalized_Text",
    "Class_1_Found",
    "Class_1_Keywords",
    "Class_2_Found",
    "Class_2_Keywords",
    "Class_3_Found",
    "Class_3_Keywords",
    "Burned_Clay_Found",
    "Burned_Clay_Only",
    "Burned_Clay_Class_1_Found",
    "Burned_Clay_Class_2_Found",
    "Caddo_Found",
    "Henrietta_Found",
    "Henrietta_Caddo_Overlap_Found",
    "Is_Prehistoric",
    "Learned_Time_Period",
    "Prehistoric_Evidence",
    "Soil_Inferred_Context",
];

/// 1レコードの分類結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// 正規化・誤字補正後のテキスト
    pub normalized_text: String,
    pub features: FeatureMatches,
    pub burned_clay: BurnedClayMatches,
    pub typology: TypologyMatches,
    pub is_prehistoric: PrehistoricStatus,
    pub learned_time_period: String,
    pub prehistoric_evidence: Vec<String>,
    /// 時期ラベルの内訳（専門家分類採用時は空）
    pub period_labels: BTreeSet<String>,
    pub soil_inferences: Vec<String>,
}

impl ClassificationResult {
    pub fn burned_clay_only(&self) -> bool {
        self.burned_clay.only(self.features.any_found())
    }

    pub fn soil_inferred_context(&self) -> String {
        self.soil_inferences.join("; ")
    }

    /// `RESULT_COLUMNS` と同じ順の表セル
    pub fn to_fields(&self) -> Vec<String> {
        vec![
            self.normalized_text.clone(),
            flag(self.features.class_1_found()),
            join(&self.features.class_1),
            flag(self.features.class_2_found()),
            join(&self.features.class_2),
            flag(self.features.class_3_found()),
            join(&self.features.class_3),
            flag(self.burned_clay.found()),
            flag(self.burned_clay_only()),
            flag(self.burned_clay.class_1_found()),
            flag(self.burned_clay.class_2_found()),
            flag(self.typology.caddo_found()),
            flag(self.typology.henrietta_found()),
            flag(self.typology.overlap()),
            self.is_prehistoric.as_table_value().to_string(),
            self.learned_time_period.clone(),
            self.prehistoric_evidence.join("; "),
            self.soil_inferred_context(),
        ]
    }

    /// JSON出力用の平坦な表現
    pub fn view(&self) -> ResultView<'_> {
        ResultView {
            normalized_text: &self.normalized_text,
            class_1_found: self.features.class_1_found(),
            class_1_keywords: join(&self.features.class_1),
            class_2_found: self.features.class_2_found(),
            class_2_keywords: join(&self.features.class_2),
            class_3_found: self.features.class_3_found(),
            class_3_keywords: join(&self.features.class_3),
            burned_clay_found: self.burned_clay.found(),
            burned_clay_only: self.burned_clay_only(),
            burned_clay_class_1_found: self.burned_clay.class_1_found(),
            burned_clay_class_2_found: self.burned_clay.class_2_found(),
            caddo_found: self.typology.caddo_found(),
            henrietta_found: self.typology.henrietta_found(),
            overlap_found: self.typology.overlap(),
            is_prehistoric: self.is_prehistoric,
            learned_time_period: &self.learned_time_period,
            prehistoric_evidence: self.prehistoric_evidence.join("; "),
            soil_inferred_context: self.soil_inferred_context(),
            audit: ResultAudit {
                features: &self.features,
                burned_clay: &self.burned_clay,
                typology: &self.typology,
                period_labels: &self.period_labels,
                prehistoric_evidence: &self.prehistoric_evidence,
                soil_inferences: &self.soil_inferences,
            },
        }
    }
}

/// 分類結果の平坦な表現
///
/// キーは `RESULT_COLUMNS` と同じ。真偽値は bool のまま、
/// `Is_Prehistoric` は `true` / `false` / `"No Data"`。
#[derive(Debug, Serialize)]
pub struct ResultView<'a> {
    #[serde(rename = "Normalized_Text")]
    pub normalized_text: &'a str,
    #[serde(rename = "Class_1_Found")]
    pub class_1_found: bool,
    #[serde(rename = "Class_1_Keywords")]
    pub class_1_keywords: String,
    #[serde(rename = "Class_2_Found")]
    pub class_2_found: bool,
    #[serde(rename = "Class_2_Keywords")]
    pub class_2_keywords: String,
    #[serde(rename = "Class_3_Found")]
    pub class_3_found: bool,
    #[serde(rename = "Class_3_Keywords")]
    pub class_3_keywords: String,
    #[serde(rename = "Burned_Clay_Found")]
    pub burned_clay_found: bool,
    #[serde(rename = "Burned_Clay_Only")]
    pub burned_clay_only: bool,
    #[serde(rename = "Burned_Clay_Class_1_Found")]
    pub burned_clay_class_1_found: bool,
    #[serde(rename = "Burned_Clay_Class_2_Found")]
    pub burned_clay_class_2_found: bool,
    #[serde(rename = "Caddo_Found")]
    pub caddo_found: bool,
    #[serde(rename = "Henrietta_Found")]
    pub henrietta_found: bool,
    #[serde(rename = "Henrietta_Caddo_Overlap_Found")]
    pub overlap_found: bool,
    #[serde(rename = "Is_Prehistoric")]
    pub is_prehistoric: PrehistoricStatus,
    #[serde(rename = "Learned_Time_Period")]
    pub learned_time_period: &'a str,
    #[serde(rename = "Prehistoric_Evidence")]
    pub prehistoric_evidence: String,
    #[serde(rename = "Soil_Inferred_Context")]
    pub soil_inferred_context: String,
    /// 監査用の一致語の内訳
    pub audit: ResultAudit<'a>,
}

#[derive(Debug, Serialize)]
pub struct ResultAudit<'a> {
    pub features: &'a FeatureMatches,
    pub burned_clay: &'a BurnedClayMatches,
    pub typology: &'a TypologyMatches,
    pub period_labels: &'a BTreeSet<String>,
    pub prehistoric_evidence: &'a [String],
    pub soil_inferences: &'a [String],
}

fn flag(value: bool) -> String {
    let text = if value { "True" } else { "False" };
    text.to_string()
}

fn join(keywords: &BTreeSet<String>) -> String {
    keywords.iter().cloned().collect::<Vec<_>>().join("; ")
}
