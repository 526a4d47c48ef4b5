//! 分類語彙（設定データ）
//!
//! 全ての語彙はコードではなくデータとして扱う。組み込みの既定値を持ち、
//! JSONファイルで一部のフィールドだけを上書きできる。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 土壌・地形の判定ルール
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilRule {
    /// いずれかが含まれればルール成立
    pub triggers: Vec<String>,
    /// 推定文字列
    pub inference: String,
}

/// 分類語彙一式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Tier 1: 焼石散布
    pub class_1: Vec<String>,
    /// Tier 2: 炉跡などの個別遺構
    pub class_2: Vec<String>,
    /// Tier 2 のうち石材語の共起を要するキーワード
    pub class_2_dependency: Vec<String>,
    /// Tier 3: 土坑炉・焼石マウンド
    pub class_3: Vec<String>,
    /// 石材語（依存ルール用）
    pub rock_material: Vec<String>,
    /// 焼土 Class 1: 素材
    pub burned_clay_class_1: Vec<String>,
    /// 焼土 Class 2: 成形物・遺構
    pub burned_clay_class_2: Vec<String>,
    /// Caddo 系の診断的遺物
    pub caddo: Vec<String>,
    /// Henrietta 系の診断的遺物
    pub henrietta: Vec<String>,
    /// 先史時代の指標語（部分一致）
    pub prehistoric_indicators: Vec<String>,
    /// 歴史時代の指標語（部分一致）
    pub historic_indicators: Vec<String>,
    /// 時期ラベルに含まれていれば先史フラグを強制する文字列
    pub prehistoric_period_markers: Vec<String>,
    /// 明示的な時期キーワード → 時期ラベル
    pub time_periods: BTreeMap<String, String>,
    /// 誤字補正の対象語彙
    pub typo_targets: Vec<String>,
    /// 否定語
    pub negation_terms: Vec<String>,
    /// 否定語を探すトークン数
    pub negation_window: usize,
    /// 基本語 → 文脈除外語
    pub exclusion_terms: BTreeMap<String, Vec<String>>,
    /// 土壌・地形ルール（表の順に評価）
    pub soil_rules: Vec<SoilRule>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        let time_periods = [
            ("mexican republic", "Historic - Mexican Republic"),
            ("republic of texas", "Historic - Republic of Texas"),
            ("early statehood", "Historic - Early Statehood (1845-1860)"),
            ("civil war", "Historic - Civil War"),
            ("late statehood", "Historic - Late Statehood (1865-1900)"),
            ("modern", "Historic - Modern (1901-present)"),
            ("colonial", "Historic - Colonial/Contact"),
            ("point of contact", "Historic - Colonial/Contact"),
            ("late prehistoric i", "Late Prehistoric I"),
            ("late prehistoric ii", "Late Prehistoric II"),
            ("austin phase", "Late Prehistoric I (Austin Phase)"),
            ("toyah", "Late Prehistoric II (Toyah Phase)"),
            ("woodland", "Woodland"),
            ("neoamerican", "Archaic - Transitional/NeoAmerican"),
            ("neo-american", "Archaic - Transitional/NeoAmerican"),
            ("terminal archaic", "Archaic - Transitional/Terminal"),
            ("paleoindian", "Paleoindian"),
            ("archaic", "Archaic"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let mut exclusion_terms = BTreeMap::new();
        exclusion_terms.insert(
            "oven".to_string(),
            strings(&[
                "stove", "enamel", "dutch", "microwave", "gas", "electric", "safe", "pottery",
                "ceramic",
            ]),
        );
        exclusion_terms.insert("hearth".to_string(), strings(&["fireplace", "chimney"]));

        Self {
            class_1: strings(&[
                "fire cracked rock", "fire-cracked rock", "fcr", "burned rock", "burned-rock",
                "burnt rock", "burnt-rock", "thermal spall", "heat spall", "pot lid",
                "burned caliche", "burned limestone",
            ]),
            class_2: strings(&[
                "hearth", "rock filled hearth", "rock lined hearth", "rock-filled hearth",
                "rock-lined hearth", "rock hearth", "burned rock concentration",
                "fcr concentration", "burned clay", "hearth basin", "ash lens",
                "charcoal stain", "burned clay concentration", "thermal feature",
            ]),
            class_2_dependency: strings(&["hearth", "hearths"]),
            class_3: strings(&[
                "rock oven", "earth oven", "oven", "roasting pit", "burned rock mound",
                "burned rock midden", "brm", "pit feature", "baking pit", "cooking pit",
                "annular mound", "annular midden", "annular brm",
            ]),
            rock_material: strings(&[
                "rock", "stone", "limestone", "caliche", "sandstone", "fcr", "spall",
            ]),
            burned_clay_class_1: strings(&[
                "burned clay", "burnt clay", "fired clay", "baked clay", "oxidized clay",
                "rubefied clay", "vitrified clay", "daub", "terracotta", "clay lump",
            ]),
            burned_clay_class_2: strings(&[
                "clay ball", "clay-lined hearth", "clay-lined pit", "clay nodule",
                "clay figurine", "clay floor",
            ]),
            caddo: strings(&[
                "caddo", "caddoan", "grog tempered", "grog-tempered", "holly fine engraved",
                "hickory engraved", "ripley engraved", "poynor engraved", "patton engraved",
                "hodges engraved", "nacogdoches engraved", "crockett curvilinear incised",
                "pennington punctated incised", "davis incised", "kiam incised",
                "maydelle incised", "bullard brushed", "alba point", "hayes point",
                "bassett point", "friley point",
            ]),
            henrietta: strings(&[
                "henrietta", "shell tempered", "shell-tempered", "nocona plain",
                "harrell point", "washita point", "fresno point", "scapula hoe",
                "plains village",
            ]),
            prehistoric_indicators: strings(&[
                "paleo", "archaic", "prehistoric", "neo-american", "neo american", "ceramic age",
                "lithic", "flake", "debitage", "dart point", "arrow point", "biface", "uniface",
                "metate", "mano", "chert", "flint", "grog tempered", "bone tempered",
                "shell tempered",
            ]),
            historic_indicators: strings(&[
                "historic", "modern", "glass", "metal", "brick", "whiteware", "stoneware",
                "porcelain", "bottle", "wire nail", "cut nail", "tin can", "homestead",
                "farmstead", "cistern",
            ]),
            prehistoric_period_markers: strings(&[
                "Prehistoric", "Archaic", "Paleo", "Caddo", "Toyah",
            ]),
            time_periods,
            typo_targets: strings(&[
                "burned", "burnt", "rock", "hearth", "oven", "midden", "cracked", "fire",
                "earth", "pit", "clay", "fcr",
            ]),
            negation_terms: strings(&["no", "not", "non", "lack", "absence", "negative"]),
            negation_window: 5,
            exclusion_terms,
            soil_rules: vec![
                SoilRule {
                    triggers: strings(&[
                        "pleistocene terrace", "pleistocene alluvium", "pleistocene gravel",
                        "relict terrace",
                    ]),
                    inference: "High Probability: Paleoindian Context".to_string(),
                },
                SoilRule {
                    triggers: strings(&[
                        "deep alluvium", "paleosol", "buried soil", "buried a horizon",
                        "cumulic soil", "holocene alluvium",
                    ]),
                    inference: "High Probability: Buried Archaic Context".to_string(),
                },
                SoilRule {
                    triggers: strings(&[
                        "floodplain", "flood plain", "terrace margin", "alluvial fan",
                    ]),
                    inference: "Moderate Probability: Late Prehistoric Context".to_string(),
                },
                SoilRule {
                    triggers: strings(&[
                        "eroded", "deflated", "shallow soil", "exposed bedrock",
                    ]),
                    inference: "Low Probability: Intact Buried Deposits".to_string(),
                },
            ],
        }
    }
}

impl Vocabulary {
    /// JSONファイルから読み込み（無いフィールドは既定値）
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let vocabulary: Self = serde_json::from_str(json)?;
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    /// 整形済みJSONに変換
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 語彙の整合性を検証
    pub fn validate(&self) -> Result<()> {
        if self.negation_window == 0 {
            return Err(Error::Config("negation_window must be at least 1".into()));
        }
        if let Some((phrase, _)) = self.time_periods.iter().find(|(_, label)| label.trim().is_empty()) {
            return Err(Error::Config(format!(
                "time period '{}' has an empty label",
                phrase
            )));
        }
        if let Some(rule) = self.soil_rules.iter().find(|r| r.inference.trim().is_empty()) {
            return Err(Error::Config(format!(
                "soil rule {:?} has an empty inference",
                rule.triggers
            )));
        }
        Ok(())
    }
}
