//! 土壌・地形記述からの文脈推定

use crate::normalizer::normalize;
use crate::vocabulary::{SoilRule, Vocabulary};

#[derive(Debug, Clone)]
pub struct SoilContextInferencer {
    rules: Vec<SoilRule>,
}

impl SoilContextInferencer {
    /// トリガー語は正規化してから保持する（空になったものは捨てる）
    pub fn new(vocabulary: &Vocabulary) -> Self {
        let rules = vocabulary
            .soil_rules
            .iter()
            .map(|rule| SoilRule {
                triggers: rule
                    .triggers
                    .iter()
                    .map(|t| normalize(t))
                    .filter(|t| !t.is_empty())
                    .collect(),
                inference: rule.inference.clone(),
            })
            .collect();
        Self { rules }
    }

    /// 成立したルールの推定（ルール表の順）
    pub fn infer(&self, text: &str) -> Vec<String> {
        let mut inferences: Vec<String> = Vec::new();
        for rule in &self.rules {
            if rule.triggers.iter().any(|t| text.contains(t.as_str()))
                && !inferences.contains(&rule.inference)
            {
                inferences.push(rule.inference.clone());
            }
        }
        inferences
    }

    /// `; ` 区切り。1つも成立しなければ空文字列
    pub fn infer_joined(&self, text: &str) -> String {
        self.infer(text).join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inferencer() -> SoilContextInferencer {
        SoilContextInferencer::new(&Vocabulary::default())
    }

    #[test]
    fn test_single_rule() {
        assert_eq!(
            inferencer().infer_joined("site on a pleistocene terrace"),
            "High Probability: Paleoindian Context"
        );
    }

    #[test]
    fn test_multiple_rules_in_table_order() {
        assert_eq!(
            inferencer().infer_joined("eroded surface over a buried soil near the floodplain"),
            "High Probability: Buried Archaic Context; Moderate Probability: Late Prehistoric Context; Low Probability: Intact Buried Deposits"
        );
    }

    #[test]
    fn test_no_match_is_empty() {
        assert_eq!(inferencer().infer_joined("sandy loam"), "");
        assert!(inferencer().infer("").is_empty());
    }

    #[test]
    fn test_triggers_are_normalized() {
        let vocabulary = Vocabulary {
            soil_rules: vec![SoilRule {
                triggers: vec!["Flood-Plain".to_string(), "???".to_string()],
                inference: "Floodplain".to_string(),
            }],
            ..Vocabulary::default()
        };
        let inferencer = SoilContextInferencer::new(&vocabulary);
        assert_eq!(inferencer.infer("on the flood plain"), vec!["Floodplain"]);
        assert!(inferencer.infer("nothing here").is_empty());
    }
}
