//! 文化類型（Caddo / Henrietta）の判定
//!
//! 遺物の型式名・混和材は一般的な素材語ほど誤検出しないため、
//! 否定・文脈除外は適用しない。

use crate::error::Result;
use crate::keywords::{compile_keywords, CompiledPattern};
use crate::vocabulary::Vocabulary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypologyMatches {
    pub caddo: BTreeSet<String>,
    pub henrietta: BTreeSet<String>,
}

impl TypologyMatches {
    pub fn caddo_found(&self) -> bool {
        !self.caddo.is_empty()
    }

    pub fn henrietta_found(&self) -> bool {
        !self.henrietta.is_empty()
    }

    /// 両方の伝統が検出された
    pub fn overlap(&self) -> bool {
        self.caddo_found() && self.henrietta_found()
    }
}

#[derive(Debug, Clone)]
pub struct TypologyClassifier {
    caddo: Vec<CompiledPattern>,
    henrietta: Vec<CompiledPattern>,
}

impl TypologyClassifier {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        Ok(Self {
            caddo: compile_keywords(&vocabulary.caddo)?,
            henrietta: compile_keywords(&vocabulary.henrietta)?,
        })
    }

    pub fn classify(&self, text: &str) -> TypologyMatches {
        TypologyMatches {
            caddo: matched(&self.caddo, text),
            henrietta: matched(&self.henrietta, text),
        }
    }
}

fn matched(patterns: &[CompiledPattern], text: &str) -> BTreeSet<String> {
    patterns
        .iter()
        .filter(|p| p.regex.is_match(text))
        .map(|p| p.keyword.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> TypologyMatches {
        TypologyClassifier::new(&Vocabulary::default())
            .unwrap()
            .classify(text)
    }

    #[test]
    fn test_caddo_only() {
        let result = classify("grog tempered pottery");
        assert!(result.caddo_found());
        assert!(!result.henrietta_found());
        assert!(!result.overlap());
    }

    #[test]
    fn test_henrietta_only() {
        let result = classify("shell tempered sherds");
        assert!(!result.caddo_found());
        assert!(result.henrietta_found());
        assert!(!result.overlap());
    }

    #[test]
    fn test_overlap() {
        let result = classify("grog tempered and shell tempered pottery");
        assert!(result.overlap());
        assert!(result.caddo.contains("grog tempered"));
        assert!(result.henrietta.contains("shell tempered"));
    }

    #[test]
    fn test_negation_not_applied() {
        let result = classify("no caddo sherds");
        assert!(result.caddo_found());
    }

    #[test]
    fn test_type_names() {
        let result = classify("holly fine engraved and two washita points");
        assert!(result.caddo.contains("holly fine engraved"));
        assert!(result.henrietta.contains("washita points"));
    }
}
