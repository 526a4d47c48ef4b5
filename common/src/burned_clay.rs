//! 焼土の2分類
//!
//! Class 1 は素材（burned clay, daub など）、Class 2 は成形物・遺構
//! （clay ball, clay-lined hearth など）。どちらも最初の一致で判定を打ち切る。

use crate::error::Result;
use crate::keywords::compile_alternation;
use crate::vocabulary::Vocabulary;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 焼土分類の結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnedClayMatches {
    /// Class 1 の最初の一致
    pub class_1: Option<String>,
    /// Class 2 の最初の一致
    pub class_2: Option<String>,
}

impl BurnedClayMatches {
    pub fn class_1_found(&self) -> bool {
        self.class_1.is_some()
    }

    pub fn class_2_found(&self) -> bool {
        self.class_2.is_some()
    }

    pub fn found(&self) -> bool {
        self.class_1_found() || self.class_2_found()
    }

    /// 焼土のみ（焼石のどのTierにも該当しない）
    pub fn only(&self, any_feature_found: bool) -> bool {
        self.found() && !any_feature_found
    }
}

#[derive(Debug, Clone)]
pub struct BurnedClayClassifier {
    class_1: Option<Regex>,
    class_2: Option<Regex>,
}

impl BurnedClayClassifier {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        Ok(Self {
            class_1: compile_alternation(&vocabulary.burned_clay_class_1)?,
            class_2: compile_alternation(&vocabulary.burned_clay_class_2)?,
        })
    }

    pub fn classify(&self, text: &str) -> BurnedClayMatches {
        BurnedClayMatches {
            class_1: first_match(self.class_1.as_ref(), text),
            class_2: first_match(self.class_2.as_ref(), text),
        }
    }
}

fn first_match(regex: Option<&Regex>, text: &str) -> Option<String> {
    regex
        .and_then(|re| re.find(text))
        .map(|m| m.as_str().to_string())
}
