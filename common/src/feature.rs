//! 焼石遺構の3段階分類
//!
//! - Tier 1: 焼石散布（fcr, burned rock など）
//! - Tier 2: 炉跡・個別遺構（hearth, ash lens など）
//! - Tier 3: 土坑炉・焼石マウンド（earth oven, burned rock midden など）
//!
//! 各Tierは独立に全文を走査する。Tier 2 の素の "hearth" は、
//! 否定されていない石材語が本文のどこかにある場合のみ採用する。

use crate::error::Result;
use crate::filters::{ExclusionFilter, NegationFilter};
use crate::keywords::{compile_keywords, CompiledPattern};
use crate::vocabulary::Vocabulary;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// 焼石分類の結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureMatches {
    pub class_1: BTreeSet<String>,
    pub class_2: BTreeSet<String>,
    pub class_3: BTreeSet<String>,
    /// 否定されていない石材語があったか
    pub rock_present: bool,
}

impl FeatureMatches {
    pub fn class_1_found(&self) -> bool {
        !self.class_1.is_empty()
    }

    pub fn class_2_found(&self) -> bool {
        !self.class_2.is_empty()
    }

    pub fn class_3_found(&self) -> bool {
        !self.class_3.is_empty()
    }

    pub fn any_found(&self) -> bool {
        self.class_1_found() || self.class_2_found() || self.class_3_found()
    }
}

/// 焼石分類器
#[derive(Debug, Clone)]
pub struct FeatureClassifier {
    class_1: Vec<CompiledPattern>,
    class_2: Vec<CompiledPattern>,
    class_3: Vec<CompiledPattern>,
    rock_material: Vec<CompiledPattern>,
    rock_dependent: HashSet<String>,
}

impl FeatureClassifier {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        Ok(Self {
            class_1: compile_keywords(&vocabulary.class_1)?,
            class_2: compile_keywords(&vocabulary.class_2)?,
            class_3: compile_keywords(&vocabulary.class_3)?,
            rock_material: compile_keywords(&vocabulary.rock_material)?,
            rock_dependent: vocabulary
                .class_2_dependency
                .iter()
                .map(|k| crate::normalizer::normalize(k))
                .collect(),
        })
    }

    /// 補正済みテキストを分類する
    pub fn classify(
        &self,
        text: &str,
        negation: &NegationFilter,
        exclusion: &ExclusionFilter,
    ) -> FeatureMatches {
        let rock_present = self.rock_present(text, negation);

        let class_1 = scan(&self.class_1, text, negation, exclusion, |_| true);
        let class_2 = scan(&self.class_2, text, negation, exclusion, |kw| {
            rock_present || !self.rock_dependent.contains(kw)
        });
        let class_3 = scan(&self.class_3, text, negation, exclusion, |_| true);

        FeatureMatches {
            class_1,
            class_2,
            class_3,
            rock_present,
        }
    }

    /// 否定されていない石材語が1つでもあるか（文脈除外は適用しない）
    pub fn rock_present(&self, text: &str, negation: &NegationFilter) -> bool {
        self.rock_material.iter().any(|pattern| {
            pattern
                .regex
                .find_iter(text)
                .any(|m| !negation.is_negated_at(text, m.start()))
        })
    }
}

/// パターン一覧を走査し、否定・除外・依存ルールを通った一致キーワードを集める
fn scan<F>(
    patterns: &[CompiledPattern],
    text: &str,
    negation: &NegationFilter,
    exclusion: &ExclusionFilter,
    accept: F,
) -> BTreeSet<String>
where
    F: Fn(&str) -> bool,
{
    let mut found = BTreeSet::new();

    for pattern in patterns {
        let keyword = pattern.keyword.as_str();
        let hit = pattern.regex.find_iter(text).any(|m| {
            !negation.is_negated_at(text, m.start())
                && !exclusion.is_excluded_at(text, keyword, m.start(), m.end())
                && accept(keyword)
        });
        if hit {
            found.insert(pattern.keyword.clone());
        }
    }

    found
}
