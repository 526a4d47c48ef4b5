//! 否定・文脈除外フィルタ
//!
//! 一致1件ごとの判定。同じキーワードでも別の箇所が通れば検出扱いになる。

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};

/// 否定語を探す文字数（一致開始位置の直前）
pub const NEGATION_CHAR_WINDOW: usize = 30;

/// 文脈除外で見る前後の文字数
pub const EXCLUSION_CHAR_WINDOW: usize = 50;

/// 否定判定
///
/// 直前 30 文字を切り出してから空白で分割し、末尾 N トークンを見る。
/// 文字単位で切るため、境界にかかった単語は途中で切れる。
#[derive(Debug, Clone)]
pub struct NegationFilter {
    terms: HashSet<String>,
    window: usize,
}

impl NegationFilter {
    pub fn new<S: AsRef<str>>(terms: &[S], window: usize) -> Self {
        Self {
            terms: terms.iter().map(|t| t.as_ref().to_lowercase()).collect(),
            window,
        }
    }

    /// `text[start..]` から始まる一致が否定されているか
    pub fn is_negated_at(&self, text: &str, start: usize) -> bool {
        let from = floor_char_boundary(text, start.saturating_sub(NEGATION_CHAR_WINDOW));
        self.is_negated(&text[from..start])
    }

    /// 直前テキストの末尾 N トークンに否定語があるか
    pub fn is_negated(&self, text_before: &str) -> bool {
        let words: Vec<&str> = text_before.split_whitespace().collect();
        let skip = words.len().saturating_sub(self.window);
        words[skip..].iter().any(|w| self.terms.contains(*w))
    }
}

/// 基本語ごとの除外ルール
#[derive(Debug, Clone)]
pub struct ExclusionRule {
    pub base_term: String,
    regex: Regex,
}

impl ExclusionRule {
    pub fn new<S: AsRef<str>>(base_term: &str, terms: &[S]) -> Result<Option<Self>> {
        let alternatives: Vec<String> = terms
            .iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .map(|t| regex::escape(&t))
            .collect();
        if alternatives.is_empty() {
            return Ok(None);
        }

        let pattern = format!(r"\b(?:{})\b", alternatives.join("|"));
        let regex = Regex::new(&pattern).map_err(|source| Error::Pattern {
            keyword: base_term.to_string(),
            source,
        })?;
        Ok(Some(Self {
            base_term: base_term.to_lowercase(),
            regex,
        }))
    }

    /// キーワードが基本語を部分文字列として含むときだけ適用する
    pub fn applies_to(&self, keyword: &str) -> bool {
        keyword.contains(self.base_term.as_str())
    }

    /// 周辺テキストに除外語があるか
    pub fn matches_context(&self, text_around: &str) -> bool {
        self.regex.is_match(text_around)
    }
}

/// 文脈除外判定
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    rules: Vec<ExclusionRule>,
}

impl ExclusionFilter {
    pub fn new(terms: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut rules = Vec::new();
        for (base, words) in terms {
            if let Some(rule) = ExclusionRule::new(base, words)? {
                rules.push(rule);
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[ExclusionRule] {
        &self.rules
    }

    /// `text[start..end]` の一致が文脈上除外されるか
    pub fn is_excluded_at(&self, text: &str, keyword: &str, start: usize, end: usize) -> bool {
        let from = floor_char_boundary(text, start.saturating_sub(EXCLUSION_CHAR_WINDOW));
        let to = ceil_char_boundary(text, (end + EXCLUSION_CHAR_WINDOW).min(text.len()));
        self.is_excluded(&text[from..to], keyword)
    }

    pub fn is_excluded(&self, text_around: &str, keyword: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.applies_to(keyword) && rule.matches_context(text_around))
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::Vocabulary;

    fn negation(window: usize) -> NegationFilter {
        NegationFilter::new(&["no", "not", "non", "lack", "absence", "negative"], window)
    }

    #[test]
    fn test_negation_within_window() {
        assert!(negation(3).is_negated("no evidence of"));
    }

    #[test]
    fn test_negation_outside_window() {
        // 4トークン前の "no" は窓の外
        assert!(!negation(3).is_negated("no evidence of any"));
        assert!(negation(5).is_negated("no evidence of any"));
    }

    #[test]
    fn test_negation_requires_whole_token() {
        assert!(!negation(5).is_negated("nothing notable"));
    }

    #[test]
    fn test_negation_char_window_clips() {
        let filter = negation(5);
        let text = "no aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa oven";
        let start = text.find("oven").unwrap();
        // "no" は30文字より前にあるので見えない
        assert!(!filter.is_negated_at(text, start));

        let text = "not an oven";
        assert!(filter.is_negated_at(text, text.find("oven").unwrap()));
    }

    #[test]
    fn test_negation_char_window_partial_word() {
        // 切り出し境界にかかった "absence" は "ence" になり否定語と一致しない
        let filter = negation(10);
        let text = "absence of a burned rock scatter oven";
        let start = text.find("oven").unwrap();
        assert_eq!(&text[start - 30..start], "ence of a burned rock scatter ");
        assert!(!filter.is_negated_at(text, start));
        assert!(filter.is_negated(&text[..start]));
    }

    #[test]
    fn test_exclusion_applies_to_substring_keywords() {
        let filter = ExclusionFilter::new(&Vocabulary::default().exclusion_terms).unwrap();
        let oven_rule = filter.rules().iter().find(|r| r.base_term == "oven").unwrap();
        assert!(oven_rule.applies_to("oven"));
        assert!(oven_rule.applies_to("earth ovens"));
        assert!(!oven_rule.applies_to("roasting pit"));
    }

    #[test]
    fn test_exclusion_context() {
        let filter = ExclusionFilter::new(&Vocabulary::default().exclusion_terms).unwrap();
        let text = "electric oven was found in the kitchen midden";
        let start = text.find("oven").unwrap();
        assert!(filter.is_excluded_at(text, "oven", start, start + 4));
        // 除外語は "oven" 系キーワードにのみ効く
        let midden = text.find("midden").unwrap();
        assert!(!filter.is_excluded_at(text, "midden", midden, midden + 6));
    }

    #[test]
    fn test_exclusion_hearth_fireplace() {
        let filter = ExclusionFilter::new(&Vocabulary::default().exclusion_terms).unwrap();
        assert!(filter.is_excluded("stone fireplace and hearth", "rock hearth"));
        assert!(!filter.is_excluded("stone ring and hearth", "rock hearth"));
    }

    #[test]
    fn test_exclusion_window_bounds() {
        let filter = ExclusionFilter::new(&Vocabulary::default().exclusion_terms).unwrap();
        let padding = "x".repeat(60);
        let text = format!("stove {} oven", padding);
        let start = text.find(" oven").unwrap() + 1;
        assert!(!filter.is_excluded_at(&text, "oven", start, start + 4));
    }

    #[test]
    fn test_empty_rule_skipped() {
        let mut terms = BTreeMap::new();
        terms.insert("pit".to_string(), Vec::new());
        let filter = ExclusionFilter::new(&terms).unwrap();
        assert!(filter.rules().is_empty());
    }
}
