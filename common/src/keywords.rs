//! キーワード照合
//!
//! 基本キーワードから表記ゆれ（複数形・ハイフン/空白）を生成し、
//! 単語境界付きの正規表現にコンパイルする。

use crate::error::{Error, Result};
use crate::normalizer::normalize;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// 基本キーワード → 生成した表記ゆれ（正規化済み）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordSet {
    variants: BTreeMap<String, BTreeSet<String>>,
}

impl KeywordSet {
    pub fn from_keywords<S: AsRef<str>>(keywords: &[S]) -> Self {
        let variants = keywords
            .iter()
            .map(|kw| {
                let canonical = kw.as_ref().to_lowercase();
                let forms = generate_variants(&canonical);
                (canonical, forms)
            })
            .collect();
        Self { variants }
    }

    /// 全表記ゆれ（重複なし・辞書順）
    pub fn all_variants(&self) -> BTreeSet<&str> {
        self.variants
            .values()
            .flat_map(|forms| forms.iter().map(|f| f.as_str()))
            .collect()
    }
}

/// 表記ゆれを生成する
///
/// - 小文字化した原形
/// - 末尾が `s` でなければ複数形
/// - ハイフンを含めば空白区切り形（末尾が `s` でなければその複数形も）
///
/// 全て正規化し、空になったものは除く。
pub fn generate_variants(keyword: &str) -> BTreeSet<String> {
    let kw = keyword.to_lowercase();
    let mut raw = vec![kw.clone()];

    if !kw.ends_with('s') {
        raw.push(format!("{}s", kw));
    }
    if kw.contains('-') {
        let spaced = kw.replace('-', " ");
        if !kw.ends_with('s') {
            raw.push(format!("{}s", spaced));
        }
        raw.push(spaced);
    }

    raw.iter()
        .map(|v| normalize(v))
        .filter(|v| !v.is_empty())
        .collect()
}

/// 単語境界付きの正規表現
pub fn word_boundary_regex(phrase: &str) -> Result<Regex> {
    Regex::new(&format!(r"\b{}\b", regex::escape(phrase))).map_err(|source| Error::Pattern {
        keyword: phrase.to_string(),
        source,
    })
}

/// (キーワード, 正規表現) の組
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub keyword: String,
    pub regex: Regex,
}

impl CompiledPattern {
    pub fn new(keyword: &str) -> Result<Self> {
        Ok(Self {
            keyword: keyword.to_string(),
            regex: word_boundary_regex(keyword)?,
        })
    }
}

/// キーワード一覧を表記ゆれ込みでコンパイルする（順序は検出結果に影響しない）
pub fn compile_keywords<S: AsRef<str>>(keywords: &[S]) -> Result<Vec<CompiledPattern>> {
    KeywordSet::from_keywords(keywords)
        .all_variants()
        .into_iter()
        .map(CompiledPattern::new)
        .collect()
}

/// ラベル付きパターン（時期・遺物辞書用）
#[derive(Debug, Clone)]
pub struct LabeledPattern {
    pub phrase: String,
    pub label: String,
    pub regex: Regex,
}

/// 句 → ラベルの対応を、句の長い順（同長は辞書順）にコンパイルする
///
/// 正規化で空になる句は捨てる。
pub fn compile_labeled<'a, I>(entries: I) -> Result<Vec<LabeledPattern>>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut normalized: Vec<(String, &str)> = entries
        .into_iter()
        .filter_map(|(phrase, label)| {
            let phrase = normalize(phrase);
            if phrase.is_empty() {
                tracing::warn!("skipping lookup key that normalizes to nothing (label: {})", label);
                None
            } else {
                Some((phrase, label))
            }
        })
        .collect();

    normalized.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    normalized.dedup_by(|(a, la), (b, lb)| a == b && la == lb);

    normalized
        .into_iter()
        .map(|(phrase, label)| {
            Ok(LabeledPattern {
                regex: word_boundary_regex(&phrase)?,
                label: label.to_string(),
                phrase,
            })
        })
        .collect()
}

/// 全キーワードを1つの選言にまとめた正規表現（最初の一致で十分な判定用）
///
/// 長い句を先に並べるので、一致箇所では最長の表記が報告される。
pub fn compile_alternation<S: AsRef<str>>(keywords: &[S]) -> Result<Option<Regex>> {
    let set = KeywordSet::from_keywords(keywords);
    let mut variants: Vec<&str> = set.all_variants().into_iter().collect();
    if variants.is_empty() {
        return Ok(None);
    }
    variants.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let body = variants
        .iter()
        .map(|v| regex::escape(v))
        .collect::<Vec<_>>()
        .join("|");
    let regex = Regex::new(&format!(r"\b(?:{})\b", body)).map_err(|source| Error::Pattern {
        keyword: body.clone(),
        source,
    })?;
    Ok(Some(regex))
}
