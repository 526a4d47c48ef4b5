//! 外部参照テーブル
//!
//! - 診断的遺物辞書: 遺物名 → 時期ラベル（JSONオブジェクト）
//! - 専門家データセット: トリノミアル → (refined_context, 出典)（CSV または JSON）
//!
//! どちらも読み込み後は変更しない。読み込めない場合は空として扱い、
//! その旨を警告ログに残す。

use crate::delimited::parse_records;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// 診断的遺物辞書
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactDictionary {
    entries: BTreeMap<String, String>,
}

impl ArtifactDictionary {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// ファイルから読み込む。失敗時は空の辞書を返して警告する
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(dictionary) => {
                tracing::debug!(
                    "loaded {} artifact entries from {}",
                    dictionary.len(),
                    path.display()
                );
                dictionary
            }
            Err(e) => {
                tracing::warn!(
                    "artifact dictionary {} unavailable, continuing without it: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSONオブジェクトから読み込む（文字列以外の値は捨てる）
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let object = value
            .as_object()
            .ok_or_else(|| Error::Config("artifact dictionary must be a JSON object".into()))?;

        let mut entries = BTreeMap::new();
        for (name, label) in object {
            match label.as_str() {
                Some(label) if !label.trim().is_empty() => {
                    entries.insert(name.trim().to_lowercase(), label.trim().to_string());
                }
                _ => tracing::warn!("artifact '{}' has no usable period label, skipped", name),
            }
        }

        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.trim().to_lowercase()).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 専門家による分類
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertEntry {
    pub refined_context: String,
    #[serde(default)]
    pub citation: String,
}

/// 専門家データセット（トリノミアルで結合）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpertDataset {
    entries: HashMap<String, ExpertEntry>,
}

/// トリノミアルの比較キー（前後空白除去・大文字化）
pub fn trinomial_key(trinomial: &str) -> String {
    trinomial.trim().to_uppercase()
}

impl ExpertDataset {
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(dataset) => {
                tracing::debug!(
                    "loaded {} expert classifications from {}",
                    dataset.len(),
                    path.display()
                );
                dataset
            }
            Err(e) => {
                tracing::warn!(
                    "expert dataset {} unavailable, continuing without overrides: {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// 拡張子が `.json` ならJSON、それ以外はCSVとして読む
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_csv_str(&content)
        }
    }

    /// `{ "41TV1": { "refined_context": "...", "citation": "..." } }`
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, ExpertEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(raw))
    }

    /// ヘッダーに `trinomial` と `refined_context`（任意で `citation`）を持つCSV
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let mut records = parse_records(content).into_iter();
        let header = records
            .next()
            .ok_or_else(|| Error::Config("expert dataset is empty".into()))?;

        let position = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let trinomial_col = position("trinomial")
            .ok_or_else(|| Error::Config("expert dataset has no 'trinomial' column".into()))?;
        let context_col = position("refined_context").ok_or_else(|| {
            Error::Config("expert dataset has no 'refined_context' column".into())
        })?;
        let citation_col = position("citation");

        let mut entries = HashMap::new();
        for record in records {
            let field = |i: usize| record.get(i).map(|s| s.trim()).unwrap_or("");
            let trinomial = field(trinomial_col);
            if trinomial.is_empty() {
                continue;
            }
            entries.insert(
                trinomial.to_string(),
                ExpertEntry {
                    refined_context: field(context_col).to_string(),
                    citation: citation_col.map(field).unwrap_or("").to_string(),
                },
            );
        }

        Ok(Self::from_entries(entries))
    }

    fn from_entries(raw: HashMap<String, ExpertEntry>) -> Self {
        let entries = raw
            .into_iter()
            .filter(|(_, entry)| !entry.refined_context.trim().is_empty())
            .map(|(trinomial, entry)| (trinomial_key(&trinomial), entry))
            .collect();
        Self { entries }
    }

    pub fn get(&self, trinomial: &str) -> Option<&ExpertEntry> {
        self.entries.get(&trinomial_key(trinomial))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
