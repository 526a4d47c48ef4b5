//! 表データの入出力（CSV / XLSX）
//!
//! 拡張子で形式を判定する。どちらも1行目をヘッダーとして扱う。

pub mod csv;
pub mod excel;

use crate::error::{ClassifierError, Result};
use std::path::Path;

/// ヘッダー付きの表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// 列位置（完全一致を優先し、無ければ大文字小文字を無視）
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers
            .iter()
            .position(|h| h.trim() == name)
            .or_else(|| {
                self.headers
                    .iter()
                    .position(|h| h.trim().eq_ignore_ascii_case(name))
            })
    }

    /// セル値（列が足りない行は空文字列）
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Xlsx,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "txt" => Ok(TableFormat::Csv),
            "xlsx" | "xlsm" | "xls" => Ok(TableFormat::Xlsx),
            _ => Err(ClassifierError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

pub fn read_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(ClassifierError::FileNotFound(path.display().to_string()));
    }
    match TableFormat::from_path(path)? {
        TableFormat::Csv => csv::read_csv(path),
        TableFormat::Xlsx => excel::read_excel(path),
    }
}

pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    match TableFormat::from_path(path)? {
        TableFormat::Csv => csv::write_csv(table, path),
        TableFormat::Xlsx => excel::write_excel(table, path),
    }
}
