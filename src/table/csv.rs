//! CSV入出力

use super::Table;
use crate::error::{ClassifierError, Result};
use site_classifier_common::delimited::{format_record, parse_records};
use std::io::Write;
use std::path::Path;

/// UTF-8として不正なバイトは置換文字にして読み続ける
pub fn read_csv(path: &Path) -> Result<Table> {
    let bytes = std::fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    if let std::borrow::Cow::Owned(_) = content {
        tracing::warn!(
            "{} contains invalid UTF-8, replaced with U+FFFD",
            path.display()
        );
    }
    parse_csv(&content)
}

/// ヘッダー行の無い入力はエラー
pub fn parse_csv(content: &str) -> Result<Table> {
    let mut records = parse_records(content).into_iter();
    let headers = records
        .next()
        .ok_or_else(|| ClassifierError::CsvParse("ヘッダー行がありません".into()))?;

    let mut table = Table::new(headers);
    for (i, record) in records.enumerate() {
        if record.len() > table.headers.len() {
            tracing::warn!(
                "row {} has {} fields but header has {}, extra fields ignored",
                i + 2,
                record.len(),
                table.headers.len()
            );
        }
        table.rows.push(record);
    }
    Ok(table)
}

pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    writeln!(file, "{}", format_record(&table.headers))?;
    for row in &table.rows {
        writeln!(file, "{}", format_record(row))?;
    }
    file.flush()?;
    Ok(())
}
