//! XLSX入出力
//!
//! 読み込みは calamine（先頭シートのみ）、書き出しは rust_xlsxwriter。

use super::Table;
use crate::error::{ClassifierError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// Excelの1セルに入る最大文字数
pub const EXCEL_MAX_CHARS: usize = 32_767;

pub fn read_excel(path: &Path) -> Result<Table> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ClassifierError::ExcelRead(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ClassifierError::ExcelRead("シートがありません".into()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ClassifierError::ExcelRead(e.to_string()))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());
    let headers = rows
        .next()
        .ok_or_else(|| ClassifierError::ExcelRead(format!("{} は空です", sheet_name)))?;

    let mut table = Table::new(headers);
    // 全セルが空の行は読み飛ばす
    table
        .rows
        .extend(rows.filter(|row| row.iter().any(|c| !c.is_empty())));
    tracing::debug!("read {} rows from sheet '{}'", table.len(), sheet_name);
    Ok(table)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Bool(true) => "True".into(),
        Data::Bool(false) => "False".into(),
        other => other.to_string(),
    }
}

pub fn write_excel(table: &Table, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Classified")
        .map_err(|e| ClassifierError::ExcelWrite(format!("シート名設定エラー: {}", e)))?;

    for (col, header) in table.headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col_num(col)?, header, &header_format)
            .map_err(|e| ClassifierError::ExcelWrite(format!("ヘッダー書き込みエラー: {}", e)))?;
    }

    for (i, row) in table.rows.iter().enumerate() {
        let row_num = u32::try_from(i + 1)
            .map_err(|_| ClassifierError::ExcelWrite("行数が多すぎます".into()))?;
        for (col, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let value = match truncate_cell(value) {
                Some(cut) => {
                    tracing::warn!(
                        "row {} column '{}' exceeds {} chars, truncated",
                        i + 2,
                        table.headers.get(col).map(String::as_str).unwrap_or(""),
                        EXCEL_MAX_CHARS
                    );
                    cut
                }
                None => value.as_str(),
            };
            worksheet
                .write_string(row_num, col_num(col)?, value)
                .map_err(|e| {
                    ClassifierError::ExcelWrite(format!("セル書き込みエラー ({}行目): {}", i + 2, e))
                })?;
        }
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| ClassifierError::ExcelWrite(format!("ウィンドウ枠固定エラー: {}", e)))?;

    workbook
        .save(path)
        .map_err(|e| ClassifierError::ExcelWrite(format!("Excel保存エラー: {}", e)))
}

/// 上限を超えるときだけ文字境界で切った値を返す
fn truncate_cell(value: &str) -> Option<&str> {
    value
        .char_indices()
        .nth(EXCEL_MAX_CHARS)
        .map(|(byte_idx, _)| &value[..byte_idx])
}

fn col_num(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| ClassifierError::ExcelWrite("列数が多すぎます".into()))
}
