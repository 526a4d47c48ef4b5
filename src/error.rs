use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("列が見つかりません: {0}（`--text-column` で指定してください）")]
    MissingColumn(String),

    #[error("CSV解析エラー: {0}")]
    CsvParse(String),

    #[error("Excel読み込みエラー: {0}")]
    ExcelRead(String),

    #[error("Excel生成エラー: {0}")]
    ExcelWrite(String),

    #[error("未対応のファイル形式: {0}（csv / xlsx のみ）")]
    UnsupportedFormat(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] site_classifier_common::Error),
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
