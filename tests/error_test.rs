//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use site_classifier::error::ClassifierError;
use site_classifier::{load_artifacts, load_experts, load_vocabulary, table};
use std::path::Path;
use tempfile::tempdir;

/// 存在しない入力ファイル
#[test]
fn test_read_nonexistent_table() {
    let result = table::read_table(Path::new("/nonexistent/path/12345/sites.csv"));
    assert!(matches!(result, Err(ClassifierError::FileNotFound(_))));
}

/// 未対応の拡張子
#[test]
fn test_read_unsupported_format() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("sites.pdf");
    std::fs::write(&path, "dummy").unwrap();

    let result = table::read_table(&path);
    assert!(matches!(result, Err(ClassifierError::UnsupportedFormat(_))));
}

/// 空のCSVはヘッダーが無いのでエラー
#[test]
fn test_read_empty_csv() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, "").unwrap();

    let result = table::read_table(&path);
    assert!(matches!(result, Err(ClassifierError::CsvParse(_))));
}

/// 壊れた語彙ファイルはエラー（既定値に戻さない）
#[test]
fn test_malformed_vocabulary_is_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("vocab.json");
    std::fs::write(&path, "{ \"class_1\": [").unwrap();

    let result = load_vocabulary(Some(path.as_path()));
    assert!(matches!(result, Err(ClassifierError::Common(_))));
}

/// 参照テーブルは読めなくても空として続行
#[test]
fn test_lookup_tables_degrade_to_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "not json").unwrap();

    assert!(load_artifacts(Some(broken.as_path())).is_empty());
    assert!(load_experts(Some(broken.as_path())).is_empty());
    assert!(load_artifacts(Some(dir.path().join("missing.json").as_path())).is_empty());
    assert!(load_artifacts(None).is_empty());
}

/// ClassifierErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        ClassifierError::Config("テスト設定エラー".to_string()),
        ClassifierError::FileNotFound("sites.csv".to_string()),
        ClassifierError::MissingColumn("Concat_site_variables".to_string()),
        ClassifierError::CsvParse("ヘッダー行がありません".to_string()),
        ClassifierError::ExcelRead("読み込み失敗".to_string()),
        ClassifierError::ExcelWrite("保存失敗".to_string()),
        ClassifierError::UnsupportedFormat("sites.pdf".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// 列不足エラーのメッセージに列名と対処が含まれる
#[test]
fn test_missing_column_message() {
    let display = ClassifierError::MissingColumn("notes".to_string()).to_string();
    assert!(display.contains("notes"));
    assert!(display.contains("--text-column"));
}

/// 共通ライブラリのエラーはそのまま表示される
#[test]
fn test_common_error_is_transparent() {
    let inner = site_classifier_common::Error::Config("negation_window must be at least 1".into());
    let inner_display = inner.to_string();
    let err: ClassifierError = inner.into();
    assert_eq!(err.to_string(), inner_display);
}
