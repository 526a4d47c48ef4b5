//! 一括分類の統合テスト（CSV入力 → 分類 → CSV出力）

use pretty_assertions::assert_eq;
use site_classifier::batch::{classify_table, BatchOptions, CITATION_COLUMN};
use site_classifier::config::Config;
use site_classifier::table::{self, Table};
use site_classifier::{build_classifier, load_experts};
use site_classifier_common::RESULT_COLUMNS;
use std::path::Path;
use tempfile::tempdir;

const SITES_CSV: &str = "\
trinomial,Concat_site_variables,refined_context
41AA1,Fire cracked rock and a hearth,
41AA2,No oven features observed,
41AA3,Electric oven was found in the kitchen midden.,
41AA4,\"Oxidized clay hearth, no stone present\",
41AA5,Recovered a Perdiz point.,
41AA6,hearth,Woodland
";

fn column(table: &Table, name: &str) -> Vec<String> {
    let idx = table
        .column_index(name)
        .unwrap_or_else(|| panic!("列がありません: {}", name));
    (0..table.len())
        .map(|r| table.cell(r, idx).to_string())
        .collect()
}

fn run_fixture(dir: &Path) -> Table {
    let input = dir.join("sites.csv");
    let output = dir.join("sites_classified.csv");
    let artifacts = dir.join("artifacts.json");
    std::fs::write(&input, SITES_CSV).unwrap();
    std::fs::write(
        &artifacts,
        r#"{ "perdiz": "Late Prehistoric II (Toyah Phase)" }"#,
    )
    .unwrap();

    let classifier = build_classifier(&Config::default(), None, Some(artifacts.as_path())).unwrap();
    let input_table = table::read_table(&input).unwrap();
    let (classified, summary) = classify_table(
        &input_table,
        &classifier,
        &load_experts(None),
        &BatchOptions::default(),
    )
    .unwrap();
    assert_eq!(summary.rows, 6);

    table::write_table(&classified, &output).unwrap();
    table::read_table(&output).unwrap()
}

/// 出力列は入力列 + 分類列 + 出典列の順
#[test]
fn test_output_columns() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output = run_fixture(dir.path());

    let mut expected: Vec<String> = vec![
        "trinomial".into(),
        "Concat_site_variables".into(),
        "refined_context".into(),
    ];
    expected.extend(RESULT_COLUMNS.iter().map(|c| c.to_string()));
    expected.push(CITATION_COLUMN.to_string());
    assert_eq!(output.headers, expected);
    assert_eq!(output.len(), 6);
}

/// 焼石3分類（否定・文脈除外・石材依存を含む）
#[test]
fn test_feature_classes() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output = run_fixture(dir.path());

    assert_eq!(
        column(&output, "Class_1_Found"),
        vec!["True", "False", "False", "False", "False", "False"]
    );
    assert_eq!(
        column(&output, "Class_2_Found"),
        vec!["True", "False", "False", "False", "False", "False"]
    );
    assert_eq!(
        column(&output, "Class_3_Found"),
        vec!["False", "False", "False", "False", "False", "False"]
    );
    assert_eq!(column(&output, "Class_1_Keywords")[0], "fire cracked rock");
    assert_eq!(column(&output, "Class_2_Keywords")[0], "hearth");
}

/// 焼土の検出と「焼土のみ」
#[test]
fn test_burned_clay() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output = run_fixture(dir.path());

    assert_eq!(column(&output, "Burned_Clay_Found")[3], "True");
    assert_eq!(column(&output, "Burned_Clay_Only")[3], "True");
    assert_eq!(column(&output, "Burned_Clay_Class_1_Found")[3], "True");
    assert_eq!(column(&output, "Burned_Clay_Found")[0], "False");
}

/// 時期推定（遺物辞書・専門家分類・既定値）と先史フラグ
#[test]
fn test_time_periods() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output = run_fixture(dir.path());

    assert_eq!(
        column(&output, "Learned_Time_Period"),
        vec![
            "Unknown",
            "Unknown",
            "Unknown",
            "Unknown",
            "Late Prehistoric II (Toyah Phase)",
            "Prioritized expert classification: Woodland",
        ]
    );
    assert_eq!(
        column(&output, "Is_Prehistoric"),
        vec!["No Data", "No Data", "No Data", "No Data", "True", "No Data"]
    );
}

/// 正規化・誤字補正後のテキストが出力される
#[test]
fn test_normalized_text() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output = run_fixture(dir.path());

    assert_eq!(
        column(&output, "Normalized_Text")[3],
        "oxidized clay hearth no stone present"
    );
}

/// 専門家データセットはトリノミアルで結合され、出典が付く
#[test]
fn test_expert_dataset_join() {
    let dir = tempdir().expect("Failed to create temp dir");
    let experts_path = dir.path().join("experts.csv");
    std::fs::write(
        &experts_path,
        "trinomial,refined_context,citation\n41aa1,Late Archaic,\"Smith, 2004\"\n",
    )
    .unwrap();

    let mut input = Table::new(vec!["trinomial".into(), "Concat_site_variables".into()]);
    input.rows.push(vec!["41AA1".into(), "burned rock midden".into()]);
    input.rows.push(vec!["41AA2".into(), "historic glass bottle".into()]);

    let classifier = build_classifier(&Config::default(), None, None).unwrap();
    let (output, summary) = classify_table(
        &input,
        &classifier,
        &load_experts(Some(experts_path.as_path())),
        &BatchOptions::default(),
    )
    .unwrap();

    assert_eq!(
        column(&output, "Learned_Time_Period"),
        vec![
            "Prioritized expert classification: Late Archaic",
            "Inferred: Historic",
        ]
    );
    assert_eq!(column(&output, "Is_Prehistoric"), vec!["True", "False"]);
    assert_eq!(column(&output, CITATION_COLUMN), vec!["Smith, 2004", ""]);
    assert_eq!(summary.expert_overrides, 1);
    assert_eq!(summary.class_3, 1);
}

/// XLSX入力でも同じ結果になる
#[test]
fn test_xlsx_round_trip_classification() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input_path = dir.path().join("sites.xlsx");
    let output_path = dir.path().join("sites_classified.xlsx");

    let mut input = Table::new(vec!["trinomial".into(), "Concat_site_variables".into()]);
    input.rows.push(vec!["41AA1".into(), "grog tempered and shell tempered sherds".into()]);
    table::write_table(&input, &input_path).unwrap();

    let classifier = build_classifier(&Config::default(), None, None).unwrap();
    let (output, _) = classify_table(
        &table::read_table(&input_path).unwrap(),
        &classifier,
        &load_experts(None),
        &BatchOptions::default(),
    )
    .unwrap();
    table::write_table(&output, &output_path).unwrap();

    let reread = table::read_table(&output_path).unwrap();
    assert_eq!(column(&reread, "Caddo_Found"), vec!["True"]);
    assert_eq!(column(&reread, "Henrietta_Found"), vec!["True"]);
    assert_eq!(column(&reread, "Henrietta_Caddo_Overlap_Found"), vec!["True"]);
}
