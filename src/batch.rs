//! 表全体の一括分類
//!
//! 行ごとの分類は独立なので rayon で並列化する。出力の行順は入力と同じ。

use crate::concat::Concatenator;
use crate::error::{ClassifierError, Result};
use crate::table::Table;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use site_classifier_common::{
    clean_value, ClassificationResult, ExpertDataset, PrehistoricStatus, Record, SiteClassifier,
    RESULT_COLUMNS,
};

pub const REFINED_CONTEXT_COLUMN: &str = "refined_context";
pub const CITATION_COLUMN: &str = "Expert_Citation";

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// 記述テキストの列名
    pub text_column: String,
    /// 専門家データセットとの結合キー列
    pub trinomial_column: String,
    /// テキスト列が無い場合に調査票の列から連結する
    pub concat: bool,
    /// 進捗バーを表示する
    pub progress: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            text_column: crate::config::DEFAULT_TEXT_COLUMN.into(),
            trinomial_column: crate::config::DEFAULT_TRINOMIAL_COLUMN.into(),
            concat: true,
            progress: false,
        }
    }
}

/// 集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub rows: usize,
    pub class_1: usize,
    pub class_2: usize,
    pub class_3: usize,
    pub burned_clay: usize,
    pub burned_clay_only: usize,
    pub caddo: usize,
    pub henrietta: usize,
    pub prehistoric: usize,
    pub expert_overrides: usize,
}

impl BatchSummary {
    fn add(&mut self, result: &ClassificationResult, expert_applied: bool) {
        self.rows += 1;
        self.class_1 += result.features.class_1_found() as usize;
        self.class_2 += result.features.class_2_found() as usize;
        self.class_3 += result.features.class_3_found() as usize;
        self.burned_clay += result.burned_clay.found() as usize;
        self.burned_clay_only += result.burned_clay_only() as usize;
        self.caddo += result.typology.caddo_found() as usize;
        self.henrietta += result.typology.henrietta_found() as usize;
        self.prehistoric += (result.is_prehistoric == PrehistoricStatus::Yes) as usize;
        self.expert_overrides += expert_applied as usize;
    }
}

/// 分類テキストの取り出し方
enum TextSource {
    Column(usize),
    Concat(Concatenator),
}

struct RowOutcome {
    fields: Vec<String>,
    result: ClassificationResult,
    expert_applied: bool,
}

/// 表を分類し、入力列 + 分類列 + 出典列の表を返す
pub fn classify_table(
    table: &Table,
    classifier: &SiteClassifier,
    experts: &ExpertDataset,
    options: &BatchOptions,
) -> Result<(Table, BatchSummary)> {
    let source = match table.column_index(&options.text_column) {
        Some(idx) => TextSource::Column(idx),
        None if options.concat => {
            let concatenator = Concatenator::for_table(table);
            if concatenator.is_empty() {
                return Err(ClassifierError::MissingColumn(options.text_column.clone()));
            }
            tracing::info!(
                "'{}' not found, building text from survey columns",
                options.text_column
            );
            TextSource::Concat(concatenator)
        }
        None => return Err(ClassifierError::MissingColumn(options.text_column.clone())),
    };
    let refined_col = table.column_index(REFINED_CONTEXT_COLUMN);
    let trinomial_col = table.column_index(&options.trinomial_column);
    if trinomial_col.is_none() && !experts.is_empty() {
        tracing::warn!(
            "trinomial column '{}' not found, expert dataset will not be joined",
            options.trinomial_column
        );
    }

    // 既存の分類列は入れ替える
    let kept: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| {
            let h = h.trim();
            !RESULT_COLUMNS.contains(&h) && h != CITATION_COLUMN
        })
        .map(|(i, _)| i)
        .collect();
    let mut headers: Vec<String> = kept.iter().map(|&i| table.headers[i].clone()).collect();
    if matches!(source, TextSource::Concat(_)) {
        headers.push(options.text_column.clone());
    }
    headers.extend(RESULT_COLUMNS.iter().map(|c| c.to_string()));
    headers.push(CITATION_COLUMN.to_string());

    let progress = if options.progress {
        let pb = ProgressBar::new(table.len() as u64);
        if let Ok(style) =
            ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} ({eta})")
        {
            pb.set_style(style.progress_chars("=> "));
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let outcomes: Vec<RowOutcome> = (0..table.len())
        .into_par_iter()
        .map(|row_idx| {
            let cell = |col: usize| clean_value(Some(table.cell(row_idx, col)));

            let (text, concatenated) = match &source {
                TextSource::Column(idx) => (cell(*idx), None),
                TextSource::Concat(concatenator) => {
                    let text = concatenator.concat_row(&table.rows[row_idx]);
                    (text.clone(), Some(text))
                }
            };

            let own_context = refined_col.map(cell).filter(|c| !c.is_empty());
            let joined = match (&own_context, trinomial_col) {
                (None, Some(col)) => experts.get(&cell(col)),
                _ => None,
            };
            let refined_context = own_context
                .clone()
                .or_else(|| joined.map(|e| e.refined_context.clone()));
            let citation = joined.map(|e| e.citation.clone()).unwrap_or_default();

            let record = Record {
                text,
                refined_context,
            };
            let result = classifier.classify(&record);

            let mut fields: Vec<String> = kept.iter().map(|&i| cell(i)).collect();
            fields.extend(concatenated);
            fields.extend(result.to_fields());
            fields.push(citation);

            progress.inc(1);
            RowOutcome {
                fields,
                expert_applied: record.refined_context.is_some(),
                result,
            }
        })
        .collect();
    progress.finish_and_clear();

    let mut summary = BatchSummary::default();
    let mut output = Table::new(headers);
    for outcome in outcomes {
        summary.add(&outcome.result, outcome.expert_applied);
        output.rows.push(outcome.fields);
    }

    tracing::info!(
        "classified {} rows ({} expert overrides)",
        summary.rows,
        summary.expert_overrides
    );
    Ok((output, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_classifier_common::{ArtifactDictionary, Vocabulary};

    fn classifier() -> SiteClassifier {
        SiteClassifier::new(&Vocabulary::default(), &ArtifactDictionary::default()).unwrap()
    }

    fn column(table: &Table, name: &str) -> Vec<String> {
        let idx = table.column_index(name).unwrap();
        (0..table.len()).map(|r| table.cell(r, idx).to_string()).collect()
    }

    #[test]
    fn test_existing_result_columns_replaced() {
        let mut table = Table::new(vec![
            "Concat_site_variables".into(),
            "Class_1_Found".into(),
        ]);
        table.rows.push(vec!["fcr scatter".into(), "stale".into()]);

        let (output, summary) =
            classify_table(&table, &classifier(), &ExpertDataset::default(), &BatchOptions::default())
                .unwrap();

        assert_eq!(output.headers.len(), 1 + RESULT_COLUMNS.len() + 1);
        assert_eq!(column(&output, "Class_1_Found"), vec!["True"]);
        assert_eq!(summary.class_1, 1);
    }

    #[test]
    fn test_missing_text_column_without_concat() {
        let table = Table::new(vec!["notes".into()]);
        let options = BatchOptions {
            concat: false,
            ..BatchOptions::default()
        };
        let err = classify_table(&table, &classifier(), &ExpertDataset::default(), &options)
            .unwrap_err();
        assert!(matches!(err, ClassifierError::MissingColumn(_)));
    }

    #[test]
    fn test_concat_fallback_adds_text_column() {
        let mut table = Table::new(vec!["trinomial".into(), "materials".into()]);
        table.rows.push(vec!["41TV1".into(), "burned rock".into()]);

        let (output, _) =
            classify_table(&table, &classifier(), &ExpertDataset::default(), &BatchOptions::default())
                .unwrap();

        assert_eq!(
            column(&output, "Concat_site_variables"),
            vec!["materials: burned rock;"]
        );
        assert_eq!(column(&output, "Class_1_Keywords"), vec!["burned rock"]);
    }

    #[test]
    fn test_row_context_beats_expert_dataset() {
        let experts = ExpertDataset::from_csv_str(
            "trinomial,refined_context,citation\n41TV1,Archaic,Smith 2004\n41BX5,Woodland,Jones 1999\n",
        )
        .unwrap();
        let mut table = Table::new(vec![
            "trinomial".into(),
            "Concat_site_variables".into(),
            "refined_context".into(),
        ]);
        table.rows.push(vec!["41tv1".into(), "hearth".into(), "".into()]);
        table.rows.push(vec!["41BX5".into(), "hearth".into(), "Late Prehistoric".into()]);
        table.rows.push(vec!["41ZZ9".into(), "hearth".into(), "".into()]);

        let (output, summary) =
            classify_table(&table, &classifier(), &experts, &BatchOptions::default()).unwrap();

        assert_eq!(
            column(&output, "Learned_Time_Period"),
            vec![
                "Prioritized expert classification: Archaic",
                "Prioritized expert classification: Late Prehistoric",
                "Unknown",
            ]
        );
        assert_eq!(column(&output, CITATION_COLUMN), vec!["Smith 2004", "", ""]);
        assert_eq!(summary.expert_overrides, 2);
    }
}
