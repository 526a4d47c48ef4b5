//! 調査票の各列を1つの記述テキストに連結する
//!
//! `"<列名>: <値>;"` を空白区切りで並べる。値が空・`no data`・`false` の列は飛ばす。

use crate::table::Table;
use site_classifier_common::clean_value;

/// 連結対象の列（この順で並べる）
pub const CONCAT_COLUMNS: [&str; 27] = [
    "type_site", "explain", "additional", "surf_tech", "map_meth", "test_meth",
    "exca_meth", "records", "materials", "samples", "time_occ", "drainage",
    "soil_desc", "surf_tex", "visible", "env_desc", "time_desc", "site_size",
    "basis", "cult_desc", "basis_size", "artifact", "intact", "value",
    "invest", "disc_desc", "unmatched",
];

fn should_skip(value: &str) -> bool {
    let v = value.to_lowercase();
    v.is_empty() || v == "no data" || v == "false"
}

/// 表のヘッダーから連結対象列の位置を解決する
#[derive(Debug, Clone)]
pub struct Concatenator {
    columns: Vec<(&'static str, usize)>,
}

impl Concatenator {
    pub fn for_table(table: &Table) -> Self {
        let mut columns = Vec::new();
        let mut missing = Vec::new();
        for name in CONCAT_COLUMNS {
            match table.headers.iter().position(|h| h.trim() == name) {
                Some(idx) => columns.push((name, idx)),
                None => missing.push(name),
            }
        }
        if !missing.is_empty() {
            tracing::warn!("concatenation columns not found: {:?}", missing);
        }
        Self { columns }
    }

    /// 連結できる列が1つも無い
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn concat_row(&self, row: &[String]) -> String {
        self.columns
            .iter()
            .filter_map(|(name, idx)| {
                let value = clean_value(row.get(*idx).map(|s| s.as_str()));
                if should_skip(&value) {
                    None
                } else {
                    Some(format!("{}: {};", name, value))
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        let mut table = Table::new(vec![
            "trinomial".into(),
            "materials".into(),
            "type_site".into(),
            "soil_desc".into(),
        ]);
        table.rows.push(vec![
            "41TV1".into(),
            "FCR and \"debitage\"\nscatter".into(),
            "Open campsite".into(),
            "No Data".into(),
        ]);
        table.rows.push(vec!["41BX5".into(), "FALSE".into(), "".into()]);
        table
    }

    #[test]
    fn test_concat_in_fixed_column_order() {
        let table = table();
        let concatenator = Concatenator::for_table(&table);
        assert!(!concatenator.is_empty());
        assert_eq!(
            concatenator.concat_row(&table.rows[0]),
            "type_site: Open campsite; materials: FCR and 'debitage' scatter;"
        );
    }

    #[test]
    fn test_skipped_values_and_short_rows() {
        let table = table();
        let concatenator = Concatenator::for_table(&table);
        assert_eq!(concatenator.concat_row(&table.rows[1]), "");
    }

    #[test]
    fn test_no_known_columns() {
        let table = Table::new(vec!["id".into(), "notes".into()]);
        assert!(Concatenator::for_table(&table).is_empty());
    }
}
