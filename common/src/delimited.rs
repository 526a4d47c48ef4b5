//! CSVの読み書き（ダブルクォート対応）
//!
//! - フィールド内のカンマ・改行はクォートで囲まれていれば保持
//! - `""` はクォート内の `"` 1文字
//! - 行末の `\r\n` / `\n` はどちらも可

/// CSV文字列をレコード（フィールドの配列）の列にパースする
///
/// 空行は読み飛ばす。
pub fn parse_records(content: &str) -> Vec<Vec<String>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_started = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                field_started = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                field_started = true;
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                finish_record(&mut records, &mut record, &mut field, field_started);
                field_started = false;
            }
            '\n' => {
                finish_record(&mut records, &mut record, &mut field, field_started);
                field_started = false;
            }
            _ => {
                field.push(c);
                field_started = true;
            }
        }
    }

    finish_record(&mut records, &mut record, &mut field, field_started);
    records
}

fn finish_record(
    records: &mut Vec<Vec<String>>,
    record: &mut Vec<String>,
    field: &mut String,
    field_started: bool,
) {
    if !field_started && record.is_empty() && field.is_empty() {
        return;
    }
    record.push(std::mem::take(field));
    records.push(std::mem::take(record));
}

/// 1フィールドをCSV用にエスケープする
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// 1レコードをCSV行にする（改行なし）
pub fn format_record<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_records() {
        let records = parse_records("a,b,c\n1,2,3\n");
        assert_eq!(records, vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn test_quoted_comma_and_newline() {
        let records = parse_records("id,text\r\n1,\"hearth, with\nfcr\"\r\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1][1], "hearth, with\nfcr");
    }

    #[test]
    fn test_escaped_quote() {
        let records = parse_records("x\n\"a \"\"perdiz\"\" point\"\n");
        assert_eq!(records[1][0], "a \"perdiz\" point");
    }

    #[test]
    fn test_empty_fields_and_blank_lines() {
        let records = parse_records("a,,c\n\n,\n");
        assert_eq!(records, vec![vec!["a", "", "c"], vec!["", ""]]);
    }

    #[test]
    fn test_no_trailing_newline_and_bom() {
        let records = parse_records("\u{feff}h1,h2\nv1,v2");
        assert_eq!(records, vec![vec!["h1", "h2"], vec!["v1", "v2"]]);
    }

    #[test]
    fn test_format_record_quotes_when_needed() {
        let line = format_record(&["plain", "a,b", "say \"hi\"", "multi\nline"]);
        assert_eq!(line, "plain,\"a,b\",\"say \"\"hi\"\"\",\"multi\nline\"");
        let reparsed = parse_records(&line);
        assert_eq!(reparsed[0], vec!["plain", "a,b", "say \"hi\"", "multi\nline"]);
    }
}
