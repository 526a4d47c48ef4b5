//! テキスト正規化
//!
//! 全ての照合は正規化済みテキストに対して行う（生テキストには行わない）。
//! - 小文字化
//! - `[a-z0-9\s]` 以外を空白に置換
//! - 連続空白を1つに圧縮し、前後を除去

use regex::Regex;

lazy_static::lazy_static! {
    static ref NON_ALNUM_RE: Regex = Regex::new(r"[^a-z0-9\s]").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// テキストを正規化する
///
/// 空文字・`None` は空文字を返す。正規化済みテキストに再適用しても変化しない。
pub fn normalize_text(text: Option<&str>) -> String {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return String::new(),
    };

    let lowered = text.to_lowercase();
    let replaced = NON_ALNUM_RE.replace_all(&lowered, " ");
    WHITESPACE_RE.replace_all(&replaced, " ").trim().to_string()
}

/// `&str` 用の短縮形
pub fn normalize(text: &str) -> String {
    normalize_text(Some(text))
}

/// 表のセル値を整形する
///
/// `\r`・`\n` はそれぞれ空白に、`"` は `'` に置換して前後の空白を除去する。
/// `\r\n` は空白2つになる（圧縮しない）。
pub fn clean_value(value: Option<&str>) -> String {
    match value {
        None => String::new(),
        Some(v) => v
            .replace('\r', " ")
            .replace('\n', " ")
            .replace('"', "'")
            .trim()
            .to_string(),
    }
}
