//! 誤字補正
//!
//! 正規化済みテキストをトークン単位で対象語彙に寄せる。
//! 類似度はRatcliff/Obershelp方式（一致文字数 × 2 / 総文字数）。

use std::collections::HashMap;
use std::sync::RwLock;

/// 補正対象とする最小トークン長
pub const MIN_TOKEN_LEN: usize = 4;

/// 類似度の閾値
pub const SIMILARITY_CUTOFF: f64 = 0.85;

/// メモ化キャッシュの既定上限
pub const DEFAULT_CACHE_CAPACITY: usize = 50_000;

/// 誤字補正器
///
/// 対象語彙はプロセス生存中固定なので、同じトークンは常に同じ結果になる。
/// キャッシュは上限到達時に全消去する（正しさはキャッシュに依存しない）。
#[derive(Debug)]
pub struct TypoCorrector {
    targets: Vec<String>,
    capacity: usize,
    cache: RwLock<HashMap<String, String>>,
}

impl TypoCorrector {
    pub fn new(targets: &[String]) -> Self {
        Self::with_capacity(targets, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(targets: &[String], capacity: usize) -> Self {
        Self {
            targets: targets.iter().map(|t| t.to_lowercase()).collect(),
            capacity: capacity.max(1),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// テキスト全体を補正する（空白区切りで再結合）
    pub fn correct_text(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|token| self.correct_token(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// 1トークンを補正する
    pub fn correct_token(&self, token: &str) -> String {
        if token.chars().count() < MIN_TOKEN_LEN {
            return token.to_string();
        }
        if self.targets.iter().any(|t| t == token) {
            return token.to_string();
        }

        if let Ok(cache) = self.cache.read() {
            if let Some(hit) = cache.get(token) {
                return hit.clone();
            }
        }

        let corrected = self
            .closest_target(token)
            .unwrap_or(token)
            .to_string();

        if let Ok(mut cache) = self.cache.write() {
            if cache.len() >= self.capacity {
                tracing::debug!("typo cache full ({} entries), flushing", cache.len());
                cache.clear();
            }
            cache.insert(token.to_string(), corrected.clone());
        }

        corrected
    }

    /// 閾値以上で最も類似する対象語（同点は辞書順で大きい方）
    fn closest_target(&self, token: &str) -> Option<&str> {
        let mut best: Option<(f64, &str)> = None;
        for target in &self.targets {
            let score = similarity(target, token);
            if score < SIMILARITY_CUTOFF {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_score, best_target)) => {
                    score > best_score || (score == best_score && target.as_str() > best_target)
                }
            };
            if better {
                best = Some((score, target.as_str()));
            }
        }
        best.map(|(_, t)| t)
    }

    /// キャッシュ件数
    pub fn cached_len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }
}

/// 類似度を計算（0.0〜1.0）
pub fn similarity(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let total = a_chars.len() + b_chars.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_chars(&a_chars, &b_chars) as f64 / total as f64
}

/// 最長共通部分文字列を再帰的に取り、左右の残りでも繰り返した一致文字数
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }

    total
}

/// `a[alo..ahi]` と `b[blo..bhi]` の最長一致ブロック
///
/// 同じ長さなら `a` 側で先に現れるものを採る。
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo;
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    let mut prev = vec![0usize; width + 1];

    for i in alo..ahi {
        let mut current = vec![0usize; width + 1];
        for j in blo..bhi {
            if a[i] == b[j] {
                let k = prev[j - blo] + 1;
                current[j - blo + 1] = k;
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            }
        }
        prev = current;
    }

    (best_i, best_j, best_k)
}
