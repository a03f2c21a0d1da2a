//! Longest-common-substring similarity.
//!
//! The score counts characters shared by the first longest common substring
//! and, recursively, by the pieces to its left and right. The percentage
//! doubles that count and divides by the combined length.
//!
//! The measure is not symmetric in general; callers that merge terms pass the
//! candidate first.

/// Number of characters the two strings share.
pub fn common_chars(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    similar(&a, &b)
}

/// Similarity in percent, `0.0..=100.0`.
///
/// ```
/// use sift_fts::similarity::similarity;
///
/// assert_eq!(similarity("search", "search"), 100.0);
/// assert_eq!(similarity("", ""), 0.0);
/// assert!(similarity("searching", "searchinng") > 93.0);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 0.0;
    }
    common_chars(a, b) as f64 * 2.0 * 100.0 / total as f64
}

/// Highest percentage two strings of these lengths could reach.
///
/// Used to skip the quadratic comparison when the length ratio alone rules a
/// pair out.
pub fn max_similarity(len_a: usize, len_b: usize) -> f64 {
    let total = len_a + len_b;
    if total == 0 {
        return 0.0;
    }
    len_a.min(len_b) as f64 * 2.0 * 100.0 / total as f64
}

fn similar(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let (mut best, mut pos_a, mut pos_b) = (0, 0, 0);
    for i in 0..a.len() {
        for j in 0..b.len() {
            let mut k = 0;
            while i + k < a.len() && j + k < b.len() && a[i + k] == b[j + k] {
                k += 1;
            }
            if k > best {
                best = k;
                pos_a = i;
                pos_b = j;
            }
        }
    }

    if best == 0 {
        return 0;
    }

    best + similar(&a[..pos_a], &b[..pos_b]) + similar(&a[pos_a + best..], &b[pos_b + best..])
}
