//! Fuzzy tag matching.
//!
//! Two scorers on a 0..=100 scale:
//!
//! - [`ratio`]: the normalised InDel similarity,
//!   `2 * lcs(a, b) / (len(a) + len(b)) * 100`, rounded. One transposed or
//!   inserted character in a tag of eight or more characters stays well
//!   above the default threshold; unrelated words fall far below it.
//! - [`weighted_ratio`]: folds case and punctuation, then also tries the
//!   words in sorted order and the best aligned substring, so "easy run"
//!   or "warm up jog" still land on their step. Substring scores are
//!   discounted as the two lengths drift apart.

/// Minimum score a candidate needs before it is accepted
pub const DEFAULT_FUZZY_THRESHOLD: u8 = 77;

/// Discount on word-sorted scores
const TOKEN_SCALE: f64 = 0.95;

/// Length ratio below which substring matching is not tried
const PARTIAL_MIN_LENGTH_RATIO: f64 = 1.5;

/// Length ratio above which substring scores take the heavy discount
const PARTIAL_MAX_LENGTH_RATIO: f64 = 8.0;

/// Similarity of `a` and `b` on a 0..=100 scale
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    indel_similarity(&a, &b).round() as u8
}

/// Best of the plain, word-sorted and substring similarities of `a` and `b`
/// after case and punctuation folding, on a 0..=100 scale
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    let a = fold(a);
    let b = fold(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a_chars.len() <= b_chars.len() {
        (a_chars.len(), b_chars.len())
    } else {
        (b_chars.len(), a_chars.len())
    };
    let length_ratio = longer as f64 / shorter as f64;

    let plain = indel_similarity(&a_chars, &b_chars);
    let sorted_a: Vec<char> = sort_words(&a).chars().collect();
    let sorted_b: Vec<char> = sort_words(&b).chars().collect();

    let score = if length_ratio < PARTIAL_MIN_LENGTH_RATIO {
        plain.max(indel_similarity(&sorted_a, &sorted_b) * TOKEN_SCALE)
    } else {
        let scale = if length_ratio <= PARTIAL_MAX_LENGTH_RATIO { 0.9 } else { 0.6 };
        plain
            .max(partial_similarity(&a_chars, &b_chars) * scale)
            .max(partial_similarity(&sorted_a, &sorted_b) * TOKEN_SCALE * scale)
    };

    score.round() as u8
}

/// Lowercase, turn every non-alphanumeric character into a space, trim
fn fold(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .trim()
        .to_lowercase()
}

fn sort_words(text: &str) -> String {
    let mut words: Vec<&str> = text.split_whitespace().collect();
    words.sort_unstable();
    words.join(" ")
}

fn indel_similarity(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    (200 * lcs_len(a, b)) as f64 / total as f64
}

/// Best similarity of the shorter string against any same-length window of
/// the longer one, including windows cut short at either end
fn partial_similarity(a: &[char], b: &[char]) -> f64 {
    let (needle, haystack) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if needle.is_empty() {
        return 0.0;
    }

    let n = needle.len();
    let h = haystack.len();
    let mut best: f64 = 0.0;

    for end in 1..n {
        best = best.max(indel_similarity(needle, &haystack[..end]));
    }
    for start in 0..=(h - n) {
        best = best.max(indel_similarity(needle, &haystack[start..start + n]));
        if best >= 100.0 {
            return best;
        }
    }
    for start in (h - n + 1)..h {
        best = best.max(indel_similarity(needle, &haystack[start..]));
    }

    best
}

/// Length of the longest common subsequence, two-row dynamic programming
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// A candidate that cleared the threshold
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FuzzyMatch<'a> {
    pub candidate: &'a str,
    pub score: u8,
}

/// Best [`weighted_ratio`] candidate at or above `threshold`
///
/// Ties keep the earliest candidate, so table order decides between equally
/// close spellings.
pub fn best_match<'a>(target: &str, candidates: &[&'a str], threshold: u8) -> Option<FuzzyMatch<'a>> {
    let mut best: Option<FuzzyMatch<'a>> = None;

    for candidate in candidates {
        let score = weighted_ratio(target, candidate);
        if score < threshold {
            continue;
        }
        if best.map_or(true, |b| score > b.score) {
            best = Some(FuzzyMatch {
                candidate: *candidate,
                score,
            });
        }
    }

    best
}
