//! Single-string fuzzy scorer: exact (100), substring (80), then ordered subsequence.

/// Score for a case-insensitive exact match (and for two empty strings).
pub const EXACT_SCORE: u32 = 100;
/// Score for a case-insensitive substring match.
pub const SUBSTRING_SCORE: u32 = 80;
/// Base points for each matched character in the subsequence pass.
const CHAR_SCORE: u32 = 10;

/// Score `text` against `query`. Zero means no match.
///
/// The subsequence pass awards `10 + run` per matched character, where `run`
/// is the number of characters matched back to back before it, so contiguous
/// runs outrank scattered matches of the same length.
pub fn fuzzy_score(text: &str, query: &str) -> u32 {
    if query.trim().is_empty() {
        return if text.is_empty() && query.is_empty() {
            EXACT_SCORE
        } else {
            0
        };
    }

    let text = text.to_lowercase();
    let query = query.to_lowercase();

    if text == query {
        return EXACT_SCORE;
    }
    if text.contains(&query) {
        return SUBSTRING_SCORE;
    }

    let needle: Vec<char> = query.chars().collect();
    let mut matched = 0;
    let mut run = 0;
    let mut score = 0;

    for c in text.chars() {
        if matched == needle.len() {
            break;
        }
        if c == needle[matched] {
            score += CHAR_SCORE + run;
            run += 1;
            matched += 1;
        } else {
            run = 0;
        }
    }

    if matched == needle.len() {
        score
    } else {
        0
    }
}
