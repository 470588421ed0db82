//! Weighted multi-field search over records that expose named text fields.

use std::borrow::Cow;

use super::fuzzy::fuzzy_score;

/// A searchable field and the multiplier applied to its fuzzy score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Field {
    pub key: &'static str,
    pub weight: f64,
}

impl Field {
    pub const fn new(key: &'static str, weight: f64) -> Self {
        Self { key, weight }
    }
}

/// Records that can be looked up by field key. Unknown or empty fields return `None`.
pub trait Searchable {
    fn field(&self, key: &str) -> Option<Cow<'_, str>>;
}

/// Sum of `fuzzy_score(field, term) * weight` over every field and whitespace-split term.
pub fn weighted_score<T: Searchable + ?Sized>(record: &T, query: &str, fields: &[Field]) -> f64 {
    let terms: Vec<&str> = query.split_whitespace().collect();
    if terms.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;
    for field in fields {
        let Some(value) = record.field(field.key) else {
            continue;
        };
        for term in &terms {
            total += f64::from(fuzzy_score(&value, term)) * field.weight;
        }
    }
    total
}

/// A record paired with its weighted score.
#[derive(Clone, Debug, PartialEq)]
pub struct Ranked<'a, T> {
    pub item: &'a T,
    pub score: f64,
}

/// Score every record, drop non-matches and sort best first. Ties keep input order.
pub fn search<'a, T: Searchable>(
    records: &'a [T],
    query: &str,
    fields: &[Field],
) -> Vec<Ranked<'a, T>> {
    let mut ranked: Vec<Ranked<'a, T>> = records
        .iter()
        .map(|item| Ranked {
            item,
            score: weighted_score(item, query, fields),
        })
        .filter(|r| r.score > 0.0)
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}
