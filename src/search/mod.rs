//! Search primitives: fuzzy scoring and weighted multi-field ranking.

mod fuzzy;
mod weighted;

pub use fuzzy::{fuzzy_score, EXACT_SCORE, SUBSTRING_SCORE};
pub use weighted::{search, weighted_score, Field, Ranked, Searchable};
