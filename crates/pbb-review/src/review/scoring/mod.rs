mod grid;
pub(crate) mod rules;

pub use grid::{decide, key_label, GridEntry, GridKey, DECISION_GRID, FALLBACK_ENTRY};
pub use rules::CriterionScore;
