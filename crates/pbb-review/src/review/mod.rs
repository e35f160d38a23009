pub mod analyzer;
pub mod domain;
pub mod fields;
mod narrative;
pub mod report;
pub mod scoring;

pub use analyzer::{analyze, QaPair, RequestAnalysis};
pub use domain::{
    BudgetDataset, Disposition, FilterSelection, FilterValue, FundingType, MandateLevel,
    OutcomesStrength, Quartile, QuartileBand, Record, Scalar, Severity,
};
pub use fields::{amounts_for, Amounts, FieldRole};
pub use report::{FilterOptions, ReviewReport};
