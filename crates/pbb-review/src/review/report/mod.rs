mod summary;
pub mod views;

pub use summary::{
    aggregate_by_department, aggregate_by_disposition, aggregate_by_program,
    aggregate_by_quartile, report_totals,
};
pub use views::{
    DepartmentRollup, DispositionSlice, FilterOptions, ProgramRollup, QuartileSlice, ReportTotals,
    ReviewReport,
};
