use std::collections::BTreeMap;

use serde::Serialize;

use super::super::analyzer::RequestAnalysis;
use super::super::domain::{Disposition, FilterSelection, Quartile};

/// Headline totals for the filtered request set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ReportTotals {
    pub request_count: usize,
    pub ongoing: f64,
    pub onetime: f64,
    pub total: f64,
}

/// Per-quartile share of the filtered spend. Amounts distribute each
/// request's total evenly across its line items before bucketing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct QuartileSlice {
    pub line_items: usize,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DepartmentRollup {
    pub request_count: usize,
    pub program_count: usize,
    pub amount: f64,
    pub quartiles: BTreeMap<Quartile, f64>,
}

/// Department/program cell of the program summary. The existing cost is a
/// configured multiple of the first contributing request's total, standing in
/// for a real baseline budget feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgramRollup {
    pub quartile: Option<Quartile>,
    pub request_count: usize,
    pub requested_amount: f64,
    pub existing_total_cost: f64,
    pub proposed_total: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DispositionSlice {
    pub request_count: usize,
    pub amount: f64,
}

/// Distinct values per filter dimension, for populating filter controls.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub funds: Vec<String>,
    pub departments: Vec<String>,
    pub divisions: Vec<String>,
    pub programs: Vec<String>,
    pub request_types: Vec<String>,
    pub statuses: Vec<String>,
}

/// One fully computed report over an immutable dataset snapshot: the
/// filtered request set with per-request analyses plus every rollup the
/// rendering collaborators consume.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewReport {
    pub filters: FilterSelection,
    pub totals: ReportTotals,
    pub filter_options: FilterOptions,
    pub analyses: Vec<RequestAnalysis>,
    pub quartiles: BTreeMap<Quartile, QuartileSlice>,
    pub departments: BTreeMap<String, DepartmentRollup>,
    pub programs: BTreeMap<String, BTreeMap<String, ProgramRollup>>,
    pub dispositions: BTreeMap<Disposition, DispositionSlice>,
}
