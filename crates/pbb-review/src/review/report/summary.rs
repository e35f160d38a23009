use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::super::analyzer::{analyze, RequestAnalysis};
use super::super::domain::{BudgetDataset, Disposition, FilterSelection, Quartile, Record};
use super::super::fields::{self, FieldRole};
use super::views::{
    DepartmentRollup, DispositionSlice, FilterOptions, ProgramRollup, QuartileSlice, ReportTotals,
    ReviewReport,
};
use crate::config::AnalysisConfig;

impl ReviewReport {
    /// Runs the whole filter -> score -> aggregate pipeline once, as a
    /// single side-effect-free transformation over the dataset snapshot.
    pub fn build(
        dataset: &BudgetDataset,
        filters: &FilterSelection,
        config: &AnalysisConfig,
    ) -> ReviewReport {
        let requests = dataset.filtered_requests(filters);
        debug!(request_count = requests.len(), "building review report");

        let analyses: Vec<RequestAnalysis> = requests
            .iter()
            .map(|request| analyze(dataset, request))
            .collect();

        ReviewReport {
            filters: filters.clone(),
            totals: report_totals(&requests),
            filter_options: FilterOptions::collect(dataset),
            quartiles: aggregate_by_quartile(dataset, &requests),
            departments: aggregate_by_department(dataset, &requests),
            programs: aggregate_by_program(dataset, &requests, config),
            dispositions: aggregate_by_disposition(&analyses),
            analyses,
        }
    }
}

pub fn report_totals(requests: &[&Record]) -> ReportTotals {
    let mut totals = ReportTotals {
        request_count: requests.len(),
        ..ReportTotals::default()
    };

    for request in requests {
        let amounts = fields::amounts_for(request);
        totals.ongoing += amounts.ongoing;
        totals.onetime += amounts.onetime;
    }
    totals.total = totals.ongoing + totals.onetime;
    totals
}

/// Line-item counts and evenly split amounts per alignment quartile. All
/// four buckets are always present, zeroed when empty.
pub fn aggregate_by_quartile(
    dataset: &BudgetDataset,
    requests: &[&Record],
) -> BTreeMap<Quartile, QuartileSlice> {
    let mut buckets: BTreeMap<Quartile, QuartileSlice> = Quartile::ordered()
        .into_iter()
        .map(|quartile| (quartile, QuartileSlice::default()))
        .collect();

    for_each_request(dataset, requests, |_, line_items, total| {
        let share = total / line_items.len() as f64;
        for item in line_items {
            if let Some(quartile) = fields::quartile_of(item) {
                let slice = buckets.entry(quartile).or_default();
                slice.line_items += 1;
                slice.amount += share;
            }
        }
    });

    buckets
}

#[derive(Default)]
struct DepartmentAccum {
    requests: BTreeSet<String>,
    programs: BTreeSet<String>,
    amount: f64,
    quartiles: BTreeMap<Quartile, f64>,
}

/// Department rollups: distinct requests and programs, total amount (each
/// request counted once per department it touches), and the evenly split
/// quartile sub-distribution.
pub fn aggregate_by_department(
    dataset: &BudgetDataset,
    requests: &[&Record],
) -> BTreeMap<String, DepartmentRollup> {
    let mut accums: BTreeMap<String, DepartmentAccum> = BTreeMap::new();

    for_each_request(dataset, requests, |request_id, line_items, total| {
        let share = total / line_items.len() as f64;
        let departments: BTreeSet<String> = line_items
            .iter()
            .filter_map(|item| department_of(item))
            .collect();

        for department in departments {
            let accum = accums.entry(department.clone()).or_default();
            accum.requests.insert(request_id.to_string());
            accum.amount += total;

            for item in line_items {
                if department_of(item).as_deref() != Some(department.as_str()) {
                    continue;
                }
                if let Some(program) =
                    fields::resolved_display(item, FieldRole::Program).filter(|p| !p.is_empty())
                {
                    accum.programs.insert(program);
                }
                if let Some(quartile) = fields::quartile_of(item) {
                    *accum.quartiles.entry(quartile).or_insert(0.0) += share;
                }
            }
        }
    });

    accums
        .into_iter()
        .map(|(department, accum)| {
            (
                department,
                DepartmentRollup {
                    request_count: accum.requests.len(),
                    program_count: accum.programs.len(),
                    amount: accum.amount,
                    quartiles: accum.quartiles,
                },
            )
        })
        .collect()
}

#[derive(Default)]
struct ProgramAccum {
    quartile: Option<Quartile>,
    requests: BTreeSet<String>,
    requested_amount: f64,
    existing_total_cost: f64,
}

/// Department/program rollups with the synthetic existing-cost baseline.
pub fn aggregate_by_program(
    dataset: &BudgetDataset,
    requests: &[&Record],
    config: &AnalysisConfig,
) -> BTreeMap<String, BTreeMap<String, ProgramRollup>> {
    let mut accums: BTreeMap<String, BTreeMap<String, ProgramAccum>> = BTreeMap::new();

    for_each_request(dataset, requests, |request_id, line_items, total| {
        let share = total / line_items.len() as f64;
        for item in line_items {
            let department =
                department_of(item).unwrap_or_else(|| "Unknown Department".to_string());
            let program = fields::resolved_display(item, FieldRole::Program)
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| "Unknown Program".to_string());

            let accum = accums
                .entry(department)
                .or_default()
                .entry(program)
                .or_insert_with(|| ProgramAccum {
                    quartile: fields::quartile_of(item),
                    ..ProgramAccum::default()
                });

            accum.requested_amount += share;
            accum.requests.insert(request_id.to_string());
            if accum.existing_total_cost == 0.0 {
                accum.existing_total_cost = total * config.baseline_multiplier;
            }
        }
    });

    accums
        .into_iter()
        .map(|(department, programs)| {
            let programs = programs
                .into_iter()
                .map(|(program, accum)| {
                    (
                        program,
                        ProgramRollup {
                            quartile: accum.quartile,
                            request_count: accum.requests.len(),
                            requested_amount: accum.requested_amount,
                            existing_total_cost: accum.existing_total_cost,
                            proposed_total: accum.existing_total_cost + accum.requested_amount,
                        },
                    )
                })
                .collect();
            (department, programs)
        })
        .collect()
}

/// Request counts and dollar totals per recommended disposition.
pub fn aggregate_by_disposition(
    analyses: &[RequestAnalysis],
) -> BTreeMap<Disposition, DispositionSlice> {
    let mut buckets: BTreeMap<Disposition, DispositionSlice> = Disposition::ordered()
        .into_iter()
        .map(|disposition| (disposition, DispositionSlice::default()))
        .collect();

    for analysis in analyses {
        let slice = buckets.entry(analysis.disposition).or_default();
        slice.request_count += 1;
        slice.amount += analysis.amounts.total;
    }

    buckets
}

impl FilterOptions {
    /// Distinct values per filter dimension across the whole dataset,
    /// sorted for stable dropdown population.
    pub fn collect(dataset: &BudgetDataset) -> FilterOptions {
        let mut funds = BTreeSet::new();
        let mut departments = BTreeSet::new();
        let mut divisions = BTreeSet::new();
        let mut programs = BTreeSet::new();
        let mut request_types = BTreeSet::new();
        let mut statuses = BTreeSet::new();

        for item in dataset.personnel.iter().chain(dataset.non_personnel.iter()) {
            insert_value(&mut funds, fields::resolved_display(item, FieldRole::Fund));
            // Both a Department and a Cost Center column may carry values;
            // the options list surfaces both.
            insert_value(&mut departments, key_value(item, "department"));
            insert_value(&mut departments, key_value(item, "cost center"));
            insert_value(
                &mut divisions,
                fields::resolved_display(item, FieldRole::Division),
            );
            insert_value(
                &mut programs,
                fields::resolved_display(item, FieldRole::Program),
            );
            insert_value(&mut statuses, key_value(item, "status"));
        }

        for request in &dataset.request_summary {
            insert_value(&mut request_types, key_value(request, "type"));
            insert_value(&mut statuses, key_value(request, "status"));
        }

        FilterOptions {
            funds: funds.into_iter().collect(),
            departments: departments.into_iter().collect(),
            divisions: divisions.into_iter().collect(),
            programs: programs.into_iter().collect(),
            request_types: request_types.into_iter().collect(),
            statuses: statuses.into_iter().collect(),
        }
    }
}

fn insert_value(set: &mut BTreeSet<String>, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        set.insert(value);
    }
}

fn key_value(record: &Record, fragment: &str) -> Option<String> {
    record
        .first_match(|label| label.to_ascii_lowercase().contains(fragment))
        .map(|value| value.display())
}

fn department_of(item: &Record) -> Option<String> {
    fields::resolved_display(item, FieldRole::Department).filter(|d| !d.is_empty())
}

/// Shared walk: resolves each request's id, line items, and total amount,
/// skipping requests that cannot be joined.
fn for_each_request<F>(dataset: &BudgetDataset, requests: &[&Record], mut visit: F)
where
    F: FnMut(&str, &[&Record], f64),
{
    for request in requests {
        let Some(request_id) = fields::request_id(request) else {
            continue;
        };
        let line_items = dataset.line_items_for(&request_id);
        if line_items.is_empty() {
            continue;
        }
        let amounts = fields::amounts_for(request);
        visit(&request_id, &line_items, amounts.total);
    }
}
