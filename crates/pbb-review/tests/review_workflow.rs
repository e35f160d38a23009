use std::io::Cursor;

use pbb_review::config::AnalysisConfig;
use pbb_review::ingest::{SheetKind, WorkbookImporter};
use pbb_review::review::{
    BudgetDataset, Disposition, FilterSelection, FilterValue, Quartile, ReviewReport,
};

const REQUEST_SUMMARY: &str = "\
Request ID,Description,Request Type,Status,Ongoing Cost,Onetime Cost
R100,Expand after-school program,Enhancement,Submitted,60000,0
R200,Replace records system,Enhancement,Submitted,10000,30000
R300,Discretionary signage refresh,New,Submitted,8000,0
R999,Orphaned request with no line items,New,Submitted,5000,0
";

const PERSONNEL: &str = "\
Request ID,Department,Division,Program,Fund,Quartile,Ongoing Cost
R100,Library,Youth Services,After School,General Fund,Most Aligned,45000
R200,Clerk,Records,Records Management,General Fund,Less Aligned,10000
R300,Public Works,Streets,Signage,General Fund,Least Aligned,8000
";

const NON_PERSONNEL: &str = "\
Request ID,Department,Division,Program,Fund,Quartile,Onetime Cost
R100,Library,Youth Services,After School,General Fund,Most Aligned,15000
R200,Clerk,Records,Records Management,General Fund,Less Aligned,30000
";

const REQUEST_QA: &str = "\
Request ID,Question Type,Question,Answer
R100,Funding,Describe outside funding,A foundation grant and partner match cover 40% of costs
R100,Outcomes,What are your KPIs?,Attendance kpi with baseline data and targets per site
R200,Mandate,Why now?,State statute requires retention; audit findings flagged compliance risk
";

fn imported_dataset() -> BudgetDataset {
    let mut dataset = BudgetDataset::default();
    dataset.request_summary =
        WorkbookImporter::read_sheet(SheetKind::RequestSummary, Cursor::new(REQUEST_SUMMARY))
            .expect("request summary parses");
    dataset.personnel = WorkbookImporter::read_sheet(SheetKind::Personnel, Cursor::new(PERSONNEL))
        .expect("personnel parses");
    dataset.non_personnel =
        WorkbookImporter::read_sheet(SheetKind::NonPersonnel, Cursor::new(NON_PERSONNEL))
            .expect("non-personnel parses");
    dataset.request_qa =
        WorkbookImporter::read_sheet(SheetKind::RequestQa, Cursor::new(REQUEST_QA))
            .expect("request q&a parses");
    dataset
}

#[test]
fn end_to_end_report_scores_and_aggregates() {
    let dataset = imported_dataset();
    let report = ReviewReport::build(
        &dataset,
        &FilterSelection::default(),
        &AnalysisConfig::default(),
    );

    // R999 has no line items and never reaches the report.
    assert_eq!(report.totals.request_count, 3);
    assert!(report.analyses.iter().all(|a| a.request_id != "R999"));

    let r100 = report
        .analyses
        .iter()
        .find(|a| a.request_id == "R100")
        .expect("R100 analyzed");
    assert_eq!(r100.best_quartile, Some(Quartile::MostAligned));
    assert_eq!(r100.alignment.score, 2);
    assert_eq!(r100.funding.score, 2);
    assert_eq!(r100.outcomes.score, 2);
    assert_eq!(r100.grid_key, "High-None-NonGF-Strong");
    assert_eq!(r100.disposition, Disposition::Approve);
    assert_eq!(r100.qa.len(), 2);
    assert!(r100.narrative.contains("PBB SUGGESTS: **APPROVE**"));

    let r200 = report
        .analyses
        .iter()
        .find(|a| a.request_id == "R200")
        .expect("R200 analyzed");
    assert_eq!(r200.grid_key, "Low-Mandated-GFonly-Weak");
    assert_eq!(r200.disposition, Disposition::Approve);
    assert!(r200.narrative.contains("**Sunset/True-up:**"));

    let r300 = report
        .analyses
        .iter()
        .find(|a| a.request_id == "R300")
        .expect("R300 analyzed");
    assert_eq!(r300.grid_key, "Low-None-GFonly-Weak");
    assert_eq!(r300.disposition, Disposition::Reject);
}

#[test]
fn quartile_distribution_conserves_filtered_spend() {
    let dataset = imported_dataset();
    let report = ReviewReport::build(
        &dataset,
        &FilterSelection::default(),
        &AnalysisConfig::default(),
    );

    let distributed: f64 = report.quartiles.values().map(|slice| slice.amount).sum();
    assert!((distributed - report.totals.total).abs() < 1e-6);
    assert_eq!(report.quartiles[&Quartile::MostAligned].line_items, 2);
    assert_eq!(report.quartiles[&Quartile::MostAligned].amount, 60_000.0);
}

#[test]
fn department_filter_narrows_the_request_set() {
    let dataset = imported_dataset();
    let mut filters = FilterSelection::default();
    filters.department = FilterValue::only("Library");

    let report = ReviewReport::build(&dataset, &filters, &AnalysisConfig::default());
    assert_eq!(report.totals.request_count, 1);
    assert_eq!(report.analyses[0].request_id, "R100");
    assert_eq!(report.totals.total, 60_000.0);

    let library = &report.departments["Library"];
    assert_eq!(library.request_count, 1);
    assert_eq!(library.amount, 60_000.0);
}

#[test]
fn program_summary_carries_the_synthetic_baseline() {
    let dataset = imported_dataset();
    let report = ReviewReport::build(
        &dataset,
        &FilterSelection::default(),
        &AnalysisConfig::default(),
    );

    let after_school = &report.programs["Library"]["After School"];
    assert_eq!(after_school.quartile, Some(Quartile::MostAligned));
    assert_eq!(after_school.requested_amount, 60_000.0);
    assert_eq!(after_school.existing_total_cost, 480_000.0);
    assert_eq!(
        after_school.proposed_total,
        after_school.existing_total_cost + after_school.requested_amount
    );
}

#[test]
fn question_type_column_never_shadows_the_question() {
    let dataset = imported_dataset();
    let report = ReviewReport::build(
        &dataset,
        &FilterSelection::default(),
        &AnalysisConfig::default(),
    );

    let r100 = report
        .analyses
        .iter()
        .find(|a| a.request_id == "R100")
        .expect("R100 analyzed");
    assert!(r100.qa.iter().any(|pair| pair.question == "What are your KPIs?"));
    assert!(r100.qa.iter().all(|pair| pair.question != "Outcomes"));
}

#[test]
fn filter_options_reflect_the_loaded_workbook() {
    let dataset = imported_dataset();
    let report = ReviewReport::build(
        &dataset,
        &FilterSelection::default(),
        &AnalysisConfig::default(),
    );

    assert_eq!(
        report.filter_options.departments,
        ["Clerk", "Library", "Public Works"]
    );
    assert_eq!(report.filter_options.funds, ["General Fund"]);
    assert_eq!(report.filter_options.request_types, ["Enhancement", "New"]);
    assert_eq!(report.filter_options.statuses, ["Submitted"]);
}
