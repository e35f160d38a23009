use crate::infra::selection_from_parts;
use clap::Args;
use pbb_review::config::AppConfig;
use pbb_review::error::AppError;
use pbb_review::ingest::WorkbookImporter;
use pbb_review::review::ReviewReport;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Directory holding one CSV per workbook sheet (e.g. "Request Summary.csv")
    #[arg(long)]
    pub(crate) dir: PathBuf,
    /// Print the full report as JSON instead of the text summary
    #[arg(long)]
    pub(crate) json: bool,
    /// Restrict to one fund
    #[arg(long)]
    pub(crate) fund: Option<String>,
    /// Restrict to one department (or cost center)
    #[arg(long)]
    pub(crate) department: Option<String>,
    /// Restrict to one division
    #[arg(long)]
    pub(crate) division: Option<String>,
    /// Restrict to one program
    #[arg(long)]
    pub(crate) program: Option<String>,
    /// Restrict to one request type
    #[arg(long)]
    pub(crate) request_type: Option<String>,
    /// Restrict to one status
    #[arg(long)]
    pub(crate) status: Option<String>,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        dir,
        json,
        fund,
        department,
        division,
        program,
        request_type,
        status,
    } = args;

    let config = AppConfig::load()?;
    let dataset = WorkbookImporter::from_dir(dir)?;
    let filters = selection_from_parts(fund, department, division, program, request_type, status);
    let report = ReviewReport::build(&dataset, &filters, &config.analysis);

    if json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        println!("{rendered}");
        return Ok(());
    }

    render_text(&report);
    Ok(())
}

fn render_text(report: &ReviewReport) {
    println!("Budget review report");
    println!(
        "  {} requests | ongoing ${:.0} | one-time ${:.0} | total ${:.0}",
        report.totals.request_count,
        report.totals.ongoing,
        report.totals.onetime,
        report.totals.total
    );

    println!("\nRecommendations");
    for (disposition, slice) in &report.dispositions {
        println!(
            "  {:<7} {:>3} request(s)  ${:.0}",
            disposition.label(),
            slice.request_count,
            slice.amount
        );
    }

    println!("\nAlignment distribution");
    for (quartile, slice) in &report.quartiles {
        println!(
            "  {:<13} {:>3} line item(s)  ${:.0}",
            quartile.label(),
            slice.line_items,
            slice.amount
        );
    }

    println!("\nRequests");
    for analysis in &report.analyses {
        println!(
            "  {} | {} | {} | score {}/12 | {}",
            analysis.request_id,
            analysis.program,
            analysis.grid_key,
            analysis.total_score,
            analysis.disposition.label()
        );
    }

    if !report.departments.is_empty() {
        println!("\nDepartments");
        for (department, rollup) in &report.departments {
            println!(
                "  {:<24} {:>3} request(s)  {:>3} program(s)  ${:.0}",
                department, rollup.request_count, rollup.program_count, rollup.amount
            );
        }
    }
}
