use serde::Serialize;
use tracing::debug;

use super::domain::{
    BudgetDataset, Disposition, FundingType, MandateLevel, OutcomesStrength, Quartile,
    QuartileBand, Record, Severity,
};
use super::fields::{self, Amounts, FieldRole};
use super::narrative;
use super::scoring::{self, rules, CriterionScore};

/// A resolved question/answer pair attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// Everything the engine derives for one budget request: the six criterion
/// scores, the decision profile, the grid outcome, and the narrative.
/// Recomputed on demand from the current dataset; never cached across filter
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestAnalysis {
    pub request_id: String,
    pub description: String,
    pub department: String,
    pub program: String,
    pub best_quartile: Option<Quartile>,
    pub amounts: Amounts,
    pub alignment: CriterionScore,
    pub outcomes: CriterionScore,
    pub funding: CriterionScore,
    pub mandate: CriterionScore,
    pub efficiency: CriterionScore,
    pub access: CriterionScore,
    pub total_score: u8,
    pub quartile_band: QuartileBand,
    pub mandate_level: MandateLevel,
    pub funding_type: FundingType,
    pub outcomes_strength: OutcomesStrength,
    pub has_outside_funding: bool,
    pub grid_key: String,
    pub disposition: Disposition,
    pub severity: Severity,
    pub verify_now: &'static [&'static str],
    pub strengthen_with: &'static [&'static str],
    pub qa: Vec<QaPair>,
    /// Raw line-item records, passed through untouched so rendering
    /// collaborators can show every source column.
    pub line_items: Vec<Record>,
    pub narrative: String,
}

/// Scores one request against the current dataset. Pure given its inputs:
/// rerunning on unchanged data yields an identical result.
pub fn analyze(dataset: &BudgetDataset, request: &Record) -> RequestAnalysis {
    let request_id = fields::request_id(request).unwrap_or_default();
    let line_items = dataset.line_items_for(&request_id);
    let qa_records = dataset.qa_for(&request_id);
    let amounts = fields::amounts_for(request);

    // First non-null quartile in encounter order; deliberately not a
    // priority-ranked pick across items.
    let best_quartile = line_items.iter().find_map(|item| fields::quartile_of(item));

    let text = qa_records
        .iter()
        .map(|record| record.joined_text())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let alignment = rules::score_alignment(best_quartile);
    let outcomes = rules::score_outcomes(qa_records.len(), &text);
    let funding = rules::score_funding(&text);
    let mandate = rules::score_mandate(&text);
    let efficiency = rules::score_efficiency(&text);
    let access = rules::score_access(&text);

    let total_score = alignment.score
        + outcomes.score
        + funding.score
        + mandate.score
        + efficiency.score
        + access.score;

    let quartile_band = match best_quartile {
        Some(Quartile::MostAligned) | Some(Quartile::MoreAligned) => QuartileBand::High,
        _ => QuartileBand::Low,
    };

    let mandate_level = if rules::mentions_mandate(&text) {
        MandateLevel::Mandated
    } else if rules::mentions_compliance(&text) {
        MandateLevel::Compliance
    } else {
        MandateLevel::None
    };

    let has_outside_funding = rules::mentions_outside_funding(&text);
    let funding_type = if has_outside_funding {
        FundingType::NonGf
    } else {
        FundingType::GfOnly
    };

    let outcomes_strength = if outcomes.score >= 2 {
        OutcomesStrength::Strong
    } else {
        OutcomesStrength::Weak
    };

    let key = (quartile_band, mandate_level, funding_type, outcomes_strength);
    let grid_entry = scoring::decide(key);
    let grid_key = scoring::key_label(key);

    let department =
        fields::primary_value(&line_items, FieldRole::Department).unwrap_or_else(|| "Unknown".to_string());
    let program =
        fields::primary_value(&line_items, FieldRole::Program).unwrap_or_else(|| "Unknown".to_string());
    let description = fields::description(request).unwrap_or_else(|| "N/A".to_string());

    let qa = qa_records
        .iter()
        .filter_map(|record| {
            fields::qa_pair(record).map(|(question, answer)| QaPair { question, answer })
        })
        .collect();

    debug!(
        request_id = %request_id,
        total_score,
        grid_key = %grid_key,
        disposition = grid_entry.disposition.label(),
        "scored budget request"
    );

    let line_items = line_items.into_iter().cloned().collect();

    let mut analysis = RequestAnalysis {
        request_id,
        description,
        department,
        program,
        best_quartile,
        amounts,
        alignment,
        outcomes,
        funding,
        mandate,
        efficiency,
        access,
        total_score,
        quartile_band,
        mandate_level,
        funding_type,
        outcomes_strength,
        has_outside_funding,
        grid_key,
        disposition: grid_entry.disposition,
        severity: grid_entry.severity,
        verify_now: grid_entry.verify_now,
        strengthen_with: grid_entry.strengthen_with,
        qa,
        line_items,
        narrative: String::new(),
    };
    analysis.narrative = narrative::compose(&analysis);
    analysis
}
