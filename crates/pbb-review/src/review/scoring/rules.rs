use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use super::super::domain::Quartile;

/// One criterion's contribution: a 0-2 score plus the fixed justification
/// for whichever branch fired. Reasons are templates, never free text, so
/// report output stays reproducible run over run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CriterionScore {
    pub score: u8,
    pub reason: &'static str,
}

const fn scored(score: u8, reason: &'static str) -> CriterionScore {
    CriterionScore { score, reason }
}

// Keyword vocabularies for the plain-containment patterns. The digit-bearing
// patterns below use compiled regexes instead.
const METRIC_TERMS: &[&str] = &["kpi", "target", "baseline", "metric", "goal", "measur"];
const DATA_TERMS: &[&str] = &["data", "trend", "statistics", "baseline"];
const NEGATION_TERMS: &[&str] = &["n/a", "unknown", "none"];

const FEE_TERMS: &[&str] = &["fee", "cost recovery", "charge", "revenue"];
const PARTNER_TERMS: &[&str] = &["partner", "partnership", "contribution", "match"];
const EXPLORATORY_TERMS: &[&str] = &["potential", "exploring", "seeking"];
const ANY_SOURCE_TERMS: &[&str] = &["grant", "partner", "fee"];

const MANDATE_TERMS: &[&str] = &[
    "board motion",
    "consent decree",
    "doj",
    "mandate",
    "statute",
    "ordinance",
    "charter",
];
const COMPLIANCE_TERMS: &[&str] = &[
    "audit",
    "liability",
    "compliance",
    "risk",
    "safety",
    "violation",
    "penalty",
];

const ROI_TERMS: &[&str] = &[
    "roi",
    "return on investment",
    "payback",
    "cost avoidance",
    "cost savings",
];
const EFFICIENCY_TERMS: &[&str] = &[
    "productivity",
    "efficiency",
    "streamline",
    "reduce cost",
    "automate",
];

const EQUITY_TERMS: &[&str] = &[
    "equity",
    "underserved",
    "priority population",
    "disparit",
    "vulnerable",
    "disadvantaged",
];
const ACCESS_TERMS: &[&str] = &["access", "barrier", "inclusive", "reach", "serve"];
const OUTREACH_TERMS: &[&str] = &["community", "service", "outreach"];

// The profile-dimension flags deliberately use narrower vocabularies than the
// mandate scorer: a request can score mandate points for an ordinance
// citation without the whole request being classified as Mandated.
const MANDATE_FLAG_TERMS: &[&str] =
    &["board motion", "consent decree", "doj", "mandate", "statute"];
const COMPLIANCE_FLAG_TERMS: &[&str] = &["audit", "liability", "compliance", "risk", "safety"];
const OUTSIDE_FUNDING_TERMS: &[&str] = &["grant", "fee", "partner", "cost recovery"];

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}

/// True when `first` appears and `second` appears somewhere after it, the
/// containment equivalent of the `first.*second` pattern.
fn ordered_pair(text: &str, first: &str, second: &str) -> bool {
    text.find(first)
        .map(|at| text[at + first.len()..].contains(second))
        .unwrap_or(false)
}

fn quantified_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\d+|save.*\d+|\d+%|\d+ hours|\d+ fte")
            .expect("quantification pattern compiles")
    })
}

fn population_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\d+%|portion|community|residents|population|demographic")
            .expect("population pattern compiles")
    })
}

fn has_grant_source(text: &str) -> bool {
    text.contains("grant") || ordered_pair(text, "outside funding", "yes")
}

/// Criterion 1: strategic alignment, from the categorical quartile field.
pub(crate) fn score_alignment(quartile: Option<Quartile>) -> CriterionScore {
    match quartile {
        Some(Quartile::MostAligned) => scored(
            2,
            "Program quartile is Q1 (Most Aligned) - highest priority alignment with city strategic goals and community priorities",
        ),
        Some(Quartile::MoreAligned) => scored(
            2,
            "Program quartile is Q2 (More Aligned) - strong alignment with city strategic goals and community priorities",
        ),
        Some(Quartile::LessAligned) => scored(
            1,
            "Program quartile is Q3 (Less Aligned) - moderate alignment with city strategic goals",
        ),
        Some(Quartile::LeastAligned) => scored(
            0,
            "Program quartile is Q4 (Least Aligned) - lower priority alignment with current strategic goals",
        ),
        None => scored(0, "No quartile alignment data found in line items"),
    }
}

/// Criterion 2: measurable-outcome evidence in the Q&A text.
pub(crate) fn score_outcomes(qa_count: usize, text: &str) -> CriterionScore {
    let has_metrics = contains_any(text, METRIC_TERMS);
    let has_data = contains_any(text, DATA_TERMS);

    if has_metrics && has_data {
        return scored(
            2,
            "Request includes specific KPIs/metrics AND baseline data or trends showing measurable outcomes",
        );
    }
    if has_metrics {
        return scored(
            1,
            "Request mentions performance targets or metrics, but lacks supporting baseline data or outcome trends",
        );
    }
    if has_data && qa_count > 0 && !contains_any(text, NEGATION_TERMS) {
        return scored(
            1,
            "Request includes some data or information, but lacks specific measurable performance targets",
        );
    }
    scored(
        0,
        "No measurable outcomes, KPIs, targets, or performance data provided in request documentation",
    )
}

/// Criterion 3: funding strategy beyond the General Fund.
pub(crate) fn score_funding(text: &str) -> CriterionScore {
    let has_grant = has_grant_source(text);
    let has_fee = contains_any(text, FEE_TERMS);
    let has_partner = contains_any(text, PARTNER_TERMS);
    let distinct_sources = [has_grant, has_fee, has_partner]
        .iter()
        .filter(|present| **present)
        .count();

    if distinct_sources >= 2 {
        return scored(
            2,
            "Request identifies MULTIPLE non-General Fund sources (grants, fees, cost recovery, or partnership funding)",
        );
    }
    if has_grant {
        return scored(
            1,
            "Request mentions grant funding or outside funding sources, reducing General Fund dependency",
        );
    }
    if has_fee || has_partner {
        return scored(
            1,
            "Request includes cost recovery mechanisms (fees/charges) or partnership contributions",
        );
    }
    if contains_any(text, EXPLORATORY_TERMS) && contains_any(text, ANY_SOURCE_TERMS) {
        return scored(
            1,
            "Request mentions exploring or seeking non-General Fund sources, though not yet secured",
        );
    }
    scored(
        0,
        "No non-General Fund sources identified - request is 100% dependent on General Fund appropriation",
    )
}

/// Criterion 4: legal mandate and compliance risk.
pub(crate) fn score_mandate(text: &str) -> CriterionScore {
    let has_mandate = contains_any(text, MANDATE_TERMS);
    let has_compliance = contains_any(text, COMPLIANCE_TERMS);

    if has_mandate && has_compliance {
        return scored(
            2,
            "Request cites specific legal/regulatory mandate (board motion, statute, consent decree) AND identifies compliance risks or penalties",
        );
    }
    if has_mandate {
        return scored(
            1,
            "Request references legal or regulatory mandate, board motion, or statutory requirement",
        );
    }
    if has_compliance {
        return scored(
            1,
            "Request addresses compliance obligations, audit findings, liability mitigation, or safety risks",
        );
    }
    scored(
        0,
        "No legal mandates, compliance obligations, or significant regulatory risks identified in request",
    )
}

/// Criterion 5: efficiency and return on investment.
pub(crate) fn score_efficiency(text: &str) -> CriterionScore {
    let has_roi = contains_any(text, ROI_TERMS);
    let has_efficiency = contains_any(text, EFFICIENCY_TERMS);
    let has_quantification = quantified_pattern().is_match(text);

    if (has_roi || has_efficiency) && has_quantification {
        return scored(
            2,
            "Request demonstrates efficiency gains or ROI with QUANTIFIED savings, cost avoidance, or productivity improvements (includes dollar amounts, percentages, or time savings)",
        );
    }
    if has_roi || (has_efficiency && has_quantification) {
        return scored(
            1,
            "Request mentions efficiency improvements, cost savings, or ROI, with some quantification or specific metrics",
        );
    }
    if has_efficiency {
        return scored(
            1,
            "Request describes efficiency improvements or process streamlining, but lacks quantified ROI or savings calculations",
        );
    }
    scored(
        0,
        "No efficiency improvements, cost savings, ROI, or productivity gains identified in the request",
    )
}

/// Criterion 6: access and equity impact.
pub(crate) fn score_access(text: &str) -> CriterionScore {
    let has_equity = contains_any(text, EQUITY_TERMS);
    let has_access = contains_any(text, ACCESS_TERMS);
    let has_population_data = population_pattern().is_match(text);

    if (has_equity || has_access) && has_population_data {
        return scored(
            2,
            "Request explicitly addresses access or equity issues with SPECIFIC population data (percentages, demographics, or community impact metrics)",
        );
    }
    if has_equity {
        return scored(
            1,
            "Request mentions equity, underserved populations, or vulnerable communities, but lacks specific demographic data",
        );
    }
    if has_access || (contains_any(text, OUTREACH_TERMS) && has_population_data) {
        return scored(
            1,
            "Request addresses community access or service delivery with some population information",
        );
    }
    scored(
        0,
        "No specific attention to access, equity considerations, or underserved population impacts identified",
    )
}

pub(crate) fn mentions_mandate(text: &str) -> bool {
    contains_any(text, MANDATE_FLAG_TERMS)
}

pub(crate) fn mentions_compliance(text: &str) -> bool {
    contains_any(text, COMPLIANCE_FLAG_TERMS)
}

pub(crate) fn mentions_outside_funding(text: &str) -> bool {
    ordered_pair(text, "outside funding", "yes") || contains_any(text, OUTSIDE_FUNDING_TERMS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_maps_quartiles_to_bands() {
        assert_eq!(score_alignment(Some(Quartile::MostAligned)).score, 2);
        assert_eq!(score_alignment(Some(Quartile::MoreAligned)).score, 2);
        assert_eq!(score_alignment(Some(Quartile::LessAligned)).score, 1);
        assert_eq!(score_alignment(Some(Quartile::LeastAligned)).score, 0);
        let missing = score_alignment(None);
        assert_eq!(missing.score, 0);
        assert!(missing.reason.contains("No quartile alignment data"));
    }

    #[test]
    fn outcomes_requires_metrics_and_data_for_full_score() {
        assert_eq!(
            score_outcomes(1, "kpi targets with baseline data and trend lines").score,
            2
        );
        assert_eq!(score_outcomes(1, "we have a performance target").score, 1);
        assert_eq!(score_outcomes(1, "we collect usage data quarterly").score, 1);
        assert_eq!(score_outcomes(0, "we collect usage data quarterly").score, 0);
        assert_eq!(score_outcomes(1, "data available: none").score, 0);
        assert_eq!(score_outcomes(1, "no evidence provided").score, 0);
    }

    #[test]
    fn funding_counts_distinct_source_categories() {
        assert_eq!(score_funding("a state grant plus user fee revenue").score, 2);
        assert_eq!(score_funding("grant grant grant").score, 1);
        assert_eq!(score_funding("awarded a federal grant").score, 1);
        assert_eq!(score_funding("cost recovery through charges").score, 1);
        assert_eq!(score_funding("exploring a potential grant").score, 1);
        assert_eq!(score_funding("fully general fund").score, 0);
    }

    #[test]
    fn funding_recognizes_outside_funding_yes_answers() {
        assert_eq!(score_funding("outside funding available? yes").score, 1);
        assert_eq!(score_funding("yes, no outside funding").score, 0);
    }

    #[test]
    fn mandate_needs_both_patterns_for_full_score() {
        assert_eq!(
            score_mandate("consent decree requires this; audit findings confirm").score,
            2
        );
        assert_eq!(score_mandate("required by city ordinance").score, 1);
        assert_eq!(score_mandate("mitigates liability exposure").score, 1);
        assert_eq!(score_mandate("a nice-to-have improvement").score, 0);
    }

    #[test]
    fn efficiency_rewards_quantified_claims() {
        assert_eq!(
            score_efficiency("automation will save staff 500 hours annually").score,
            2
        );
        assert_eq!(score_efficiency("strong roi expected").score, 1);
        assert_eq!(score_efficiency("streamline intake processing").score, 1);
        assert_eq!(score_efficiency("adds a new service").score, 0);
    }

    #[test]
    fn access_rewards_population_data() {
        assert_eq!(
            score_access("expands access for residents; 40% of the community qualifies").score,
            2
        );
        assert_eq!(score_access("serves underserved families").score, 1);
        assert_eq!(score_access("removes a barrier to entry").score, 1);
        assert_eq!(
            score_access("community outreach reaching 12% of residents").score,
            2
        );
        assert_eq!(score_access("routine replacement of equipment").score, 0);
    }

    #[test]
    fn scores_stay_within_bounds() {
        let texts = [
            "",
            "grant fee partner kpi data audit mandate roi $5000 equity 10% residents",
            "nothing relevant here",
        ];
        for text in texts {
            for score in [
                score_outcomes(1, text),
                score_funding(text),
                score_mandate(text),
                score_efficiency(text),
                score_access(text),
            ] {
                assert!(score.score <= 2);
            }
        }
    }

    #[test]
    fn profile_flags_use_narrow_vocabularies() {
        assert!(mentions_mandate("per state statute"));
        assert!(!mentions_mandate("per city charter"));
        assert!(mentions_compliance("audit finding"));
        assert!(!mentions_compliance("penalty clause"));
        assert!(mentions_outside_funding("outside funding: yes"));
        assert!(mentions_outside_funding("matching grant"));
        assert!(!mentions_outside_funding("general fund only"));
    }
}
