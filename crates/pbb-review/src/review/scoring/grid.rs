use super::super::domain::{
    Disposition, FundingType, MandateLevel, OutcomesStrength, QuartileBand, Severity,
};

/// The four-dimension profile the grid is keyed by.
pub type GridKey = (QuartileBand, MandateLevel, FundingType, OutcomesStrength);

/// One disposition policy: the recommended action, its severity, what must be
/// verified before approval, and how the request could be strengthened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridEntry {
    pub disposition: Disposition,
    pub severity: Severity,
    pub verify_now: &'static [&'static str],
    pub strengthen_with: &'static [&'static str],
}

use Disposition::{Approve, Defer, Modify, Reject};
use FundingType::{GfOnly, NonGf};
use MandateLevel::{Compliance, Mandated, None as NoMandate};
use OutcomesStrength::{Strong, Weak};
use QuartileBand::{High, Low};
use Severity::{Caution, Critical, Favorable};

const fn entry(
    disposition: Disposition,
    severity: Severity,
    verify_now: &'static [&'static str],
    strengthen_with: &'static [&'static str],
) -> GridEntry {
    GridEntry {
        disposition,
        severity,
        verify_now,
        strengthen_with,
    }
}

/// Budget-review policy table, 2 x 3 x 2 x 2 = 24 entries. The lists are
/// policy artifacts of this domain and are reproduced exactly; do not
/// reorder or reword them.
pub static DECISION_GRID: [(GridKey, GridEntry); 24] = [
    // High relevance (Q1-Q2)
    (
        (High, Mandated, NonGf, Strong),
        entry(
            Approve,
            Favorable,
            &["Statute/board reference", "Allowability of non-GF sources"],
            &["Final KPI list", "Compliance milestones", "Data source & cadence"],
        ),
    ),
    (
        (High, Mandated, GfOnly, Strong),
        entry(
            Approve,
            Favorable,
            &["Confirm mandate scope & minimums"],
            &["Cost offsets (phase-down plan, reallocation)", "Sunset/true-up triggers"],
        ),
    ),
    (
        (High, Mandated, NonGf, Weak),
        entry(
            Approve,
            Caution,
            &["That mandate truly requires this spend"],
            &["Baseline→target KPIs", "90-day evaluation plan", "Interim check-in"],
        ),
    ),
    (
        (High, Mandated, GfOnly, Weak),
        entry(
            Approve,
            Caution,
            &["Minimum-viable compliance level"],
            &["Add fee/grant search", "Partner MOUs", "Phased start", "Sunset clause"],
        ),
    ),
    (
        (High, Compliance, NonGf, Strong),
        entry(
            Approve,
            Favorable,
            &["Risk register link", "Risk reduction metric"],
            &["Cost avoidance calc", "SLA updates", "Internal control changes"],
        ),
    ),
    (
        (High, Compliance, GfOnly, Strong),
        entry(
            Modify,
            Caution,
            &["Materiality of risk", "Alternatives"],
            &["Add partial cost recovery", "Internal reallocation", "Pilot scope"],
        ),
    ),
    (
        (High, Compliance, NonGf, Weak),
        entry(
            Modify,
            Caution,
            &["That non-GF is real & timely"],
            &["KPIs", "6-mo pilot with go/no-go", "Light-weight evaluation plan"],
        ),
    ),
    (
        (High, Compliance, GfOnly, Weak),
        entry(
            Modify,
            Caution,
            &["Criticality (safety/liability)?"],
            &["Narrow scope", "Stage gates", "Non-GF plan within 60–90 days"],
        ),
    ),
    (
        (High, NoMandate, NonGf, Strong),
        entry(
            Approve,
            Favorable,
            &["No hidden GF backfill"],
            &["Pay-for-itself math", "Fee elasticity/grant terms", "Partner commitments"],
        ),
    ),
    (
        (High, NoMandate, GfOnly, Strong),
        entry(
            Modify,
            Caution,
            &["Alternatives considered"],
            &["Add cost recovery/partners", "Unit-cost reduction", "Partial reallocation"],
        ),
    ),
    (
        (High, NoMandate, NonGf, Weak),
        entry(
            Modify,
            Caution,
            &["Outcome plausibility"],
            &["KPIs & evaluation", "Start as pilot", "Tighten deliverables"],
        ),
    ),
    (
        (High, NoMandate, GfOnly, Weak),
        entry(
            Defer,
            Critical,
            &["N/A"],
            &["Tie to priority KPIs", "Find non-GF", "Reduce scope or integrate with Q1/Q2 work"],
        ),
    ),
    // Low relevance (Q3-Q4)
    (
        (Low, Mandated, NonGf, Strong),
        entry(
            Approve,
            Favorable,
            &["Minimum compliance scope"],
            &["Keep GF minimal", "Escrow/offsets", "Time-bound sunset"],
        ),
    ),
    (
        (Low, Mandated, GfOnly, Strong),
        entry(
            Approve,
            Caution,
            &["Is Q3/Q4 mapping correct?"],
            &["Identify fees/grants", "Swap lower-impact spend", "Phase", "Sunset"],
        ),
    ),
    (
        (Low, Mandated, NonGf, Weak),
        entry(
            Approve,
            Caution,
            &["That mandate truly applies to this program"],
            &["KPI baseline→target", "90-day review", "Non-GF documentation"],
        ),
    ),
    (
        (Low, Mandated, GfOnly, Weak),
        entry(
            Approve,
            Caution,
            &["Cheapest compliance path"],
            &["Tight scope", "Offsets", "Timeline to add non-GF", "Exit criteria"],
        ),
    ),
    (
        (Low, Compliance, NonGf, Strong),
        entry(
            Modify,
            Caution,
            &["Non-GF terms & durability"],
            &["No-GF pledge", "Measurable risk reduction", "Pilot + review"],
        ),
    ),
    (
        (Low, Compliance, GfOnly, Strong),
        entry(
            Modify,
            Caution,
            &["Impact scale vs. alternatives"],
            &["Require cost recovery", "Internal reallocation", "Narrower scope"],
        ),
    ),
    (
        (Low, Compliance, NonGf, Weak),
        entry(
            Defer,
            Critical,
            &["Realism of benefits"],
            &["Basic KPI set", "Partner LOIs", "Phase to prove value"],
        ),
    ),
    (
        (Low, Compliance, GfOnly, Weak),
        entry(
            Defer,
            Critical,
            &["If imminent, treat as mandate"],
            &["Pilot w/ non-GF", "Quantify liability avoided", "Combine with Q1/Q2"],
        ),
    ),
    (
        (Low, NoMandate, NonGf, Strong),
        entry(
            Approve,
            Favorable,
            &["No GF drift"],
            &["Full cost recovery", "Service redesign", "Contribution margin"],
        ),
    ),
    (
        (Low, NoMandate, GfOnly, Strong),
        entry(
            Defer,
            Critical,
            &["Competes with higher-Q needs"],
            &["Add fee/grant/partner", "ROI calc", "Phase behind Q1/Q2"],
        ),
    ),
    (
        (Low, NoMandate, NonGf, Weak),
        entry(
            Defer,
            Critical,
            &["N/A"],
            &["KPIs", "Tighten scope", "Prove demand/willingness-to-pay"],
        ),
    ),
    (
        (Low, NoMandate, GfOnly, Weak),
        entry(
            Reject,
            Critical,
            &["N/A"],
            &["Reframe to higher-Q outcome", "Non-GF plan", "Consolidate/streamline"],
        ),
    ),
];

/// Returned on a key miss. Unreachable while the table above stays
/// exhaustive; tests treat any hit as a defect signal.
pub static FALLBACK_ENTRY: GridEntry = entry(
    Modify,
    Caution,
    &["Unable to categorize - manual review needed"],
    &["Provide complete information on mandate, funding, and outcomes"],
);

pub fn decide(key: GridKey) -> &'static GridEntry {
    DECISION_GRID
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, entry)| entry)
        .unwrap_or(&FALLBACK_ENTRY)
}

/// Human-readable profile key, e.g. `High-Mandated-NonGF-Strong`.
pub fn key_label(key: GridKey) -> String {
    let (band, mandate, funding, outcomes) = key;
    format!(
        "{}-{}-{}-{}",
        band.label(),
        mandate.label(),
        funding.label(),
        outcomes.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_keys() -> Vec<GridKey> {
        let mut keys = Vec::new();
        for band in [High, Low] {
            for mandate in [Mandated, Compliance, NoMandate] {
                for funding in [NonGf, GfOnly] {
                    for outcomes in [Strong, Weak] {
                        keys.push((band, mandate, funding, outcomes));
                    }
                }
            }
        }
        keys
    }

    #[test]
    fn grid_is_total_over_all_profiles() {
        let keys = all_keys();
        assert_eq!(keys.len(), 24);
        for key in keys {
            let entry = decide(key);
            assert!(
                !std::ptr::eq(entry, &FALLBACK_ENTRY),
                "fallback reachable for {}",
                key_label(key)
            );
            assert!(!entry.verify_now.is_empty());
            assert!(!entry.strengthen_with.is_empty());
        }
    }

    #[test]
    fn grid_has_no_duplicate_keys() {
        let mut labels: Vec<String> = DECISION_GRID
            .iter()
            .map(|(key, _)| key_label(*key))
            .collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 24);
    }

    #[test]
    fn strongest_and_weakest_profiles_hit_expected_dispositions() {
        let best = decide((High, Mandated, NonGf, Strong));
        assert_eq!(best.disposition, Disposition::Approve);
        assert_eq!(best.severity, Severity::Favorable);
        assert_eq!(best.verify_now[0], "Statute/board reference");

        let worst = decide((Low, NoMandate, GfOnly, Weak));
        assert_eq!(worst.disposition, Disposition::Reject);
        assert_eq!(worst.severity, Severity::Critical);
        assert_eq!(worst.verify_now, ["N/A"]);
    }

    #[test]
    fn mandated_profiles_always_approve() {
        for key in all_keys() {
            if key.1 == Mandated {
                assert_eq!(decide(key).disposition, Disposition::Approve);
            }
        }
    }

    #[test]
    fn key_label_formats_all_dimensions() {
        assert_eq!(
            key_label((Low, NoMandate, GfOnly, Weak)),
            "Low-None-GFonly-Weak"
        );
        assert_eq!(
            key_label((High, Compliance, NonGf, Strong)),
            "High-Compliance-NonGF-Strong"
        );
    }
}
