use std::fmt::Write;

use super::analyzer::RequestAnalysis;
use super::domain::{Disposition, FundingType, MandateLevel, OutcomesStrength, QuartileBand};

/// US-style thousands grouping, fractional part kept only when present.
pub(crate) fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let amount = amount.abs();
    let whole = amount.trunc() as u64;
    let fraction = amount - amount.trunc();

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if fraction > 1e-9 {
        let mut tail = format!("{fraction:.3}");
        // "0.250" -> ".25"
        tail.remove(0);
        while tail.ends_with('0') {
            tail.pop();
        }
        if tail.len() > 1 {
            grouped.push_str(&tail);
        }
    }

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Deterministic template assembly: header, context flags, the disposition
/// recommendation, the grid checklists, then the follow-up gates. Every
/// sentence is fixed; only resolved field values vary.
pub(crate) fn compose(analysis: &RequestAnalysis) -> String {
    let mut out = String::new();

    let quartile_code = analysis
        .best_quartile
        .map(|quartile| quartile.code())
        .unwrap_or("None");

    let _ = writeln!(out, "**Program:** {} ({})", analysis.program, analysis.department);
    let _ = writeln!(
        out,
        "**Quartile:** {} ({} Relevance)",
        quartile_code,
        analysis.quartile_band.label()
    );
    let _ = writeln!(
        out,
        "**Total Amount:** ${}",
        format_currency(analysis.amounts.total)
    );
    let _ = writeln!(out, "**Decision Profile:** {}", analysis.grid_key);
    out.push_str("\n---\n\n");

    match analysis.mandate_level {
        MandateLevel::Mandated => out.push_str(
            "**MANDATED**: This request is legally mandated or tied to a Board Motion/consent decree.\n\n",
        ),
        MandateLevel::Compliance => out.push_str(
            "**COMPLIANCE/RISK**: This request addresses compliance obligations or risk mitigation.\n\n",
        ),
        MandateLevel::None => {}
    }

    if analysis.has_outside_funding {
        out.push_str(
            "**NON-GF FUNDING**: Includes non-General Fund sources (grants, fees, or partnerships).\n\n",
        );
    } else if analysis.quartile_band == QuartileBand::Low {
        out.push_str(
            "**FUNDING CONCERN**: 100% General Fund requested for a lower-relevance (Q3/Q4) program.\n\n",
        );
    }

    if analysis.outcomes_strength == OutcomesStrength::Strong {
        out.push_str(
            "**STRONG EVIDENCE**: Clear performance metrics and outcome targets provided.\n\n",
        );
    } else {
        out.push_str(
            "**WEAK EVIDENCE**: Insufficient outcome data, KPIs, or evaluation plan.\n\n",
        );
    }

    out.push_str("---\n\n");

    let _ = writeln!(
        out,
        "## PBB SUGGESTS: **{}** (Score: {}/12)\n",
        analysis.disposition.label(),
        analysis.total_score
    );

    push_recommendation(&mut out, analysis);
    push_checklists(&mut out, analysis);
    push_followups(&mut out, analysis);

    out
}

fn push_recommendation(out: &mut String, analysis: &RequestAnalysis) {
    match analysis.disposition {
        Disposition::Approve => {
            if analysis.mandate_level == MandateLevel::Mandated {
                let strength = match analysis.outcomes_strength {
                    OutcomesStrength::Strong => "strong",
                    OutcomesStrength::Weak => "weak",
                };
                let _ = write!(
                    out,
                    "**PBB Recommendation:** PBB suggests APPROVE. This is a mandated program with {strength} outcomes evidence. "
                );
                if analysis.funding_type == FundingType::GfOnly
                    && analysis.quartile_band == QuartileBand::Low
                {
                    out.push_str(
                        "Given the lower quartile, PBB suggests requiring offsetting reductions or pursuing non-GF sources. ",
                    );
                }
                if analysis.outcomes_strength == OutcomesStrength::Weak {
                    out.push_str(
                        "PBB suggests requiring metrics and evaluation plan as condition of approval.\n\n",
                    );
                } else {
                    out.push_str(
                        "General Fund support appears justified based on mandate requirements.\n\n",
                    );
                }
            } else if analysis.funding_type == FundingType::NonGf {
                out.push_str(
                    "**PBB Recommendation:** PBB suggests APPROVE with non-GF priority. Strong proposal with external funding sources. ",
                );
                if analysis.quartile_band == QuartileBand::Low {
                    out.push_str(
                        "For Q3/Q4 programs, PBB suggests ensuring minimal or no GF backfill. ",
                    );
                }
                out.push_str(
                    "PBB recommends proceeding with clear cost recovery and sustainability plan.\n\n",
                );
            } else {
                out.push_str(
                    "**PBB Recommendation:** PBB suggests APPROVE but strengthen funding strategy. While outcomes are strong, PBB recommends adding cost recovery or partnership elements to reduce General Fund reliance.\n\n",
                );
            }
        }
        Disposition::Modify => {
            out.push_str(
                "**PBB Recommendation:** PBB suggests MODIFY before approval. This request shows merit but PBB recommends adjustments before proceeding:\n\n",
            );
        }
        Disposition::Defer => {
            out.push_str(
                "**PBB Recommendation:** PBB suggests DEFER. Insufficient business case for current approval based on PBB criteria. ",
            );
            if analysis.mandate_level == MandateLevel::Mandated {
                out.push_str("PBB recommends monitoring mandate requirements. ");
            }
            out.push_str("See PBB-recommended strengthening actions below.\n\n");
        }
        Disposition::Reject => {
            out.push_str("**PBB Recommendation:** PBB suggests REJECT OR SIGNIFICANT REDESIGN. ");
            out.push_str(
                "This low-relevance, GF-only request with weak outcomes does not meet PBB funding criteria. PBB recommends fundamental changes before reconsideration.\n\n",
            );
        }
    }
}

fn push_checklists(out: &mut String, analysis: &RequestAnalysis) {
    // A literal "N/A" head means the grid has nothing to verify up front.
    if analysis.verify_now.first() != Some(&"N/A") {
        out.push_str("### VERIFY NOW:\n\n");
        for item in analysis.verify_now {
            let _ = writeln!(out, "- {item}");
        }
        out.push('\n');
    }

    if !analysis.strengthen_with.is_empty() {
        out.push_str("### TO STRENGTHEN THIS REQUEST:\n\n");
        for item in analysis.strengthen_with {
            let _ = writeln!(out, "- {item}");
        }
        out.push('\n');
    }
}

/// Nine independently gated follow-up prompts, concatenated in fixed order.
fn push_followups(out: &mut String, analysis: &RequestAnalysis) {
    out.push_str("### SPECIFIC FOLLOW-UP ACTIONS:\n\n");

    if analysis.outcomes.score < 2 {
        out.push_str(
            "**KPIs & Evaluation:** Please add baseline→target values for 2–3 KPIs, the data source, and review cadence (e.g., monthly). We'll approve as a 90-day pilot pending KPI progress.\n\n",
        );
    }

    if analysis.funding.score == 0
        && (analysis.quartile_band == QuartileBand::Low
            || analysis.disposition != Disposition::Approve)
    {
        out.push_str(
            "**Funding/Offsets:** Identify at least one non-GF source (fee, grant, partner, restricted fund) covering ≥30% of the request, or propose an internal reallocation/offset equal to ≥20%.\n\n",
        );
    }

    if analysis.mandate_level == MandateLevel::Mandated && analysis.outcomes.score < 2 {
        out.push_str(
            "**Mandate Evidence:** Attach the statute/board motion/consent decree citation and define the minimum compliance scope. Include milestones and success criteria.\n\n",
        );
    }

    if analysis.mandate_level == MandateLevel::Compliance {
        out.push_str(
            "**Risk Reduction:** Link this request to a specific risk register item and quantify the expected reduction (e.g., 'reduce audit findings by 50% in 12 months').\n\n",
        );
    }

    if analysis.efficiency.score < 2 && analysis.disposition != Disposition::Reject {
        out.push_str(
            "**ROI/Efficiency:** Provide a cost-avoidance or productivity calculation (unit cost, throughput, payback). If uncertain, start with a 6-month pilot and measure.\n\n",
        );
    }

    if analysis.access.score < 2 && analysis.quartile_band == QuartileBand::High {
        out.push_str(
            "**Equity:** Name the priority population and specify a measurable access/outcome improvement (e.g., 'decrease wait time for X group from 12 to 6 weeks').\n\n",
        );
    }

    if analysis.quartile_band == QuartileBand::Low && analysis.funding_type == FundingType::GfOnly {
        out.push_str(
            "**Scope/Phasing:** Consider a phased approach (Phase 1 core features, Phase 2 optional enhancements) to reduce near-term GF use.\n\n",
        );
    }

    if analysis.funding.score == 1 {
        out.push_str(
            "**Partnership:** Add letters of intent (LOIs) or MOUs for partner contributions (space, staff time, cash match).\n\n",
        );
    }

    if analysis.mandate_level == MandateLevel::Mandated && analysis.quartile_band == QuartileBand::Low
    {
        out.push_str(
            "**Sunset/True-up:** Add a 12-month sunset and a true-up clause to right-size funding based on measured demand and KPI performance.\n\n",
        );
    }
}
