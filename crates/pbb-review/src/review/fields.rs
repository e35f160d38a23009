use serde::Serialize;

use super::domain::{Quartile, Record, Scalar};

/// Semantic roles the resolver can locate across heterogeneous column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    RequestId,
    Description,
    Department,
    Program,
    Quartile,
    Fund,
    Division,
    Question,
    Answer,
}

fn role_matches(role: FieldRole, label: &str) -> bool {
    let label = label.to_ascii_lowercase();
    match role {
        FieldRole::RequestId => label.contains("request") && label.contains("id"),
        FieldRole::Description => label.contains("description") || label.contains("desc"),
        FieldRole::Department => label.contains("department"),
        FieldRole::Program => label.contains("program"),
        FieldRole::Quartile => label.contains("quartile"),
        FieldRole::Fund => label.contains("fund"),
        FieldRole::Division => label.contains("division"),
        // A Q&A sheet can carry both a "Question" and a "Question Type"
        // column; the type column must never win the question role.
        FieldRole::Question => label.contains("question") && !label.contains("type"),
        FieldRole::Answer => label.contains("answer"),
    }
}

/// Locates a value by role. First match wins, in the record's column order;
/// when multiple columns match, whichever the source emitted first is the
/// one downstream consumers see.
pub fn resolve_role<'a>(record: &'a Record, role: FieldRole) -> Option<&'a Scalar> {
    let direct = record.first_match(|label| role_matches(role, label));
    match role {
        FieldRole::Department => direct.or_else(|| {
            record.first_match(|label| label.to_ascii_lowercase().contains("cost center"))
        }),
        FieldRole::RequestId => {
            direct.or_else(|| record.first_match(|label| label.to_ascii_lowercase().contains("id")))
        }
        _ => direct,
    }
}

pub fn resolved_display(record: &Record, role: FieldRole) -> Option<String> {
    resolve_role(record, role).map(|value| value.display())
}

/// The request's unique identifier, trimmed. `None` means the record cannot
/// participate in line-item linkage and is dropped from the report set.
pub fn request_id(record: &Record) -> Option<String> {
    let id = resolved_display(record, FieldRole::RequestId)?;
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

pub fn description(record: &Record) -> Option<String> {
    resolved_display(record, FieldRole::Description).filter(|value| !value.is_empty())
}

/// First non-empty value for the role across the given items, in order.
pub fn primary_value(items: &[&Record], role: FieldRole) -> Option<String> {
    items
        .iter()
        .find_map(|item| resolved_display(item, role).filter(|value| !value.is_empty()))
}

pub fn quartile_of(item: &Record) -> Option<Quartile> {
    resolved_display(item, FieldRole::Quartile).and_then(|raw| Quartile::parse(&raw))
}

/// Question/answer pair for a Q&A record. Entries missing either side are
/// skipped by callers rather than treated as errors.
pub fn qa_pair(record: &Record) -> Option<(String, String)> {
    let question = resolved_display(record, FieldRole::Question)?;
    let answer = resolved_display(record, FieldRole::Answer)?;
    if question.is_empty() || answer.is_empty() {
        return None;
    }
    Some((question, answer))
}

/// Ongoing/one-time dollar totals for one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Amounts {
    pub ongoing: f64,
    pub onetime: f64,
    pub total: f64,
}

/// Sums every column whose label marks it as ongoing or one-time. A record
/// may contribute to both buckets when it carries distinctly named columns
/// for each. Non-numeric cells contribute zero.
pub fn amounts_for(record: &Record) -> Amounts {
    let mut ongoing = 0.0;
    let mut onetime = 0.0;

    for (label, value) in record.columns() {
        let label = label.to_ascii_lowercase();
        let amount = value.as_number().unwrap_or(0.0);

        if label.contains("ongoing") {
            ongoing += amount;
        }
        if label.contains("onetime") || label.contains("one-time") {
            onetime += amount;
        }
    }

    Amounts {
        ongoing,
        onetime,
        total: ongoing + onetime,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_prefers_request_id_over_bare_id() {
        let record = Record::from_pairs([
            ("Item ID", Scalar::Text("X9".to_string())),
            ("Request ID", Scalar::Text("R1".to_string())),
        ]);
        assert_eq!(request_id(&record).as_deref(), Some("R1"));
    }

    #[test]
    fn request_id_falls_back_to_any_id_key() {
        let record = Record::from_pairs([
            ("Name", Scalar::Text("widget".to_string())),
            ("Identifier", Scalar::Text("77".to_string())),
        ]);
        assert_eq!(request_id(&record).as_deref(), Some("77"));

        let record = Record::from_pairs([("Name", Scalar::Text("widget".to_string()))]);
        assert_eq!(request_id(&record), None);
    }

    #[test]
    fn first_matching_column_wins_in_enumeration_order() {
        let record = Record::from_pairs([
            ("Program Name", Scalar::Text("Trails".to_string())),
            ("Program Code", Scalar::Text("TR-01".to_string())),
        ]);
        assert_eq!(
            resolved_display(&record, FieldRole::Program).as_deref(),
            Some("Trails")
        );
    }

    #[test]
    fn empty_values_are_skipped_during_resolution() {
        let record = Record::from_pairs([
            ("Request ID", Scalar::Empty),
            ("Parent ID", Scalar::Text("R4".to_string())),
        ]);
        assert_eq!(request_id(&record).as_deref(), Some("R4"));
    }

    #[test]
    fn department_falls_back_to_cost_center() {
        let record = Record::from_pairs([
            ("Cost Center", Scalar::Text("CC-200".to_string())),
            ("Program", Scalar::Text("Trails".to_string())),
        ]);
        assert_eq!(
            resolved_display(&record, FieldRole::Department).as_deref(),
            Some("CC-200")
        );

        let record = Record::from_pairs([
            ("Cost Center", Scalar::Text("CC-200".to_string())),
            ("Department", Scalar::Text("Parks".to_string())),
        ]);
        assert_eq!(
            resolved_display(&record, FieldRole::Department).as_deref(),
            Some("Parks")
        );
    }

    #[test]
    fn question_role_never_selects_question_type() {
        let record = Record::from_pairs([
            ("Question Type", Scalar::Text("Outcomes".to_string())),
            ("Question", Scalar::Text("What are your KPIs?".to_string())),
            ("Answer", Scalar::Text("Response times".to_string())),
        ]);
        let (question, answer) = qa_pair(&record).expect("pair resolves");
        assert_eq!(question, "What are your KPIs?");
        assert_eq!(answer, "Response times");
    }

    #[test]
    fn qa_pair_requires_both_sides() {
        let record = Record::from_pairs([
            ("Question", Scalar::Text("What are your KPIs?".to_string())),
            ("Answer", Scalar::Empty),
        ]);
        assert_eq!(qa_pair(&record), None);
    }

    #[test]
    fn amounts_sum_ongoing_and_onetime_columns() {
        let record = Record::from_pairs([
            ("Ongoing Cost", Scalar::Number(1200.0)),
            ("One-Time Cost", Scalar::Text("300".to_string())),
            ("Onetime Equipment", Scalar::Number(50.0)),
            ("Notes", Scalar::Text("n/a".to_string())),
        ]);
        let amounts = amounts_for(&record);
        assert_eq!(amounts.ongoing, 1200.0);
        assert_eq!(amounts.onetime, 350.0);
        assert_eq!(amounts.total, amounts.ongoing + amounts.onetime);
    }

    #[test]
    fn non_numeric_cost_cells_contribute_zero() {
        let record = Record::from_pairs([
            ("Ongoing Cost", Scalar::Text("TBD".to_string())),
            ("Onetime Cost", Scalar::Number(75.0)),
        ]);
        let amounts = amounts_for(&record);
        assert_eq!(amounts.ongoing, 0.0);
        assert_eq!(amounts.total, 75.0);
    }
}
