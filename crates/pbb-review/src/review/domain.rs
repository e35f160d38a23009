use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::fields::{self, FieldRole};

/// One cell value as produced by the tabular loader. Sources are untyped, so
/// anything that is not cleanly numeric stays text.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(f64),
    Empty,
}

impl Scalar {
    pub(crate) fn from_cell(cell: &str) -> Self {
        if cell.is_empty() {
            Scalar::Empty
        } else {
            Scalar::Text(cell.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Scalar::Text(text) => text.trim().is_empty(),
            Scalar::Number(_) => false,
            Scalar::Empty => true,
        }
    }

    /// Numeric reading used by the amount aggregator. Non-numeric text
    /// contributes zero rather than erroring.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(value) => Some(*value),
            Scalar::Text(text) => text.trim().parse::<f64>().ok(),
            Scalar::Empty => None,
        }
    }

    /// Display form used for filter equality and request-id joins.
    pub fn display(&self) -> String {
        match self {
            Scalar::Text(text) => text.trim().to_string(),
            Scalar::Number(value) => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    format!("{}", *value as i64)
                } else {
                    format!("{value}")
                }
            }
            Scalar::Empty => String::new(),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Text(text) => serializer.serialize_str(text),
            Scalar::Number(value) => serializer.serialize_f64(*value),
            Scalar::Empty => serializer.serialize_none(),
        }
    }
}

/// An ordered column-label -> value mapping. Column labels are whatever the
/// source table produced; semantic fields are located by role, not by exact
/// name, and "first match wins" contracts depend on insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    columns: Vec<(String, Scalar)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, value: Scalar) {
        self.columns.push((label.into(), value));
    }

    /// Test/demo constructor from literal pairs.
    pub fn from_pairs<I, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, Scalar)>,
        L: Into<String>,
    {
        let mut record = Record::new();
        for (label, value) in pairs {
            record.push(label, value);
        }
        record
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.columns.iter().map(|(label, value)| (label.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// First column whose label satisfies the predicate and whose value is
    /// non-empty, in insertion order.
    pub fn first_match<F>(&self, predicate: F) -> Option<&Scalar>
    where
        F: Fn(&str) -> bool,
    {
        self.columns
            .iter()
            .find(|(label, value)| predicate(label) && !value.is_empty())
            .map(|(_, value)| value)
    }

    /// Every non-empty value joined with single spaces, the raw material the
    /// text classifiers operate on.
    pub fn joined_text(&self) -> String {
        self.columns
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(_, value)| value.display())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (label, value) in &self.columns {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// Alignment band assigned to a program by the priority-ranking process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quartile {
    MostAligned,
    MoreAligned,
    LessAligned,
    LeastAligned,
}

impl Quartile {
    /// Accepts both the Q1-Q4 source codes and the spelled-out labels.
    pub fn parse(raw: &str) -> Option<Quartile> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "q1" | "most aligned" => Some(Quartile::MostAligned),
            "q2" | "more aligned" => Some(Quartile::MoreAligned),
            "q3" | "less aligned" => Some(Quartile::LessAligned),
            "q4" | "least aligned" => Some(Quartile::LeastAligned),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Quartile::MostAligned => "Most Aligned",
            Quartile::MoreAligned => "More Aligned",
            Quartile::LessAligned => "Less Aligned",
            Quartile::LeastAligned => "Least Aligned",
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Quartile::MostAligned => "Q1",
            Quartile::MoreAligned => "Q2",
            Quartile::LessAligned => "Q3",
            Quartile::LeastAligned => "Q4",
        }
    }

    pub const fn ordered() -> [Quartile; 4] {
        [
            Quartile::MostAligned,
            Quartile::MoreAligned,
            Quartile::LessAligned,
            Quartile::LeastAligned,
        ]
    }
}

/// High = Q1/Q2, Low = Q3/Q4 (or no quartile data at all).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QuartileBand {
    High,
    Low,
}

impl QuartileBand {
    pub const fn label(self) -> &'static str {
        match self {
            QuartileBand::High => "High",
            QuartileBand::Low => "Low",
        }
    }
}

/// Ascending strength of the legal or regulatory obligation behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MandateLevel {
    Mandated,
    Compliance,
    None,
}

impl MandateLevel {
    pub const fn label(self) -> &'static str {
        match self {
            MandateLevel::Mandated => "Mandated",
            MandateLevel::Compliance => "Compliance",
            MandateLevel::None => "None",
        }
    }
}

/// Whether any non-General-Fund source backs the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FundingType {
    NonGf,
    GfOnly,
}

impl FundingType {
    pub const fn label(self) -> &'static str {
        match self {
            FundingType::NonGf => "NonGF",
            FundingType::GfOnly => "GFonly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OutcomesStrength {
    Strong,
    Weak,
}

impl OutcomesStrength {
    pub const fn label(self) -> &'static str {
        match self {
            OutcomesStrength::Strong => "Strong",
            OutcomesStrength::Weak => "Weak",
        }
    }
}

/// The engine's recommended action on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Disposition {
    Approve,
    Modify,
    Defer,
    Reject,
}

impl Disposition {
    pub const fn label(self) -> &'static str {
        match self {
            Disposition::Approve => "APPROVE",
            Disposition::Modify => "MODIFY",
            Disposition::Defer => "DEFER",
            Disposition::Reject => "REJECT",
        }
    }

    pub const fn ordered() -> [Disposition; 4] {
        [
            Disposition::Approve,
            Disposition::Modify,
            Disposition::Defer,
            Disposition::Reject,
        ]
    }
}

/// Traffic-light severity attached to each grid entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    Favorable,
    Caution,
    Critical,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Favorable => "favorable",
            Severity::Caution => "caution",
            Severity::Critical => "critical",
        }
    }

    pub const fn hex(self) -> &'static str {
        match self {
            Severity::Favorable => "#28a745",
            Severity::Caution => "#ffc107",
            Severity::Critical => "#dc3545",
        }
    }
}

/// One filter dimension: either the "all" sentinel or a specific value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterValue {
    #[default]
    All,
    Only(String),
}

impl FilterValue {
    pub fn only(value: impl Into<String>) -> Self {
        FilterValue::Only(value.into())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FilterValue::All)
    }
}

impl From<String> for FilterValue {
    fn from(raw: String) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            FilterValue::All
        } else {
            FilterValue::Only(trimmed.to_string())
        }
    }
}

impl From<FilterValue> for String {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::All => "all".to_string(),
            FilterValue::Only(value) => value,
        }
    }
}

/// Current selection across the six filter dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub fund: FilterValue,
    #[serde(default)]
    pub department: FilterValue,
    #[serde(default)]
    pub division: FilterValue,
    #[serde(default)]
    pub program: FilterValue,
    #[serde(default)]
    pub request_type: FilterValue,
    #[serde(default)]
    pub status: FilterValue,
}

/// The Record Store: normalized in-memory tables for the five logical sheets.
#[derive(Debug, Clone, Default)]
pub struct BudgetDataset {
    pub request_summary: Vec<Record>,
    pub personnel: Vec<Record>,
    pub non_personnel: Vec<Record>,
    pub request_qa: Vec<Record>,
    pub budget_summary: Vec<Record>,
}

impl BudgetDataset {
    /// Personnel plus non-personnel items whose resolved request id equals
    /// `request_id` (trimmed, case-sensitive).
    pub fn line_items_for(&self, request_id: &str) -> Vec<&Record> {
        let wanted = request_id.trim();
        if wanted.is_empty() {
            return Vec::new();
        }

        self.personnel
            .iter()
            .chain(self.non_personnel.iter())
            .filter(|item| fields::request_id(item).as_deref() == Some(wanted))
            .collect()
    }

    /// Q&A records referencing the request id in any field.
    pub fn qa_for(&self, request_id: &str) -> Vec<&Record> {
        let wanted = request_id.trim();
        if wanted.is_empty() {
            return Vec::new();
        }

        self.request_qa
            .iter()
            .filter(|entry| entry.columns().any(|(_, value)| value.display() == wanted))
            .collect()
    }

    /// Requests that survive the current filter selection. A request with no
    /// resolvable id, or with zero line items, is excluded regardless of the
    /// filter settings.
    pub fn filtered_requests(&self, filters: &FilterSelection) -> Vec<&Record> {
        self.request_summary
            .iter()
            .filter(|request| self.request_passes(request, filters))
            .collect()
    }

    fn request_passes(&self, request: &Record, filters: &FilterSelection) -> bool {
        let Some(request_id) = fields::request_id(request) else {
            return false;
        };

        let line_items = self.line_items_for(&request_id);
        if line_items.is_empty() {
            return false;
        }

        if let FilterValue::Only(fund) = &filters.fund {
            if !line_items.iter().any(|item| {
                fields::resolved_display(item, FieldRole::Fund).as_deref() == Some(fund.as_str())
            }) {
                return false;
            }
        }

        if let FilterValue::Only(department) = &filters.department {
            if !line_items.iter().any(|item| {
                fields::resolved_display(item, FieldRole::Department).as_deref()
                    == Some(department.as_str())
            }) {
                return false;
            }
        }

        if let FilterValue::Only(division) = &filters.division {
            if !line_items.iter().any(|item| {
                fields::resolved_display(item, FieldRole::Division).as_deref()
                    == Some(division.as_str())
            }) {
                return false;
            }
        }

        if let FilterValue::Only(program) = &filters.program {
            if !line_items.iter().any(|item| {
                fields::resolved_display(item, FieldRole::Program).as_deref()
                    == Some(program.as_str())
            }) {
                return false;
            }
        }

        if let FilterValue::Only(request_type) = &filters.request_type {
            if !record_key_value_matches(request, "type", request_type) {
                return false;
            }
        }

        if let FilterValue::Only(status) = &filters.status {
            if !record_key_value_matches(request, "status", status) {
                return false;
            }
        }

        true
    }
}

fn record_key_value_matches(record: &Record, key_fragment: &str, wanted: &str) -> bool {
    record.columns().any(|(label, value)| {
        label.to_ascii_lowercase().contains(key_fragment) && value.display() == wanted
    })
}
