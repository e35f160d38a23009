use metrics_exporter_prometheus::PrometheusHandle;
use pbb_review::config::AnalysisConfig;
use pbb_review::review::{FilterSelection, FilterValue};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) analysis: AnalysisConfig,
}

pub(crate) fn filter_value(raw: Option<String>) -> FilterValue {
    raw.map(FilterValue::from).unwrap_or_default()
}

pub(crate) fn selection_from_parts(
    fund: Option<String>,
    department: Option<String>,
    division: Option<String>,
    program: Option<String>,
    request_type: Option<String>,
    status: Option<String>,
) -> FilterSelection {
    FilterSelection {
        fund: filter_value(fund),
        department: filter_value(department),
        division: filter_value(division),
        program: filter_value(program),
        request_type: filter_value(request_type),
        status: filter_value(status),
    }
}
