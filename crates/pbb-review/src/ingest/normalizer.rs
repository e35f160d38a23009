/// Strips BOM and zero-width characters spreadsheet exports tend to smuggle
/// into the first header cell, then trims surrounding whitespace.
pub(crate) fn normalize_cell(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bom_and_trims() {
        assert_eq!(normalize_cell("\u{feff} Request ID "), "Request ID");
        assert_eq!(normalize_cell("\u{200b}"), "");
        assert_eq!(normalize_cell("  plain  value  "), "plain  value");
    }
}
