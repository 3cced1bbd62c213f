//! Detailed view: every raw record, searchable and grouped by sheet.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::models::UploadErrorRecord;

/// Searchable, sheet-grouped list of error records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView<'a> {
    search: String,
    records: Vec<&'a UploadErrorRecord>,
}

impl<'a> DetailView<'a> {
    /// Records of `all` matching `search` (blank search keeps everything).
    pub fn new(all: &'a [UploadErrorRecord], search: &str) -> Self {
        let records = all.iter().filter(|r| matches_search(r, search)).collect();
        Self {
            search: search.to_string(),
            records,
        }
    }

    pub fn records(&self) -> &[&'a UploadErrorRecord] {
        &self.records
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// A search is active and nothing matched.
    pub fn no_results(&self) -> bool {
        !self.search.trim().is_empty() && self.records.is_empty()
    }

    /// Count per error type over the filtered records, first-seen order.
    pub fn type_counts(&self) -> Vec<(&'a str, usize)> {
        let mut counts: Vec<(&'a str, usize)> = Vec::new();
        let mut index: HashMap<&'a str, usize> = HashMap::new();

        for &record in &self.records {
            let tag = record.error_type.as_str();
            match index.get(tag) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(tag, counts.len());
                    counts.push((tag, 1));
                }
            }
        }
        counts
    }

    /// Filtered records grouped by sheet name, first-seen order.
    pub fn by_sheet(&self) -> Vec<(&'a str, Vec<&'a UploadErrorRecord>)> {
        let mut sheets: Vec<(&'a str, Vec<&'a UploadErrorRecord>)> = Vec::new();
        let mut index: HashMap<&'a str, usize> = HashMap::new();

        for &record in &self.records {
            let sheet = record.sheet_name.as_str();
            match index.get(sheet) {
                Some(&i) => sheets[i].1.push(record),
                None => {
                    index.insert(sheet, sheets.len());
                    sheets.push((sheet, vec![record]));
                }
            }
        }
        sheets
    }

    /// Plain-text rendering.
    pub fn render(&self) -> String {
        let mut out = String::new();

        if self.no_results() {
            let _ = writeln!(out, "No errors match \"{}\".", self.search);
            return out;
        }
        if self.records.is_empty() {
            out.push_str("No errors.\n");
            return out;
        }

        let badges: Vec<String> = self
            .type_counts()
            .iter()
            .map(|(tag, count)| format!("{}: {}", tag, count))
            .collect();
        let _ = writeln!(out, "{} errors  |  {}", self.records.len(), badges.join("  "));

        for (sheet, records) in self.by_sheet() {
            let _ = writeln!(out, "\n📄 {} ({})", sheet, records.len());
            for record in records {
                let row = record
                    .row_number
                    .map(|n| format!("row {}", n))
                    .unwrap_or_else(|| "row -".to_string());
                let column = record
                    .column_name
                    .as_deref()
                    .map(|c| format!(", {}", c))
                    .unwrap_or_default();
                let value = record
                    .example_value()
                    .map(|v| format!(" (value: \"{}\")", v))
                    .unwrap_or_default();
                let _ = writeln!(
                    out,
                    "   {}{}  {}  {}{}",
                    row, column, record.error_type, record.error_message, value
                );
            }
        }
        out
    }
}

/// Case-insensitive substring match on message, sheet, type, column or value.
pub fn matches_search(record: &UploadErrorRecord, search: &str) -> bool {
    if search.trim().is_empty() {
        return true;
    }
    let needle = search.to_lowercase();

    let contains = |field: &str| field.to_lowercase().contains(&needle);
    contains(&record.error_message)
        || contains(&record.sheet_name)
        || contains(&record.error_type)
        || record.column_name.as_deref().is_some_and(contains)
        || record.field_value.as_deref().is_some_and(contains)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sheet: &str, error_type: &str, column: Option<&str>, value: Option<&str>, message: &str) -> UploadErrorRecord {
        UploadErrorRecord {
            sheet_name: sheet.to_string(),
            row_number: Some(2),
            column_name: column.map(String::from),
            error_type: error_type.to_string(),
            error_message: message.to_string(),
            field_value: value.map(String::from),
            ..Default::default()
        }
    }

    fn sample() -> Vec<UploadErrorRecord> {
        vec![
            record("PROG001_LEASE", "INVALID_LENDER", Some("Lender"), Some("ZZZ"), "Unknown lender"),
            record("PROG002_RETAIL", "INVALID_GEO_CODE", Some("Region"), Some("XX"), "Unknown region"),
            record("PROG001_LEASE", "INVALID_PRICING_VALUE", Some("Rate"), Some("abc"), "Not a number"),
            record("PROG002_RETAIL", "INVALID_LENDER", None, None, "Lender column missing"),
        ]
    }

    #[test]
    fn test_search_is_sound_and_complete() {
        let records = sample();
        for term in ["lender", "PROG002", "geo_code", "rate", "zzz", "nothing-here", "UNKNOWN"] {
            let view = DetailView::new(&records, term);
            for record in &records {
                let returned = view.records().iter().any(|r| std::ptr::eq(*r, record));
                assert_eq!(returned, matches_search(record, term), "term {:?}", term);
            }
            for returned in view.records() {
                let needle = term.to_lowercase();
                let fields = [
                    Some(returned.error_message.as_str()),
                    Some(returned.sheet_name.as_str()),
                    Some(returned.error_type.as_str()),
                    returned.column_name.as_deref(),
                    returned.field_value.as_deref(),
                ];
                assert!(fields.iter().flatten().any(|f| f.to_lowercase().contains(&needle)));
            }
        }
    }

    #[test]
    fn test_search_matches_each_field() {
        let records = sample();
        assert_eq!(DetailView::new(&records, "not a NUMBER").records().len(), 1);
        assert_eq!(DetailView::new(&records, "retail").records().len(), 2);
        assert_eq!(DetailView::new(&records, "invalid_lender").records().len(), 2);
        assert_eq!(DetailView::new(&records, "region").records().len(), 1);
        assert_eq!(DetailView::new(&records, "xx").records().len(), 1);
    }

    #[test]
    fn test_search_term_is_not_trimmed() {
        let records = sample();
        let view = DetailView::new(&records, "lender ");
        assert_eq!(view.records().len(), 1);
        assert_eq!(view.records()[0].error_message, "Lender column missing");
        assert_eq!(DetailView::new(&records, "lender").records().len(), 2);
        assert!(!matches_search(&records[0], " lender "));
    }

    #[test]
    fn test_empty_search_keeps_everything() {
        let records = sample();
        let view = DetailView::new(&records, "   ");
        assert_eq!(view.records().len(), 4);
        assert!(!view.no_results());
    }

    #[test]
    fn test_type_counts_follow_filter() {
        let records = sample();
        let all = DetailView::new(&records, "");
        assert_eq!(
            all.type_counts(),
            vec![("INVALID_LENDER", 2), ("INVALID_GEO_CODE", 1), ("INVALID_PRICING_VALUE", 1)]
        );

        let filtered = DetailView::new(&records, "PROG001");
        assert_eq!(
            filtered.type_counts(),
            vec![("INVALID_LENDER", 1), ("INVALID_PRICING_VALUE", 1)]
        );
    }

    #[test]
    fn test_grouped_by_sheet() {
        let records = sample();
        let view = DetailView::new(&records, "");
        let sheets: Vec<(&str, usize)> = view.by_sheet().iter().map(|(s, r)| (*s, r.len())).collect();
        assert_eq!(sheets, vec![("PROG001_LEASE", 2), ("PROG002_RETAIL", 2)]);
    }

    #[test]
    fn test_no_results_message() {
        let records = sample();
        let view = DetailView::new(&records, "missing-thing");
        assert!(view.no_results());
        assert_eq!(view.render(), "No errors match \"missing-thing\".\n");
    }

    #[test]
    fn test_render_lists_sheets() {
        let records = sample();
        let rendered = DetailView::new(&records, "").render();
        assert!(rendered.starts_with("4 errors"));
        assert!(rendered.contains("📄 PROG001_LEASE (2)"));
        assert!(rendered.contains("row 2, Lender  INVALID_LENDER  Unknown lender (value: \"ZZZ\")"));
    }
}
