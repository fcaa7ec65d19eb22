//! Generated file names.

use std::sync::OnceLock;
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;

fn whitespace() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// Replace every whitespace run with `_`.
pub fn file_safe_name(name: &str) -> String {
    whitespace().replace_all(name.trim(), "_").into_owned()
}

/// `research_report_<YYYY-MM-DD>`.
pub fn research_file_name(date: NaiveDate) -> String {
    format!("research_report_{}", date.format("%Y-%m-%d"))
}

/// `analysis-<name>-<epoch ms>`.
pub fn analysis_file_name(mission_name: &str, at: DateTime<Utc>) -> String {
    format!("analysis-{}-{}", file_safe_name(mission_name), at.timestamp_millis())
}

/// `final-report-<name>-<epoch ms>`.
pub fn final_report_file_name(mission_name: &str, at: DateTime<Utc>) -> String {
    format!("final-report-{}-{}", file_safe_name(mission_name), at.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_names() {
        let at = Utc.timestamp_millis_opt(1_760_000_000_123).unwrap();

        assert_eq!(file_safe_name("Retail  pricing\tQ3"), "Retail_pricing_Q3");
        assert_eq!(research_file_name(at.date_naive()), "research_report_2025-10-09");
        assert_eq!(analysis_file_name("Q3 sales", at), "analysis-Q3_sales-1760000000123");
        assert_eq!(final_report_file_name("Audit", at), "final-report-Audit-1760000000123");
    }
}
