mod cli;
mod json;

pub use cli::{format_text_report, print_text_report};
pub use json::print_json;

use crate::model::ScanReport;
use anyhow::Result;

/// Output format for scan reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable, line-oriented report
    Text,
    /// JSON format for programmatic use
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'text' or 'json'", s)),
        }
    }
}

pub fn print_report(report: &ScanReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text_report(report),
        OutputFormat::Json => print_json(report),
    }
}

/// Format a report to a string for file output
pub fn format_report_to_string(report: &ScanReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_text_report(report)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_format() {
        assert_eq!(OutputFormat::from_str("text"), Ok(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("JSON"), Ok(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("table"), Ok(OutputFormat::Text));
        assert!(OutputFormat::from_str("sarif").is_err());
    }

    #[test]
    fn test_json_output_round_trips() {
        let report = ScanReport::new("/p", 7);
        let text = format_report_to_string(&report, OutputFormat::Json).unwrap();
        let back: ScanReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back.tracked_packages, 7);
    }
}
