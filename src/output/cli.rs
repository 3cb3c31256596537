use crate::model::{Hit, ScanReport};
use anyhow::Result;
use std::fmt::{self, Write};
use tabled::{settings::Style, Table, Tabled};

const SEPARATOR: &str = "----------------------------------";

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Finding")]
    finding: &'static str,
    #[tabled(rename = "Count")]
    count: usize,
}

pub fn print_text_report(report: &ScanReport) -> Result<()> {
    print!("{}", format_text_report(report));
    Ok(())
}

/// Renders the counters, then one block per hit grouped by kind, then a
/// summary table.
pub fn format_text_report(report: &ScanReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = render(report, &mut out);
    out
}

fn render(report: &ScanReport, out: &mut String) -> fmt::Result {
    writeln!(out, "Scan root: {}", report.root.display())?;
    writeln!(
        out,
        "Scan completed at: {}",
        report.scan_time.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(out, "Total metadata files found: {}", report.manifest_files.len())?;
    writeln!(
        out,
        "Suspicious artifact files found: {}",
        report.artifact_files().count()
    )?;
    writeln!(
        out,
        "Suspicious artifact directories found: {}",
        report.artifact_dirs().count()
    )?;
    writeln!(out, "Total suspicious packages: {}", report.tracked_packages)?;
    writeln!(out, "{}", SEPARATOR)?;

    let ordered = report
        .installed_hits()
        .chain(report.range_hits())
        .chain(report.artifact_files())
        .chain(report.artifact_dirs());
    for hit in ordered {
        write_hit(out, hit)?;
        writeln!(out, "{}", SEPARATOR)?;
    }

    let rows = vec![
        SummaryRow {
            finding: "Installed malicious versions",
            count: report.installed_hits().count(),
        },
        SummaryRow {
            finding: "Ranges admitting malicious versions",
            count: report.range_hits().count(),
        },
        SummaryRow {
            finding: "Artifact files",
            count: report.artifact_files().count(),
        },
        SummaryRow {
            finding: "Artifact directories",
            count: report.artifact_dirs().count(),
        },
    ];
    let table = Table::new(rows).with(Style::rounded()).to_string();
    writeln!(out, "{}", table)?;

    if report.has_findings() {
        writeln!(
            out,
            "Suspicious activity detected: {} finding(s)",
            report.hits.len()
        )
    } else {
        writeln!(out, "No indicators of compromise found")
    }
}

fn write_hit(out: &mut String, hit: &Hit) -> fmt::Result {
    match hit {
        Hit::InstalledExact {
            package,
            version,
            file,
        } => {
            writeln!(out, "Suspicious package installed: {}@{}", package, version)?;
            writeln!(out, "  File: {}", file.display())
        }
        Hit::RangeVulnerable {
            package,
            range,
            malicious_version,
            file,
        } => {
            writeln!(out, "Declared range allows malicious version: {}", package)?;
            writeln!(out, "  Declared: {} -> allows {}", range, malicious_version)?;
            writeln!(out, "  File: {}", file.display())
        }
        Hit::ArtifactFile { path } => {
            writeln!(out, "Suspicious artifact file detected")?;
            writeln!(out, "  File: {}", path.display())
        }
        Hit::ArtifactDirectory { path } => {
            writeln!(out, "Suspicious artifact directory detected")?;
            writeln!(out, "  Directory: {}", path.display())
        }
    }
}
