use crate::types::{CrawlReport, OutputFormat};

/// Formats a `CrawlReport` in the requested output format.
pub fn format_report(report: &CrawlReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_report_as_json(report),
        OutputFormat::Text => format_report_as_text(report),
    }
}

/// Formats a `CrawlReport` as pretty-printed JSON.
pub fn format_report_as_json(report: &CrawlReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_default()
}

/// Formats a `CrawlReport` as a plain-text table.
///
/// References are listed by depth, most distant referrers last, with ties
/// broken by uid.
pub fn format_report_as_text(report: &CrawlReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "References for {} ({}) [{}]\n",
        report.root.entry_uid, report.root.content_type_uid, report.locale
    ));
    out.push_str(&format!(
        "{} unique ({} upward, {} downward before merge) in {}ms\n\n",
        report.references.len(),
        report.upward_count,
        report.downward_count,
        report.duration_ms
    ));

    if report.references.is_empty() {
        out.push_str("_No references found._\n");
        return out;
    }

    let mut sorted: Vec<_> = report.references.iter().collect();
    sorted.sort_by(|a, b| {
        a.depth
            .cmp(&b.depth)
            .then_with(|| a.entry_uid.cmp(&b.entry_uid))
    });

    let uid_width = sorted
        .iter()
        .map(|r| r.entry_uid.len())
        .max()
        .unwrap_or(0)
        .max("ENTRY".len());

    out.push_str(&format!("{:>6}  {:<uid_width$}  CONTENT TYPE\n", "DEPTH", "ENTRY"));
    for reference in sorted {
        out.push_str(&format!(
            "{:>6}  {:<uid_width$}  {}\n",
            reference.depth, reference.entry_uid, reference.content_type_uid
        ));
    }

    out
}
