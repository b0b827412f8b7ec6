/*!
 * Reporting functionality for bundlefs
 *
 * Provides functionality for generating formatted reports of bundle and
 * rebuild runs using the tabled library for clean, consistent table rendering.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::utils::format_file_size;

/// Information about a file in the report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReportInfo {
    /// Number of lines emitted
    pub lines: usize,
    /// Number of characters emitted
    pub chars: usize,
}

/// Statistics for a forward (bundle) run
#[derive(Debug, Clone, Default)]
pub struct BundleReport {
    /// Output file path
    pub output_file: String,
    /// Time taken to scan and write
    pub duration: Duration,
    /// Number of files bundled
    pub files_processed: usize,
    /// Files emitted as the binary sentinel
    pub binary_files: usize,
    /// Files that could not be read
    pub unreadable_files: usize,
    /// Files whose comments were stripped
    pub comments_stripped: usize,
    /// Total number of lines
    pub total_lines: usize,
    /// Total number of characters
    pub total_chars: usize,
    /// Size of the bundle document in bytes
    pub output_size: u64,
    /// Details for each file, in bundle order
    pub file_details: Vec<(String, FileReportInfo)>,
}

/// Statistics for a reverse (rebuild) run
#[derive(Debug, Clone, Default)]
pub struct RebuildReport {
    /// Target root
    pub target_root: String,
    /// Time taken to parse and write
    pub duration: Duration,
    /// Files written
    pub files_written: usize,
    /// Files written as the binary sentinel
    pub binary_files: usize,
    /// Files that could not be written
    pub files_failed: usize,
    /// Header lines skipped as malformed
    pub malformed_headers: usize,
    /// Paths that appeared more than once
    pub duplicate_paths: usize,
    /// Bytes written
    pub bytes_written: u64,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for run results
pub struct Reporter {
    format: ReportFormat,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    key: String,

    #[tabled(rename = "Value")]
    value: String,
}

impl SummaryRow {
    fn new(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string for a bundle run
    pub fn generate_bundle_report(&self, report: &BundleReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => {
                let files_title = if report.file_details.len() > 15 {
                    "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT"
                } else {
                    "📋  BUNDLED FILES"
                };
                format!(
                    "{}\n{}\n\n{}\n{}",
                    files_title,
                    self.create_files_table(report),
                    "✅  BUNDLE COMPLETE",
                    self.create_bundle_summary(report)
                )
            }
        }
    }

    /// Generate a report string for a rebuild run
    pub fn generate_rebuild_report(&self, report: &RebuildReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => format!(
                "{}\n{}",
                "✅  REBUILD COMPLETE",
                self.create_rebuild_summary(report)
            ),
        }
    }

    /// Print a bundle report to stdout
    pub fn print_bundle_report(&self, report: &BundleReport) {
        println!("\n{}", self.generate_bundle_report(report));
    }

    /// Print a rebuild report to stdout
    pub fn print_rebuild_report(&self, report: &RebuildReport) {
        println!("\n{}", self.generate_rebuild_report(report));
    }

    fn create_bundle_summary(&self, report: &BundleReport) -> String {
        let mut rows = vec![
            SummaryRow::new("📂 Output File", report.output_file.clone()),
            SummaryRow::new("⏱️ Process Time", format!("{:.4?}", report.duration)),
            SummaryRow::new("📄 Files Bundled", self.format_number(report.files_processed)),
            SummaryRow::new("📝 Total Lines", self.format_number(report.total_lines)),
            SummaryRow::new("📦 Bundle Size", format_file_size(report.output_size)),
        ];

        if report.binary_files > 0 {
            rows.push(SummaryRow::new(
                "🔒 Binary Placeholders",
                self.format_number(report.binary_files),
            ));
        }
        if report.unreadable_files > 0 {
            rows.push(SummaryRow::new(
                "⚠️ Unreadable Files",
                self.format_number(report.unreadable_files),
            ));
        }
        if report.comments_stripped > 0 {
            rows.push(SummaryRow::new(
                "✂️ Comments Stripped",
                format!("{} file(s)", self.format_number(report.comments_stripped)),
            ));
        }

        self.style(Table::new(rows))
    }

    fn create_rebuild_summary(&self, report: &RebuildReport) -> String {
        let mut rows = vec![
            SummaryRow::new("📂 Target Root", report.target_root.clone()),
            SummaryRow::new("⏱️ Process Time", format!("{:.4?}", report.duration)),
            SummaryRow::new("📄 Files Written", self.format_number(report.files_written)),
            SummaryRow::new("📦 Bytes Written", format_file_size(report.bytes_written)),
        ];

        if report.binary_files > 0 {
            rows.push(SummaryRow::new(
                "🔒 Binary Placeholders",
                self.format_number(report.binary_files),
            ));
        }
        if report.files_failed > 0 {
            rows.push(SummaryRow::new(
                "⚠️ Failed Files",
                self.format_number(report.files_failed),
            ));
        }
        if report.malformed_headers > 0 {
            rows.push(SummaryRow::new(
                "⚠️ Malformed Headers",
                self.format_number(report.malformed_headers),
            ));
        }
        if report.duplicate_paths > 0 {
            rows.push(SummaryRow::new(
                "🔁 Duplicate Paths",
                self.format_number(report.duplicate_paths),
            ));
        }

        self.style(Table::new(rows))
    }

    // Create a files table using the tabled crate
    fn create_files_table(&self, report: &BundleReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Chars")]
            chars: String,
        }

        let mut files: Vec<_> = report.file_details.iter().collect();
        files.sort_by(|(_, a), (_, b)| b.chars.cmp(&a.chars));

        let files_to_show = if files.len() > 15 {
            &files[..10]
        } else {
            &files[..]
        };

        let rows: Vec<FileRow> = files_to_show
            .iter()
            .map(|(path, info)| FileRow {
                path: truncate_path(path, 60),
                lines: self.format_number(info.lines),
                chars: self.format_number(info.chars),
            })
            .collect();

        self.style(Table::new(rows))
    }

    fn style(&self, mut table: Table) -> String {
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));
        table.to_string()
    }
}

/// Keep the last path segments that fit in `max_len`
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let mut segments = Vec::new();
    let mut current_len = 3; // "..."
    for part in path.rsplit('/') {
        let part_len = part.chars().count() + 1;
        if current_len + part_len > max_len {
            break;
        }
        segments.push(part);
        current_len += part_len;
    }

    if segments.is_empty() {
        let tail: String = path
            .chars()
            .rev()
            .take(max_len.saturating_sub(3))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        return format!("...{}", tail);
    }

    let mut result = String::from("...");
    for part in segments.iter().rev() {
        result.push('/');
        result.push_str(part);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        assert_eq!(reporter.format_number(999), "999");
        assert_eq!(reporter.format_number(1_500), "1.5K");
        assert_eq!(reporter.format_number(2_000_000), "2.0M");
    }

    #[test]
    fn test_truncate_path() {
        assert_eq!(truncate_path("src/main.rs", 60), "src/main.rs");
        assert_eq!(truncate_path("aaaa/bbbb/cccc/dddd.rs", 16), ".../cccc/dddd.rs");
        assert_eq!(truncate_path("abcdefghijkl", 8), "...hijkl");
    }

    #[test]
    fn test_bundle_report_mentions_files_and_counts() {
        let report = BundleReport {
            output_file: "bundle.txt".into(),
            files_processed: 2,
            binary_files: 1,
            file_details: vec![
                ("a.txt".into(), FileReportInfo { lines: 1, chars: 6 }),
                ("img.png".into(), FileReportInfo { lines: 1, chars: 12 }),
            ],
            ..Default::default()
        };

        let text = Reporter::new(ReportFormat::ConsoleTable).generate_bundle_report(&report);
        assert!(text.contains("BUNDLED FILES"));
        assert!(text.contains("a.txt"));
        assert!(text.contains("bundle.txt"));
        assert!(text.contains("Binary Placeholders"));
        assert!(!text.contains("Unreadable"));
    }

    #[test]
    fn test_rebuild_report_lists_problems() {
        let report = RebuildReport {
            target_root: "out".into(),
            files_written: 3,
            malformed_headers: 1,
            ..Default::default()
        };

        let text = Reporter::new(ReportFormat::ConsoleTable).generate_rebuild_report(&report);
        assert!(text.contains("REBUILD COMPLETE"));
        assert!(text.contains("Malformed Headers"));
        assert!(!text.contains("Duplicate Paths"));
    }
}
