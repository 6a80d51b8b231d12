//! Console output formatter for batch results

use botbatch_application::BatchReport;
use colored::Colorize;

/// Formats batch summaries for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Human-readable summary
    pub fn format(report: &BatchReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Batch Results"));
        output.push('\n');

        output.push_str(&Self::row("Questions:", report.total.to_string()));
        output.push_str(&Self::row(
            "Answered:",
            report.answered.to_string().green().to_string(),
        ));

        let lost = [
            ("Timed out:", report.timed_out),
            ("Closed:", report.closed),
            ("Failed:", report.failed),
        ];
        for (label, count) in lost {
            let value = if count > 0 {
                count.to_string().yellow().to_string()
            } else {
                count.to_string()
            };
            output.push_str(&Self::row(label, value));
        }

        let failed = report.metrics.failed;
        if failed.total() > 0 {
            let stages = [
                ("token", failed.token),
                ("conversation", failed.conversation),
                ("connect", failed.connect),
                ("send", failed.send),
                ("listen", failed.listen),
                ("worker", failed.worker),
            ];
            let breakdown: Vec<String> = stages
                .iter()
                .filter(|(_, n)| *n > 0)
                .map(|(stage, n)| format!("{stage} {n}"))
                .collect();
            output.push_str(&format!("  {:<12}{}\n", "", breakdown.join(", ").dimmed()));
        }

        output.push_str(&Self::row("Workers:", report.workers.to_string()));
        output.push_str(&Self::row(
            "Elapsed:",
            format!("{:.1}s", report.elapsed_seconds),
        ));
        output.push_str(&Self::row("Output:", report.output.display().to_string()));

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(report: &BatchReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn row(label: &str, value: String) -> String {
        format!("  {:<12}{}\n", label.cyan().bold(), value)
    }

    fn header(title: &str) -> String {
        format!("{}\n", format!("=== {title} ===").cyan().bold())
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(24).dimmed())
    }
}
