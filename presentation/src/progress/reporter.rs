//! Progress reporting for batch execution

use botbatch_application::metrics::MetricsSnapshot;
use botbatch_application::ports::progress::BatchProgressNotifier;
use botbatch_domain::{ExchangeOutcome, Question};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

const MESSAGE_WIDTH: usize = 48;

/// Shorten `text` to at most `max` characters, marking the cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn outcome_line(question: &Question, outcome: &ExchangeOutcome) -> String {
    let text = truncate(question.text(), MESSAGE_WIDTH);
    if outcome.is_answered() {
        format!("{} {}", "v".green(), text)
    } else {
        format!("{} {} ({})", "x".red(), text, outcome.label())
    }
}

fn summary_line(metrics: &MetricsSnapshot) -> String {
    format!(
        "{} answered, {} lost",
        metrics.answered.to_string().green(),
        metrics.lost().to_string().red()
    )
}

/// Reports batch progress with a single progress bar on stderr
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn batch_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed}) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchProgressNotifier for ProgressReporter {
    fn on_batch_start(&self, total: usize) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::batch_style());
        pb.set_prefix("Questions");
        pb.set_message("Starting...");
        pb.enable_steady_tick(std::time::Duration::from_millis(120));

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_exchange_complete(&self, question: &Question, outcome: &ExchangeOutcome) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_message(outcome_line(question, outcome));
            pb.inc(1);
        }
    }

    fn on_batch_complete(&self, metrics: &MetricsSnapshot) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_with_message(summary_line(metrics));
        }
    }
}

/// Simple line-based progress (no fancy UI), for non-terminal stderr
pub struct SimpleProgress;

impl BatchProgressNotifier for SimpleProgress {
    fn on_batch_start(&self, total: usize) {
        eprintln!("{} {} ({} questions)", "->".cyan(), "Dispatching".bold(), total);
    }

    fn on_exchange_complete(&self, question: &Question, outcome: &ExchangeOutcome) {
        eprintln!("  {}", outcome_line(question, outcome));
    }

    fn on_batch_complete(&self, metrics: &MetricsSnapshot) {
        eprintln!("{} {}", "->".cyan(), summary_line(metrics));
    }
}
