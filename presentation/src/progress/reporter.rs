//! Progress reporting for compliance scans and remediation

use cloudops_application::ports::scan_progress::ScanProgressNotifier;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with one spinner per listing and a bar for remediation
pub struct ScanProgressReporter {
    multi: MultiProgress,
    scans: Mutex<HashMap<String, ProgressBar>>,
    chunk_bar: Mutex<Option<ProgressBar>>,
}

impl ScanProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            scans: Mutex::new(HashMap::new()),
            chunk_bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn chunk_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl Default for ScanProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanProgressNotifier for ScanProgressReporter {
    fn on_scan_start(&self, label: &str) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(label.to_string());
        pb.set_message("listing...");
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut scans) = self.scans.lock() {
            scans.insert(label.to_string(), pb);
        }
    }

    fn on_page_scanned(&self, label: &str, page: usize, collected: usize) {
        if let Some(pb) = self.scans.lock().ok().and_then(|s| s.get(label).cloned()) {
            pb.set_message(format!("page {}, {} id(s)", page, collected));
        }
    }

    fn on_scan_complete(&self, label: &str, collected: usize, truncated: bool) {
        if let Some(pb) = self.scans.lock().ok().and_then(|mut s| s.remove(label)) {
            let status = if truncated {
                format!("{} id(s) {}", collected, "(truncated)".yellow())
            } else {
                format!("{} id(s) {}", collected, "done".green())
            };
            pb.finish_with_message(status);
        }
    }

    fn on_remediation_start(&self, label: &str, chunks: usize, items: usize) {
        let pb = self.multi.add(ProgressBar::new(chunks as u64));
        pb.set_style(Self::chunk_style());
        pb.set_prefix(label.to_string());
        pb.set_message(format!("{} item(s)", items));

        if let Ok(mut bar) = self.chunk_bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_chunk_complete(&self, index: usize, size: usize, succeeded: bool) {
        if let Some(pb) = self.chunk_bar.lock().ok().and_then(|b| b.clone()) {
            let status = if succeeded {
                format!("{} chunk {} ({})", "v".green(), index, size)
            } else {
                format!("{} chunk {} ({})", "x".red(), index, size)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_remediation_complete(&self, succeeded: usize, failed: usize) {
        if let Some(pb) = self.chunk_bar.lock().ok().and_then(|mut b| b.take()) {
            let summary = if failed == 0 {
                format!("{} item(s) {}", succeeded, "complete!".green())
            } else {
                format!("{} ok, {} {}", succeeded, failed, "failed".red())
            };
            pb.finish_with_message(summary);
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleScanProgress;

impl ScanProgressNotifier for SimpleScanProgress {
    fn on_scan_start(&self, label: &str) {
        eprintln!("{} {}", "->".cyan(), label.bold());
    }

    fn on_scan_complete(&self, label: &str, collected: usize, truncated: bool) {
        if truncated {
            eprintln!("  {} {}: {} id(s) (truncated)", "!".yellow(), label, collected);
        } else {
            eprintln!("  {} {}: {} id(s)", "v".green(), label, collected);
        }
    }

    fn on_remediation_start(&self, label: &str, chunks: usize, items: usize) {
        eprintln!(
            "{} {} ({} item(s) in {} chunk(s))",
            "->".cyan(),
            label.bold(),
            items,
            chunks
        );
    }

    fn on_chunk_complete(&self, index: usize, size: usize, succeeded: bool) {
        if succeeded {
            eprintln!("  {} chunk {} ({})", "v".green(), index, size);
        } else {
            eprintln!("  {} chunk {} ({}) failed", "x".red(), index, size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressDrawTarget;

    fn hidden() -> ScanProgressReporter {
        let reporter = ScanProgressReporter::new();
        reporter.multi.set_draw_target(ProgressDrawTarget::hidden());
        reporter
    }

    #[test]
    fn test_scan_bars_are_tracked_per_label() {
        let reporter = hidden();

        reporter.on_scan_start("ec2_list_instances");
        reporter.on_scan_start("ec2_list_instances[tagged]");
        reporter.on_page_scanned("ec2_list_instances", 1, 40);
        assert_eq!(reporter.scans.lock().unwrap().len(), 2);

        reporter.on_scan_complete("ec2_list_instances", 40, false);
        assert_eq!(reporter.scans.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_chunk_bar_counts_chunks() {
        let reporter = hidden();

        reporter.on_remediation_start("ec2_create_tags", 3, 250);
        reporter.on_chunk_complete(0, 100, true);
        reporter.on_chunk_complete(1, 100, false);
        let position = reporter.chunk_bar.lock().unwrap().as_ref().unwrap().position();
        assert_eq!(position, 2);

        reporter.on_remediation_complete(150, 100);
        assert!(reporter.chunk_bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_callbacks_without_start_are_ignored() {
        let reporter = hidden();
        reporter.on_page_scanned("unknown", 1, 1);
        reporter.on_chunk_complete(0, 1, true);
        reporter.on_remediation_complete(1, 0);
    }
}
