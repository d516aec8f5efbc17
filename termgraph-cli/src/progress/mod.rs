//! Progress reporting for document batches

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Progress of a document batch
///
/// Workers report through `&self`, so one reporter serves the whole pool.
/// Failed documents are counted alongside the bar.
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    quiet: bool,
    failed: AtomicUsize,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool) -> Self {
        Self {
            progress_bar: None,
            quiet,
            failed: AtomicUsize::new(0),
        }
    }

    /// Start a bar over `total` documents
    pub fn init_documents(&mut self, total: u64) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::with_template(
            "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} documents {msg}",
        ) {
            pb.set_style(style.progress_chars("##-"));
        }
        pb.enable_steady_tick(Duration::from_millis(100));

        self.progress_bar = Some(pb);
    }

    /// Record a finished document
    pub fn document_finished(&self, name: &str, ok: bool) {
        let failed = if ok {
            self.failed.load(Ordering::Relaxed)
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed) + 1
        };
        if let Some(pb) = &self.progress_bar {
            pb.set_message(status_message(name, failed));
            pb.inc(1);
        }
    }

    /// Documents reported as failed so far
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }

    /// Finish progress reporting
    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(match self.failed() {
                0 => "Complete".to_string(),
                n => format!("Complete ({n} failed)"),
            });
        }
    }
}

/// One-line bar message; control characters in names would break the bar
fn status_message(name: &str, failed: usize) -> String {
    let name: String = name
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    match failed {
        0 => name,
        n => format!("{name} ({n} failed)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_reporter_still_counts_failures() {
        let mut reporter = ProgressReporter::new(true);
        reporter.init_documents(10);
        assert!(reporter.progress_bar.is_none());
        reporter.document_finished("doc.lif", false);
        reporter.document_finished("doc2.lif", true);
        assert_eq!(reporter.failed(), 1);
        reporter.finish();
    }

    #[test]
    fn test_reporter_counts_documents() {
        let mut reporter = ProgressReporter::new(false);
        reporter.init_documents(3);
        reporter.document_finished("a.lif", true);
        reporter.document_finished("b.lif", false);
        reporter.document_finished("c.lif", true);
        let pb = reporter.progress_bar.as_ref().unwrap();
        assert_eq!(pb.position(), 3);
        assert_eq!(pb.message(), "c.lif (1 failed)");
        reporter.finish();
    }

    #[test]
    fn test_status_message_stays_on_one_line() {
        assert_eq!(status_message("odd\tname\n.lif", 0), "odd name .lif");
        assert_eq!(status_message("a.lif", 2), "a.lif (2 failed)");
    }

    #[test]
    fn test_shared_between_workers() {
        let mut reporter = ProgressReporter::new(false);
        reporter.init_documents(8);
        std::thread::scope(|scope| {
            for i in 0..8 {
                let reporter = &reporter;
                scope.spawn(move || reporter.document_finished("doc.lif", i % 2 == 0));
            }
        });
        assert_eq!(reporter.failed(), 4);
        reporter.finish();
    }
}
