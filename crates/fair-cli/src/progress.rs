use fair_core::ProgressReporter;

/// Forwards rule progress to the log. Completion is reported at roughly
/// every tenth step so long accession lists stay readable.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn started(&self, task: &str, total: usize) {
        tracing::info!(task, total, "started");
    }

    fn advanced(&self, task: &str, done: usize, total: usize) {
        let step = (total / 10).max(1);
        if done == total || done % step == 0 {
            tracing::info!(task, done, total, "progress");
        } else {
            tracing::debug!(task, done, total, "progress");
        }
    }

    fn finished(&self, task: &str) {
        tracing::info!(task, "finished");
    }
}
