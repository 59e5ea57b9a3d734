use tracing::error;

pub const ERROR_TITLE: &str = "There was an error while attempting to use Boxcat.";

/// Host hook for showing a user-facing error.
pub trait ErrorDisplay: Send + Sync {
    /// Show `title` and `body`, then call `on_ack` once the user has seen it.
    fn show_custom_error(&self, title: &str, body: &str, on_ack: Box<dyn FnOnce() + Send>);
}

/// Headless fallback: the error goes to the log and is acknowledged immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogErrorDisplay;

impl ErrorDisplay for LogErrorDisplay {
    fn show_custom_error(&self, title: &str, body: &str, on_ack: Box<dyn FnOnce() + Send>) {
        error!(title, body, "boxcat error");
        on_ack();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    #[test]
    fn log_display_acknowledges() {
        let acked = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&acked);
        LogErrorDisplay.show_custom_error(
            ERROR_TITLE,
            "body",
            Box::new(move || flag.store(true, Ordering::SeqCst)),
        );
        assert!(acked.load(Ordering::SeqCst));
    }
}
