//! Logging utilities for structured tracing

use std::time::Instant;

/// Track operation timing and log on drop
pub struct Timer {
    start: Instant,
    operation: String,
    url: String,
}

impl Timer {
    /// Create a new timer for an operation against a url
    pub fn new(operation: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            operation: operation.into(),
            url: url.into(),
        }
    }

    /// Milliseconds since the timer started
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        tracing::debug!(
            operation = %self.operation,
            url = %self.url,
            duration_ms = self.elapsed_ms(),
            "Operation completed"
        );
    }
}

/// Log an error with structured context
pub fn log_error(operation: &str, url: &str, error: &impl std::error::Error) {
    tracing::warn!(
        operation = %operation,
        url = %url,
        error = %error,
        error_kind = std::any::type_name_of_val(error),
        "Operation failed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_timer_tracks_duration() {
        let timer = Timer::new("fetch_page", "https://example.com");
        thread::sleep(Duration::from_millis(10));
        assert!(timer.elapsed_ms() >= 10);
    }

    #[test]
    fn test_log_error_accepts_crate_errors() {
        let err = crate::error::LinkPreviewError::Status(502);
        log_error("fetch_page", "https://example.com", &err);
    }
}
