//! Side channel for failures a strategy absorbs instead of returning.

use std::sync::Mutex;

/// Receives `(tag, detail)` pairs when a strategy recovers from an internal
/// failure. Implementations must not panic and must return promptly.
pub trait Diagnostics: Send + Sync {
    fn report(&self, tag: &str, detail: &str);
}

/// Default sink: a `warn` event on the `decomment::diagnostics` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, tag: &str, detail: &str) {
        tracing::warn!(target: "decomment::diagnostics", tag, detail, "strategy recovered");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn report(&self, _tag: &str, _detail: &str) {}
}

/// Keeps every report in memory. Useful for hosts that show a summary after a
/// batch, and for tests.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    events: Mutex<Vec<(String, String)>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(String, String)> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn tags(&self) -> Vec<String> {
        self.events().into_iter().map(|(tag, _)| tag).collect()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&self, tag: &str, detail: &str) {
        let mut guard = match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push((tag.to_string(), detail.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_keeps_order() {
        let sink = RecordingDiagnostics::new();
        sink.report("brace.parse_error", "row 1");
        sink.report("markup.scan_error", "overlap");
        assert_eq!(sink.tags(), vec!["brace.parse_error", "markup.scan_error"]);
        assert_eq!(sink.events()[0].1, "row 1");
    }

    #[test]
    fn sinks_are_object_safe() {
        let sinks: Vec<Box<dyn Diagnostics>> =
            vec![Box::new(TracingDiagnostics), Box::new(NullDiagnostics)];
        for sink in &sinks {
            sink.report("tag", "detail");
        }
    }
}
