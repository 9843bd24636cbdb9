//! Observability subsystem
//!
//! - Structured JSON logging to stderr
//! - Typed lifecycle events
//! - Begin/complete scopes with timing
//!
//! Observability is read-only: nothing here influences translation output.
//!
//! ```ignore
//! use schemaport::observability::{log_event, Event, ObservationScope};
//!
//! log_event(Event::ConfigLoaded, &[("schema_dir", "./schemas")]);
//!
//! let scope = ObservationScope::with_fields("COMPILE", &[("schema", "users")]);
//! // ... do work ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::{ObservationScope, Timer};

/// Log a typed event at its own severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        log_event(Event::ExtensionsInstalled, &[]);
        log_event(Event::MapKeyDegraded, &[("field", "scores")]);
    }

    #[test]
    fn test_failures_enabled_at_default_level() {
        assert!(Logger::enabled(Event::FieldUnsupported.severity()));
        assert!(Logger::enabled(Severity::Fatal));
    }
}
