//! Observable events
//!
//! Every lifecycle point that produces a log line has a typed event here.
//! Scoped operations (see `ObservationScope`) derive their
//! `_BEGIN` / `_COMPLETE` / `_FAILED` names from a scope name instead.

use std::fmt;

use super::logger::Severity;

/// Observable events in schemaport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Registration
    /// Identifier extensions installed
    ExtensionsInstalled,

    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // Declarations
    /// A declaration file parsed and registered
    DeclarationLoaded,
    /// Declaration directory scan complete
    DeclarationsLoaded,

    // Translation
    /// A field could not be represented in the output vocabulary
    FieldUnsupported,
    /// A map key could not be resolved; map emitted without key metadata
    MapKeyDegraded,
    /// A document schema was produced
    SchemaCompiled,
    /// A compiled schema was written to disk
    SchemaWritten,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ExtensionsInstalled => "EXTENSIONS_INSTALLED",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DeclarationLoaded => "DECLARATION_LOADED",
            Event::DeclarationsLoaded => "DECLARATIONS_LOADED",
            Event::FieldUnsupported => "FIELD_UNSUPPORTED",
            Event::MapKeyDegraded => "MAP_KEY_DEGRADED",
            Event::SchemaCompiled => "SCHEMA_COMPILED",
            Event::SchemaWritten => "SCHEMA_WRITTEN",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::FieldUnsupported => Severity::Error,
            Event::MapKeyDegraded => Severity::Warn,
            Event::DeclarationLoaded => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ExtensionsInstalled,
            Event::ConfigLoaded,
            Event::DeclarationLoaded,
            Event::DeclarationsLoaded,
            Event::FieldUnsupported,
            Event::MapKeyDegraded,
            Event::SchemaCompiled,
            Event::SchemaWritten,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_event_severities() {
        assert_eq!(Event::FieldUnsupported.severity(), Severity::Error);
        assert_eq!(Event::MapKeyDegraded.severity(), Severity::Warn);
        assert_eq!(Event::SchemaCompiled.severity(), Severity::Info);
        assert_eq!(Event::DeclarationLoaded.severity(), Severity::Trace);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::MapKeyDegraded), "MAP_KEY_DEGRADED");
    }
}
