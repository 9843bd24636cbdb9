//! Schema error types
//!
//! Error codes:
//! - SCHEMA_UNKNOWN (REJECT)
//! - SCHEMA_DUPLICATE (REJECT)
//! - SCHEMA_MALFORMED_DECLARATION (FATAL)
//! - SCHEMA_TRANSLATION_FAILED (REJECT)
//! - SCHEMA_INVALID_STRUCTURE (REJECT)

use std::fmt;

use crate::translate::TranslateError;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The declaration is rejected; other declarations may still compile
    Reject,
    /// Loading cannot continue
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Declaration name not registered
    SchemaUnknown,
    /// Declaration name registered twice
    SchemaDuplicate,
    /// Declaration file unreadable or not a valid declaration
    SchemaMalformedDeclaration,
    /// Declaration uses a type with no storage mapping
    SchemaTranslationFailed,
    /// Compiled field names are not storable
    SchemaInvalidStructure,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::SchemaUnknown => "SCHEMA_UNKNOWN",
            SchemaErrorCode::SchemaDuplicate => "SCHEMA_DUPLICATE",
            SchemaErrorCode::SchemaMalformedDeclaration => "SCHEMA_MALFORMED_DECLARATION",
            SchemaErrorCode::SchemaTranslationFailed => "SCHEMA_TRANSLATION_FAILED",
            SchemaErrorCode::SchemaInvalidStructure => "SCHEMA_INVALID_STRUCTURE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::SchemaMalformedDeclaration => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug)]
pub struct SchemaError {
    /// Error code
    code: SchemaErrorCode,
    /// Human-readable message
    message: String,
    /// Schema name if applicable
    schema: Option<String>,
    /// Underlying translation failure
    source: Option<TranslateError>,
}

impl SchemaError {
    /// Create an unknown schema error
    pub fn unknown(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: SchemaErrorCode::SchemaUnknown,
            message: format!("Schema '{}' not found", name),
            schema: Some(name),
            source: None,
        }
    }

    /// Create a duplicate schema error
    pub fn duplicate(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: SchemaErrorCode::SchemaDuplicate,
            message: format!("Schema '{}' is already registered", name),
            schema: Some(name),
            source: None,
        }
    }

    /// Create an error for a malformed declaration file
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::SchemaMalformedDeclaration,
            message: format!("Malformed declaration '{}': {}", path.into(), reason.into()),
            schema: None,
            source: None,
        }
    }

    /// Wrap a translation failure
    pub fn translation_failed(name: impl Into<String>, err: TranslateError) -> Self {
        let name = name.into();
        Self {
            code: SchemaErrorCode::SchemaTranslationFailed,
            message: format!("Schema '{}' cannot be translated: {}", name, err),
            schema: Some(name),
            source: Some(err),
        }
    }

    /// Create an invalid structure error
    pub fn invalid_structure(name: impl Into<String>, reason: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: SchemaErrorCode::SchemaInvalidStructure,
            message: format!("Schema '{}' has invalid structure: {}", name, reason.into()),
            schema: Some(name),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the schema name if applicable
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Returns the translation failure if applicable
    pub fn translate_error(&self) -> Option<&TranslateError> {
        self.source.as_ref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::SchemaUnknown.code(), "SCHEMA_UNKNOWN");
        assert_eq!(SchemaErrorCode::SchemaDuplicate.code(), "SCHEMA_DUPLICATE");
        assert_eq!(
            SchemaErrorCode::SchemaMalformedDeclaration.code(),
            "SCHEMA_MALFORMED_DECLARATION"
        );
        assert_eq!(
            SchemaErrorCode::SchemaTranslationFailed.code(),
            "SCHEMA_TRANSLATION_FAILED"
        );
        assert_eq!(
            SchemaErrorCode::SchemaInvalidStructure.code(),
            "SCHEMA_INVALID_STRUCTURE"
        );
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(SchemaErrorCode::SchemaUnknown.severity(), Severity::Reject);
        assert_eq!(SchemaErrorCode::SchemaMalformedDeclaration.severity(), Severity::Fatal);
        assert!(SchemaError::malformed("a.json", "bad").is_fatal());
        assert!(!SchemaError::duplicate("users").is_fatal());
    }

    #[test]
    fn test_translation_failure_exposes_source() {
        let cause = TranslateError::UnsupportedFieldKind {
            field: "meta".into(),
            type_name: "Unknown".into(),
        };
        let err = SchemaError::translation_failed("users", cause.clone());

        assert_eq!(err.schema(), Some("users"));
        assert_eq!(err.translate_error(), Some(&cause));
        assert!(err.source().is_some());
        let display = err.to_string();
        assert!(display.contains("SCHEMA_TRANSLATION_FAILED"));
        assert!(display.contains("meta"));
    }

    #[test]
    fn test_display_includes_severity() {
        let err = SchemaError::unknown("orders");
        assert!(err.to_string().starts_with("[REJECT] SCHEMA_UNKNOWN"));
    }
}
