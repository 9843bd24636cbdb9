//! # Translation Errors

use thiserror::Error;

/// Result type for translation
pub type TranslateResult<T> = Result<T, TranslateError>;

/// Fatal translation failures.
///
/// Every variant carries the dotted path of the offending field and the
/// runtime type name of the node that could not be represented.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("Unsupported field kind at '{field}': {type_name}")]
    UnsupportedFieldKind { field: String, type_name: String },

    #[error("Unsupported array element kind at '{field}': {type_name}")]
    UnsupportedArrayElementKind { field: String, type_name: String },

    #[error("Unsupported map value kind at '{field}': {type_name}")]
    UnsupportedMapValueKind { field: String, type_name: String },

    #[error("Root node must be an object, got {type_name}")]
    RootNotObject { type_name: String },
}

impl TranslateError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            TranslateError::UnsupportedFieldKind { .. } => "TRANSLATE_UNSUPPORTED_FIELD_KIND",
            TranslateError::UnsupportedArrayElementKind { .. } => {
                "TRANSLATE_UNSUPPORTED_ARRAY_ELEMENT_KIND"
            }
            TranslateError::UnsupportedMapValueKind { .. } => {
                "TRANSLATE_UNSUPPORTED_MAP_VALUE_KIND"
            }
            TranslateError::RootNotObject { .. } => "TRANSLATE_ROOT_NOT_OBJECT",
        }
    }

    /// Path of the offending field; empty for root errors
    pub fn field(&self) -> &str {
        match self {
            TranslateError::UnsupportedFieldKind { field, .. }
            | TranslateError::UnsupportedArrayElementKind { field, .. }
            | TranslateError::UnsupportedMapValueKind { field, .. } => field,
            TranslateError::RootNotObject { .. } => "",
        }
    }

    /// Runtime type name of the offending node
    pub fn type_name(&self) -> &str {
        match self {
            TranslateError::UnsupportedFieldKind { type_name, .. }
            | TranslateError::UnsupportedArrayElementKind { type_name, .. }
            | TranslateError::UnsupportedMapValueKind { type_name, .. }
            | TranslateError::RootNotObject { type_name } => type_name,
        }
    }
}
