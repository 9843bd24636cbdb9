//! Closed classification of validation nodes

use std::fmt;

use crate::validation::IdentifierKind;

/// Semantic kind of a validation node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Number,
    Boolean,
    Date,
    Object,
    Array,
    /// String or fixed-integer enumeration
    Enum,
    /// Record or map
    Map,
    ObjectId,
    Uuid,
    Optional,
    Nullable,
    Default,
    Effects,
    Union,
    /// Mixed / accept-any
    Any,
    /// Catch-all for nodes with no storage mapping
    Unsupported,
}

impl Kind {
    /// Returns the kind name for logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
            Kind::Date => "date",
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::Enum => "enum",
            Kind::Map => "map",
            Kind::ObjectId => "objectId",
            Kind::Uuid => "uuid",
            Kind::Optional => "optional",
            Kind::Nullable => "nullable",
            Kind::Default => "default",
            Kind::Effects => "effects",
            Kind::Union => "union",
            Kind::Any => "any",
            Kind::Unsupported => "unsupported",
        }
    }

    /// Whether this kind wraps exactly one inner node
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Kind::Optional | Kind::Nullable | Kind::Default | Kind::Effects
        )
    }

    /// Whether this kind maps to a scalar field
    pub fn is_scalar(&self) -> bool {
        matches!(self, Kind::String | Kind::Number | Kind::Boolean | Kind::Date)
    }

    /// Identifier kind, for `ObjectId` and `Uuid`
    pub fn identifier(&self) -> Option<IdentifierKind> {
        match self {
            Kind::ObjectId => Some(IdentifierKind::ObjectId),
            Kind::Uuid => Some(IdentifierKind::Uuid),
            _ => None,
        }
    }
}

impl From<IdentifierKind> for Kind {
    fn from(kind: IdentifierKind) -> Self {
        match kind {
            IdentifierKind::ObjectId => Kind::ObjectId,
            IdentifierKind::Uuid => Kind::Uuid,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
