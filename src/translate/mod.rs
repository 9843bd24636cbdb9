//! Recursive field translation
//!
//! Turns a validation object node into an ordered map of document-database
//! field descriptors.
//!
//! ```ignore
//! let user = object()
//!     .field("name", string().min(3).max(255))
//!     .field("age", number().min(18).max(100).default_value(18))
//!     .field("tags", array(string()));
//!
//! let fields = Translator::new().translate_object(&user.into_node())?;
//! println!("{}", serde_json::to_string_pretty(&fields)?);
//! ```
//!
//! Modifier precedence:
//! - optional keeps a default collected from an outer default wrapper
//! - an explicit default always beats the null default of nullable
//! - a union forgets everything collected before it
//! - the innermost refinement becomes the validator

mod context;
mod errors;
mod field;
mod translator;

pub use errors::{TranslateError, TranslateResult};
pub use field::{
    ArrayField, Bound, FieldDescriptor, FieldMap, IdentifierField, MapField, MapKey, MixedField,
    ObjectField, ScalarField, ScalarKind,
};
pub use translator::Translator;
