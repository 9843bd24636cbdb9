//! Validation type algebra
//!
//! The source vocabulary of translation: composable, immutable schema
//! rules (scalars, objects, arrays, maps, enums, unions) plus modifier
//! wrappers (optional, nullable, default, effects) and the identifier
//! factory.

mod builders;
mod effects;
mod identifier;
mod node;

pub use builders::{
    any, array, boolean, custom, date, enumeration, literal, map, native_enum, number, object,
    object_id, preprocess, record, string, tuple, union, unknown, uuid, DateType, NumberType,
    ObjectType, StringType, TypeNodeExt,
};
pub use effects::{
    DefaultProducer, Effect, Mapping, Predicate, Refinement, DEFAULT_REFINEMENT_MESSAGE,
};
pub use identifier::{IdentifierAttributes, IdentifierKind, IdentifierType, ObjectIdType, UuidType};
pub use node::{
    CustomType, DateChecks, EnumValues, NodeAttributes, NumberChecks, Shape, StringChecks, TypeDef,
    TypeNode,
};
