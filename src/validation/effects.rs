//! Effects and default producers attached to validation nodes
//!
//! Effects wrap exactly one inner node:
//! - Refinement: predicate + failure message, surfaces as a field validator
//! - Transform / Preprocess: value mappings, invisible to translation

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

/// Predicate over a runtime value
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Value-to-value mapping used by transform and preprocess effects
pub type Mapping = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Message used when a refinement is declared without one
pub const DEFAULT_REFINEMENT_MESSAGE: &str = "Invalid input";

/// A user-supplied predicate with its failure message.
#[derive(Clone)]
pub struct Refinement {
    predicate: Predicate,
    message: String,
}

impl Refinement {
    /// Create a refinement from a predicate and message
    pub fn new<F>(predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            message: message.into(),
        }
    }

    /// Run the predicate against a value
    pub fn check(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    /// Failure message reported when the predicate rejects a value
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refinement")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Side-channel behavior wrapped around an inner node
#[derive(Clone)]
pub enum Effect {
    /// Validation predicate
    Refinement(Refinement),
    /// Output mapping applied after validation
    Transform(Mapping),
    /// Input mapping applied before validation
    Preprocess(Mapping),
}

impl Effect {
    /// Returns the effect sub-kind name
    pub fn kind_name(&self) -> &'static str {
        match self {
            Effect::Refinement(_) => "refinement",
            Effect::Transform(_) => "transform",
            Effect::Preprocess(_) => "preprocess",
        }
    }

    /// Returns the refinement if this effect is one
    pub fn refinement(&self) -> Option<&Refinement> {
        match self {
            Effect::Refinement(r) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Refinement(r) => f.debug_tuple("Refinement").field(r).finish(),
            Effect::Transform(_) => f.write_str("Transform(..)"),
            Effect::Preprocess(_) => f.write_str("Preprocess(..)"),
        }
    }
}

/// Zero-argument producer of a field's default value.
///
/// Producers are invoked lazily, every call yields a fresh value.
#[derive(Clone)]
pub struct DefaultProducer(Arc<dyn Fn() -> Value + Send + Sync>);

impl DefaultProducer {
    /// Create a producer from a closure
    pub fn new<F>(producer: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(producer))
    }

    /// Producer that always yields the same value
    pub fn constant(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::new(move || value.clone())
    }

    /// Producer yielding `null`
    pub fn null() -> Self {
        Self::constant(Value::Null)
    }

    /// Producer yielding the current UTC time (RFC 3339)
    pub fn now() -> Self {
        Self::new(|| Value::String(Utc::now().to_rfc3339()))
    }

    /// Producer yielding a random v4 UUID
    pub fn random_uuid() -> Self {
        Self::new(|| Value::String(Uuid::new_v4().to_string()))
    }

    /// Invoke the producer
    pub fn produce(&self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for DefaultProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DefaultProducer({})", self.produce())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_refinement_check_and_message() {
        let r = Refinement::new(
            |v| v.as_str().map_or(false, |s| s.contains('@')),
            "must be an email",
        );
        assert!(r.check(&json!("a@b.c")));
        assert!(!r.check(&json!("nope")));
        assert!(!r.check(&json!(42)));
        assert_eq!(r.message(), "must be an email");
    }

    #[test]
    fn test_effect_kind_names() {
        let refine = Effect::Refinement(Refinement::new(|_| true, "x"));
        let transform = Effect::Transform(Arc::new(|v: Value| v));
        let preprocess = Effect::Preprocess(Arc::new(|v: Value| v));

        assert_eq!(refine.kind_name(), "refinement");
        assert_eq!(transform.kind_name(), "transform");
        assert_eq!(preprocess.kind_name(), "preprocess");
        assert!(refine.refinement().is_some());
        assert!(transform.refinement().is_none());
    }

    #[test]
    fn test_constant_and_null_producers() {
        assert_eq!(DefaultProducer::constant(18).produce(), json!(18));
        assert_eq!(DefaultProducer::null().produce(), Value::Null);
    }

    #[test]
    fn test_random_uuid_producer_is_fresh() {
        let producer = DefaultProducer::random_uuid();
        let a = producer.produce();
        let b = producer.produce();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_now_producer_is_rfc3339() {
        let value = DefaultProducer::now().produce();
        let parsed = chrono::DateTime::parse_from_rfc3339(value.as_str().unwrap());
        assert!(parsed.is_ok());
    }
}
