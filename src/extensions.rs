//! Process-wide registration of identifier extensions
//!
//! Classification recognises identifier kinds through string annotations
//! (a node description, or a custom type's name) only after the extension
//! table has been installed. Installation happens once per process: the
//! first call to `install` / `install_with` wins and every later call
//! returns the already installed table.
//!
//! Creating a `Classifier` installs the defaults, so any translation runs
//! after installation.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::observability::{log_event, Event};
use crate::validation::IdentifierKind;

static EXTENSIONS: OnceLock<Extensions> = OnceLock::new();

/// Built-in annotation names for identifier kinds
const BUILTIN_ANNOTATIONS: &[(&str, IdentifierKind)] = &[
    ("ObjectId", IdentifierKind::ObjectId),
    ("ObjectID", IdentifierKind::ObjectId),
    ("UUID", IdentifierKind::Uuid),
    ("Uuid", IdentifierKind::Uuid),
];

/// Installed extension table
#[derive(Debug)]
pub struct Extensions {
    annotations: HashMap<String, IdentifierKind>,
}

impl Extensions {
    fn with_aliases(aliases: &[(&str, IdentifierKind)]) -> Self {
        let annotations = BUILTIN_ANNOTATIONS
            .iter()
            .map(|(name, kind)| (name.to_string(), *kind))
            .chain(aliases.iter().map(|(name, kind)| (name.to_string(), *kind)))
            .collect();
        Self { annotations }
    }

    /// Identifier kind registered for an annotation
    pub fn identifier_for(&self, annotation: &str) -> Option<IdentifierKind> {
        self.annotations.get(annotation).copied()
    }

    /// Number of registered annotations
    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }
}

/// Install the built-in extensions
pub fn install() -> &'static Extensions {
    install_with(&[])
}

/// Install the built-in extensions plus extra annotation aliases.
///
/// Aliases are ignored when the table is already installed.
pub fn install_with(aliases: &[(&str, IdentifierKind)]) -> &'static Extensions {
    EXTENSIONS.get_or_init(|| {
        let extensions = Extensions::with_aliases(aliases);
        let count = extensions.annotation_count().to_string();
        log_event(Event::ExtensionsInstalled, &[("annotations", count.as_str())]);
        extensions
    })
}

/// The installed table, if installation already happened
pub fn installed() -> Option<&'static Extensions> {
    EXTENSIONS.get()
}
