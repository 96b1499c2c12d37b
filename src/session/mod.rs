//! Completion sessions and the host interface
//!
//! The host owns a single metadata accessor slot. Everything in this crate
//! reaches the host through [`MetadataAccessor`], [`SessionListener`] and
//! [`Host`]; [`Minibuffer`] is the in-memory host used by the CLI and tests.

pub mod host;
pub mod mode;

pub use host::Minibuffer;
pub use mode::AnnotationMode;

use crate::annotate::AnnotationFn;
use crate::category::Category;
use crate::classify::TableShape;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

// ==================== Metadata ====================

/// Key of a per-session metadata query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetadataKey {
    Category,
    AnnotationFunction,
    Other(String),
}

/// Value of a per-session metadata entry
#[derive(Clone)]
pub enum MetadataValue {
    Category(Category),
    AnnotationFunction(AnnotationFn),
    Text(String),
}

impl MetadataValue {
    pub fn into_category(self) -> Option<Category> {
        match self {
            Self::Category(category) => Some(category),
            _ => None,
        }
    }

    pub fn into_annotation_function(self) -> Option<AnnotationFn> {
        match self {
            Self::AnnotationFunction(f) => Some(f),
            _ => None,
        }
    }
}

impl fmt::Debug for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(category) => f.debug_tuple("Category").field(category).finish(),
            Self::AnnotationFunction(_) => f.write_str("AnnotationFunction(..)"),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
        }
    }
}

// ==================== Completion Session ====================

/// Where the candidates come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateTable {
    /// A plain list of strings
    List { candidates: Vec<String> },
    /// The language's symbol table
    Symbols { candidates: Vec<String> },
    /// A completion function the host knows by name
    Named { name: String, candidates: Vec<String> },
}

impl CandidateTable {
    pub fn candidates(&self) -> &[String] {
        match self {
            Self::List { candidates } | Self::Symbols { candidates } | Self::Named { candidates, .. } => {
                candidates
            }
        }
    }

    pub fn shape(&self) -> TableShape {
        match self {
            Self::List { .. } => TableShape::List,
            Self::Symbols { .. } => TableShape::Symbols,
            Self::Named { name, .. } => TableShape::Named(name.clone()),
        }
    }
}

/// One interactive completion episode as the host sees it
#[derive(Debug, Clone)]
pub struct CompletionSession {
    pub prompt: String,
    pub table: CandidateTable,
    metadata: HashMap<MetadataKey, MetadataValue>,
}

impl CompletionSession {
    pub fn new(prompt: impl Into<String>, table: CandidateTable) -> Self {
        Self {
            prompt: prompt.into(),
            table,
            metadata: HashMap::new(),
        }
    }

    /// Declare the session's own category
    pub fn with_category(self, category: Category) -> Self {
        self.with_metadata(MetadataKey::Category, MetadataValue::Category(category))
    }

    pub fn with_metadata(mut self, key: MetadataKey, value: MetadataValue) -> Self {
        self.metadata.insert(key, value);
        self
    }

    /// Metadata the session itself declared, bypassing any accessor
    pub fn declared(&self, key: &MetadataKey) -> Option<&MetadataValue> {
        self.metadata.get(key)
    }
}

// ==================== Host Interface ====================

/// The host's per-session metadata lookup
pub trait MetadataAccessor {
    fn get(&self, session: &CompletionSession, key: &MetadataKey) -> Option<MetadataValue>;
}

/// The host's own accessor: whatever the session declared
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredMetadata;

impl MetadataAccessor for DeclaredMetadata {
    fn get(&self, session: &CompletionSession, key: &MetadataKey) -> Option<MetadataValue> {
        session.declared(key).cloned()
    }
}

/// Notified when a completion session opens and closes
pub trait SessionListener {
    /// `command` is the command that opened the session, if known
    fn session_started(&self, command: Option<&str>);

    fn session_ended(&self) {}
}

pub type ListenerId = usize;

/// A completion host with an interceptable accessor slot
pub trait Host {
    fn accessor(&self) -> Rc<dyn MetadataAccessor>;

    /// Install `accessor`, returning the one it replaces
    fn replace_accessor(&mut self, accessor: Rc<dyn MetadataAccessor>) -> Rc<dyn MetadataAccessor>;

    fn add_listener(&mut self, listener: Rc<dyn SessionListener>) -> ListenerId;

    /// Returns whether the listener was registered
    fn remove_listener(&mut self, id: ListenerId) -> bool;
}
