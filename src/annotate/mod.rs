//! Annotators and the category dispatch table
//!
//! An annotator turns one candidate into raw annotation text ([`Note`]);
//! the [`format`] module lays that text out. Annotators are selected by
//! category through a [`DispatchTable`].

pub mod builtin;
pub mod format;

pub use format::{render_candidate, Annotation, Face, Formatter, Segment};

use crate::category::Category;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

// ==================== Annotator Output ====================

/// Raw annotation text produced by an annotator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Note {
    /// Documentation, right-justified at the margin
    Doc(String),
    /// Key description shown right after the candidate
    Binding(String),
    /// Current value plus documentation, in two aligned fields
    Value { value: String, doc: String },
    /// Sample text shown in the candidate's own face, plus documentation
    Preview { face: String, sample: String, doc: String },
}

/// Per-candidate annotator; `None` means nothing to show for that candidate
pub type AnnotatorFn = Rc<dyn Fn(&str) -> Option<Note>>;

/// What the host calls per visible candidate: annotator plus formatting
pub type AnnotationFn = Rc<dyn Fn(&str) -> Option<Annotation>>;

/// Wrap a closure as an [`AnnotatorFn`]
pub fn annotator<F>(f: F) -> AnnotatorFn
where
    F: Fn(&str) -> Option<Note> + 'static,
{
    Rc::new(f)
}

// ==================== Dispatch Table ====================

/// Category → annotator mapping; the last registration for a category wins
#[derive(Clone, Default)]
pub struct DispatchTable {
    entries: HashMap<Category, AnnotatorFn>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `f` for `category`, returning the entry it replaced
    pub fn register(&mut self, category: Category, f: AnnotatorFn) -> Option<AnnotatorFn> {
        log::debug!("registering annotator for {}", category);
        self.entries.insert(category, f)
    }

    /// Builder form of [`register`](Self::register)
    pub fn with(mut self, category: Category, f: AnnotatorFn) -> Self {
        self.register(category, f);
        self
    }

    pub fn lookup(&self, category: &Category) -> Option<AnnotatorFn> {
        self.entries.get(category).cloned()
    }

    pub fn contains(&self, category: &Category) -> bool {
        self.entries.contains_key(category)
    }

    pub fn remove(&mut self, category: &Category) -> Option<AnnotatorFn> {
        self.entries.remove(category)
    }

    /// Registered categories, sorted by name
    pub fn categories(&self) -> Vec<&Category> {
        let mut categories: Vec<_> = self.entries.keys().collect();
        categories.sort();
        categories
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.categories()).finish()
    }
}

/// What a bound command should be annotated with
#[derive(Clone)]
pub enum AnnotatorSource {
    /// Reuse the annotator currently registered for another category
    Category(Category),
    Function(AnnotatorFn),
}

impl From<Category> for AnnotatorSource {
    fn from(category: Category) -> Self {
        Self::Category(category)
    }
}

impl From<AnnotatorFn> for AnnotatorSource {
    fn from(f: AnnotatorFn) -> Self {
        Self::Function(f)
    }
}
