//! Category classification
//!
//! An ordered chain of independent strategies, each reading the session
//! snapshot. The first strategy with an opinion decides the category; the
//! rest are never consulted.

pub mod builtin;

pub use builtin::{ByCommandName, ByOriginalCategory, ByPrompt, BySymbolTable};

use crate::category::Category;
use crate::config::Settings;
use crate::utils::contained;
use std::rc::Rc;

// ==================== Session Snapshot ====================

/// Structural shape of the candidate source
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TableShape {
    /// Nothing known about the candidates
    #[default]
    Unknown,
    /// A plain list of strings
    List,
    /// A flat collection of language symbols
    Symbols,
    /// A candidate function known to the host by name
    Named(String),
}

/// Everything a classifier may look at, captured once per query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Command that opened the completion session
    pub command: Option<String>,
    /// Category the host itself declared for the session
    pub original_category: Option<Category>,
    /// Visible prompt text
    pub prompt: Option<String>,
    pub table: TableShape,
}

/// Input to a single classification
#[derive(Debug, Clone, Copy)]
pub struct ClassifyContext<'a> {
    pub state: &'a SessionState,
    pub settings: &'a Settings,
}

// ==================== Classifier ====================

/// A category inference strategy.
///
/// Implementations must be fast, must not prompt, and return `None` when
/// their signal is absent.
pub trait Classifier {
    /// Stable name used to reorder or remove the classifier
    fn name(&self) -> &str;

    fn classify(&self, cx: &ClassifyContext<'_>) -> Option<Category>;
}

/// Classifier backed by a closure
pub struct FnClassifier<F> {
    name: String,
    f: F,
}

impl<F> Classifier for FnClassifier<F>
where
    F: Fn(&ClassifyContext<'_>) -> Option<Category>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn classify(&self, cx: &ClassifyContext<'_>) -> Option<Category> {
        (self.f)(cx)
    }
}

/// Wrap a closure as a named classifier
pub fn from_fn<F>(name: impl Into<String>, f: F) -> Rc<dyn Classifier>
where
    F: Fn(&ClassifyContext<'_>) -> Option<Category> + 'static,
{
    Rc::new(FnClassifier { name: name.into(), f })
}

// ==================== Classifier Chain ====================

/// Ordered, externally configurable sequence of classifiers
#[derive(Clone, Default)]
pub struct ClassifierChain {
    classifiers: Vec<Rc<dyn Classifier>>,
}

impl ClassifierChain {
    /// An empty chain; resolves everything to `None`
    pub fn new() -> Self {
        Self::default()
    }

    /// The default chain: command override, host category, prompt, table shape
    pub fn standard() -> Self {
        Self {
            classifiers: vec![
                Rc::new(ByCommandName),
                Rc::new(ByOriginalCategory),
                Rc::new(ByPrompt),
                Rc::new(BySymbolTable),
            ],
        }
    }

    pub fn push_front(&mut self, classifier: Rc<dyn Classifier>) {
        self.classifiers.insert(0, classifier);
    }

    pub fn push_back(&mut self, classifier: Rc<dyn Classifier>) {
        self.classifiers.push(classifier);
    }

    /// Insert before the classifier called `anchor`, or at the end if absent
    pub fn insert_before(&mut self, anchor: &str, classifier: Rc<dyn Classifier>) {
        let index = self.position(anchor).unwrap_or(self.classifiers.len());
        self.classifiers.insert(index, classifier);
    }

    /// Remove every classifier called `name`; returns whether any was removed
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.classifiers.len();
        self.classifiers.retain(|c| c.name() != name);
        self.classifiers.len() != before
    }

    /// Replace the whole chain
    pub fn replace(&mut self, classifiers: impl IntoIterator<Item = Rc<dyn Classifier>>) {
        self.classifiers = classifiers.into_iter().collect();
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.classifiers.iter().position(|c| c.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.classifiers.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    /// First category any classifier reports. A panicking classifier counts
    /// as having no opinion.
    pub fn resolve(&self, cx: &ClassifyContext<'_>) -> Option<Category> {
        for classifier in &self.classifiers {
            let name = classifier.name();
            if let Some(category) = contained("classifier", name, || classifier.classify(cx)) {
                log::debug!("classifier {:?} chose category {}", name, category);
                return Some(category);
            }
            log::trace!("classifier {:?} had no opinion", name);
        }
        None
    }
}

impl std::fmt::Debug for ClassifierChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Resolve the category for `state` using `chain`
pub fn resolve_category(
    chain: &ClassifierChain,
    state: &SessionState,
    settings: &Settings,
) -> Option<Category> {
    chain.resolve(&ClassifyContext { state, settings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    fn counting(name: &str, answer: Option<&'static str>, calls: Rc<Cell<usize>>) -> Rc<dyn Classifier> {
        from_fn(name, move |_| {
            calls.set(calls.get() + 1);
            answer.map(Category::from_static)
        })
    }

    #[test]
    fn test_first_answer_wins_and_short_circuits() {
        let calls: Vec<Rc<Cell<usize>>> = (0..4).map(|_| Rc::new(Cell::new(0))).collect();
        let mut chain = ClassifierChain::new();
        chain.push_back(counting("a", None, calls[0].clone()));
        chain.push_back(counting("b", Some("face"), calls[1].clone()));
        chain.push_back(counting("c", Some("variable"), calls[2].clone()));
        chain.push_back(counting("d", None, calls[3].clone()));

        let state = SessionState::default();
        let settings = Settings::empty();
        assert_eq!(resolve_category(&chain, &state, &settings), Some(Category::FACE));

        let counts: Vec<usize> = calls.iter().map(|c| c.get()).collect();
        assert_eq!(counts, vec![1, 1, 0, 0]);
    }

    #[test]
    fn test_empty_and_silent_chains() {
        let state = SessionState::default();
        let settings = Settings::empty();
        assert_eq!(resolve_category(&ClassifierChain::new(), &state, &settings), None);

        let mut chain = ClassifierChain::new();
        chain.push_back(from_fn("x", |_| None));
        chain.push_back(from_fn("y", |_| None));
        assert_eq!(resolve_category(&chain, &state, &settings), None);
    }

    #[test]
    fn test_panicking_classifier_has_no_opinion() {
        let mut chain = ClassifierChain::new();
        chain.push_back(from_fn("broken", |_| panic!("classifier bug")));
        chain.push_back(from_fn("fallback", |_| Some(Category::SYMBOL)));
        let state = SessionState::default();
        assert_eq!(resolve_category(&chain, &state, &Settings::empty()), Some(Category::SYMBOL));
    }

    #[test]
    fn test_chain_editing() {
        let mut chain = ClassifierChain::standard();
        assert_eq!(chain.names(), vec!["by-command", "original-category", "by-prompt", "symbol-table"]);

        chain.push_front(from_fn("first", |_| None));
        chain.insert_before("by-prompt", from_fn("before-prompt", |_| None));
        chain.insert_before("missing", from_fn("last", |_| None));
        assert_eq!(
            chain.names(),
            vec!["first", "by-command", "original-category", "before-prompt", "by-prompt", "symbol-table", "last"]
        );

        assert!(chain.remove("original-category"));
        assert!(!chain.remove("original-category"));
        assert_eq!(chain.position("by-prompt"), Some(3));

        chain.replace(vec![from_fn("only", |_| None)]);
        assert_eq!(chain.names(), vec!["only"]);
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let chain = ClassifierChain::standard();
        let settings = Settings::default();
        let state = SessionState {
            prompt: Some("Describe face: ".to_string()),
            ..SessionState::default()
        };
        let first = resolve_category(&chain, &state, &settings);
        let second = resolve_category(&chain, &state, &settings);
        assert_eq!(first, Some(Category::FACE));
        assert_eq!(first, second);
    }
}
