//! Registry: the configuration object behind the interception point
//!
//! Bundles runtime settings, the classifier chain and the dispatch table,
//! and exposes the registration surface. One registry is shared between an
//! [`AnnotationMode`](crate::session::AnnotationMode) and its interceptor;
//! tests build independent ones.

use crate::annotate::builtin::{default_annotators, Lookup};
use crate::annotate::{AnnotationFn, AnnotatorFn, AnnotatorSource, DispatchTable, Formatter};
use crate::category::Category;
use crate::classify::{resolve_category, ClassifierChain, SessionState};
use crate::config::{Config, Settings};
use crate::utils::{contained, Error, Result};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct Registry {
    settings: Settings,
    chain: ClassifierChain,
    annotators: DispatchTable,
}

impl Registry {
    /// Registry with the given parts
    pub fn new(settings: Settings, chain: ClassifierChain, annotators: DispatchTable) -> Self {
        Self { settings, chain, annotators }
    }

    /// Default settings, the standard chain and the default annotators
    pub fn with_defaults(lookup: Rc<dyn Lookup>) -> Self {
        Self::new(Settings::default(), ClassifierChain::standard(), default_annotators(lookup))
    }

    /// Like [`with_defaults`](Self::with_defaults) but with settings from `config`
    pub fn from_config(config: &Config, lookup: Rc<dyn Lookup>) -> Result<Self> {
        let settings = Settings::from_config(config)?;
        Ok(Self::new(settings, ClassifierChain::standard(), default_annotators(lookup)))
    }

    // === Accessors ===

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn chain(&self) -> &ClassifierChain {
        &self.chain
    }

    /// Prepend, append, reorder or replace classifiers
    pub fn chain_mut(&mut self) -> &mut ClassifierChain {
        &mut self.chain
    }

    pub fn annotators(&self) -> &DispatchTable {
        &self.annotators
    }

    // === Registration ===

    pub fn set_truncate_width(&mut self, width: usize) {
        self.settings.truncate_width = width;
    }

    /// Add or replace the annotator for `category`
    pub fn register_annotator(&mut self, category: Category, f: AnnotatorFn) -> Option<AnnotatorFn> {
        self.annotators.register(category, f)
    }

    /// Force sessions opened by `command` to resolve to `category`
    pub fn register_command_category(&mut self, command: &str, category: Category) -> Option<Category> {
        self.settings.command_categories.insert(command.to_string(), category)
    }

    /// Append a prompt rule after the existing ones
    pub fn add_prompt_category(&mut self, pattern: &str, category: Category) -> Result<()> {
        self.settings.prompt_categories.push(pattern, category)
    }

    /// Give `command` its own annotator.
    ///
    /// The command resolves to a synthetic category named after itself, so
    /// other commands sharing its structural category are unaffected.
    /// Returns the synthetic category.
    pub fn bind_command(&mut self, command: &str, source: impl Into<AnnotatorSource>) -> Result<Category> {
        let f = match source.into() {
            AnnotatorSource::Function(f) => f,
            AnnotatorSource::Category(category) => self
                .annotators
                .lookup(&category)
                .ok_or_else(|| Error::UnknownCategory { category: category.to_string() })?,
        };
        let synthetic = Category::for_command(command);
        self.register_command_category(command, synthetic.clone());
        self.register_annotator(synthetic.clone(), f);
        log::debug!("bound command {:?} to its own annotator", command);
        Ok(synthetic)
    }

    // === Queries ===

    pub fn resolve_category(&self, state: &SessionState) -> Option<Category> {
        resolve_category(&self.chain, state, &self.settings)
    }

    pub fn annotator_for(&self, category: &Category) -> Option<AnnotatorFn> {
        self.annotators.lookup(category)
    }

    /// Annotation function for `category`: the registered annotator with
    /// formatting applied at the current truncate width. A panicking
    /// annotator yields no annotation for that candidate only.
    pub fn annotation_function(&self, category: &Category) -> Option<AnnotationFn> {
        let annotator = self.annotator_for(category)?;
        let formatter = Formatter::new(self.settings.truncate_width);
        let label = category.to_string();
        Some(Rc::new(move |cand: &str| {
            contained("annotator", &label, || annotator(cand)).map(|note| formatter.format_note(&note))
        }))
    }
}
