//! Default annotators
//!
//! The lookups themselves (key bindings, documentation, values, package
//! summaries) belong to the host and are reached through [`Lookup`].
//! [`StaticLookup`] is an in-memory implementation loadable from JSON.

use super::{annotator, AnnotatorFn, DispatchTable, Note};
use crate::category::Category;
use crate::utils::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

/// Sample text previewed in a face's own style
pub const FACE_SAMPLE: &str = "abcdefghijklmNOPQRSTUVWXYZ";

/// Which documentation namespace a symbol is looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocKind {
    Function,
    Variable,
    Face,
    Group,
}

/// Read-only lookups the default annotators consult. None of them may block.
pub trait Lookup {
    /// Description of the first key sequence bound to `command`
    fn key_binding(&self, command: &str) -> Option<String>;

    fn documentation(&self, kind: DocKind, symbol: &str) -> Option<String>;

    /// Printed representation of a variable's current value
    fn value(&self, variable: &str) -> Option<String>;

    /// One-line summary of an installed or available package
    fn package_summary(&self, package: &str) -> Option<String>;
}

// ==================== Static Lookup ====================

/// Lookup tables held in memory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticLookup {
    pub bindings: HashMap<String, String>,
    pub functions: HashMap<String, String>,
    pub variables: HashMap<String, String>,
    pub faces: HashMap<String, String>,
    pub groups: HashMap<String, String>,
    pub values: HashMap<String, String>,
    pub packages: HashMap<String, String>,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn with_binding(mut self, command: &str, keys: &str) -> Self {
        self.bindings.insert(command.to_string(), keys.to_string());
        self
    }

    pub fn with_doc(mut self, kind: DocKind, symbol: &str, doc: &str) -> Self {
        self.docs_mut(kind).insert(symbol.to_string(), doc.to_string());
        self
    }

    pub fn with_value(mut self, variable: &str, value: &str) -> Self {
        self.values.insert(variable.to_string(), value.to_string());
        self
    }

    pub fn with_package(mut self, package: &str, summary: &str) -> Self {
        self.packages.insert(package.to_string(), summary.to_string());
        self
    }

    fn docs(&self, kind: DocKind) -> &HashMap<String, String> {
        match kind {
            DocKind::Function => &self.functions,
            DocKind::Variable => &self.variables,
            DocKind::Face => &self.faces,
            DocKind::Group => &self.groups,
        }
    }

    fn docs_mut(&mut self, kind: DocKind) -> &mut HashMap<String, String> {
        match kind {
            DocKind::Function => &mut self.functions,
            DocKind::Variable => &mut self.variables,
            DocKind::Face => &mut self.faces,
            DocKind::Group => &mut self.groups,
        }
    }
}

impl Lookup for StaticLookup {
    fn key_binding(&self, command: &str) -> Option<String> {
        self.bindings.get(command).cloned()
    }

    fn documentation(&self, kind: DocKind, symbol: &str) -> Option<String> {
        self.docs(kind).get(symbol).cloned()
    }

    fn value(&self, variable: &str) -> Option<String> {
        self.values.get(variable).cloned()
    }

    fn package_summary(&self, package: &str) -> Option<String> {
        self.packages.get(package).cloned()
    }
}

// ==================== Annotators ====================

pub fn annotate_binding(lookup: &dyn Lookup, cand: &str) -> Option<Note> {
    lookup.key_binding(cand).map(Note::Binding)
}

pub fn annotate_customize_group(lookup: &dyn Lookup, cand: &str) -> Option<Note> {
    lookup.documentation(DocKind::Group, cand).map(Note::Doc)
}

/// Documentation plus current value. A variable without documentation gets
/// no annotation even if its value is known.
pub fn annotate_variable(lookup: &dyn Lookup, cand: &str) -> Option<Note> {
    let doc = lookup.documentation(DocKind::Variable, cand)?;
    let value = lookup.value(cand).unwrap_or_default();
    Some(Note::Value { value, doc })
}

pub fn annotate_face(lookup: &dyn Lookup, cand: &str) -> Option<Note> {
    let doc = lookup.documentation(DocKind::Face, cand)?;
    Some(Note::Preview {
        face: cand.to_string(),
        sample: FACE_SAMPLE.to_string(),
        doc,
    })
}

/// Function documentation, falling back to variable documentation
pub fn annotate_symbol(lookup: &dyn Lookup, cand: &str) -> Option<Note> {
    lookup
        .documentation(DocKind::Function, cand)
        .or_else(|| lookup.documentation(DocKind::Variable, cand))
        .map(Note::Doc)
}

pub fn annotate_package(lookup: &dyn Lookup, cand: &str) -> Option<Note> {
    lookup.package_summary(strip_version(cand)).map(Note::Doc)
}

/// Package name without a trailing `-<version>` made of digits, dots and dashes
pub fn strip_version(cand: &str) -> &str {
    let is_version = |rest: &str| {
        !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-')
    };
    cand.match_indices('-')
        .find(|(i, _)| is_version(&cand[i + 1..]))
        .map(|(i, _)| &cand[..i])
        .unwrap_or(cand)
}

fn bind<F>(lookup: &Rc<dyn Lookup>, f: F) -> AnnotatorFn
where
    F: Fn(&dyn Lookup, &str) -> Option<Note> + 'static,
{
    let lookup = Rc::clone(lookup);
    annotator(move |cand| f(&*lookup, cand))
}

/// Dispatch table seeded with the default annotators
pub fn default_annotators(lookup: Rc<dyn Lookup>) -> DispatchTable {
    DispatchTable::new()
        .with(Category::COMMAND, bind(&lookup, annotate_binding))
        .with(Category::CUSTOMIZE_GROUP, bind(&lookup, annotate_customize_group))
        .with(Category::VARIABLE, bind(&lookup, annotate_variable))
        .with(Category::FACE, bind(&lookup, annotate_face))
        .with(Category::SYMBOL, bind(&lookup, annotate_symbol))
        .with(Category::PACKAGE, bind(&lookup, annotate_package))
}
