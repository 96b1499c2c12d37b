//! Completion categories
//!
//! A category names what a completion session is choosing among. The set is
//! open: callers introduce new categories simply by registering a classifier
//! or annotator for a new name.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Semantic tag for a completion session, compared by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(Cow<'static, str>);

impl Category {
    pub const COMMAND: Category = Category::from_static("command");
    pub const VARIABLE: Category = Category::from_static("variable");
    pub const FACE: Category = Category::from_static("face");
    pub const SYMBOL: Category = Category::from_static("symbol");
    pub const PACKAGE: Category = Category::from_static("package");
    pub const CUSTOMIZE_GROUP: Category = Category::from_static("customize-group");

    /// Create a category from any name
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Create a category from a string literal (usable in constants)
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// The synthetic category a bound command resolves to
    pub fn for_command(command: &str) -> Self {
        Self::new(command)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
