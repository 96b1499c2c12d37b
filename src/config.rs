//! Configuration
//!
//! [`Config`] is the serializable form read from JSON; [`Settings`] is the
//! compiled form the classifiers and formatter read on every query.

use crate::category::Category;
use crate::utils::{Error, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Default column budget for annotation text
pub const DEFAULT_TRUNCATE_WIDTH: usize = 80;

/// Default width of the completion display area
pub const DEFAULT_FRAME_WIDTH: usize = 120;

/// Candidate tables that are known to complete language symbols
pub const DEFAULT_SYMBOL_TABLES: &[&str] = &["help--symbol-completion-table"];

/// Default prompt rules, tried in order
pub const DEFAULT_PROMPT_RULES: &[(&str, Category)] = &[
    (r"\bgroup\b", Category::CUSTOMIZE_GROUP),
    (r"\bM-x\b", Category::COMMAND),
    (r"\bpackage\b", Category::PACKAGE),
    (r"\bface\b", Category::FACE),
    (r"\bvariable\b", Category::VARIABLE),
];

// ==================== Serialized Configuration ====================

/// User configuration as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum display width of annotation text
    pub truncate_width: usize,

    /// Width of the area candidates are rendered into (CLI only)
    pub frame_width: usize,

    /// Prompt regex → category rules, first match wins
    pub prompt_categories: Vec<PromptRule>,

    /// Invoking command → category overrides
    pub command_categories: BTreeMap<String, Category>,

    /// Names of candidate tables that hold symbols
    pub symbol_tables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRule {
    pub pattern: String,
    pub category: Category,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            truncate_width: DEFAULT_TRUNCATE_WIDTH,
            frame_width: DEFAULT_FRAME_WIDTH,
            prompt_categories: DEFAULT_PROMPT_RULES
                .iter()
                .map(|(pattern, category)| PromptRule {
                    pattern: pattern.to_string(),
                    category: category.clone(),
                })
                .collect(),
            command_categories: BTreeMap::new(),
            symbol_tables: DEFAULT_SYMBOL_TABLES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no session could be annotated with
    pub fn validate(&self) -> Result<()> {
        if self.truncate_width == 0 {
            return Err(Error::Config("truncate_width must be positive".to_string()));
        }
        Ok(())
    }

    /// Load a JSON configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        log::debug!("loaded configuration from {}", path.display());
        Self::from_json(&text)
    }

    /// Output as pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

// ==================== Compiled Settings ====================

/// Ordered prompt rules with compiled patterns
#[derive(Debug, Clone, Default)]
pub struct PromptCategories {
    rules: Vec<(Regex, Category)>,
}

impl PromptCategories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. Patterns match case-insensitively.
    pub fn push(&mut self, pattern: &str, category: Category) -> Result<()> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
        self.rules.push((regex, category));
        Ok(())
    }

    /// Category of the first rule matching `prompt`
    pub fn classify(&self, prompt: &str) -> Option<&Category> {
        self.rules
            .iter()
            .find(|(regex, _)| regex.is_match(prompt))
            .map(|(_, category)| category)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Runtime settings consulted by classifiers and the formatter
#[derive(Debug, Clone)]
pub struct Settings {
    pub truncate_width: usize,
    pub prompt_categories: PromptCategories,
    pub command_categories: HashMap<String, Category>,
    pub symbol_tables: HashSet<String>,
}

impl Settings {
    /// Settings with no rules at all
    pub fn empty() -> Self {
        Self {
            truncate_width: DEFAULT_TRUNCATE_WIDTH,
            prompt_categories: PromptCategories::new(),
            command_categories: HashMap::new(),
            symbol_tables: HashSet::new(),
        }
    }

    /// Compile a [`Config`]
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut prompt_categories = PromptCategories::new();
        for rule in &config.prompt_categories {
            prompt_categories.push(&rule.pattern, rule.category.clone())?;
        }
        Ok(Self {
            truncate_width: config.truncate_width,
            prompt_categories,
            command_categories: config
                .command_categories
                .iter()
                .map(|(cmd, cat)| (cmd.clone(), cat.clone()))
                .collect(),
            symbol_tables: config.symbol_tables.iter().cloned().collect(),
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        let mut settings = Self::empty();
        for (pattern, category) in DEFAULT_PROMPT_RULES {
            if let Err(e) = settings.prompt_categories.push(pattern, category.clone()) {
                log::error!("built-in prompt rule rejected: {}", e);
            }
        }
        settings.symbol_tables = DEFAULT_SYMBOL_TABLES.iter().map(|s| s.to_string()).collect();
        settings
    }
}
