//! Built-in classifiers, in their default chain order

use super::{Classifier, ClassifyContext, TableShape};
use crate::category::Category;

/// Explicit per-command override; the escape hatch that beats every heuristic
#[derive(Debug, Clone, Copy, Default)]
pub struct ByCommandName;

impl Classifier for ByCommandName {
    fn name(&self) -> &str {
        "by-command"
    }

    fn classify(&self, cx: &ClassifyContext<'_>) -> Option<Category> {
        let command = cx.state.command.as_deref()?;
        cx.settings.command_categories.get(command).cloned()
    }
}

/// Trust whatever the host already declared
#[derive(Debug, Clone, Copy, Default)]
pub struct ByOriginalCategory;

impl Classifier for ByOriginalCategory {
    fn name(&self) -> &str {
        "original-category"
    }

    fn classify(&self, cx: &ClassifyContext<'_>) -> Option<Category> {
        cx.state.original_category.clone()
    }
}

/// Match the prompt text against the configured rules
#[derive(Debug, Clone, Copy, Default)]
pub struct ByPrompt;

impl Classifier for ByPrompt {
    fn name(&self) -> &str {
        "by-prompt"
    }

    fn classify(&self, cx: &ClassifyContext<'_>) -> Option<Category> {
        let prompt = cx.state.prompt.as_deref()?;
        cx.settings.prompt_categories.classify(prompt).cloned()
    }
}

/// Recognize candidate sources that enumerate language symbols
#[derive(Debug, Clone, Copy, Default)]
pub struct BySymbolTable;

impl Classifier for BySymbolTable {
    fn name(&self) -> &str {
        "symbol-table"
    }

    fn classify(&self, cx: &ClassifyContext<'_>) -> Option<Category> {
        match &cx.state.table {
            TableShape::Symbols => Some(Category::SYMBOL),
            TableShape::Named(name) if cx.settings.symbol_tables.contains(name) => {
                Some(Category::SYMBOL)
            }
            _ => None,
        }
    }
}
