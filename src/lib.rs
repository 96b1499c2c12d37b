//! Marginal
//!
//! Category-aware annotations for completion candidates. An ordered chain
//! of classifiers infers what a completion session is choosing among; a
//! dispatch table picks the annotator for that category; the formatter
//! right-justifies the annotation against the edge of the display area.
//!
//! ```no_run
//! use marginal::annotate::builtin::StaticLookup;
//! use marginal::session::{AnnotationMode, CandidateTable, CompletionSession, Minibuffer};
//! use marginal::Registry;
//! use std::rc::Rc;
//!
//! let mut host = Minibuffer::new(120);
//! let mut mode = AnnotationMode::new(Registry::with_defaults(Rc::new(StaticLookup::new())));
//! mode.enable(&mut host);
//!
//! let table = CandidateTable::List { candidates: vec!["fill-column".to_string()] };
//! host.open(Some("describe-variable"), CompletionSession::new("Describe variable: ", table));
//! for line in host.render() {
//!     println!("{}", line);
//! }
//! ```

pub mod annotate;
pub mod category;
pub mod classify;
pub mod config;
pub mod registry;
pub mod session;
pub mod utils;

pub use category::Category;
pub use config::{Config, Settings};
pub use registry::Registry;
pub use utils::{Error, Result};
