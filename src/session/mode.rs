//! The interception point
//!
//! [`AnnotationMode`] wraps the host's accessor in an [`Interceptor`] and
//! registers a listener that remembers the invoking command. Disabling
//! restores the exact accessor that was wrapped.

use super::{CompletionSession, Host, ListenerId, MetadataAccessor, MetadataKey, MetadataValue, SessionListener};
use crate::annotate::AnnotationFn;
use crate::category::Category;
use crate::classify::SessionState;
use crate::registry::Registry;
use std::cell::RefCell;
use std::rc::Rc;

// ==================== Command Tracker ====================

/// Remembers which command opened the current session
#[derive(Debug, Default)]
struct CommandTracker {
    command: RefCell<Option<String>>,
}

impl CommandTracker {
    fn command(&self) -> Option<String> {
        self.command.borrow().clone()
    }
}

impl SessionListener for CommandTracker {
    fn session_started(&self, command: Option<&str>) {
        *self.command.borrow_mut() = command.map(str::to_string);
    }

    fn session_ended(&self) {
        self.command.borrow_mut().take();
    }
}

// ==================== Interceptor ====================

/// Accessor decorator answering `category` and `annotation-function`.
///
/// A `None` answer falls through to the wrapped accessor, as does every
/// other key.
struct Interceptor {
    original: Rc<dyn MetadataAccessor>,
    registry: Rc<RefCell<Registry>>,
    tracker: Rc<CommandTracker>,
}

impl Interceptor {
    /// Snapshot everything the classifiers read. The host's own category is
    /// read through the wrapped accessor, never through this one.
    fn snapshot(&self, session: &CompletionSession) -> SessionState {
        SessionState {
            command: self.tracker.command(),
            original_category: self
                .original
                .get(session, &MetadataKey::Category)
                .and_then(MetadataValue::into_category),
            prompt: Some(session.prompt.clone()),
            table: session.table.shape(),
        }
    }

    fn category(&self, session: &CompletionSession) -> Option<Category> {
        let state = self.snapshot(session);
        let Ok(registry) = self.registry.try_borrow() else {
            log::warn!("registry busy during category query; deferring to host");
            return None;
        };
        registry.resolve_category(&state)
    }

    fn annotation_function(&self, session: &CompletionSession) -> Option<AnnotationFn> {
        let category = self.get(session, &MetadataKey::Category)?.into_category()?;
        let Ok(registry) = self.registry.try_borrow() else {
            log::warn!("registry busy during annotation query; deferring to host");
            return None;
        };
        let f = registry.annotation_function(&category);
        if f.is_none() {
            log::trace!("no annotator registered for {}", category);
        }
        f
    }
}

impl MetadataAccessor for Interceptor {
    fn get(&self, session: &CompletionSession, key: &MetadataKey) -> Option<MetadataValue> {
        let answer = match key {
            MetadataKey::Category => self.category(session).map(MetadataValue::Category),
            MetadataKey::AnnotationFunction => {
                self.annotation_function(session).map(MetadataValue::AnnotationFunction)
            }
            MetadataKey::Other(_) => None,
        };
        answer.or_else(|| self.original.get(session, key))
    }
}

// ==================== Annotation Mode ====================

struct Installation {
    original: Rc<dyn MetadataAccessor>,
    listener: ListenerId,
}

/// On/off switch for category-aware annotations on a host
pub struct AnnotationMode {
    registry: Rc<RefCell<Registry>>,
    installation: Option<Installation>,
}

impl AnnotationMode {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Rc::new(RefCell::new(registry)),
            installation: None,
        }
    }

    /// Shared handle to the registry; changes apply to the next query
    pub fn registry(&self) -> Rc<RefCell<Registry>> {
        Rc::clone(&self.registry)
    }

    pub fn is_enabled(&self) -> bool {
        self.installation.is_some()
    }

    /// Install the interceptor and the command listener. Any previous
    /// installation is torn down first, so enabling twice wraps once.
    pub fn enable<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.disable(host);

        let tracker = Rc::new(CommandTracker::default());
        let interceptor = Interceptor {
            original: host.accessor(),
            registry: Rc::clone(&self.registry),
            tracker: Rc::clone(&tracker),
        };
        let original = host.replace_accessor(Rc::new(interceptor));
        let listener = host.add_listener(tracker);
        self.installation = Some(Installation { original, listener });
        log::debug!("annotation mode enabled");
    }

    /// Restore the wrapped accessor and drop the listener
    pub fn disable<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(installation) = self.installation.take() {
            host.replace_accessor(installation.original);
            host.remove_listener(installation.listener);
            log::debug!("annotation mode disabled");
        }
    }

    pub fn set_enabled<H: Host + ?Sized>(&mut self, host: &mut H, enabled: bool) {
        if enabled {
            self.enable(host);
        } else {
            self.disable(host);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::builtin::{DocKind, StaticLookup};
    use crate::annotate::{annotator, DispatchTable, Note};
    use crate::classify::{self, ClassifierChain};
    use crate::config::Settings;
    use crate::session::{CandidateTable, Minibuffer};
    use crate::utils::width::display_width;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    const FRAME: usize = 120;

    fn lookup() -> StaticLookup {
        StaticLookup::new()
            .with_binding("find-file", "C-x C-f")
            .with_doc(DocKind::Variable, "fill-column", "Column beyond which automatic line-wrapping should happen.")
            .with_value("fill-column", "70")
            .with_doc(DocKind::Face, "bold", "Basic bold face.")
    }

    fn mode() -> AnnotationMode {
        AnnotationMode::new(Registry::with_defaults(Rc::new(lookup())))
    }

    fn list(items: &[&str]) -> CandidateTable {
        CandidateTable::List { candidates: items.iter().map(|s| s.to_string()).collect() }
    }

    fn host_annotation() -> AnnotationFn {
        Rc::new(|_: &str| crate::annotate::format::format(Some("host"), 10, 0))
    }

    #[test]
    fn test_describe_variable_end_to_end() {
        let mut host = Minibuffer::new(FRAME);
        let mut mode = mode();
        mode.enable(&mut host);

        host.open(
            Some("describe-variable"),
            CompletionSession::new("Describe variable: ", list(&["fill-column", "undocumented"])),
        );
        assert_eq!(host.category(), Some(Category::VARIABLE));

        let lines = host.render();
        let doc = "Column beyond which automatic line-wrapping should happen.";
        let line = &lines[0];
        assert!(line.starts_with("fill-column "));

        // value field ends at the secondary offset, documentation at the margin
        let value_end = display_width(&line[..line.find("70").unwrap()]) + 2;
        assert_eq!(value_end, FRAME - 80 - 1);
        assert!(line.ends_with(doc));
        assert_eq!(display_width(line), FRAME);

        // no documentation: candidate shown bare
        assert_eq!(lines[1], "undocumented");
    }

    #[test]
    fn test_disable_restores_host_behaviour() {
        let mut host = Minibuffer::new(FRAME);
        let session = CompletionSession::new("Describe variable: ", list(&["fill-column"]))
            .with_category(Category::new("host-category"))
            .with_metadata(MetadataKey::AnnotationFunction, MetadataValue::AnnotationFunction(host_annotation()));

        let mut mode = mode();
        mode.enable(&mut host);
        mode.registry().borrow_mut().register_command_category("describe-variable", Category::VARIABLE);
        host.open(Some("describe-variable"), session.clone());
        assert_eq!(host.category(), Some(Category::VARIABLE));
        host.close();

        mode.disable(&mut host);
        assert!(!mode.is_enabled());
        assert_eq!(host.listener_count(), 0);

        host.open(Some("describe-variable"), session);
        assert_eq!(host.category(), Some(Category::new("host-category")));
        let f = host.annotation_function().unwrap();
        assert_eq!(f("fill-column").unwrap().plain_text(), " host");
    }

    #[test]
    fn test_enable_twice_installs_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut chain = ClassifierChain::new();
        chain.push_back(classify::from_fn("counting", move |_| {
            counter.set(counter.get() + 1);
            None
        }));
        let registry = Registry::new(Settings::empty(), chain, DispatchTable::new());

        let mut host = Minibuffer::new(FRAME);
        let mut mode = AnnotationMode::new(registry);
        mode.enable(&mut host);
        mode.enable(&mut host);
        assert_eq!(host.listener_count(), 1);

        host.open(None, CompletionSession::new("Pick: ", list(&["a"])));
        assert!(host.annotation_function().is_none());
        assert_eq!(calls.get(), 1);

        mode.set_enabled(&mut host, false);
        calls.set(0);
        assert!(host.annotation_function().is_none());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_bound_command_gets_its_own_annotator() {
        let mut host = Minibuffer::new(FRAME);
        let mut mode = mode();
        mode.enable(&mut host);
        mode.registry()
            .borrow_mut()
            .bind_command("my-find-file", annotator(|cand| Some(Note::Doc(format!("custom {}", cand)))))
            .unwrap();

        // prompt would say "command" via M-x, but the binding wins
        host.open(Some("my-find-file"), CompletionSession::new("M-x ", list(&["find-file"])));
        assert_eq!(host.category(), Some(Category::new("my-find-file")));
        assert!(host.render()[0].ends_with("custom find-file"));
        host.close();

        host.open(Some("execute-extended-command"), CompletionSession::new("M-x ", list(&["find-file"])));
        assert_eq!(host.category(), Some(Category::COMMAND));
        assert_eq!(host.render(), vec!["find-file (C-x C-f)".to_string()]);
    }

    #[test]
    fn test_command_is_forgotten_when_session_ends() {
        let mut host = Minibuffer::new(FRAME);
        let mut mode = mode();
        mode.enable(&mut host);
        mode.registry().borrow_mut().register_command_category("list-faces", Category::FACE);

        host.open(Some("list-faces"), CompletionSession::new("Pick: ", list(&["bold"])));
        assert_eq!(host.category(), Some(Category::FACE));
        host.close();

        host.open(None, CompletionSession::new("Pick: ", list(&["bold"])));
        assert_eq!(host.category(), None);
    }

    #[test]
    fn test_unknown_category_falls_back_to_host() {
        let mut host = Minibuffer::new(FRAME);
        let mut mode = mode();
        mode.enable(&mut host);

        let session = CompletionSession::new("Find file: ", list(&["README"]))
            .with_category(Category::new("file"))
            .with_metadata(MetadataKey::AnnotationFunction, MetadataValue::AnnotationFunction(host_annotation()))
            .with_metadata(MetadataKey::Other("cycle-sort-function".to_string()), MetadataValue::Text("id".to_string()));
        host.open(Some("find-file"), session);

        assert_eq!(host.category(), Some(Category::new("file")));
        let f = host.annotation_function().unwrap();
        assert_eq!(f("README").unwrap().plain_text(), " host");
        assert!(matches!(
            host.metadata(&MetadataKey::Other("cycle-sort-function".to_string())),
            Some(MetadataValue::Text(ref t)) if t == "id"
        ));
    }

    #[test]
    fn test_panicking_classifier_does_not_break_the_session() {
        let mut host = Minibuffer::new(FRAME);
        let mut mode = mode();
        mode.registry()
            .borrow_mut()
            .chain_mut()
            .push_front(classify::from_fn("broken", |_| panic!("bad classifier")));
        mode.enable(&mut host);

        host.open(None, CompletionSession::new("Describe face: ", list(&["bold"])));
        assert_eq!(host.category(), Some(Category::FACE));
        assert_eq!(host.render().len(), 1);
    }

    #[test]
    fn test_symbol_table_shape() {
        let mut host = Minibuffer::new(FRAME);
        let mut mode = mode();
        mode.enable(&mut host);
        host.open(
            Some("describe-symbol"),
            CompletionSession::new("Describe symbol: ", CandidateTable::Symbols { candidates: vec!["fill-column".to_string()] }),
        );
        assert_eq!(host.category(), Some(Category::SYMBOL));
        assert!(host.render()[0].ends_with("Column beyond which automatic line-wrapping should happen."));
    }
}
