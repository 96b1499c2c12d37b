//! In-memory completion host
//!
//! Holds at most one open session, renders its candidates with whatever
//! annotation function the (possibly intercepted) accessor reports.

use super::{
    CompletionSession, DeclaredMetadata, Host, ListenerId, MetadataAccessor, MetadataKey, MetadataValue,
    SessionListener,
};
use crate::annotate::{render_candidate, AnnotationFn};
use crate::category::Category;
use std::rc::Rc;

pub struct Minibuffer {
    accessor: Rc<dyn MetadataAccessor>,
    listeners: Vec<(ListenerId, Rc<dyn SessionListener>)>,
    next_listener: ListenerId,
    session: Option<CompletionSession>,
    frame_width: usize,
}

impl Minibuffer {
    /// A host rendering candidates into `frame_width` columns
    pub fn new(frame_width: usize) -> Self {
        Self {
            accessor: Rc::new(DeclaredMetadata),
            listeners: Vec::new(),
            next_listener: 0,
            session: None,
            frame_width,
        }
    }

    pub fn frame_width(&self) -> usize {
        self.frame_width
    }

    /// Open `session` on behalf of `command`, closing any open one first
    pub fn open(&mut self, command: Option<&str>, session: CompletionSession) {
        if self.session.is_some() {
            self.close();
        }
        log::debug!("opening completion session {:?} for {:?}", session.prompt, command);
        self.session = Some(session);
        for (_, listener) in &self.listeners {
            listener.session_started(command);
        }
    }

    pub fn close(&mut self) {
        if self.session.take().is_some() {
            for (_, listener) in &self.listeners {
                listener.session_ended();
            }
        }
    }

    pub fn session(&self) -> Option<&CompletionSession> {
        self.session.as_ref()
    }

    /// Ask the current accessor for `key` of the open session
    pub fn metadata(&self, key: &MetadataKey) -> Option<MetadataValue> {
        let session = self.session.as_ref()?;
        self.accessor.get(session, key)
    }

    pub fn category(&self) -> Option<Category> {
        self.metadata(&MetadataKey::Category)?.into_category()
    }

    pub fn annotation_function(&self) -> Option<AnnotationFn> {
        self.metadata(&MetadataKey::AnnotationFunction)?.into_annotation_function()
    }

    /// Render every candidate of the open session, annotated when possible.
    /// The annotation function is fetched once, then applied per candidate.
    pub fn render(&self) -> Vec<String> {
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        let annotate = self.annotation_function();
        session
            .table
            .candidates()
            .iter()
            .map(|cand| {
                let annotation = annotate.as_ref().and_then(|f| f(cand.as_str()));
                render_candidate(cand, annotation.as_ref(), self.frame_width)
            })
            .collect()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Host for Minibuffer {
    fn accessor(&self) -> Rc<dyn MetadataAccessor> {
        Rc::clone(&self.accessor)
    }

    fn replace_accessor(&mut self, accessor: Rc<dyn MetadataAccessor>) -> Rc<dyn MetadataAccessor> {
        std::mem::replace(&mut self.accessor, accessor)
    }

    fn add_listener(&mut self, listener: Rc<dyn SessionListener>) -> ListenerId {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }
}
