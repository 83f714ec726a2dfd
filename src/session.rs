//! Reader session
//!
//! A small explicit state machine over the discrete input events of the
//! reading surface: selection capture, the floating note editor with its
//! drag and resize interactions, and section tracking. One pending
//! capture at a time; a new selection overwrites it, there is no queue.
//!
//! The session also guards against late document fetches: a response is
//! only accepted when its identity matches the document the reader is
//! still on.

use serde::{Deserialize, Serialize};

use crate::anchor::CapturedSelection;
use crate::corpus::DocumentKey;

/// Shared UI state with an explicit lifecycle: loaded from the user
/// profile at startup, persisted whenever it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderContext {
    pub user_id: String,
    pub theme: String,
    pub mode: String,
    pub ui_language: String,
}

/// Where the reader is in its interaction cycle.
///
/// Drag and resize apply to the floating note editor, so both carry the
/// pending capture along and return to editing when they end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Selecting,
    EditingNote(CapturedSelection),
    Dragging(CapturedSelection),
    Resizing(CapturedSelection),
}

/// Discrete input events the session reacts to.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    DocumentOpened(DocumentKey),
    SelectionStarted,
    /// A selection was released; `None` means it trimmed to nothing and
    /// capture was a silent no-op.
    SelectionReleased(Option<CapturedSelection>),
    DragStarted,
    DragEnded,
    ResizeStarted,
    ResizeEnded,
    /// The note editor was confirmed; the capture goes to the store.
    NoteCommitted,
    NoteCancelled,
    /// The viewing surface reports the structural anchor now visible.
    AnchorVisible(String),
    /// The context object changed and must be persisted.
    ContextChanged(ReaderContext),
}

/// What the caller has to do after an event was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    None,
    /// Open the note editor anchored at this byte offset.
    OpenEditor(usize),
    /// Write the committed capture through the annotation store.
    PersistNote(CapturedSelection),
    /// Write the changed context through the user store.
    PersistContext(ReaderContext),
    /// Tell the shell which outline section is active now.
    ActiveSection(String),
}

#[derive(Debug)]
pub struct ReaderSession {
    state: SessionState,
    current: Option<DocumentKey>,
    active_section: Option<String>,
    context: ReaderContext,
}

impl ReaderSession {
    pub fn new(context: ReaderContext) -> Self {
        Self {
            state: SessionState::Idle,
            current: None,
            active_section: None,
            context,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn context(&self) -> &ReaderContext {
        &self.context
    }

    pub fn current_document(&self) -> Option<&DocumentKey> {
        self.current.as_ref()
    }

    /// Whether a fetched body belongs to the document the reader is still
    /// on. Superseded fetches are not cancelled; their late responses are
    /// rejected here instead.
    pub fn accepts_body(&self, key: &DocumentKey) -> bool {
        self.current.as_ref() == Some(key)
    }

    /// Apply one event. Events that make no sense in the current state
    /// are ignored, leaving the state unchanged.
    pub fn apply(&mut self, event: SessionEvent) -> SessionEffect {
        match event {
            SessionEvent::DocumentOpened(key) => {
                // Navigation abandons any pending capture.
                self.state = SessionState::Idle;
                self.active_section = None;
                self.current = Some(key);
                SessionEffect::None
            }
            SessionEvent::SelectionStarted => {
                self.state = SessionState::Selecting;
                SessionEffect::None
            }
            SessionEvent::SelectionReleased(None) => {
                if matches!(self.state, SessionState::Selecting) {
                    self.state = SessionState::Idle;
                }
                SessionEffect::None
            }
            SessionEvent::SelectionReleased(Some(captured)) => {
                // Overwrites any pending uncommitted capture.
                let offset = captured.anchor_offset;
                self.state = SessionState::EditingNote(captured);
                SessionEffect::OpenEditor(offset)
            }
            SessionEvent::DragStarted => {
                if let SessionState::EditingNote(captured) = self.state.clone() {
                    self.state = SessionState::Dragging(captured);
                }
                SessionEffect::None
            }
            SessionEvent::DragEnded => {
                if let SessionState::Dragging(captured) = self.state.clone() {
                    self.state = SessionState::EditingNote(captured);
                }
                SessionEffect::None
            }
            SessionEvent::ResizeStarted => {
                if let SessionState::EditingNote(captured) = self.state.clone() {
                    self.state = SessionState::Resizing(captured);
                }
                SessionEffect::None
            }
            SessionEvent::ResizeEnded => {
                if let SessionState::Resizing(captured) = self.state.clone() {
                    self.state = SessionState::EditingNote(captured);
                }
                SessionEffect::None
            }
            SessionEvent::NoteCommitted => {
                if let SessionState::EditingNote(captured) = self.state.clone() {
                    self.state = SessionState::Idle;
                    SessionEffect::PersistNote(captured)
                } else {
                    SessionEffect::None
                }
            }
            SessionEvent::NoteCancelled => {
                if matches!(
                    self.state,
                    SessionState::EditingNote(_)
                        | SessionState::Dragging(_)
                        | SessionState::Resizing(_)
                ) {
                    self.state = SessionState::Idle;
                }
                SessionEffect::None
            }
            SessionEvent::AnchorVisible(anchor_id) => {
                if self.active_section.as_deref() == Some(anchor_id.as_str()) {
                    SessionEffect::None
                } else {
                    self.active_section = Some(anchor_id.clone());
                    SessionEffect::ActiveSection(anchor_id)
                }
            }
            SessionEvent::ContextChanged(context) => {
                if self.context == context {
                    SessionEffect::None
                } else {
                    self.context = context.clone();
                    SessionEffect::PersistContext(context)
                }
            }
        }
    }
}
