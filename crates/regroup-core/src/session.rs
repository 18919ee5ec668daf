//! Drag session state machine.

use crate::reorder::apply_move;
use crate::target::{Destination, Hover, resolve_target};
use crate::tree::{Entry, Tree};

/// Sequences one pointer-down-to-release interaction.
///
/// On gesture start the session freezes a snapshot of the tree. Every hover
/// only reclassifies against that snapshot and buffers the preview; the
/// committed tree changes at most once per gesture, when [`commit`] applies
/// the buffered preview. Cancelling is a pure state transition, since
/// nothing was mutated while the gesture ran.
///
/// [`commit`]: DragSession::commit
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: SessionState,
}

#[derive(Debug, Clone, Default)]
enum SessionState {
    #[default]
    Idle,
    Active(ActiveDrag),
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    /// The tree as it looked when the gesture started.
    snapshot: Tree,
    /// The element being dragged.
    entry: Entry,
    /// Last classified destination, rendered by the collaborator as the
    /// drop indicator.
    preview: Option<Destination>,
}

impl DragSession {
    /// Create an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a gesture for `entry`, snapshotting `tree`.
    ///
    /// Returns false while another gesture is active (commits stay strictly
    /// serialized) and when `entry` is not in the tree.
    pub fn begin(&mut self, tree: &Tree, entry: Entry) -> bool {
        if self.is_active() {
            log::debug!("ignoring gesture start for {entry:?}: a gesture is already active");
            return false;
        }
        if !tree.contains(entry) {
            log::debug!("ignoring gesture start for {entry:?}: not in the tree");
            return false;
        }
        tree.debug_validate();
        self.state = SessionState::Active(ActiveDrag {
            snapshot: tree.clone(),
            entry,
            preview: None,
        });
        true
    }

    /// Classify a drag-over signal against the gesture snapshot and buffer
    /// it as the new preview. Returns the preview for the collaborator to
    /// render, or `None` while idle. Never touches committed state.
    pub fn hover(&mut self, hover: Option<Hover>) -> Option<Destination> {
        let SessionState::Active(drag) = &mut self.state else {
            return None;
        };
        let destination = resolve_target(&drag.snapshot, drag.entry, hover);
        drag.preview = Some(destination);
        Some(destination)
    }

    /// Finish the gesture, applying the buffered preview exactly once.
    ///
    /// Returns the committed tree — the unchanged snapshot when no hover
    /// was ever classified or the move degenerated to a no-op — or `None`
    /// when no gesture was active.
    pub fn commit(&mut self) -> Option<Tree> {
        match std::mem::take(&mut self.state) {
            SessionState::Idle => None,
            SessionState::Active(drag) => {
                log::debug!("committing gesture for {:?} at {:?}", drag.entry, drag.preview);
                let committed = match drag.preview {
                    Some(destination) => apply_move(&drag.snapshot, drag.entry, destination),
                    None => drag.snapshot,
                };
                Some(committed)
            }
        }
    }

    /// Abandon the gesture. The committed tree was never touched, so there
    /// is nothing to roll back.
    pub fn cancel(&mut self) {
        if let SessionState::Active(drag) = std::mem::take(&mut self.state) {
            log::debug!("cancelled gesture for {:?}", drag.entry);
        }
    }

    /// Whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    /// The element being dragged, while active.
    pub fn active_entry(&self) -> Option<Entry> {
        match &self.state {
            SessionState::Active(drag) => Some(drag.entry),
            SessionState::Idle => None,
        }
    }

    /// The buffered preview destination, while active.
    pub fn preview(&self) -> Option<Destination> {
        match &self.state {
            SessionState::Active(drag) => drag.preview,
            SessionState::Idle => None,
        }
    }

    /// The frozen gesture snapshot, while active.
    pub fn snapshot(&self) -> Option<&Tree> {
        match &self.state {
            SessionState::Active(drag) => Some(&drag.snapshot),
            SessionState::Idle => None,
        }
    }
}
