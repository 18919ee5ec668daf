//! Regroup Core Library
//!
//! Pure reorder engine for two-level item/group lists: a value-typed tree of
//! free-standing items and single-level groups, a geometric drop classifier,
//! a move resolver, and a drag session state machine. Gesture capture and
//! rendering live in the embedding application; they talk to this crate
//! through [`DragSession`] and get new [`Tree`] values back.

pub mod reorder;
pub mod session;
pub mod snapshot;
pub mod target;
pub mod tree;

pub use reorder::apply_move;
pub use session::DragSession;
pub use snapshot::{EntryRef, GroupRecord, ItemRecord, SnapshotError, TreeSnapshot};
pub use target::{Destination, Hover, HoverTarget, resolve_target};
pub use tree::{Entry, Group, GroupId, Item, ItemId, Location, Tree, TreeCorruption};
