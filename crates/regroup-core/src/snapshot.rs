//! Stable JSON snapshot of a tree.
//!
//! The wire shape is a plain record with no engine-internal handles, fit
//! for storage, sync, or an externally layered undo history:
//!
//! ```json
//! {
//!   "root": [{ "kind": "item", "id": "…" }, { "kind": "group", "id": "…" }],
//!   "groups": { "…": { "title": "…", "childIds": ["…"] } },
//!   "items": { "…": { "content": "…" } }
//! }
//! ```
//!
//! Loading validates every structural invariant. A malformed snapshot is a
//! caller bug and surfaces as an error, never as a silently repaired tree.

use crate::tree::{Entry, Group, GroupId, Item, ItemId, Tree, TreeCorruption};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors produced when decoding a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Corrupt(#[from] TreeCorruption),
}

/// Wire form of a root slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntryRef {
    Item { id: ItemId },
    Group { id: GroupId },
}

/// Wire form of a group record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub title: String,
    #[serde(rename = "childIds")]
    pub child_ids: Vec<ItemId>,
}

/// Wire form of an item record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub content: String,
}

/// The persisted shape of a whole tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub root: Vec<EntryRef>,
    pub groups: HashMap<GroupId, GroupRecord>,
    pub items: HashMap<ItemId, ItemRecord>,
}

impl From<&Tree> for TreeSnapshot {
    fn from(tree: &Tree) -> Self {
        Self {
            root: tree
                .root()
                .iter()
                .map(|&entry| match entry {
                    Entry::Item(id) => EntryRef::Item { id },
                    Entry::Group(id) => EntryRef::Group { id },
                })
                .collect(),
            groups: tree
                .groups
                .iter()
                .map(|(&id, group)| {
                    (
                        id,
                        GroupRecord {
                            title: group.title.clone(),
                            child_ids: group.children.clone(),
                        },
                    )
                })
                .collect(),
            items: tree
                .items
                .iter()
                .map(|(&id, item)| {
                    (
                        id,
                        ItemRecord {
                            content: item.content.clone(),
                        },
                    )
                })
                .collect(),
        }
    }
}

impl TryFrom<TreeSnapshot> for Tree {
    type Error = TreeCorruption;

    fn try_from(snapshot: TreeSnapshot) -> Result<Self, Self::Error> {
        let root = snapshot
            .root
            .into_iter()
            .map(|entry| match entry {
                EntryRef::Item { id } => Entry::Item(id),
                EntryRef::Group { id } => Entry::Group(id),
            })
            .collect();
        let groups = snapshot
            .groups
            .into_iter()
            .map(|(id, record)| {
                (
                    id,
                    Group {
                        id,
                        title: record.title,
                        children: record.child_ids,
                    },
                )
            })
            .collect();
        let items = snapshot
            .items
            .into_iter()
            .map(|(id, record)| {
                (
                    id,
                    Item {
                        id,
                        content: record.content,
                    },
                )
            })
            .collect();
        Tree::from_parts(root, groups, items)
    }
}

impl Tree {
    /// The wire form of this tree.
    pub fn to_snapshot(&self) -> TreeSnapshot {
        TreeSnapshot::from(self)
    }

    /// Rebuild a tree from its wire form, verifying every invariant.
    pub fn from_snapshot(snapshot: TreeSnapshot) -> Result<Self, SnapshotError> {
        Ok(Self::try_from(snapshot)?)
    }

    /// Serialize the tree to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_snapshot())
    }

    /// Deserialize and validate a tree from JSON.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: TreeSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Location;
    use uuid::Uuid;

    /// root = [a, g1(b), c]
    fn sample() -> Tree {
        let a = Item::new("a");
        let b = Item::new("b");
        let c = Item::new("c");
        let mut g1 = Group::new("g1");
        g1.children = vec![b.id];

        Tree::new()
            .add_item(Location::Root(0), a)
            .add_item(Location::Root(1), b)
            .add_group(1, g1)
            .add_item(Location::Root(2), c)
    }

    #[test]
    fn test_json_round_trip() {
        let tree = sample();
        let json = tree.to_json().unwrap();
        let restored = Tree::from_json(&json).unwrap();
        assert_eq!(restored, tree);
    }

    #[test]
    fn test_wire_shape() {
        let tree = sample();
        let value: serde_json::Value = serde_json::from_str(&tree.to_json().unwrap()).unwrap();

        let root = value["root"].as_array().unwrap();
        assert_eq!(root.len(), 3);
        assert_eq!(root[0]["kind"], "item");
        assert_eq!(root[1]["kind"], "group");

        let group_id = root[1]["id"].as_str().unwrap();
        let record = &value["groups"][group_id];
        assert_eq!(record["title"], "g1");
        assert_eq!(record["childIds"].as_array().unwrap().len(), 1);

        let item_id = root[0]["id"].as_str().unwrap();
        assert_eq!(value["items"][item_id]["content"], "a");
    }

    #[test]
    fn test_rejects_double_ownership() {
        let tree = sample();
        let mut snapshot = tree.to_snapshot();
        // list a root item as a group child as well
        let root_item = match snapshot.root[0] {
            EntryRef::Item { id } => id,
            EntryRef::Group { .. } => unreachable!("fixture starts with an item"),
        };
        snapshot
            .groups
            .values_mut()
            .next()
            .unwrap()
            .child_ids
            .push(root_item);

        let err = Tree::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Corrupt(TreeCorruption::DuplicateItem(id)) if id == root_item
        ));
    }

    #[test]
    fn test_rejects_unknown_group_reference() {
        let tree = sample();
        let mut snapshot = tree.to_snapshot();
        snapshot.root.push(EntryRef::Group { id: Uuid::new_v4() });
        assert!(matches!(
            Tree::from_snapshot(snapshot),
            Err(SnapshotError::Corrupt(TreeCorruption::UnknownGroup(_)))
        ));
    }

    #[test]
    fn test_rejects_orphan_records() {
        let tree = sample();
        let mut snapshot = tree.to_snapshot();
        snapshot.items.insert(
            Uuid::new_v4(),
            ItemRecord {
                content: "loose".into(),
            },
        );
        assert!(matches!(
            Tree::from_snapshot(snapshot),
            Err(SnapshotError::Corrupt(TreeCorruption::OrphanItem(_)))
        ));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            Tree::from_json("{ not json"),
            Err(SnapshotError::Json(_))
        ));
    }

    #[test]
    fn test_empty_tree_round_trips() {
        let tree = Tree::new();
        let restored = Tree::from_json(&tree.to_json().unwrap()).unwrap();
        assert!(restored.is_empty());
    }
}
