//! Tree model: root order, groups, and items.

use std::collections::{HashMap, HashSet};
use thiserror::Error;
use uuid::Uuid;

/// Identifier for an item.
pub type ItemId = Uuid;
/// Identifier for a group.
pub type GroupId = Uuid;

/// A leaf value, owned by exactly one container (root or a group).
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    /// Display payload.
    pub content: String,
}

impl Item {
    /// Create a new item with a fresh id.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
        }
    }

    /// Create an item with a specific id.
    pub fn with_id(id: ItemId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

/// An ordered collection of items. A group owns its children exclusively and
/// never contains another group.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: GroupId,
    pub title: String,
    /// Child items, in display order.
    pub children: Vec<ItemId>,
}

impl Group {
    /// Create a new empty group with a fresh id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            children: Vec::new(),
        }
    }

    /// Create a group with a specific id.
    pub fn with_id(id: GroupId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            children: Vec::new(),
        }
    }

    /// Number of child items.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// An empty group is a valid, stable state.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A root-level slot: either a free-standing item or a group.
///
/// The variant is the element's kind, fixed at creation time. It doubles as
/// the engine-wide handle for drag sources, so kind never has to be inferred
/// from an id's textual form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entry {
    Item(ItemId),
    Group(GroupId),
}

impl Entry {
    /// The underlying id, kind erased.
    pub fn id(&self) -> Uuid {
        match *self {
            Entry::Item(id) => id,
            Entry::Group(id) => id,
        }
    }

    /// Whether this entry refers to a group.
    pub fn is_group(&self) -> bool {
        matches!(self, Entry::Group(_))
    }
}

/// Where an element currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Directly in the root sequence, at this index.
    Root(usize),
    /// Inside a group's children, at this index.
    InGroup(GroupId, usize),
}

/// Structural invariant violations.
///
/// The engine's own operations never produce these; they surface when a
/// snapshot assembled outside the engine is loaded, and as debug assertions
/// when a corrupt tree is handed to the resolver.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeCorruption {
    #[error("item {0} is owned by more than one container")]
    DuplicateItem(ItemId),
    #[error("group {0} appears more than once in root")]
    DuplicateGroup(GroupId),
    #[error("root references unknown group {0}")]
    UnknownGroup(GroupId),
    #[error("container references unknown item {0}")]
    UnknownItem(ItemId),
    #[error("item record {0} is not referenced by any container")]
    OrphanItem(ItemId),
    #[error("group record {0} is not referenced by root")]
    OrphanGroup(GroupId),
}

/// The full root + groups + items structure at a point in time.
///
/// A `Tree` is value data: every operation takes `&self` and returns a new
/// tree, so a committed tree can be read freely while a gesture previews
/// against its own snapshot. Which container holds an id is the only
/// ownership record; items carry no parent pointer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tree {
    pub(crate) root: Vec<Entry>,
    pub(crate) groups: HashMap<GroupId, Group>,
    pub(crate) items: HashMap<ItemId, Item>,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a tree from raw parts, verifying every invariant.
    pub(crate) fn from_parts(
        root: Vec<Entry>,
        groups: HashMap<GroupId, Group>,
        items: HashMap<ItemId, Item>,
    ) -> Result<Self, TreeCorruption> {
        let tree = Self { root, groups, items };
        tree.validate()?;
        Ok(tree)
    }

    /// The root sequence, in display order.
    pub fn root(&self) -> &[Entry] {
        &self.root
    }

    /// Get an item by id.
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Get a group by id.
    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    /// Whether the tree holds no items and no groups.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.groups.is_empty()
    }

    /// Total number of items plus groups.
    pub fn entry_count(&self) -> usize {
        self.items.len() + self.groups.len()
    }

    /// Whether `entry` currently exists anywhere in the tree.
    pub fn contains(&self, entry: Entry) -> bool {
        self.locate(entry).is_some()
    }

    /// Find where `entry` currently lives. `None` means the element is not
    /// in the tree (it may have been removed mid-gesture).
    pub fn locate(&self, entry: Entry) -> Option<Location> {
        if let Some(index) = self.root.iter().position(|&e| e == entry) {
            return Some(Location::Root(index));
        }
        if let Entry::Item(id) = entry {
            for group in self.groups.values() {
                if let Some(index) = group.children.iter().position(|&child| child == id) {
                    return Some(Location::InGroup(group.id, index));
                }
            }
        }
        None
    }

    /// Whether placing `entry` under `parent` (`None` = root) keeps the
    /// hierarchy within two levels. Items are safe anywhere; a group is only
    /// safe at root. Kept explicit so a deeper hierarchy stays a local
    /// change.
    pub fn is_descendant_safe(&self, entry: Entry, parent: Option<GroupId>) -> bool {
        match entry {
            Entry::Item(_) => true,
            Entry::Group(_) => parent.is_none(),
        }
    }

    /// Insert a new item at `location`. The index is clamped to the
    /// container's length. No-op if the id already exists or the target
    /// group does not.
    pub fn add_item(&self, location: Location, item: Item) -> Tree {
        if self.items.contains_key(&item.id) {
            return self.clone();
        }
        let mut next = self.clone();
        match location {
            Location::Root(index) => {
                let index = index.min(next.root.len());
                next.root.insert(index, Entry::Item(item.id));
            }
            Location::InGroup(group_id, index) => {
                let Some(group) = next.groups.get_mut(&group_id) else {
                    return self.clone();
                };
                let index = index.min(group.children.len());
                group.children.insert(index, item.id);
            }
        }
        next.items.insert(item.id, item);
        next
    }

    /// Insert a new group at `root_index` (clamped). Children listed in the
    /// group must currently be free-standing root items; they move into the
    /// group, keeping the listed order. No-op if the group id already
    /// exists, or any listed child is missing, duplicated, or not at root.
    pub fn add_group(&self, root_index: usize, group: Group) -> Tree {
        if self.groups.contains_key(&group.id) {
            return self.clone();
        }
        let mut listed = HashSet::new();
        for &child in &group.children {
            let at_root = matches!(self.locate(Entry::Item(child)), Some(Location::Root(_)));
            if !at_root || !listed.insert(child) {
                return self.clone();
            }
        }
        let mut next = self.clone();
        next.root
            .retain(|entry| !matches!(entry, Entry::Item(id) if listed.contains(id)));
        let index = root_index.min(next.root.len());
        next.root.insert(index, Entry::Group(group.id));
        next.groups.insert(group.id, group);
        next
    }

    /// Remove a group, splicing its children back into root at the group's
    /// former position. Relocation, not deletion: the item records survive.
    pub fn remove_group(&self, id: GroupId) -> Tree {
        let Some(position) = self.root.iter().position(|&e| e == Entry::Group(id)) else {
            return self.clone();
        };
        let mut next = self.clone();
        next.root.remove(position);
        let children = next
            .groups
            .remove(&id)
            .map(|group| group.children)
            .unwrap_or_default();
        for (offset, child) in children.into_iter().enumerate() {
            next.root.insert(position + offset, Entry::Item(child));
        }
        next
    }

    /// Remove an item from whichever container holds it.
    pub fn remove_item(&self, id: ItemId) -> Tree {
        let Some(location) = self.locate(Entry::Item(id)) else {
            return self.clone();
        };
        let mut next = self.clone();
        match location {
            Location::Root(index) => {
                next.root.remove(index);
            }
            Location::InGroup(group_id, index) => {
                if let Some(group) = next.groups.get_mut(&group_id) {
                    group.children.remove(index);
                }
            }
        }
        next.items.remove(&id);
        next
    }

    /// Retitle a group. No-op for an unknown id.
    pub fn rename_group(&self, id: GroupId, title: impl Into<String>) -> Tree {
        let mut next = self.clone();
        match next.groups.get_mut(&id) {
            Some(group) => group.title = title.into(),
            None => return self.clone(),
        }
        next
    }

    /// Check every structural invariant: single ownership, no unknown or
    /// orphaned records, no duplicate references.
    pub fn validate(&self) -> Result<(), TreeCorruption> {
        let mut seen_items = HashSet::new();
        let mut seen_groups = HashSet::new();
        for entry in &self.root {
            match *entry {
                Entry::Item(id) => {
                    if !self.items.contains_key(&id) {
                        return Err(TreeCorruption::UnknownItem(id));
                    }
                    if !seen_items.insert(id) {
                        return Err(TreeCorruption::DuplicateItem(id));
                    }
                }
                Entry::Group(id) => {
                    if !self.groups.contains_key(&id) {
                        return Err(TreeCorruption::UnknownGroup(id));
                    }
                    if !seen_groups.insert(id) {
                        return Err(TreeCorruption::DuplicateGroup(id));
                    }
                }
            }
        }
        for group in self.groups.values() {
            for &child in &group.children {
                if !self.items.contains_key(&child) {
                    return Err(TreeCorruption::UnknownItem(child));
                }
                if !seen_items.insert(child) {
                    return Err(TreeCorruption::DuplicateItem(child));
                }
            }
        }
        for &id in self.groups.keys() {
            if !seen_groups.contains(&id) {
                return Err(TreeCorruption::OrphanGroup(id));
            }
        }
        for &id in self.items.keys() {
            if !seen_items.contains(&id) {
                return Err(TreeCorruption::OrphanItem(id));
            }
        }
        Ok(())
    }

    /// Trip loudly in debug builds when a caller hands the engine a corrupt
    /// tree. Release builds skip the walk.
    pub(crate) fn debug_validate(&self) {
        #[cfg(debug_assertions)]
        if let Err(err) = self.validate() {
            panic!("corrupt tree passed to engine: {err}");
        }
    }
}
