//! Move resolution: applying a drag destination to a tree.

use crate::target::Destination;
use crate::tree::{Entry, Location, Tree};

/// Apply a resolved destination to `tree`, producing the new tree.
///
/// Never panics and never reports an error: a drag gesture is speculative,
/// so anything malformed degrades to a no-op. A vanished source, a group
/// targeted into another group, or a vanished destination group all return
/// a tree structurally equal to the input; callers that care can compare.
/// Destination indices are interpreted against the gesture snapshot and
/// clamped after the removal step, so out-of-range indices append.
pub fn apply_move(tree: &Tree, entry: Entry, destination: Destination) -> Tree {
    tree.debug_validate();

    let Some(source) = tree.locate(entry) else {
        log::debug!("move source {entry:?} is no longer in the tree; keeping it unchanged");
        return tree.clone();
    };

    let parent = match destination {
        Destination::Root(_) => None,
        Destination::InGroup(group_id, _) => Some(group_id),
    };
    if !tree.is_descendant_safe(entry, parent) {
        log::debug!("rejecting move of {entry:?} into a group: groups stay at root");
        return tree.clone();
    }
    if let Some(group_id) = parent {
        if tree.group(group_id).is_none() {
            log::debug!("destination group {group_id} is no longer in the tree");
            return tree.clone();
        }
    }

    let mut next = tree.clone();
    match (source, destination) {
        // Same container: one remove/insert with index correction, so that
        // targeting the current location is the identity.
        (Location::Root(from), Destination::Root(to)) => {
            let moved = next.root.remove(from);
            let to = if from < to { to - 1 } else { to };
            let clamped = to.min(next.root.len());
            next.root.insert(clamped, moved);
        }
        (Location::InGroup(source_group, from), Destination::InGroup(dest_group, to))
            if source_group == dest_group =>
        {
            if let Some(group) = next.groups.get_mut(&dest_group) {
                let moved = group.children.remove(from);
                let to = if from < to { to - 1 } else { to };
                let clamped = to.min(group.children.len());
                group.children.insert(clamped, moved);
            }
        }
        // Cross container: detach first, then clamp against the
        // intermediate tree before inserting.
        _ => {
            match source {
                Location::Root(index) => {
                    next.root.remove(index);
                }
                Location::InGroup(group_id, index) => {
                    if let Some(group) = next.groups.get_mut(&group_id) {
                        group.children.remove(index);
                    }
                }
            }
            match destination {
                Destination::Root(index) => {
                    let clamped = index.min(next.root.len());
                    next.root.insert(clamped, entry);
                }
                Destination::InGroup(group_id, index) => {
                    // Only items get here; the nesting guard above already
                    // bounced groups.
                    if let (Entry::Item(item_id), Some(group)) =
                        (entry, next.groups.get_mut(&group_id))
                    {
                        let clamped = index.min(group.children.len());
                        group.children.insert(clamped, item_id);
                    }
                }
            }
        }
    }

    next.debug_validate();
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Group, GroupId, Item, ItemId, Location};
    use uuid::Uuid;

    struct Fixture {
        tree: Tree,
        a: ItemId,
        b: ItemId,
        c: ItemId,
        d: ItemId,
        g1: GroupId,
    }

    /// root = [a, g1(b, c), d]
    fn fixture() -> Fixture {
        let a = Item::new("a");
        let b = Item::new("b");
        let c = Item::new("c");
        let d = Item::new("d");
        let mut g1 = Group::new("g1");
        g1.children = vec![b.id, c.id];
        let ids = (a.id, b.id, c.id, d.id, g1.id);

        let tree = Tree::new()
            .add_item(Location::Root(0), a)
            .add_item(Location::Root(1), b)
            .add_item(Location::Root(2), c)
            .add_group(1, g1)
            .add_item(Location::Root(2), d);
        Fixture {
            tree,
            a: ids.0,
            b: ids.1,
            c: ids.2,
            d: ids.3,
            g1: ids.4,
        }
    }

    #[test]
    fn test_scenario_item_into_group() {
        let f = fixture();
        let next = apply_move(&f.tree, Entry::Item(f.d), Destination::InGroup(f.g1, 1));
        assert_eq!(
            next.root(),
            &[Entry::Item(f.a), Entry::Group(f.g1)]
        );
        assert_eq!(next.group(f.g1).unwrap().children, vec![f.b, f.d, f.c]);
        assert_eq!(next.entry_count(), f.tree.entry_count());
        assert!(next.validate().is_ok());
    }

    #[test]
    fn test_scenario_group_to_front() {
        let f = fixture();
        let next = apply_move(&f.tree, Entry::Group(f.g1), Destination::Root(0));
        assert_eq!(
            next.root(),
            &[Entry::Group(f.g1), Entry::Item(f.a), Entry::Item(f.d)]
        );
        assert_eq!(next.group(f.g1).unwrap().children, vec![f.b, f.c]);
    }

    #[test]
    fn test_reorder_within_root() {
        let f = fixture();
        // move a after d: destination index counts the snapshot positions
        let next = apply_move(&f.tree, Entry::Item(f.a), Destination::Root(3));
        assert_eq!(
            next.root(),
            &[Entry::Group(f.g1), Entry::Item(f.d), Entry::Item(f.a)]
        );
    }

    #[test]
    fn test_reorder_within_group() {
        let f = fixture();
        let next = apply_move(&f.tree, Entry::Item(f.b), Destination::InGroup(f.g1, 2));
        assert_eq!(next.group(f.g1).unwrap().children, vec![f.c, f.b]);
    }

    #[test]
    fn test_move_to_current_location_is_identity() {
        let f = fixture();
        // both the "before itself" and "after itself" spellings
        assert_eq!(
            apply_move(&f.tree, Entry::Item(f.a), Destination::Root(0)),
            f.tree
        );
        assert_eq!(
            apply_move(&f.tree, Entry::Item(f.a), Destination::Root(1)),
            f.tree
        );
        assert_eq!(
            apply_move(&f.tree, Entry::Item(f.b), Destination::InGroup(f.g1, 0)),
            f.tree
        );
    }

    #[test]
    fn test_round_trip_restores_tree() {
        let f = fixture();
        let there = apply_move(&f.tree, Entry::Item(f.d), Destination::InGroup(f.g1, 0));
        assert_ne!(there, f.tree);
        let back = apply_move(&there, Entry::Item(f.d), Destination::Root(2));
        assert_eq!(back, f.tree);
    }

    #[test]
    fn test_out_of_range_index_clamps_to_end() {
        let f = fixture();
        let next = apply_move(&f.tree, Entry::Item(f.a), Destination::InGroup(f.g1, 9999));
        assert_eq!(next.group(f.g1).unwrap().children, vec![f.b, f.c, f.a]);
        assert!(next.validate().is_ok());
    }

    #[test]
    fn test_group_into_group_is_noop() {
        let f = fixture();
        let g2 = Group::new("g2");
        let tree = f.tree.add_group(0, g2.clone());
        let next = apply_move(&tree, Entry::Group(g2.id), Destination::InGroup(f.g1, 0));
        assert_eq!(next, tree);
    }

    #[test]
    fn test_unknown_source_is_noop() {
        let f = fixture();
        let next = apply_move(&f.tree, Entry::Item(Uuid::new_v4()), Destination::Root(0));
        assert_eq!(next, f.tree);
    }

    #[test]
    fn test_unknown_destination_group_is_noop() {
        let f = fixture();
        let next = apply_move(
            &f.tree,
            Entry::Item(f.a),
            Destination::InGroup(Uuid::new_v4(), 0),
        );
        assert_eq!(next, f.tree);
    }

    #[test]
    fn test_move_out_of_group_leaves_valid_empty_group() {
        let f = fixture();
        let once = apply_move(&f.tree, Entry::Item(f.b), Destination::Root(0));
        let twice = apply_move(&once, Entry::Item(f.c), Destination::Root(0));
        assert!(twice.group(f.g1).unwrap().is_empty());
        assert!(twice.validate().is_ok());
        assert_eq!(twice.entry_count(), f.tree.entry_count());
    }

    #[test]
    fn test_move_between_groups() {
        let f = fixture();
        let mut g2 = Group::new("g2");
        g2.children = vec![f.d];
        let tree = f.tree.add_group(2, g2.clone());
        let next = apply_move(&tree, Entry::Item(f.b), Destination::InGroup(g2.id, 1));
        assert_eq!(next.group(f.g1).unwrap().children, vec![f.c]);
        assert_eq!(next.group(g2.id).unwrap().children, vec![f.d, f.b]);
        assert!(next.validate().is_ok());
    }

    #[test]
    fn test_input_tree_is_untouched() {
        let f = fixture();
        let before = f.tree.clone();
        let _ = apply_move(&f.tree, Entry::Item(f.d), Destination::InGroup(f.g1, 0));
        assert_eq!(f.tree, before);
    }
}
