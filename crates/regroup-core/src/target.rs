//! Drop target classification from hover geometry.
//!
//! Turns a raw drag-over signal (hovered element, its bounding box, pointer
//! position) into the single insertion point it implies. Pure functions of
//! their inputs: reclassifying the same hover always yields the same
//! destination, so the preview cannot drift with event ordering.

use crate::tree::{Entry, GroupId, Location, Tree};
use kurbo::{Point, Rect};

/// Fraction of a hovered row's height forming the before/after bands while
/// dragging a group.
pub const GROUP_BAND_RATIO: f64 = 0.25;
/// Fraction of a group's height forming the drop-beside edge bands while
/// dragging an item over it.
pub const EDGE_BAND_RATIO: f64 = 0.25;
/// Upper limit on an edge band, in pixels.
pub const EDGE_BAND_MAX: f64 = 20.0;

/// What the pointer is currently over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget {
    /// The rendered row of a root entry or a grouped item.
    Entry(Entry),
    /// The placeholder a collaborator renders inside an empty group.
    EmptyGroup(GroupId),
}

/// One drag-over signal from the gesture collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hover {
    pub target: HoverTarget,
    /// On-screen bounding box of the hovered element.
    pub bounds: Rect,
    /// Current pointer position.
    pub pointer: Point,
}

impl Hover {
    /// Convenience constructor for a hovered row.
    pub fn over(target: HoverTarget, bounds: Rect, pointer: Point) -> Self {
        Self {
            target,
            bounds,
            pointer,
        }
    }
}

/// The resolved insertion point of a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Insert into the root sequence at this index.
    Root(usize),
    /// Insert into a group's children at this index.
    InGroup(GroupId, usize),
}

/// Vertical placement relative to a hovered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Before,
    After,
}

fn place(index: usize, side: Side) -> usize {
    match side {
        Side::Before => index,
        Side::After => index + 1,
    }
}

/// Three-band split used while dragging a group: top quarter lands before
/// the hovered row, and both the bottom quarter and the wide middle band
/// land after it. Collapsing the middle keeps tall rows from oscillating
/// between before and after on small pointer movements.
fn group_row_side(bounds: Rect, pointer: Point) -> Side {
    let band = bounds.height() * GROUP_BAND_RATIO;
    if pointer.y < bounds.y0 + band {
        Side::Before
    } else {
        Side::After
    }
}

/// Midpoint split used while dragging an item over another item.
fn item_row_side(bounds: Rect, pointer: Point) -> Side {
    if pointer.y < bounds.center().y {
        Side::Before
    } else {
        Side::After
    }
}

/// Edge band height for dropping an item beside (rather than into) a group.
fn edge_band(bounds: Rect) -> f64 {
    (bounds.height() * EDGE_BAND_RATIO).min(EDGE_BAND_MAX)
}

/// Resolve a drag-over signal into one unambiguous [`Destination`].
///
/// With no hover the destination is the end of root. A hovered element that
/// is no longer in `tree` resolves the same way; a dragged element may
/// vanish mid-gesture, but that is the resolver's concern, not the
/// classifier's.
pub fn resolve_target(tree: &Tree, dragged: Entry, hover: Option<Hover>) -> Destination {
    match (dragged, hover) {
        (_, None) => Destination::Root(tree.root().len()),
        (Entry::Group(_), Some(hover)) => resolve_group_drag(tree, hover),
        (Entry::Item(_), Some(hover)) => resolve_item_drag(tree, hover),
    }
}

/// A dragged group only ever targets root. Hovering a group's body, its
/// empty placeholder, or an item inside it all collapse to that group's
/// position among the root entries.
fn resolve_group_drag(tree: &Tree, hover: Hover) -> Destination {
    let collapsed = match hover.target {
        HoverTarget::EmptyGroup(group_id) => tree.locate(Entry::Group(group_id)),
        HoverTarget::Entry(entry) => match tree.locate(entry) {
            Some(Location::InGroup(group_id, _)) => tree.locate(Entry::Group(group_id)),
            other => other,
        },
    };
    match collapsed {
        Some(Location::Root(index)) => {
            Destination::Root(place(index, group_row_side(hover.bounds, hover.pointer)))
        }
        _ => Destination::Root(tree.root().len()),
    }
}

fn resolve_item_drag(tree: &Tree, hover: Hover) -> Destination {
    let fallback = Destination::Root(tree.root().len());
    match hover.target {
        HoverTarget::EmptyGroup(group_id) => {
            if tree.group(group_id).is_some() {
                Destination::InGroup(group_id, 0)
            } else {
                fallback
            }
        }
        HoverTarget::Entry(Entry::Group(group_id)) => {
            let Some(Location::Root(index)) = tree.locate(Entry::Group(group_id)) else {
                return fallback;
            };
            let band = edge_band(hover.bounds);
            if hover.pointer.y < hover.bounds.y0 + band {
                // Top margin: drop beside the group, not into it.
                Destination::Root(index)
            } else if hover.pointer.y > hover.bounds.y1 - band {
                Destination::Root(index + 1)
            } else {
                let length = tree.group(group_id).map_or(0, |group| group.children.len());
                Destination::InGroup(group_id, length)
            }
        }
        HoverTarget::Entry(Entry::Item(item_id)) => match tree.locate(Entry::Item(item_id)) {
            Some(Location::Root(index)) => {
                Destination::Root(place(index, item_row_side(hover.bounds, hover.pointer)))
            }
            Some(Location::InGroup(group_id, index)) => Destination::InGroup(
                group_id,
                place(index, item_row_side(hover.bounds, hover.pointer)),
            ),
            None => fallback,
        },
    }
}
