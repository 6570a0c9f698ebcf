use crate::engine::check;
use crate::engine::diagram::{DiagramSpec, Interaction};
use crate::engine::layout::DiagramLayout;
use crate::session::state::DiagramState;

/// A pointer coordinate in terminal cells. Mouse, touch, or any other
/// pointing source reduces to this before reaching the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pointer {
    pub x: u16,
    pub y: u16,
}

/// An in-flight drag: which item is held and where the pointer last was.
/// The release point resolves the drop against the layout's bounding boxes.
#[derive(Clone, Debug)]
pub struct DragSession {
    pub item: String,
    pub at: Pointer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Nothing the controller needs to act on.
    Inert,
    /// Selection or placement changed; re-render.
    Changed,
    /// The answer should be checked now.
    SubmitRequested,
}

/// Click an entity directly (pointer or keyboard both land here).
/// Single-select submits immediately on the first valid click; multi-select
/// toggles membership and waits for an explicit submit.
pub fn click(spec: &DiagramSpec, state: &mut DiagramState, entity_id: &str) -> GestureOutcome {
    if state.verdict.is_some() {
        return GestureOutcome::Inert;
    }
    match spec.interaction() {
        Interaction::Click { multi_select: false } => {
            state.selected.clear();
            state.selected.push(entity_id.to_string());
            GestureOutcome::SubmitRequested
        }
        Interaction::Click { multi_select: true } => {
            if let Some(pos) = state.selected.iter().position(|s| s == entity_id) {
                state.selected.remove(pos);
            } else {
                state.selected.push(entity_id.to_string());
            }
            GestureOutcome::Changed
        }
        Interaction::Drag => GestureOutcome::Inert,
    }
}

/// Move `item` into `zone`. The zone's single slot is overwritten, and if the
/// item was previously in a different zone that older mapping is deleted
/// first — an item occupies at most one zone at a time.
pub fn place(state: &mut DiagramState, item: &str, zone: &str) {
    state.placements.retain(|_, held| held != item);
    state.placements.insert(zone.to_string(), item.to_string());
}

/// Return `item` to the source pool.
pub fn unplace(state: &mut DiagramState, item: &str) {
    state.placements.retain(|_, held| held != item);
}

pub fn pointer_down(
    spec: &DiagramSpec,
    state: &mut DiagramState,
    layout: &DiagramLayout,
    p: Pointer,
) -> GestureOutcome {
    if state.verdict.is_some() {
        return GestureOutcome::Inert;
    }
    if layout.on_submit(p.x, p.y) && check::submit_ready(spec, state) {
        return GestureOutcome::SubmitRequested;
    }
    let Some(entity) = layout.entity_at(p.x, p.y) else {
        return GestureOutcome::Inert;
    };
    match spec.interaction() {
        Interaction::Click { .. } => {
            let entity = entity.to_string();
            click(spec, state, &entity)
        }
        Interaction::Drag => {
            state.drag = Some(DragSession {
                item: entity.to_string(),
                at: p,
            });
            GestureOutcome::Changed
        }
    }
}

pub fn pointer_move(state: &mut DiagramState, p: Pointer) -> GestureOutcome {
    match state.drag {
        Some(ref mut drag) => {
            drag.at = p;
            GestureOutcome::Changed
        }
        None => GestureOutcome::Inert,
    }
}

/// Resolve a release: over a zone the item (re)occupies it, over the pool the
/// placement is removed, anywhere else the drag is a no-op revert.
pub fn pointer_up(state: &mut DiagramState, layout: &DiagramLayout, p: Pointer) -> GestureOutcome {
    let Some(drag) = state.drag.take() else {
        return GestureOutcome::Inert;
    };
    if let Some(zone) = layout.zone_at(p.x, p.y) {
        let zone = zone.to_string();
        place(state, &drag.item, &zone);
    } else if layout.in_pool(p.x, p.y) {
        unplace(state, &drag.item);
    }
    GestureOutcome::Changed
}
