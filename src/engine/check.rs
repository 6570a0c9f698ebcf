use crate::engine::diagram::{DiagramAnswer, DiagramSpec, Interaction};
use crate::session::state::DiagramState;

/// Pure correctness verdict, separate from rendering.
///
/// - single click: the first (only) selection equals the correct id.
/// - multi-select: exact set equality — same cardinality and every correct
///   id selected, so supersets fail.
/// - drag: every declared (zone, item) pair is matched by the placements.
pub fn correct(answer: &DiagramAnswer, state: &DiagramState) -> bool {
    match answer {
        DiagramAnswer::Single(id) => {
            state.selected.first().map(String::as_str) == Some(id.as_str())
        }
        DiagramAnswer::Set(ids) => {
            state.selected.len() == ids.len()
                && ids.iter().all(|id| state.selected.contains(id))
        }
        DiagramAnswer::Placements(pairs) => pairs.iter().all(|(zone, item)| {
            state.placements.get(zone).map(String::as_str) == Some(item.as_str())
        }),
    }
}

/// Whether the submit action is available. Incomplete selections are rejected
/// here, before the correctness checker can ever see them.
pub fn submit_ready(spec: &DiagramSpec, state: &DiagramState) -> bool {
    if state.verdict.is_some() {
        return false;
    }
    match spec.interaction() {
        // Single-click submits implicitly on the first click; the explicit
        // submit path only exists for incrementally built answers.
        Interaction::Click { .. } => !state.selected.is_empty(),
        Interaction::Drag => spec
            .zones()
            .iter()
            .all(|z| state.placements.contains_key(&z.id)),
    }
}
