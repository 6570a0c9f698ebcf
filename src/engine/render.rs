use ratatui::layout::Rect;

use crate::engine::check;
use crate::engine::diagram::{DiagramAnswer, DiagramSpec, Interaction};
use crate::engine::layout::DiagramLayout;
use crate::session::state::DiagramState;

/// Visual state of one entity or zone. The presentation layer maps these to
/// theme colors; the engine decides *what* state each entity is in, not how
/// it is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualClass {
    Selectable,
    Selected,
    Correct,
    Incorrect,
    Disabled,
    DropTarget,
}

#[derive(Clone, Debug)]
pub struct EntityView {
    pub id: String,
    pub label: String,
    pub tags: Vec<&'static str>,
    pub rect: Rect,
    pub class: VisualClass,
    pub dragging: bool,
}

#[derive(Clone, Debug)]
pub struct ZoneView {
    pub id: String,
    pub label: String,
    pub rect: Rect,
    pub class: VisualClass,
    pub occupied: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct SubmitView {
    pub rect: Rect,
    pub enabled: bool,
}

/// Everything the presentation layer needs to draw one diagram frame.
#[derive(Clone, Debug)]
pub struct DiagramView {
    pub title: &'static str,
    pub entities: Vec<EntityView>,
    pub zones: Vec<ZoneView>,
    pub pool: Option<Rect>,
    pub submit: Option<SubmitView>,
}

fn answer_holds(answer: &DiagramAnswer, id: &str) -> bool {
    match answer {
        DiagramAnswer::Single(correct) => correct == id,
        DiagramAnswer::Set(ids) => ids.iter().any(|i| i == id),
        DiagramAnswer::Placements(pairs) => pairs.values().any(|i| i == id),
    }
}

fn zone_expects<'a>(answer: &'a DiagramAnswer, zone: &str) -> Option<&'a str> {
    match answer {
        DiagramAnswer::Placements(pairs) => pairs.get(zone).map(String::as_str),
        _ => None,
    }
}

/// Pure render description for one diagram given the current session state.
pub fn describe(
    spec: &DiagramSpec,
    state: &DiagramState,
    answer: &DiagramAnswer,
    layout: &DiagramLayout,
) -> DiagramView {
    let hovered_zone = state
        .drag
        .as_ref()
        .and_then(|d| layout.zone_at(d.at.x, d.at.y))
        .map(str::to_string);

    let entities = spec
        .entities()
        .into_iter()
        .map(|info| {
            let rect = layout.entity_rect(info.id).unwrap_or_default();
            let dragging = state.drag.as_ref().is_some_and(|d| d.item == info.id);
            let class = entity_class(spec, state, answer, info.id, dragging);
            EntityView {
                id: info.id.to_string(),
                label: info.label.to_string(),
                tags: info.tags,
                rect,
                class,
                dragging,
            }
        })
        .collect();

    let zones = spec
        .zones()
        .iter()
        .map(|zone| {
            let rect = layout.zone_rect(&zone.id).unwrap_or_default();
            let occupant = state.item_in_zone(&zone.id);
            let class = match state.verdict {
                Some(_) => match (zone_expects(answer, &zone.id), occupant) {
                    (Some(want), Some(have)) if want == have => VisualClass::Correct,
                    (Some(_), Some(_)) => VisualClass::Incorrect,
                    // No occupant after a verdict only happens when feedback
                    // is being redisplayed from a persisted answer.
                    _ => VisualClass::Disabled,
                },
                None if hovered_zone.as_deref() == Some(zone.id.as_str()) => {
                    VisualClass::DropTarget
                }
                None => VisualClass::Selectable,
            };
            ZoneView {
                id: zone.id.clone(),
                label: zone.label.clone(),
                rect,
                class,
                occupied: occupant.is_some(),
            }
        })
        .collect();

    let submit = layout.submit.map(|rect| SubmitView {
        rect,
        enabled: check::submit_ready(spec, state),
    });

    DiagramView {
        title: spec.title(),
        entities,
        zones,
        pool: layout.pool,
        submit,
    }
}

fn entity_class(
    spec: &DiagramSpec,
    state: &DiagramState,
    answer: &DiagramAnswer,
    id: &str,
    dragging: bool,
) -> VisualClass {
    match state.verdict {
        Some(_) => match spec.interaction() {
            Interaction::Click { .. } => {
                if answer_holds(answer, id) {
                    VisualClass::Correct
                } else if state.selected.iter().any(|s| s == id) {
                    VisualClass::Incorrect
                } else {
                    VisualClass::Disabled
                }
            }
            Interaction::Drag => match state.placed_zone(id) {
                Some(zone) => {
                    if zone_expects(answer, zone) == Some(id) {
                        VisualClass::Correct
                    } else {
                        VisualClass::Incorrect
                    }
                }
                None => VisualClass::Disabled,
            },
        },
        None => {
            if dragging {
                VisualClass::Selected
            } else {
                match spec.interaction() {
                    Interaction::Click { .. } => {
                        if state.selected.iter().any(|s| s == id) {
                            VisualClass::Selected
                        } else {
                            VisualClass::Selectable
                        }
                    }
                    Interaction::Drag => {
                        if state.placed_zone(id).is_some() {
                            VisualClass::Selected
                        } else {
                            VisualClass::Selectable
                        }
                    }
                }
            }
        }
    }
}
