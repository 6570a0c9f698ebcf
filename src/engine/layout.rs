use ratatui::layout::Rect;

use crate::engine::diagram::{DiagramSpec, Interaction};
use crate::session::state::DiagramState;

/// Entity boxes are bordered, one label line + one tag line.
pub const ENTITY_HEIGHT: u16 = 4;
/// Zone boxes wrap a single item slot.
pub const ZONE_HEIGHT: u16 = ENTITY_HEIGHT + 2;
const POOL_HEIGHT: u16 = ENTITY_HEIGHT + 2;
const SUBMIT_WIDTH: u16 = 14;
const SUBMIT_HEIGHT: u16 = 3;
const GAP: u16 = 2;

/// Geometry for one diagram in one frame. The same rectangles drive both
/// rendering and pointer hit-testing, so the two can never disagree.
#[derive(Clone, Debug, Default)]
pub struct DiagramLayout {
    /// Selectable entities (or drag items at their current position),
    /// in `DiagramSpec::entities` order.
    pub entities: Vec<(String, Rect)>,
    pub zones: Vec<(String, Rect)>,
    pub pool: Option<Rect>,
    pub submit: Option<Rect>,
}

pub fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x
        && x < rect.x.saturating_add(rect.width)
        && y >= rect.y
        && y < rect.y.saturating_add(rect.height)
}

impl DiagramLayout {
    pub fn entity_at(&self, x: u16, y: u16) -> Option<&str> {
        self.entities
            .iter()
            .find(|(_, r)| contains(*r, x, y))
            .map(|(id, _)| id.as_str())
    }

    pub fn zone_at(&self, x: u16, y: u16) -> Option<&str> {
        self.zones
            .iter()
            .find(|(_, r)| contains(*r, x, y))
            .map(|(id, _)| id.as_str())
    }

    pub fn in_pool(&self, x: u16, y: u16) -> bool {
        self.pool.is_some_and(|r| contains(r, x, y))
    }

    pub fn on_submit(&self, x: u16, y: u16) -> bool {
        self.submit.is_some_and(|r| contains(r, x, y))
    }

    pub fn entity_rect(&self, id: &str) -> Option<Rect> {
        self.entities
            .iter()
            .find(|(e, _)| e == id)
            .map(|(_, r)| *r)
    }

    pub fn zone_rect(&self, id: &str) -> Option<Rect> {
        self.zones.iter().find(|(z, _)| z == id).map(|(_, r)| *r)
    }
}

/// Arrange a diagram into `area`. Placed drag items sit inside their zone's
/// slot, unplaced ones in the source pool, and an in-flight drag floats at
/// the pointer position.
pub fn arrange(spec: &DiagramSpec, state: &DiagramState, area: Rect) -> DiagramLayout {
    match spec.interaction() {
        Interaction::Click { multi_select } => arrange_click(spec, area, multi_select),
        Interaction::Drag => arrange_drag(spec, state, area),
    }
}

fn box_width(labels: &[&str]) -> u16 {
    let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
    (longest + 4).clamp(12, 26)
}

fn centered_row(area: Rect, count: u16, width: u16, y: u16, height: u16) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let total = count * width + (count - 1) * GAP;
    let x0 = if total >= area.width {
        area.x
    } else {
        area.x + (area.width - total) / 2
    };
    (0..count)
        .map(|i| Rect::new(x0 + i * (width + GAP), y, width, height))
        .collect()
}

fn clamp_into(area: Rect, x: i32, y: i32, width: u16, height: u16) -> Rect {
    let max_x = (area.x + area.width).saturating_sub(width) as i32;
    let max_y = (area.y + area.height).saturating_sub(height) as i32;
    let x = x.clamp(area.x as i32, max_x.max(area.x as i32)) as u16;
    let y = y.clamp(area.y as i32, max_y.max(area.y as i32)) as u16;
    Rect::new(x, y, width, height)
}

fn arrange_click(spec: &DiagramSpec, area: Rect, multi_select: bool) -> DiagramLayout {
    let infos = spec.entities();
    let labels: Vec<&str> = infos.iter().map(|e| e.label).collect();
    let width = box_width(&labels);

    let row_count = infos.iter().map(|e| e.row).max().map_or(1, |r| r + 1);
    let mut entities: Vec<(String, Rect)> = Vec::with_capacity(infos.len());
    for row in 0..row_count {
        let in_row: Vec<_> = infos.iter().filter(|e| e.row == row).collect();
        let y = area.y + 1 + row as u16 * (ENTITY_HEIGHT + 1);
        let rects = centered_row(area, in_row.len() as u16, width, y, ENTITY_HEIGHT);
        for (info, rect) in in_row.into_iter().zip(rects) {
            entities.push((info.id.to_string(), rect));
        }
    }
    // Preserve spec entity order for stable keyboard indexing.
    let order = spec.entity_ids();
    entities.sort_by_key(|(id, _)| {
        order
            .iter()
            .position(|o| *o == id.as_str())
            .unwrap_or(usize::MAX)
    });

    let submit = multi_select.then(|| {
        Rect::new(
            area.x + (area.width.saturating_sub(SUBMIT_WIDTH)) / 2,
            (area.y + area.height).saturating_sub(SUBMIT_HEIGHT),
            SUBMIT_WIDTH.min(area.width),
            SUBMIT_HEIGHT,
        )
    });

    DiagramLayout {
        entities,
        zones: Vec::new(),
        pool: None,
        submit,
    }
}

fn arrange_drag(spec: &DiagramSpec, state: &DiagramState, area: Rect) -> DiagramLayout {
    let infos = spec.entities();
    let zone_specs = spec.zones();

    let item_labels: Vec<&str> = infos.iter().map(|e| e.label).collect();
    let zone_labels: Vec<&str> = zone_specs.iter().map(|z| z.label.as_str()).collect();
    // Zones must be wide enough to hold any item box.
    let item_width = box_width(&item_labels);
    let zone_width = box_width(&zone_labels).max(item_width + 2);

    let zone_rects = centered_row(
        area,
        zone_specs.len() as u16,
        zone_width,
        area.y + 1,
        ZONE_HEIGHT,
    );
    let zones: Vec<(String, Rect)> = zone_specs
        .iter()
        .zip(zone_rects)
        .map(|(z, r)| (z.id.clone(), r))
        .collect();

    let pool = Rect::new(
        area.x,
        (area.y + area.height).saturating_sub(POOL_HEIGHT),
        area.width,
        POOL_HEIGHT.min(area.height),
    );

    let submit_y = pool.y.saturating_sub(SUBMIT_HEIGHT);
    let submit = Rect::new(
        area.x + (area.width.saturating_sub(SUBMIT_WIDTH)) / 2,
        submit_y,
        SUBMIT_WIDTH.min(area.width),
        SUBMIT_HEIGHT,
    );

    // Unplaced items queue up left-to-right in the pool.
    let mut pool_cursor = pool.x + 1;
    let mut entities: Vec<(String, Rect)> = Vec::with_capacity(infos.len());
    for info in &infos {
        let dragging = state.drag.as_ref().is_some_and(|d| d.item == info.id);
        let rect = if dragging {
            let at = state.drag.as_ref().map(|d| d.at).unwrap_or_default();
            clamp_into(
                area,
                at.x as i32 - item_width as i32 / 2,
                at.y as i32 - 1,
                item_width,
                ENTITY_HEIGHT - 1,
            )
        } else if let Some(zone_id) = state.placed_zone(info.id) {
            match zones.iter().find(|(z, _)| z == zone_id) {
                Some((_, zr)) => Rect::new(
                    zr.x + 1,
                    zr.y + 1,
                    zr.width.saturating_sub(2),
                    ENTITY_HEIGHT,
                ),
                None => Rect::new(pool.x + 1, pool.y + 1, item_width, ENTITY_HEIGHT),
            }
        } else {
            let rect = Rect::new(pool_cursor, pool.y + 1, item_width, ENTITY_HEIGHT);
            pool_cursor = pool_cursor.saturating_add(item_width + GAP);
            rect
        };
        entities.push((info.id.to_string(), rect));
    }

    DiagramLayout {
        entities,
        zones,
        pool: Some(pool),
        submit: Some(submit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag_spec() -> DiagramSpec {
        serde_json::from_str(
            r#"{"type":"drag-topology",
                "items":[{"id":"i1","label":"Producer"},{"id":"i2","label":"Broker"}],
                "zones":[{"id":"z1","label":"Writes"},{"id":"z2","label":"Stores"}]}"#,
        )
        .unwrap()
    }

    fn click_spec() -> DiagramSpec {
        serde_json::from_str(
            r#"{"type":"kraft-quorum","nodes":[
                {"id":"c1","label":"Controller 1"},
                {"id":"c2","label":"Controller 2"},
                {"id":"c3","label":"Controller 3"}]}"#,
        )
        .unwrap()
    }

    #[test]
    fn click_layout_places_every_entity() {
        let layout = arrange(
            &click_spec(),
            &DiagramState::default(),
            Rect::new(0, 0, 80, 20),
        );
        assert_eq!(layout.entities.len(), 3);
        assert!(layout.zones.is_empty());
        assert!(layout.pool.is_none());
        // Single-select: no explicit submit target.
        assert!(layout.submit.is_none());

        // Rects are disjoint and hit-testing resolves each entity.
        for (id, rect) in &layout.entities {
            assert_eq!(layout.entity_at(rect.x + 1, rect.y + 1), Some(id.as_str()));
        }
    }

    #[test]
    fn unplaced_items_sit_in_pool() {
        let spec = drag_spec();
        let layout = arrange(&spec, &DiagramState::default(), Rect::new(0, 0, 80, 24));
        let pool = layout.pool.expect("drag layout has a pool");
        for (_, rect) in &layout.entities {
            assert!(contains(pool, rect.x, rect.y));
        }
        assert!(layout.submit.is_some());
        assert_eq!(layout.zones.len(), 2);
    }

    #[test]
    fn placed_item_moves_into_zone_slot() {
        let spec = drag_spec();
        let mut state = DiagramState::default();
        state
            .placements
            .insert("z1".to_string(), "i1".to_string());
        let layout = arrange(&spec, &state, Rect::new(0, 0, 80, 24));
        let zone = layout.zone_rect("z1").unwrap();
        let item = layout.entity_rect("i1").unwrap();
        assert!(contains(zone, item.x, item.y));
        // The other item is still in the pool.
        let pool = layout.pool.unwrap();
        let other = layout.entity_rect("i2").unwrap();
        assert!(contains(pool, other.x, other.y));
    }

    #[test]
    fn zone_hit_test_resolves_by_bounding_box() {
        let spec = drag_spec();
        let layout = arrange(&spec, &DiagramState::default(), Rect::new(0, 0, 80, 24));
        let (zone_id, rect) = layout.zones[0].clone();
        assert_eq!(
            layout.zone_at(rect.x + rect.width / 2, rect.y + 1),
            Some(zone_id.as_str())
        );
        assert_eq!(layout.zone_at(0, rect.y + ZONE_HEIGHT + 1), None);
    }
}
