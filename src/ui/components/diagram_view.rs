use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::render::{DiagramView, EntityView, VisualClass, ZoneView};
use crate::ui::theme::{Theme, ThemeColors};

/// Draws a diagram render description: zones first, then the source pool,
/// entities on top, the dragged entity last so it floats over everything.
pub struct DiagramWidget<'a> {
    view: &'a DiagramView,
    theme: &'a Theme,
}

impl<'a> DiagramWidget<'a> {
    pub fn new(view: &'a DiagramView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }
}

fn class_color(colors: &ThemeColors, class: VisualClass) -> Color {
    match class {
        VisualClass::Selectable => colors.border(),
        VisualClass::Selected => colors.selected(),
        VisualClass::Correct => colors.correct(),
        VisualClass::Incorrect => colors.incorrect(),
        VisualClass::Disabled => colors.disabled(),
        VisualClass::DropTarget => colors.drop_target(),
    }
}

/// Keep every box inside the widget area; partially visible boxes are
/// dropped rather than clipped mid-border.
fn fits(rect: Rect, area: Rect) -> bool {
    rect.width >= 2
        && rect.height >= 2
        && rect.x >= area.x
        && rect.y >= area.y
        && rect.x + rect.width <= area.x + area.width
        && rect.y + rect.height <= area.y + area.height
}

fn render_zone(zone: &ZoneView, colors: &ThemeColors, buf: &mut Buffer) {
    let color = class_color(colors, zone.class);
    let block = Block::bordered()
        .title(format!(" {} ", zone.label))
        .border_style(Style::default().fg(color));
    let inner = block.inner(zone.rect);
    block.render(zone.rect, buf);

    if !zone.occupied {
        Paragraph::new(Line::from(Span::styled(
            "drop here",
            Style::default().fg(colors.text_muted()),
        )))
        .alignment(Alignment::Center)
        .render(inner, buf);
    }
}

fn render_entity(entity: &EntityView, index: usize, colors: &ThemeColors, buf: &mut Buffer) {
    let color = class_color(colors, entity.class);
    let fg = match entity.class {
        VisualClass::Selectable => colors.fg(),
        other => class_color(colors, other),
    };

    let block = Block::bordered()
        .title(format!("{}", index + 1))
        .border_style(Style::default().fg(color));
    let inner = block.inner(entity.rect);
    block.render(entity.rect, buf);

    let mut lines = vec![Line::from(Span::styled(
        entity.label.clone(),
        Style::default().fg(fg).add_modifier(Modifier::BOLD),
    ))];
    if !entity.tags.is_empty() {
        lines.push(Line::from(Span::styled(
            entity.tags.join(", "),
            Style::default().fg(colors.text_muted()),
        )));
    }
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(inner, buf);
}

impl Widget for DiagramWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let colors = &self.theme.colors;

        Paragraph::new(Line::from(Span::styled(
            self.view.title,
            Style::default().fg(colors.text_muted()),
        )))
        .render(Rect::new(area.x, area.y, area.width, 1), buf);

        for zone in &self.view.zones {
            if fits(zone.rect, area) {
                render_zone(zone, colors, buf);
            }
        }

        if let Some(pool) = self.view.pool {
            if fits(pool, area) {
                Block::bordered()
                    .title(" Components ")
                    .border_style(Style::default().fg(colors.border()))
                    .render(pool, buf);
            }
        }

        if let Some(submit) = self.view.submit.filter(|s| fits(s.rect, area)) {
            let color = if submit.enabled {
                colors.accent()
            } else {
                colors.disabled()
            };
            let block = Block::bordered().border_style(Style::default().fg(color));
            let inner = block.inner(submit.rect);
            block.render(submit.rect, buf);
            Paragraph::new(Line::from(Span::styled(
                "Submit",
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .render(inner, buf);
        }

        for (i, entity) in self.view.entities.iter().enumerate() {
            if !entity.dragging && fits(entity.rect, area) {
                render_entity(entity, i, colors, buf);
            }
        }
        // Dragged entity floats above everything else.
        for (i, entity) in self.view.entities.iter().enumerate() {
            if entity.dragging && fits(entity.rect, area) {
                render_entity(entity, i, colors, buf);
            }
        }
    }
}
