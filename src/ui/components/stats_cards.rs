use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::store::schema::Progress;
use crate::ui::theme::Theme;

/// Streak / answered / accuracy cards. Lays out as a row when the area is
/// wider than tall, otherwise stacks vertically (stats sidebar).
pub struct StatsCards<'a> {
    progress: &'a Progress,
    theme: &'a Theme,
}

impl<'a> StatsCards<'a> {
    pub fn new(progress: &'a Progress, theme: &'a Theme) -> Self {
        Self { progress, theme }
    }
}

impl Widget for StatsCards<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let cards = [
            (
                self.progress.streak.to_string(),
                "Day Streak",
                colors.streak(),
            ),
            (
                self.progress.total_answered.to_string(),
                "Answered",
                colors.accent(),
            ),
            (
                format!("{}%", self.progress.accuracy_percent()),
                "Accuracy",
                colors.correct(),
            ),
        ];

        let horizontal = area.width >= area.height * 8;
        let layout = Layout::default()
            .direction(if horizontal {
                Direction::Horizontal
            } else {
                Direction::Vertical
            })
            .constraints(cards.iter().map(|_| Constraint::Ratio(1, 3)))
            .split(area);

        for ((value, label, color), cell) in cards.into_iter().zip(layout.iter()) {
            let block = Block::bordered().border_style(Style::default().fg(colors.border()));
            let inner = block.inner(*cell);
            block.render(*cell, buf);

            let lines = vec![
                Line::from(Span::styled(
                    value,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    label,
                    Style::default().fg(colors.text_muted()),
                )),
            ];
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .render(inner, buf);
        }
    }
}
