use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::ui::theme::Theme;

/// Multiple-choice options. After answering, the correct option is always
/// highlighted and a wrong pick is marked; everything else goes inert.
pub struct OptionsList<'a> {
    options: &'a [String],
    correct: usize,
    selected: Option<usize>,
    answered: bool,
    theme: &'a Theme,
}

impl<'a> OptionsList<'a> {
    pub fn new(
        options: &'a [String],
        correct: usize,
        selected: Option<usize>,
        answered: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            options,
            correct,
            selected,
            answered,
            theme,
        }
    }

    /// One clickable row per option, every other line. The mouse handler
    /// hit-tests against these same rects.
    pub fn rows(area: Rect, count: usize) -> Vec<Rect> {
        (0..count)
            .map(|i| {
                let y = area.y + (i as u16) * 2;
                Rect::new(area.x, y, area.width, 1)
            })
            .filter(|r| r.y < area.y + area.height)
            .collect()
    }
}

impl Widget for OptionsList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        for (i, (option, row)) in self
            .options
            .iter()
            .zip(Self::rows(area, self.options.len()))
            .enumerate()
        {
            let number = i + 1;
            let style = if self.answered {
                if i == self.correct {
                    Style::default()
                        .fg(colors.correct())
                        .add_modifier(Modifier::BOLD)
                } else if self.selected == Some(i) {
                    Style::default()
                        .fg(colors.incorrect())
                        .bg(colors.incorrect_bg())
                } else {
                    Style::default().fg(colors.disabled())
                }
            } else if self.selected == Some(i) {
                Style::default().fg(colors.selected())
            } else {
                Style::default().fg(colors.fg())
            };

            Paragraph::new(Line::from(vec![
                Span::styled(
                    format!(" {number}) "),
                    style.add_modifier(Modifier::BOLD),
                ),
                Span::styled(option.clone(), style),
            ]))
            .render(row, buf);
        }
    }
}
