use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

const REVEAL_WIDTH: u16 = 21;
const REVEAL_HEIGHT: u16 = 3;

/// Flashcard surface: a reveal button until revealed, then the answer with
/// its explanation. Revealing counts as answering (always correct).
pub struct Flashcard<'a> {
    answer: &'a str,
    explanation: &'a str,
    docs_link: Option<&'a str>,
    revealed: bool,
    theme: &'a Theme,
}

impl<'a> Flashcard<'a> {
    pub fn new(
        answer: &'a str,
        explanation: &'a str,
        docs_link: Option<&'a str>,
        revealed: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            answer,
            explanation,
            docs_link,
            revealed,
            theme,
        }
    }

    /// Clickable reveal-button rect, shared with the mouse handler.
    pub fn reveal_rect(area: Rect) -> Rect {
        Rect::new(
            area.x + (area.width.saturating_sub(REVEAL_WIDTH)) / 2,
            area.y + 1,
            REVEAL_WIDTH.min(area.width),
            REVEAL_HEIGHT.min(area.height.saturating_sub(1)),
        )
    }
}

impl Widget for Flashcard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        if !self.revealed {
            let button = Self::reveal_rect(area);
            let block = Block::bordered().border_style(Style::default().fg(colors.accent()));
            let inner = block.inner(button);
            block.render(button, buf);
            Paragraph::new(Line::from(Span::styled(
                "Reveal Answer",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .render(inner, buf);
            return;
        }

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Answer: ", Style::default().fg(colors.text_muted())),
                Span::styled(
                    self.answer,
                    Style::default()
                        .fg(colors.correct())
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                self.explanation,
                Style::default().fg(colors.fg()),
            )),
        ];
        if let Some(link) = self.docs_link {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Read the docs: {link}"),
                Style::default().fg(colors.accent()),
            )));
        }
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
