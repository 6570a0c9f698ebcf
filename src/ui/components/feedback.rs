use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

/// Verdict banner plus explanation, shown once a question is answered.
/// Before that it renders the interaction hint instead.
pub struct Feedback<'a> {
    verdict: Option<bool>,
    explanation: &'a str,
    docs_link: Option<&'a str>,
    hint: &'a str,
    theme: &'a Theme,
}

impl<'a> Feedback<'a> {
    pub fn new(
        verdict: Option<bool>,
        explanation: &'a str,
        docs_link: Option<&'a str>,
        hint: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            verdict,
            explanation,
            docs_link,
            hint,
            theme,
        }
    }
}

impl Widget for Feedback<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let Some(correct) = self.verdict else {
            Paragraph::new(Line::from(Span::styled(
                self.hint,
                Style::default().fg(colors.text_muted()),
            )))
            .render(area, buf);
            return;
        };

        let (header, color) = if correct {
            ("Correct!", colors.correct())
        } else {
            ("Not quite!", colors.incorrect())
        };

        let mut lines = vec![
            Line::from(Span::styled(
                header,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.explanation,
                Style::default().fg(colors.fg()),
            )),
        ];
        if let Some(link) = self.docs_link {
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
