use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use crate::bank::{Difficulty, Question};
use crate::ui::layout::wrapped_line_count;
use crate::ui::theme::Theme;

/// Category/difficulty badges, the day counter (or browse position), and the
/// wrapped question text.
pub struct QuestionHeader<'a> {
    question: &'a Question,
    /// "Day N of 365", daily screen only.
    day_of_year: Option<u32>,
    /// "Question i of N", browse screen only.
    position: Option<(usize, usize)>,
    theme: &'a Theme,
}

impl<'a> QuestionHeader<'a> {
    pub fn new(question: &'a Question, theme: &'a Theme) -> Self {
        Self {
            question,
            day_of_year: None,
            position: None,
            theme,
        }
    }

    pub fn day_of_year(mut self, day: u32) -> Self {
        self.day_of_year = Some(day);
        self
    }

    pub fn position(mut self, index: usize, total: usize) -> Self {
        self.position = Some((index, total));
        self
    }

    /// Rows consumed at the given width: badges, blank, question text.
    pub fn height(question: &Question, width: u16) -> u16 {
        2 + wrapped_line_count(&question.question, width.max(1) as usize) as u16
    }

    fn difficulty_color(&self) -> ratatui::style::Color {
        let colors = &self.theme.colors;
        match self.question.difficulty {
            Difficulty::Easy => colors.badge_easy(),
            Difficulty::Medium => colors.badge_medium(),
            Difficulty::Hard => colors.badge_hard(),
        }
    }
}

impl Widget for QuestionHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let colors = &self.theme.colors;

        let badge_row = Rect::new(area.x, area.y, area.width, 1);
        let badges = Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {} ", self.question.category_display()),
                Style::default().fg(colors.accent()).bg(colors.accent_dim()),
            ),
            Span::raw(" "),
            Span::styled(
                format!(" {} ", self.question.difficulty.as_str()),
                Style::default()
                    .fg(colors.bg())
                    .bg(self.difficulty_color()),
            ),
        ]));
        badges.render(badge_row, buf);

        let right_text = match (self.day_of_year, self.position) {
            (Some(day), _) => Some(format!("Day {day} of 365")),
            (None, Some((index, total))) => Some(format!("Question {} of {total}", index + 1)),
            (None, None) => None,
        };
        if let Some(text) = right_text {
            Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().fg(colors.text_muted()),
            )))
            .alignment(Alignment::Right)
            .render(badge_row, buf);
        }

        let text_area = Rect::new(
            area.x,
            area.y + 2,
            area.width,
            area.height.saturating_sub(2),
        );
        Paragraph::new(Line::from(Span::styled(
            self.question.question.clone(),
            Style::default()
                .fg(colors.fg())
                .add_modifier(Modifier::BOLD),
        )))
        .wrap(Wrap { trim: true })
        .render(text_area, buf);
    }
}
