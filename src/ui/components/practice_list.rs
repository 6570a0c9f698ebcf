use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::bank::Bank;
use crate::store::schema::Progress;
use crate::ui::theme::Theme;

/// Scrollable list of the whole bank. Opening a row starts a no-stakes
/// practice run; answered questions carry a marker.
pub struct PracticeList<'a> {
    bank: &'a Bank,
    progress: &'a Progress,
    selected: usize,
    theme: &'a Theme,
}

impl<'a> PracticeList<'a> {
    pub fn new(bank: &'a Bank, progress: &'a Progress, selected: usize, theme: &'a Theme) -> Self {
        Self {
            bank,
            progress,
            selected,
            theme,
        }
    }
}

impl Widget for PracticeList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Question Bank ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let visible = inner.height as usize;
        if visible == 0 {
            return;
        }
        let offset = self.selected.saturating_sub(visible.saturating_sub(1));

        for (row, (i, question)) in self
            .bank
            .questions()
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .enumerate()
        {
            let is_selected = i == self.selected;
            let answered = self.progress.answered_questions.contains(&question.id);
            let indicator = if is_selected { ">" } else { " " };
            let marker = if answered { "*" } else { " " };
            let kind = if question.is_diagram() { "diagram" } else { "text" };

            let text = format!(
                " {indicator} {marker} #{:<3} {:<16} {:<7} {:<8} {}",
                question.id,
                question.category_display(),
                question.difficulty.as_str(),
                kind,
                question.question,
            );

            let style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else if answered {
                Style::default().fg(colors.text_muted())
            } else {
                Style::default().fg(colors.fg())
            };

            Paragraph::new(Line::from(Span::styled(text, style))).render(
                Rect::new(inner.x, inner.y + row as u16, inner.width, 1),
                buf,
            );
        }
    }
}
