use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::curriculum::conversation::LESSON_PATH;
use crate::ui::theme::Theme;

/// The conversation lesson path: a vertical trail of lesson nodes joined by
/// dotted connectors.
pub struct LessonPath<'a> {
    pub selected: usize,
    pub theme: &'a Theme,
}

impl Widget for &LessonPath<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Conversation Mode ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        for (i, lesson) in LESSON_PATH.iter().enumerate() {
            let is_selected = i == self.selected;
            let cursor = if is_selected { ">" } else { " " };

            lines.push(Line::from(vec![
                Span::styled(format!("{cursor} "), Style::default().fg(colors.fg())),
                Span::styled(
                    "● ",
                    Style::default().fg(if is_selected {
                        colors.accent()
                    } else {
                        colors.accent_dim()
                    }),
                ),
                Span::styled(
                    format!("Lesson {}: {}", lesson.id, lesson.title),
                    Style::default()
                        .fg(if is_selected { colors.accent() } else { colors.fg() })
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                ),
            ]));
            if i + 1 < LESSON_PATH.len() {
                lines.push(Line::from(Span::styled(
                    "   ┆",
                    Style::default().fg(colors.text_dim()),
                )));
            }
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
