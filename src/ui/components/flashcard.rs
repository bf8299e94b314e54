use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::curriculum::conversation::VocabItem;
use crate::curriculum::grammar::ExerciseItem;
use crate::ui::theme::Theme;

/// One two-sided card: script + transliteration on the front, translation
/// on the back. Cards without a back (letter drills) ignore the reveal
/// flag.
pub struct Flashcard<'a> {
    bengali: &'a str,
    transliteration: &'a str,
    english: Option<&'a str>,
    pub revealed: bool,
    pub busy: bool,
    pub theme: &'a Theme,
}

impl<'a> Flashcard<'a> {
    pub fn from_exercise(item: &'a ExerciseItem, revealed: bool, busy: bool, theme: &'a Theme) -> Self {
        Self {
            bengali: item.bengali(),
            transliteration: item.transliteration(),
            english: item.english(),
            revealed,
            busy,
            theme,
        }
    }

    pub fn from_vocab(item: &'a VocabItem, revealed: bool, busy: bool, theme: &'a Theme) -> Self {
        Self {
            bengali: &item.bengali,
            transliteration: &item.transliteration,
            english: Some(&item.english),
            revealed,
            busy,
            theme,
        }
    }
}

impl Widget for &Flashcard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let showing_back = self.revealed && self.english.is_some();
        let border = if showing_back {
            colors.border_focused()
        } else {
            colors.border()
        };
        let block = Block::bordered()
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let speaker_line = if self.busy {
            Span::styled("… synthesizing", Style::default().fg(colors.text_dim()))
        } else {
            Span::styled("♪ [s] listen", Style::default().fg(colors.accent_dim()))
        };

        let mut lines: Vec<Line> = vec![Line::from("")];
        if showing_back {
            lines.push(Line::from(Span::styled(
                self.english.unwrap_or_default().to_string(),
                Style::default()
                    .fg(colors.highlight())
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(speaker_line));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "[space] show Bengali",
                Style::default().fg(colors.text_dim()),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                self.bengali.to_string(),
                Style::default()
                    .fg(colors.fg())
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                self.transliteration.to_string(),
                Style::default().fg(colors.text_dim()),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(speaker_line));
            if self.english.is_some() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "[space] show translation",
                    Style::default().fg(colors.text_dim()),
                )));
            }
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
