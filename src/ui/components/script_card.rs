use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::curriculum::conversation::Scenario;
use crate::ui::theme::Theme;

/// The two-sided dialogue script: script + transliteration on the front,
/// the English rendering on the back.
pub struct ScriptCard<'a> {
    pub scenario: &'a Scenario,
    pub revealed: bool,
    pub busy: bool,
    pub theme: &'a Theme,
}

impl Widget for &ScriptCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let border = if self.revealed {
            colors.border_focused()
        } else {
            colors.border()
        };
        let block = Block::bordered()
            .title(format!(" ✦ {} ", self.scenario.image))
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        for line in &self.scenario.dialogue {
            let speaker = Span::styled(
                format!(" {}: ", line.speaker),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            );
            if self.revealed {
                lines.push(Line::from(vec![
                    speaker,
                    Span::styled(line.english.clone(), Style::default().fg(colors.highlight())),
                ]));
            } else {
                lines.push(Line::from(vec![
                    speaker,
                    Span::styled(line.bengali.clone(), Style::default().fg(colors.fg())),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("      {}", line.transliteration),
                    Style::default().fg(colors.text_dim()),
                )));
            }
        }

        lines.push(Line::from(""));
        let play = if self.busy {
            "… synthesizing"
        } else {
            "♪ [a] play conversation"
        };
        let hint = if self.revealed {
            "[t] show original"
        } else {
            "[t] show translation"
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {play}"), Style::default().fg(colors.accent_dim())),
            Span::styled(format!("   {hint}"), Style::default().fg(colors.text_dim())),
        ]));

        Paragraph::new(lines).render(inner, buf);
    }
}
