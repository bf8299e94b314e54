use std::collections::HashSet;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::curriculum::grammar::{self, UnitKey};
use crate::engine::progress::ProgressState;
use crate::engine::unlock::UnlockPolicy;
use crate::ui::theme::Theme;

/// One selectable row on the grammar home screen: a phase header to
/// expand/collapse, or a module inside an expanded phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HomeRow {
    Phase(usize),
    Unit(UnitKey),
}

/// Flatten the curriculum into the visible row list for the current
/// expansion state.
pub fn build_rows(expanded: &HashSet<usize>) -> Vec<HomeRow> {
    let mut rows = Vec::new();
    for (phase, def) in grammar::PHASES.iter().enumerate() {
        rows.push(HomeRow::Phase(phase));
        if expanded.contains(&phase) {
            for module in 0..def.modules.len() {
                rows.push(HomeRow::Unit(UnitKey::new(phase, module)));
            }
        }
    }
    rows
}

pub struct PhaseList<'a> {
    pub rows: &'a [HomeRow],
    pub selected: usize,
    pub progress: &'a ProgressState,
    pub policy: UnlockPolicy,
    pub expanded: &'a HashSet<usize>,
    pub theme: &'a Theme,
}

impl Widget for &PhaseList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Curriculum ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        // Keep the selected row in view.
        let visible = inner.height as usize;
        let start = self.selected.saturating_sub(visible.saturating_sub(1));

        let mut lines: Vec<Line> = Vec::new();
        for (i, row) in self.rows.iter().enumerate().skip(start).take(visible) {
            let is_selected = i == self.selected;
            let cursor = if is_selected { ">" } else { " " };

            let line = match row {
                HomeRow::Phase(phase) => {
                    let marker = if self.expanded.contains(phase) { "−" } else { "+" };
                    let title = grammar::PHASES[*phase].title;
                    Line::from(Span::styled(
                        format!("{cursor} [{marker}] {title}"),
                        Style::default()
                            .fg(if is_selected { colors.accent() } else { colors.fg() })
                            .add_modifier(Modifier::BOLD),
                    ))
                }
                HomeRow::Unit(key) => {
                    let completed = self.progress.is_completed(*key);
                    let reachable = self.policy.reachable(*key, self.progress.completed());
                    let is_focus = *key == self.progress.focus() && !completed;

                    let (marker, marker_color) = if completed {
                        ("✓", colors.success())
                    } else if is_focus {
                        ("→", colors.warning())
                    } else if !reachable {
                        ("·", colors.text_dim())
                    } else {
                        (" ", colors.fg())
                    };

                    let title = key.module_title().unwrap_or("?");
                    let text_color = if !reachable && !completed {
                        colors.text_dim()
                    } else if is_selected {
                        colors.accent()
                    } else {
                        colors.fg()
                    };

                    Line::from(vec![
                        Span::styled(format!("{cursor}    "), Style::default().fg(text_color)),
                        Span::styled(format!("{marker} "), Style::default().fg(marker_color)),
                        Span::styled(
                            title,
                            Style::default().fg(text_color).add_modifier(if is_selected {
                                Modifier::BOLD
                            } else {
                                Modifier::empty()
                            }),
                        ),
                    ])
                }
            };
            lines.push(line);
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapsed_home_lists_only_phase_headers() {
        let rows = build_rows(&HashSet::new());
        assert_eq!(rows.len(), grammar::phase_count());
        assert!(rows.iter().all(|r| matches!(r, HomeRow::Phase(_))));
    }

    #[test]
    fn expanding_a_phase_inserts_its_units_in_order() {
        let rows = build_rows(&HashSet::from([0]));
        assert_eq!(rows.len(), grammar::phase_count() + grammar::module_count(0));
        assert_eq!(rows[0], HomeRow::Phase(0));
        assert_eq!(rows[1], HomeRow::Unit(UnitKey::new(0, 0)));
        assert_eq!(rows[3], HomeRow::Unit(UnitKey::new(0, 2)));
        assert_eq!(rows[4], HomeRow::Phase(1));
    }
}
