use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::app::{App, SetupField};
use crate::runtime::Clock;
use crate::store::SettingsStore;
use crate::ui::{bold, dim, italic, screen::Screen, HORIZONTAL_MARGIN, VERTICAL_MARGIN};
use crate::util::format_duration;

const LABEL_WIDTH: usize = 28;

/// Settings form shown before a game
pub struct SetupScreen;

impl<S: SettingsStore, C: Clock> Screen<S, C> for SetupScreen {
    fn render(&self, app: &App<S, C>, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2),                               // title
                Constraint::Length(1),                               // difficulty
                Constraint::Length(1),                               // notice
                Constraint::Length(SetupField::ALL.len() as u16 + 1), // form
                Constraint::Min(1),                                  // history summary
                Constraint::Length(1),                               // legend
            ])
            .split(area);

        Paragraph::new(Span::styled(
            "Times Table Quiz",
            bold().fg(Color::Cyan),
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        Paragraph::new(Span::styled(
            format!(
                "Difficulty: {} (level {})",
                app.difficulty.group, app.difficulty.level
            ),
            dim(),
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        if let Some(notice) = app.difficulty.notice() {
            Paragraph::new(Span::styled(notice, italic().fg(Color::Yellow)))
                .alignment(Alignment::Center)
                .render(chunks[2], buf);
        }

        let selected = app.form.field();
        let timer_on = app.engine.config().use_timer;
        let lines: Vec<Line> = SetupField::ALL
            .iter()
            .map(|&field| {
                let is_selected = field == selected;
                let marker = if is_selected { "▶ " } else { "  " };
                let mut value_style = bold();
                if is_selected {
                    value_style = value_style.add_modifier(Modifier::REVERSED);
                }
                let label_style = if field == SetupField::TimerDuration && !timer_on {
                    dim()
                } else {
                    Style::default()
                };

                Line::from(vec![
                    Span::raw(marker),
                    Span::styled(
                        format!("{:<width$}", field.label(), width = LABEL_WIDTH),
                        label_style,
                    ),
                    Span::styled(format!(" {} ", app.field_value(field)), value_style),
                ])
            })
            .collect();

        Paragraph::new(lines).render(chunks[3], buf);

        let summary = app.engine.history().summary();
        let summary_text = match (summary.best_score, summary.mean_time_secs) {
            (Some(best), Some(mean)) => format!(
                "Games played: {}   Best score: {}   Average time: {}",
                summary.games,
                best,
                format_duration(mean.round() as u64)
            ),
            _ => "No games played yet".to_string(),
        };
        Paragraph::new(Span::styled(summary_text, italic()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[4], buf);

        Paragraph::new(Span::styled(
            "(↑/↓) select / (←/→) adjust / (0-9) type / (space) toggle / (enter) start / (esc)ape",
            italic(),
        ))
        .render(chunks[5], buf);
    }
}
