use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Color,
    text::Span,
    widgets::{Block, Borders, Paragraph, Row, Table, Widget},
};

use crate::app::App;
use crate::runtime::Clock;
use crate::store::SettingsStore;
use crate::ui::{bold, dim, italic, screen::Screen, HORIZONTAL_MARGIN, VERTICAL_MARGIN};
use crate::util::format_duration_long;

/// Final score, time taken and past games
pub struct FinishedScreen;

impl<S: SettingsStore, C: Clock> Screen<S, C> for FinishedScreen {
    fn render(&self, app: &App<S, C>, area: Rect, buf: &mut Buffer) {
        let engine = &app.engine;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2), // heading
                Constraint::Length(1), // final score
                Constraint::Length(2), // time taken
                Constraint::Min(3),    // history
                Constraint::Length(1), // legend
            ])
            .split(area);

        Paragraph::new(Span::styled("Game over!", bold().fg(Color::Cyan)))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        Paragraph::new(Span::styled(
            format!("Final score: {}", engine.final_score()),
            bold(),
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        Paragraph::new(Span::styled(
            format!(
                "Time taken: {}",
                format_duration_long(engine.total_time_taken())
            ),
            dim(),
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        let rows = engine.history().entries().iter().map(|entry| {
            Row::new(vec![
                entry.date.clone(),
                entry.score.to_string(),
                entry.time_label(),
                entry.ranges.clone(),
            ])
        });
        Table::new(
            rows,
            [
                Constraint::Length(19),
                Constraint::Length(7),
                Constraint::Length(9),
                Constraint::Min(10),
            ],
        )
        .header(Row::new(vec!["Date", "Score", "Time", "Ranges"]).style(bold()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Game history "),
        )
        .render(chunks[3], buf);

        Paragraph::new(Span::styled(
            "(p)lay again / (r)estart / (esc)ape",
            italic(),
        ))
        .render(chunks[4], buf);
    }
}
