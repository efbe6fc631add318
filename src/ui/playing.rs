use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::app::App;
use crate::question_generator::OPTION_COUNT;
use crate::runtime::Clock;
use crate::store::SettingsStore;
use crate::ui::{bold, dim, italic, screen::Screen, HORIZONTAL_MARGIN, VERTICAL_MARGIN};

/// Seconds left at which the countdown turns red
const LOW_TIME_SECS: u32 = 3;

/// Question, answer options and feedback for the running game
pub struct PlayingScreen;

impl<S: SettingsStore, C: Clock> Screen<S, C> for PlayingScreen {
    fn render(&self, app: &App<S, C>, area: Rect, buf: &mut Buffer) {
        let engine = &app.engine;
        let config = engine.config();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // score
                Constraint::Length(1), // timer
                Constraint::Min(1),    // padding
                Constraint::Length(3), // question
                Constraint::Length(1), // padding
                Constraint::Length(3), // options
                Constraint::Length(2), // feedback
                Constraint::Min(1),    // padding
                Constraint::Length(1), // legend
            ])
            .split(area);

        Paragraph::new(Span::styled(
            format!("Score: {} / {}", engine.score(), config.score_limit),
            bold(),
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        if config.use_timer {
            let style = if engine.time_left() <= LOW_TIME_SECS {
                bold().fg(Color::Red)
            } else {
                dim()
            };
            Paragraph::new(Span::styled(
                format!("Time left: {}s", engine.time_left()),
                style,
            ))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
        }

        if let Some(question) = engine.current_question() {
            Paragraph::new(Span::styled(
                format!("{} = ?", question.text()),
                bold().fg(Color::Cyan),
            ))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
            .render(chunks[3], buf);
        }

        let option_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, OPTION_COUNT as u32); OPTION_COUNT])
            .split(chunks[5]);

        for (idx, (value, option_area)) in engine.options().iter().zip(option_areas.iter()).enumerate() {
            let mut style = bold();
            if engine.is_showing_feedback() {
                let is_answer = engine
                    .current_question()
                    .is_some_and(|q| q.correct_answer == *value);
                style = if is_answer {
                    style.fg(Color::Green)
                } else {
                    style.add_modifier(Modifier::DIM)
                };
            } else if idx == app.selected_option {
                style = style.add_modifier(Modifier::REVERSED);
            }

            Paragraph::new(Span::styled(format!("({}) {}", idx + 1, value), style))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL))
                .render(*option_area, buf);
        }

        if let Some(feedback) = engine.feedback() {
            let lines = if feedback.is_correct {
                vec![Line::from(Span::styled(
                    feedback.message.as_str(),
                    bold().fg(Color::Green),
                ))]
            } else {
                vec![
                    Line::from(Span::styled(feedback.question_text.as_str(), dim())),
                    Line::from(Span::styled(
                        feedback.message.as_str(),
                        bold().fg(Color::Red),
                    )),
                ]
            };
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .render(chunks[6], buf);
        }

        Paragraph::new(Span::styled(
            "(1-4) answer / (←/→) move / (enter) choose / (q)uit game / (esc)ape",
            italic(),
        ))
        .render(chunks[8], buf);
    }
}
