pub mod finished;
pub mod playing;
pub mod screen;
pub mod setup;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::celebration::Celebration;
use crate::runtime::Clock;
use crate::store::SettingsStore;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

const SPARK_COLORS: [Color; 6] = [
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
    Color::Green,
    Color::Red,
    Color::LightYellow,
];

impl<S: SettingsStore, C: Clock> Widget for &App<S, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen::<S, C>(self.state()).render(self, area, buf);

        if self.celebration.is_active() {
            render_celebration(&self.celebration, area, buf);
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

/// Column at which `text` starts when centered in `area`
fn centered_x(text: &str, area: Rect) -> u16 {
    let width = text.width().min(area.width as usize) as u16;
    area.x + (area.width - width) / 2
}

/// Render sparks and the headline on top of the current screen
fn render_celebration(celebration: &Celebration, area: Rect, buf: &mut Buffer) {
    for spark in &celebration.sparks {
        if spark.x < 0.0 || spark.y < 0.0 {
            continue;
        }
        let (x, y) = (spark.x as u16, spark.y as u16);
        if x >= area.width || y >= area.height {
            continue;
        }

        let color = SPARK_COLORS[spark.color_index % SPARK_COLORS.len()];
        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&spark.symbol.to_string());
            cell.set_style(Style::default().fg(color).add_modifier(Modifier::BOLD));
        }
    }

    if area.height > 0 {
        let headline = celebration.headline;
        let x = centered_x(headline, area);
        buf.set_stringn(
            x,
            area.y + area.height / 4,
            headline,
            area.width as usize,
            bold().fg(Color::Yellow),
        );
    }
}

#[cfg(test)]
pub(crate) fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    (0..area.height)
        .map(|y| {
            (0..area.width)
                .map(|x| buf[(area.x + x, area.y + y)].symbol().to_string())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
