use ratatui::{buffer::Buffer, layout::Rect};

use crate::app::App;
use crate::runtime::Clock;
use crate::session::GameState;
use crate::store::SettingsStore;
use crate::ui::{finished::FinishedScreen, playing::PlayingScreen, setup::SetupScreen};

/// A UI screen boundary: renders one game state
pub trait Screen<S: SettingsStore, C: Clock> {
    fn render(&self, app: &App<S, C>, area: Rect, buf: &mut Buffer);
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen<S: SettingsStore, C: Clock>(state: GameState) -> Box<dyn Screen<S, C>> {
    match state {
        GameState::Setup => Box::new(SetupScreen),
        GameState::Playing => Box::new(PlayingScreen),
        GameState::Finished => Box::new(FinishedScreen),
    }
}
