use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;

use crate::celebration::Celebration;
use crate::config::{FieldEdit, Operand, RangeBound, MAX_OPERAND, MAX_TIMER_SECS, MIN_SCORE_LIMIT, MIN_TIMER_SECS};
use crate::difficulty::DifficultySelection;
use crate::engine::QuizEngine;
use crate::question_generator::OPTION_COUNT;
use crate::runtime::{Clock, SystemClock};
use crate::session::GameState;
use crate::store::SettingsStore;

const SCORE_LIMIT_STEP: u32 = 10;

/// Editable rows of the setup form, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    MultiplicandMin,
    MultiplicandMax,
    MultiplierMin,
    MultiplierMax,
    ScoreLimit,
    CorrectAnswerScore,
    IncorrectAnswerScore,
    UseTimer,
    TimerDuration,
    AllowDuplicates,
}

impl SetupField {
    pub const ALL: [SetupField; 10] = [
        SetupField::MultiplicandMin,
        SetupField::MultiplicandMax,
        SetupField::MultiplierMin,
        SetupField::MultiplierMax,
        SetupField::ScoreLimit,
        SetupField::CorrectAnswerScore,
        SetupField::IncorrectAnswerScore,
        SetupField::UseTimer,
        SetupField::TimerDuration,
        SetupField::AllowDuplicates,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SetupField::MultiplicandMin => "Multiplicand min",
            SetupField::MultiplicandMax => "Multiplicand max",
            SetupField::MultiplierMin => "Multiplier min",
            SetupField::MultiplierMax => "Multiplier max",
            SetupField::ScoreLimit => "Score limit",
            SetupField::CorrectAnswerScore => "Correct answer points",
            SetupField::IncorrectAnswerScore => "Incorrect/missed points",
            SetupField::UseTimer => "Use timer",
            SetupField::TimerDuration => "Timer duration (seconds)",
            SetupField::AllowDuplicates => "Allow duplicate questions",
        }
    }

    fn operand_bound(&self) -> Option<(Operand, RangeBound)> {
        match self {
            SetupField::MultiplicandMin => Some((Operand::Multiplicand, RangeBound::Min)),
            SetupField::MultiplicandMax => Some((Operand::Multiplicand, RangeBound::Max)),
            SetupField::MultiplierMin => Some((Operand::Multiplier, RangeBound::Min)),
            SetupField::MultiplierMax => Some((Operand::Multiplier, RangeBound::Max)),
            _ => None,
        }
    }

    /// Fields edited by typing digits
    pub fn is_typed(&self) -> bool {
        self.operand_bound().is_some()
            || matches!(
                self,
                SetupField::ScoreLimit
                    | SetupField::CorrectAnswerScore
                    | SetupField::IncorrectAnswerScore
            )
    }
}

/// Cursor and in-progress text of the setup form
#[derive(Debug, Default)]
pub struct SetupForm {
    pub selected: usize,
    /// Text typed into the selected field, if the user started typing
    pub draft: Option<String>,
}

impl SetupForm {
    pub fn field(&self) -> SetupField {
        SetupField::ALL[self.selected]
    }

    fn select_next(&mut self) {
        self.selected = (self.selected + 1) % SetupField::ALL.len();
        self.draft = None;
    }

    fn select_previous(&mut self) {
        self.selected = (self.selected + SetupField::ALL.len() - 1) % SetupField::ALL.len();
        self.draft = None;
    }
}

pub struct App<S: SettingsStore, C: Clock = SystemClock> {
    pub engine: QuizEngine<S, C>,
    pub form: SetupForm,
    pub difficulty: DifficultySelection,
    pub celebration: Celebration,
    /// Highlighted answer option while playing
    pub selected_option: usize,
    round: usize,
}

impl<S: SettingsStore, C: Clock> App<S, C> {
    pub fn new(engine: QuizEngine<S, C>, difficulty: DifficultySelection) -> Self {
        Self {
            engine,
            form: SetupForm::default(),
            difficulty,
            celebration: Celebration::new(),
            selected_option: 0,
            round: 0,
        }
    }

    pub fn state(&self) -> GameState {
        self.engine.state()
    }

    /// Current display text for a setup field
    pub fn field_value(&self, field: SetupField) -> String {
        if field == self.form.field() {
            if let Some(draft) = &self.form.draft {
                return draft.clone();
            }
        }

        let cfg = self.engine.config();
        match field {
            SetupField::MultiplicandMin => cfg.multiplicand_range.min.to_string(),
            SetupField::MultiplicandMax => cfg.multiplicand_range.max.to_string(),
            SetupField::MultiplierMin => cfg.multiplier_range.min.to_string(),
            SetupField::MultiplierMax => cfg.multiplier_range.max.to_string(),
            SetupField::ScoreLimit => cfg.score_limit.to_string(),
            SetupField::CorrectAnswerScore => cfg.correct_answer_score.to_string(),
            SetupField::IncorrectAnswerScore => cfg.incorrect_answer_score.to_string(),
            SetupField::UseTimer => on_off(cfg.use_timer).to_string(),
            SetupField::TimerDuration => cfg.timer_duration.to_string(),
            SetupField::AllowDuplicates => on_off(cfg.allow_duplicates).to_string(),
        }
    }

    /// Handle a key press. Returns true if the app should exit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return true;
        }

        match self.engine.state() {
            GameState::Setup => self.on_setup_key(key.code),
            GameState::Playing => self.on_playing_key(key.code),
            GameState::Finished => self.on_finished_key(key.code),
        }
        false
    }

    /// Advance timers and animations; `width`/`height` size the celebration.
    pub fn on_tick(&mut self, width: u16, height: u16) {
        let before = self.engine.state();
        self.engine.tick();
        self.sync_round();

        if before == GameState::Playing && self.engine.state() == GameState::Finished {
            self.celebration.start(width, height, &mut rand::thread_rng());
        }
        self.celebration.update();
    }

    pub fn start_game(&mut self) {
        self.form.draft = None;
        self.celebration.stop();
        self.engine.start_game();
        self.sync_round();
    }

    fn sync_round(&mut self) {
        let round = self.engine.previous_questions().len();
        if round != self.round {
            self.round = round;
            self.selected_option = 0;
        }
    }

    fn on_setup_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.start_game(),
            KeyCode::Up | KeyCode::Char('k') => self.form.select_previous(),
            KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => self.form.select_next(),
            KeyCode::Left => self.adjust_field(false),
            KeyCode::Right => self.adjust_field(true),
            KeyCode::Char(' ') => self.toggle_field(),
            KeyCode::Char(c) if c.is_ascii_digit() => self.type_into_field(Some(c)),
            KeyCode::Backspace => self.type_into_field(None),
            _ => {}
        }
    }

    fn on_playing_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                self.answer_option(idx);
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.answer_option(self.selected_option),
            KeyCode::Left | KeyCode::Up => {
                self.selected_option = (self.selected_option + OPTION_COUNT - 1) % OPTION_COUNT;
            }
            KeyCode::Right | KeyCode::Down => {
                self.selected_option = (self.selected_option + 1) % OPTION_COUNT;
            }
            KeyCode::Char('q') => self.engine.reset_game(),
            _ => {}
        }
    }

    fn on_finished_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter | KeyCode::Char('p') => {
                self.celebration.stop();
                self.engine.reset_game();
            }
            KeyCode::Char('r') => self.start_game(),
            _ => {}
        }
    }

    fn answer_option(&mut self, idx: usize) {
        let Some(&value) = self.engine.options().get(idx) else {
            return;
        };
        self.selected_option = idx;
        if let Some(outcome) = self.engine.answer(Some(value)) {
            debug!("answered {value}: {outcome:?}");
        }
    }

    fn toggle_field(&mut self) {
        match self.form.field() {
            SetupField::UseTimer => self.engine.toggle_use_timer(),
            SetupField::AllowDuplicates => self.engine.toggle_allow_duplicates(),
            _ => {}
        }
    }

    /// Append a digit to (or with `None`, delete the last character of) the
    /// selected field's text and feed it through the matching setter.
    fn type_into_field(&mut self, digit: Option<char>) {
        let field = self.form.field();
        if !field.is_typed() {
            return;
        }

        let mut text = self
            .form
            .draft
            .take()
            .unwrap_or_else(|| self.field_value(field));
        match digit {
            Some(c) => text.push(c),
            None => {
                text.pop();
            }
        }

        if let Some((operand, bound)) = field.operand_bound() {
            let value = self.engine.set_range_bound(operand, bound, &text);
            // keep what was typed unless it was clamped
            self.form.draft = Some(if text.is_empty() || value.to_string() == text {
                text
            } else {
                value.to_string()
            });
            return;
        }

        let edit = match field {
            SetupField::ScoreLimit => self.engine.set_score_limit(&text),
            SetupField::CorrectAnswerScore => self.engine.set_correct_answer_score(&text),
            _ => self.engine.set_incorrect_answer_score(&text),
        };
        if edit != FieldEdit::Rejected {
            self.form.draft = Some(text);
        }
    }

    fn adjust_field(&mut self, up: bool) {
        self.form.draft = None;
        let field = self.form.field();
        let cfg = self.engine.config().clone();

        let step = |value: u32, by: u32, min: u32, max: u32| -> u32 {
            if up {
                value.saturating_add(by).min(max)
            } else {
                value.saturating_sub(by).max(min)
            }
        };

        if let Some((operand, bound)) = field.operand_bound() {
            let range = cfg.range(operand);
            let current = match bound {
                RangeBound::Min => range.min,
                RangeBound::Max => range.max,
            };
            let next = step(current, 1, 0, MAX_OPERAND);
            self.engine
                .set_range_bound(operand, bound, &next.to_string());
            return;
        }

        match field {
            SetupField::ScoreLimit => {
                let next = step(cfg.score_limit, SCORE_LIMIT_STEP, MIN_SCORE_LIMIT, u32::MAX);
                self.engine.set_score_limit(&next.to_string());
            }
            SetupField::CorrectAnswerScore => {
                let next = step(cfg.correct_answer_score, 1, 0, u32::MAX);
                self.engine.set_correct_answer_score(&next.to_string());
            }
            SetupField::IncorrectAnswerScore => {
                let next = step(cfg.incorrect_answer_score, 1, 0, u32::MAX);
                self.engine.set_incorrect_answer_score(&next.to_string());
            }
            SetupField::TimerDuration => {
                let next = step(cfg.timer_duration, 1, MIN_TIMER_SECS, MAX_TIMER_SECS);
                self.engine.set_timer_duration(next);
            }
            SetupField::UseTimer | SetupField::AllowDuplicates => self.toggle_field(),
            _ => {}
        }
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OperandRange, QuizConfig};
    use crate::runtime::ManualClock;
    use crate::store::MemorySettingsStore;
    use rand::{rngs::StdRng, SeedableRng};
    use std::time::Duration;

    fn test_app(cfg: QuizConfig) -> (App<MemorySettingsStore, ManualClock>, ManualClock) {
        let store = MemorySettingsStore::new();
        cfg.save(&store).unwrap();
        let clock = ManualClock::new();
        let engine = QuizEngine::with_parts(store, clock.clone(), StdRng::seed_from_u64(3));
        (App::new(engine, DifficultySelection::default()), clock)
    }

    fn press(app: &mut App<MemorySettingsStore, ManualClock>, code: KeyCode) -> bool {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn select(app: &mut App<MemorySettingsStore, ManualClock>, field: SetupField) {
        while app.form.field() != field {
            press(app, KeyCode::Down);
        }
    }

    #[test]
    fn escape_and_ctrl_c_quit() {
        let (mut app, _) = test_app(QuizConfig::default());
        assert!(press(&mut app, KeyCode::Esc));
        assert!(app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!press(&mut app, KeyCode::Char('x')));
    }

    #[test]
    fn form_navigation_wraps() {
        let (mut app, _) = test_app(QuizConfig::default());
        assert_eq!(app.form.field(), SetupField::MultiplicandMin);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.form.field(), SetupField::AllowDuplicates);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.form.field(), SetupField::MultiplicandMin);
    }

    #[test]
    fn typing_digits_updates_range() {
        let (mut app, _) = test_app(QuizConfig::default());
        select(&mut app, SetupField::MultiplicandMax);

        // "10" + '2' clamps to the largest operand
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.engine.config().multiplicand_range.max, MAX_OPERAND);
        assert_eq!(app.field_value(SetupField::MultiplicandMax), "100");

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.engine.config().multiplicand_range.max, 1);

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.engine.config().multiplicand_range.max, 0);
        assert_eq!(app.field_value(SetupField::MultiplicandMax), "");
    }

    #[test]
    fn clearing_score_field_keeps_stored_value() {
        let (mut app, _) = test_app(QuizConfig::default());
        select(&mut app, SetupField::ScoreLimit);

        for _ in 0..3 {
            press(&mut app, KeyCode::Backspace);
        }
        assert_eq!(app.field_value(SetupField::ScoreLimit), "");
        assert_eq!(app.engine.config().score_limit, 1);

        press(&mut app, KeyCode::Char('5'));
        press(&mut app, KeyCode::Char('0'));
        assert_eq!(app.engine.config().score_limit, 50);
        assert_eq!(app.field_value(SetupField::ScoreLimit), "50");
    }

    #[test]
    fn arrows_adjust_within_bounds() {
        let (mut app, _) = test_app(QuizConfig::default());

        select(&mut app, SetupField::ScoreLimit);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.engine.config().score_limit, 110);
        for _ in 0..20 {
            press(&mut app, KeyCode::Left);
        }
        assert_eq!(app.engine.config().score_limit, MIN_SCORE_LIMIT);

        select(&mut app, SetupField::TimerDuration);
        for _ in 0..40 {
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.engine.config().timer_duration, MAX_TIMER_SECS);

        select(&mut app, SetupField::MultiplierMin);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.engine.config().multiplier_range, OperandRange::new(0, 10));
    }

    #[test]
    fn space_toggles_flags() {
        let (mut app, _) = test_app(QuizConfig::default());
        select(&mut app, SetupField::UseTimer);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.engine.config().use_timer);
        assert_eq!(app.field_value(SetupField::UseTimer), "ON");

        select(&mut app, SetupField::AllowDuplicates);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.engine.config().allow_duplicates);
    }

    #[test]
    fn number_keys_answer_options() {
        let (mut app, clock) = test_app(QuizConfig::default());
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state(), GameState::Playing);

        let answer = app.engine.current_question().unwrap().correct_answer;
        let idx = app.engine.options().iter().position(|&o| o == answer).unwrap();
        let key = char::from_digit(idx as u32 + 1, 10).unwrap();
        press(&mut app, KeyCode::Char(key));

        assert_eq!(app.engine.score(), 10);
        assert_eq!(app.selected_option, idx);

        clock.advance(Duration::from_millis(1500));
        app.on_tick(80, 24);
        assert_eq!(app.selected_option, 0);
        assert!(app.engine.feedback().is_none());
    }

    #[test]
    fn finishing_starts_celebration_and_play_again_returns_to_setup() {
        let cfg = QuizConfig {
            score_limit: 10,
            ..QuizConfig::default()
        };
        let (mut app, clock) = test_app(cfg);
        press(&mut app, KeyCode::Enter);

        let answer = app.engine.current_question().unwrap().correct_answer;
        let idx = app.engine.options().iter().position(|&o| o == answer).unwrap();
        app.selected_option = idx;
        press(&mut app, KeyCode::Enter);

        clock.advance(Duration::from_millis(1500));
        app.on_tick(80, 24);

        assert_eq!(app.state(), GameState::Finished);
        assert!(app.celebration.is_active());

        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.state(), GameState::Setup);
        assert!(!app.celebration.is_active());
        assert_eq!(app.engine.history().len(), 1);
    }

    #[test]
    fn quitting_a_game_returns_to_setup() {
        let (mut app, _) = test_app(QuizConfig::default());
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.state(), GameState::Setup);
        assert!(app.engine.history().is_empty());
    }
}
