use chrono::Local;
use itertools::Itertools;
use log::{debug, info, warn};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::config::{
    self, coerce_operand_input, parse_score_input, FieldEdit, Operand, OperandRange, QuizConfig,
    RangeBound,
};
use crate::history::{GameHistory, GameHistoryEntry};
use crate::question_generator::{OperandPair, Question, QuestionGenerator};
use crate::runtime::{Clock, SystemClock};
use crate::session::{Feedback, GameSession, GameState};
use crate::store::{self, SettingsStore};

/// How long feedback stays up before the next round (or the end of the game)
pub const FEEDBACK_DELAY: Duration = Duration::from_millis(1500);
const ONE_SECOND: Duration = Duration::from_secs(1);

/// Armed per-question countdown. Whoever takes it ends the round.
#[derive(Debug, Clone, Copy)]
struct Countdown {
    next_decrement_at: Instant,
}

/// Deferred decision after an answered round
#[derive(Debug, Clone, Copy)]
struct PendingAdvance {
    due_at: Instant,
    new_score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub points: u32,
    pub new_score: u32,
}

/// The multiplication quiz: configuration, game lifecycle, scoring and history
pub struct QuizEngine<S: SettingsStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    rng: StdRng,
    config: QuizConfig,
    history: GameHistory,
    session: GameSession,
    countdown: Option<Countdown>,
    pending: Option<PendingAdvance>,
}

impl<S: SettingsStore> QuizEngine<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_parts(store, SystemClock, StdRng::from_entropy())
    }
}

impl<S: SettingsStore, C: Clock> QuizEngine<S, C> {
    pub fn with_parts(store: S, clock: C, rng: StdRng) -> Self {
        let config = QuizConfig::load(&store);
        let history = GameHistory::load(&store);
        debug!(
            "loaded config {:?} and {} history entries",
            config,
            history.len()
        );

        Self {
            store,
            clock,
            rng,
            config,
            history,
            session: GameSession::default(),
            countdown: None,
            pending: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.session.state
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn final_score(&self) -> u32 {
        self.session.final_score
    }

    pub fn time_left(&self) -> u32 {
        self.session.time_left
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.session.feedback.as_ref()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question.as_ref()
    }

    pub fn options(&self) -> &[u32] {
        &self.session.options
    }

    pub fn previous_questions(&self) -> &[OperandPair] {
        &self.session.previous_questions
    }

    /// Duration of the last finished game in whole seconds
    pub fn total_time_taken(&self) -> u64 {
        self.session.total_time_taken
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn history(&self) -> &GameHistory {
        &self.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_timer_running(&self) -> bool {
        self.countdown.is_some()
    }

    /// True while feedback for an answered round is on screen
    pub fn is_showing_feedback(&self) -> bool {
        self.pending.is_some()
    }

    pub fn start_game(&mut self) {
        self.countdown = None;
        self.pending = None;
        self.session = GameSession {
            state: GameState::Playing,
            started_at: Some(self.clock.now()),
            ..GameSession::default()
        };
        info!(
            "starting game: {} to {} points",
            self.config.ranges_label(),
            self.config.score_limit
        );
        self.next_round();
    }

    /// Submit an answer for the current round. `None` means no answer was
    /// given and always scores as incorrect.
    pub fn answer(&mut self, selected: Option<u32>) -> Option<AnswerOutcome> {
        self.countdown = None;

        if self.session.state != GameState::Playing || self.pending.is_some() {
            return None;
        }
        let question = self.session.current_question?;

        Some(self.score_round(question, selected))
    }

    /// Advance timers. Call regularly while the game is running.
    pub fn tick(&mut self) {
        let now = self.clock.now();

        if let Some(mut countdown) = self.countdown {
            while self.session.time_left > 0 && now >= countdown.next_decrement_at {
                self.session.time_left -= 1;
                countdown.next_decrement_at += ONE_SECOND;
            }

            if self.session.time_left == 0 {
                self.countdown = None;
                if let Some(question) = self.session.current_question {
                    debug!("time is up for {}", question.text());
                    self.score_round(question, None);
                }
            } else {
                self.countdown = Some(countdown);
            }
        }

        if let Some(pending) = self.pending {
            if now >= pending.due_at {
                self.pending = None;
                self.advance(pending.new_score);
            }
        }
    }

    /// Back to setup. Drops the session along with any running countdown or
    /// pending round advance; configuration and history are kept.
    pub fn reset_game(&mut self) {
        self.countdown = None;
        self.pending = None;
        self.session = GameSession::default();
    }

    fn next_round(&mut self) {
        self.countdown = None;

        let generator = QuestionGenerator::from_config(&self.config);
        let (question, options) =
            generator.generate(&mut self.rng, &mut self.session.previous_questions);
        debug!(
            "round {}: {} options [{}]",
            self.session.previous_questions.len(),
            question.text(),
            options.iter().join(", ")
        );
        self.session.set_round(question, options);

        if self.config.use_timer {
            self.session.time_left = self.config.timer_duration;
            self.countdown = Some(Countdown {
                next_decrement_at: self.clock.now() + ONE_SECOND,
            });
        }
    }

    fn score_round(&mut self, question: Question, selected: Option<u32>) -> AnswerOutcome {
        let is_correct = selected == Some(question.correct_answer);
        let points = if is_correct {
            self.config.correct_answer_score
        } else {
            self.config.incorrect_answer_score
        };
        let new_score = self.session.score.saturating_add(points);

        self.session.score = new_score;
        self.session.feedback = Some(Feedback::for_answer(&question, is_correct));
        self.pending = Some(PendingAdvance {
            due_at: self.clock.now() + FEEDBACK_DELAY,
            new_score,
        });

        AnswerOutcome {
            is_correct,
            points,
            new_score,
        }
    }

    fn advance(&mut self, new_score: u32) {
        if self.session.state != GameState::Playing {
            return;
        }

        if new_score >= self.config.score_limit {
            self.end_game(new_score);
        } else {
            self.next_round();
        }
    }

    fn end_game(&mut self, final_score: u32) {
        let elapsed = self
            .session
            .started_at
            .map(|started| self.clock.now().duration_since(started).as_secs())
            .unwrap_or(0);

        self.countdown = None;
        self.session.total_time_taken = elapsed;
        self.session.final_score = final_score;
        self.session.current_question = None;
        self.session.options.clear();
        self.session.feedback = None;
        self.session.state = GameState::Finished;

        self.history.record(GameHistoryEntry::new(
            final_score,
            elapsed,
            self.config.ranges_label(),
            Local::now(),
        ));
        if let Err(e) = self.history.save(&self.store) {
            warn!("failed to save game history: {e}");
        }

        info!("game finished with {final_score} points in {elapsed}s");
    }

    fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = store::save(&self.store, key, value) {
            warn!("failed to save '{key}': {e}");
        }
    }

    pub fn set_range(&mut self, operand: Operand, range: OperandRange) {
        *self.config.range_mut(operand) = range;
        self.persist(operand.key(), &range);
    }

    /// Set one bound of an operand range from raw input; non-numeric input becomes 0.
    pub fn set_range_bound(&mut self, operand: Operand, bound: RangeBound, raw: &str) -> u32 {
        let value = coerce_operand_input(raw);
        let range = self.config.range(operand).with_bound(bound, value);
        self.set_range(operand, range);
        value
    }

    pub fn set_multiplicand_min(&mut self, raw: &str) -> u32 {
        self.set_range_bound(Operand::Multiplicand, RangeBound::Min, raw)
    }

    pub fn set_multiplicand_max(&mut self, raw: &str) -> u32 {
        self.set_range_bound(Operand::Multiplicand, RangeBound::Max, raw)
    }

    pub fn set_multiplier_min(&mut self, raw: &str) -> u32 {
        self.set_range_bound(Operand::Multiplier, RangeBound::Min, raw)
    }

    pub fn set_multiplier_max(&mut self, raw: &str) -> u32 {
        self.set_range_bound(Operand::Multiplier, RangeBound::Max, raw)
    }

    pub fn set_score_limit(&mut self, raw: &str) -> FieldEdit {
        self.edit_score(raw, config::SCORE_LIMIT_KEY, |c| &mut c.score_limit)
    }

    pub fn set_correct_answer_score(&mut self, raw: &str) -> FieldEdit {
        self.edit_score(raw, config::CORRECT_ANSWER_SCORE_KEY, |c| {
            &mut c.correct_answer_score
        })
    }

    pub fn set_incorrect_answer_score(&mut self, raw: &str) -> FieldEdit {
        self.edit_score(raw, config::INCORRECT_ANSWER_SCORE_KEY, |c| {
            &mut c.incorrect_answer_score
        })
    }

    fn edit_score(
        &mut self,
        raw: &str,
        key: &str,
        field: fn(&mut QuizConfig) -> &mut u32,
    ) -> FieldEdit {
        let edit = parse_score_input(raw);
        if let FieldEdit::Set(value) = edit {
            *field(&mut self.config) = value;
            self.persist(key, &value);
        }
        edit
    }

    pub fn set_timer_duration(&mut self, secs: u32) {
        self.config.timer_duration = secs;
        self.persist(config::TIMER_DURATION_KEY, &secs);
    }

    pub fn set_use_timer(&mut self, use_timer: bool) {
        self.config.use_timer = use_timer;
        self.persist(config::USE_TIMER_KEY, &use_timer);
    }

    pub fn toggle_use_timer(&mut self) {
        self.set_use_timer(!self.config.use_timer);
    }

    pub fn set_allow_duplicates(&mut self, allow: bool) {
        self.config.allow_duplicates = allow;
        self.persist(config::ALLOW_DUPLICATES_KEY, &allow);
    }

    pub fn toggle_allow_duplicates(&mut self) {
        self.set_allow_duplicates(!self.config.allow_duplicates);
    }
}
