use serde::{Deserialize, Serialize};

use crate::store::{self, SettingsStore, StoreError};

pub const MULTIPLICAND_RANGE_KEY: &str = "multiplicandRange";
pub const MULTIPLIER_RANGE_KEY: &str = "multiplierRange";
pub const SCORE_LIMIT_KEY: &str = "scoreLimit";
pub const USE_TIMER_KEY: &str = "useTimer";
pub const TIMER_DURATION_KEY: &str = "timerDuration";
pub const ALLOW_DUPLICATES_KEY: &str = "allowDuplicates";
pub const CORRECT_ANSWER_SCORE_KEY: &str = "correctAnswerScore";
pub const INCORRECT_ANSWER_SCORE_KEY: &str = "incorrectAnswerScore";

/// Largest operand the setup form offers
pub const MAX_OPERAND: u32 = 100;
pub const MIN_SCORE_LIMIT: u32 = 10;
pub const MIN_TIMER_SECS: u32 = 5;
pub const MAX_TIMER_SECS: u32 = 30;

/// Inclusive operand range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperandRange {
    pub min: u32,
    pub max: u32,
}

impl OperandRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn label(&self) -> String {
        format!("{}-{}", self.min, self.max)
    }

    pub fn contains(&self, value: u32) -> bool {
        self.min <= value && value <= self.max
    }

    /// Both bounds pulled into `0..=MAX_OPERAND`
    pub fn clamped(self) -> Self {
        Self::new(self.min.min(MAX_OPERAND), self.max.min(MAX_OPERAND))
    }

    pub fn with_bound(self, bound: RangeBound, value: u32) -> Self {
        match bound {
            RangeBound::Min => Self { min: value, ..self },
            RangeBound::Max => Self { max: value, ..self },
        }
    }
}

impl Default for OperandRange {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Operand {
    Multiplicand,
    Multiplier,
}

impl Operand {
    pub fn key(&self) -> &'static str {
        match self {
            Operand::Multiplicand => MULTIPLICAND_RANGE_KEY,
            Operand::Multiplier => MULTIPLIER_RANGE_KEY,
        }
    }
}

/// Persisted quiz configuration. Each field lives under its own store key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    pub multiplicand_range: OperandRange,
    pub multiplier_range: OperandRange,
    pub score_limit: u32,
    pub use_timer: bool,
    pub timer_duration: u32,
    pub allow_duplicates: bool,
    pub correct_answer_score: u32,
    pub incorrect_answer_score: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            multiplicand_range: OperandRange::default(),
            multiplier_range: OperandRange::default(),
            score_limit: 100,
            use_timer: false,
            timer_duration: 10,
            allow_duplicates: true,
            correct_answer_score: 10,
            incorrect_answer_score: 1,
        }
    }
}

impl QuizConfig {
    /// Read every key independently; a missing or unreadable key keeps its default.
    pub fn load<S: SettingsStore + ?Sized>(store: &S) -> Self {
        let d = Self::default();
        Self {
            multiplicand_range: store::load(store, MULTIPLICAND_RANGE_KEY, d.multiplicand_range)
                .clamped(),
            multiplier_range: store::load(store, MULTIPLIER_RANGE_KEY, d.multiplier_range)
                .clamped(),
            score_limit: store::load(store, SCORE_LIMIT_KEY, d.score_limit),
            use_timer: store::load(store, USE_TIMER_KEY, d.use_timer),
            timer_duration: store::load(store, TIMER_DURATION_KEY, d.timer_duration),
            allow_duplicates: store::load(store, ALLOW_DUPLICATES_KEY, d.allow_duplicates),
            correct_answer_score: store::load(
                store,
                CORRECT_ANSWER_SCORE_KEY,
                d.correct_answer_score,
            ),
            incorrect_answer_score: store::load(
                store,
                INCORRECT_ANSWER_SCORE_KEY,
                d.incorrect_answer_score,
            ),
        }
    }

    pub fn save<S: SettingsStore + ?Sized>(&self, store: &S) -> Result<(), StoreError> {
        store::save(store, MULTIPLICAND_RANGE_KEY, &self.multiplicand_range)?;
        store::save(store, MULTIPLIER_RANGE_KEY, &self.multiplier_range)?;
        store::save(store, SCORE_LIMIT_KEY, &self.score_limit)?;
        store::save(store, USE_TIMER_KEY, &self.use_timer)?;
        store::save(store, TIMER_DURATION_KEY, &self.timer_duration)?;
        store::save(store, ALLOW_DUPLICATES_KEY, &self.allow_duplicates)?;
        store::save(store, CORRECT_ANSWER_SCORE_KEY, &self.correct_answer_score)?;
        store::save(store, INCORRECT_ANSWER_SCORE_KEY, &self.incorrect_answer_score)
    }

    pub fn range(&self, operand: Operand) -> OperandRange {
        match operand {
            Operand::Multiplicand => self.multiplicand_range,
            Operand::Multiplier => self.multiplier_range,
        }
    }

    pub fn range_mut(&mut self, operand: Operand) -> &mut OperandRange {
        match operand {
            Operand::Multiplicand => &mut self.multiplicand_range,
            Operand::Multiplier => &mut self.multiplier_range,
        }
    }

    /// Both ranges as shown in the game history, e.g. "1-10 × 2-12"
    pub fn ranges_label(&self) -> String {
        format!(
            "{} × {}",
            self.multiplicand_range.label(),
            self.multiplier_range.label()
        )
    }
}

/// Result of feeding raw form text into a numeric setter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEdit {
    /// The field now holds this value.
    Set(u32),
    /// Empty input while the user edits the field; the stored value is kept.
    Blank,
    /// Non-numeric input; ignored.
    Rejected,
}

/// Parse the leading integer of `raw` the way form controls do: leading
/// whitespace and an optional sign, then digits up to the first non-digit.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

/// Operand bound input: anything non-numeric becomes 0, and the result is
/// kept inside `0..=MAX_OPERAND`.
pub fn coerce_operand_input(raw: &str) -> u32 {
    parse_leading_int(raw)
        .map(|v| v.clamp(0, MAX_OPERAND as i64) as u32)
        .unwrap_or(0)
}

pub fn parse_score_input(raw: &str) -> FieldEdit {
    if raw.is_empty() {
        return FieldEdit::Blank;
    }

    match parse_leading_int(raw) {
        Some(v) => FieldEdit::Set(v.clamp(0, u32::MAX as i64) as u32),
        None => FieldEdit::Rejected,
    }
}
