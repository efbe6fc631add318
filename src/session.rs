use std::time::Instant;

use crate::question_generator::{OperandPair, Options, Question};

/// Lifecycle of one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum GameState {
    Setup,
    Playing,
    Finished,
}

/// What the player sees right after answering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub is_correct: bool,
    pub message: String,
    pub question_text: String,
}

impl Feedback {
    pub fn for_answer(question: &Question, is_correct: bool) -> Self {
        let message = if is_correct {
            "Correct!".to_string()
        } else {
            format!("Oops! The answer is {}", question.correct_answer)
        };

        Self {
            is_correct,
            message,
            question_text: question.text(),
        }
    }
}

/// In-memory state of the game being played. Never persisted.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub state: GameState,
    pub score: u32,
    pub final_score: u32,
    pub time_left: u32,
    pub feedback: Option<Feedback>,
    pub started_at: Option<Instant>,
    pub total_time_taken: u64,
    pub current_question: Option<Question>,
    pub options: Vec<u32>,
    pub previous_questions: Vec<OperandPair>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            state: GameState::Setup,
            score: 0,
            final_score: 0,
            time_left: 0,
            feedback: None,
            started_at: None,
            total_time_taken: 0,
            current_question: None,
            options: Vec::new(),
            previous_questions: Vec::new(),
        }
    }
}

impl GameSession {
    pub fn set_round(&mut self, question: Question, options: Options) {
        self.current_question = Some(question);
        self.options = options.to_vec();
        self.feedback = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_in_setup() {
        let session = GameSession::default();
        assert_eq!(session.state, GameState::Setup);
        assert!(session.current_question.is_none());
        assert!(session.previous_questions.is_empty());
    }

    #[test]
    fn feedback_messages() {
        let q = Question::new(6, 7);
        let right = Feedback::for_answer(&q, true);
        assert_eq!(right.message, "Correct!");
        assert_eq!(right.question_text, "6 × 7");

        let wrong = Feedback::for_answer(&q, false);
        assert_eq!(wrong.message, "Oops! The answer is 42");
        assert!(!wrong.is_correct);
    }

    #[test]
    fn game_state_display() {
        assert_eq!(GameState::Playing.to_string(), "playing");
        assert_eq!(GameState::Finished.to_string(), "finished");
    }
}
