use log::debug;
use rand::{seq::SliceRandom, Rng};

use crate::config::{OperandRange, QuizConfig};

/// Draws per question before a duplicate pair is accepted anyway
pub const MAX_DRAW_ATTEMPTS: usize = 20;
pub const OPTION_COUNT: usize = 4;
const DISTRACTOR_COUNT: usize = OPTION_COUNT - 1;

/// Distractor offsets are drawn from `DISTRACTOR_OFFSET_LOW..DISTRACTOR_OFFSET_HIGH`,
/// i.e. -5 through 4.
const DISTRACTOR_OFFSET_LOW: i64 = -5;
const DISTRACTOR_OFFSET_HIGH: i64 = 5;

/// Shuffled answer choices, one of which is the correct answer
pub type Options = [u32; OPTION_COUNT];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperandPair {
    pub multiplicand: u32,
    pub multiplier: u32,
}

impl OperandPair {
    pub fn new(multiplicand: u32, multiplier: u32) -> Self {
        Self {
            multiplicand,
            multiplier,
        }
    }

    /// Order-insensitive comparison: 3 × 4 and 4 × 3 are the same question.
    pub fn same_operands(&self, other: &OperandPair) -> bool {
        (self.multiplicand == other.multiplicand && self.multiplier == other.multiplier)
            || (self.multiplicand == other.multiplier && self.multiplier == other.multiplicand)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub multiplicand: u32,
    pub multiplier: u32,
    pub correct_answer: u32,
}

impl Question {
    pub fn new(multiplicand: u32, multiplier: u32) -> Self {
        Self {
            multiplicand,
            multiplier,
            correct_answer: multiplicand * multiplier,
        }
    }

    pub fn pair(&self) -> OperandPair {
        OperandPair::new(self.multiplicand, self.multiplier)
    }

    pub fn text(&self) -> String {
        format!("{} × {}", self.multiplicand, self.multiplier)
    }
}

/// Produces questions and answer options for one game's configuration
#[derive(Debug, Clone)]
pub struct QuestionGenerator {
    pub multiplicand_range: OperandRange,
    pub multiplier_range: OperandRange,
    pub allow_duplicates: bool,
}

impl QuestionGenerator {
    pub fn new(
        multiplicand_range: OperandRange,
        multiplier_range: OperandRange,
        allow_duplicates: bool,
    ) -> Self {
        Self {
            multiplicand_range,
            multiplier_range,
            allow_duplicates,
        }
    }

    pub fn from_config(config: &QuizConfig) -> Self {
        Self::new(
            config.multiplicand_range,
            config.multiplier_range,
            config.allow_duplicates,
        )
    }

    /// Generate the next question and its shuffled options, recording the
    /// operand pair in `previous`.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        previous: &mut Vec<OperandPair>,
    ) -> (Question, Options) {
        let pair = self.draw_pair(rng, previous);
        let question = Question::new(pair.multiplicand, pair.multiplier);
        previous.push(pair);

        let distractors = distractors(rng, question.correct_answer);
        let mut options = [
            question.correct_answer,
            distractors[0],
            distractors[1],
            distractors[2],
        ];
        options.shuffle(rng);

        (question, options)
    }

    fn draw_pair<R: Rng + ?Sized>(&self, rng: &mut R, previous: &[OperandPair]) -> OperandPair {
        let mut attempts = 0;
        loop {
            let pair = OperandPair::new(
                draw(rng, self.multiplicand_range),
                draw(rng, self.multiplier_range),
            );
            attempts += 1;

            let is_duplicate =
                !self.allow_duplicates && previous.iter().any(|p| p.same_operands(&pair));
            if !is_duplicate {
                return pair;
            }
            if attempts >= MAX_DRAW_ATTEMPTS {
                debug!(
                    "no fresh pair after {attempts} draws, repeating {} × {}",
                    pair.multiplicand, pair.multiplier
                );
                return pair;
            }
        }
    }
}

/// Uniform draw from an inclusive range. An inverted range collapses to its minimum.
fn draw<R: Rng + ?Sized>(rng: &mut R, range: OperandRange) -> u32 {
    if range.min >= range.max {
        range.min
    } else {
        rng.gen_range(range.min..=range.max)
    }
}

/// Three distinct positive wrong answers close to `correct_answer`.
pub fn distractors<R: Rng + ?Sized>(rng: &mut R, correct_answer: u32) -> [u32; DISTRACTOR_COUNT] {
    let correct = correct_answer as i64;
    let mut chosen: Vec<u32> = Vec::with_capacity(DISTRACTOR_COUNT);

    // Always terminates: at least four positive non-answer candidates are in reach.
    while chosen.len() < DISTRACTOR_COUNT {
        let candidate = correct + rng.gen_range(DISTRACTOR_OFFSET_LOW..DISTRACTOR_OFFSET_HIGH);
        if candidate > 0 && candidate != correct && !chosen.contains(&(candidate as u32)) {
            chosen.push(candidate as u32);
        }
    }

    [chosen[0], chosen[1], chosen[2]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rand::{rngs::StdRng, SeedableRng};

    fn generator(min: u32, max: u32, allow_duplicates: bool) -> QuestionGenerator {
        QuestionGenerator::new(
            OperandRange::new(min, max),
            OperandRange::new(min, max),
            allow_duplicates,
        )
    }

    #[test]
    fn question_answer_is_product() {
        let q = Question::new(7, 8);
        assert_eq!(q.correct_answer, 56);
        assert_eq!(q.text(), "7 × 8");
    }

    #[test]
    fn pairs_match_regardless_of_order() {
        let a = OperandPair::new(3, 4);
        assert!(a.same_operands(&OperandPair::new(4, 3)));
        assert!(a.same_operands(&OperandPair::new(3, 4)));
        assert!(!a.same_operands(&OperandPair::new(3, 5)));
    }

    #[test]
    fn operands_stay_inside_their_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let gen = QuestionGenerator::new(OperandRange::new(2, 5), OperandRange::new(11, 12), true);
        let mut previous = Vec::new();

        for _ in 0..200 {
            let (q, _) = gen.generate(&mut rng, &mut previous);
            assert!((2..=5).contains(&q.multiplicand));
            assert!((11..=12).contains(&q.multiplier));
        }
        assert_eq!(previous.len(), 200);
    }

    #[test]
    fn options_are_four_distinct_positive_values_with_answer() {
        let mut rng = StdRng::seed_from_u64(42);
        let gen = generator(1, 12, true);
        let mut previous = Vec::new();

        for _ in 0..500 {
            let (q, options) = gen.generate(&mut rng, &mut previous);
            assert_eq!(options.len(), OPTION_COUNT);
            assert!(options.iter().all_unique());
            assert!(options.iter().all(|&o| o > 0));
            assert!(options.contains(&q.correct_answer));
        }
    }

    #[test]
    fn zero_answer_still_gets_three_positive_distractors() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let d = distractors(&mut rng, 0);
            assert!(d.iter().all(|&v| (1..=4).contains(&v)));
            assert!(d.iter().all_unique());
        }
    }

    #[test]
    fn distractors_stay_near_answer() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let d = distractors(&mut rng, 30);
            assert!(d.iter().all(|&v| (25..=34).contains(&v) && v != 30));
        }
    }

    #[test]
    fn correct_answer_position_varies() {
        let mut rng = StdRng::seed_from_u64(99);
        let gen = generator(2, 9, true);
        let mut positions = [0usize; OPTION_COUNT];

        for _ in 0..400 {
            let mut previous = Vec::new();
            let (q, options) = gen.generate(&mut rng, &mut previous);
            let idx = options.iter().position(|&o| o == q.correct_answer).unwrap();
            positions[idx] += 1;
        }
        assert!(positions.iter().all(|&n| n > 0), "positions: {positions:?}");
    }

    #[test]
    fn no_duplicate_pairs_while_plenty_remain() {
        let mut rng = StdRng::seed_from_u64(5);
        let gen = generator(1, 10, false);
        let mut previous = Vec::new();

        for _ in 0..10 {
            gen.generate(&mut rng, &mut previous);
        }

        for (i, a) in previous.iter().enumerate() {
            for b in &previous[i + 1..] {
                assert!(!a.same_operands(b), "{a:?} repeated as {b:?}");
            }
        }
    }

    #[test]
    fn exhausted_range_falls_back_to_duplicate() {
        let mut rng = StdRng::seed_from_u64(1);
        let gen = generator(1, 3, false);
        // every unordered pair from 1..=3 has been asked already
        let mut previous: Vec<OperandPair> = (1..=3)
            .flat_map(|a| (a..=3).map(move |b| OperandPair::new(a, b)))
            .collect();
        assert_eq!(previous.len(), 6);

        let (q, _) = gen.generate(&mut rng, &mut previous);

        assert_eq!(previous.len(), 7);
        assert!(previous[..6].iter().any(|p| p.same_operands(&q.pair())));
    }

    #[test]
    fn single_value_range_terminates() {
        let mut rng = StdRng::seed_from_u64(8);
        let gen = generator(4, 4, false);
        let mut previous = Vec::new();

        for _ in 0..3 {
            let (q, _) = gen.generate(&mut rng, &mut previous);
            assert_eq!(q.correct_answer, 16);
        }
        assert_eq!(previous.len(), 3);
    }

    #[test]
    fn inverted_range_collapses_to_min() {
        let mut rng = StdRng::seed_from_u64(2);
        let gen = QuestionGenerator::new(OperandRange::new(9, 3), OperandRange::new(2, 2), true);
        let (q, _) = gen.generate(&mut rng, &mut Vec::new());
        assert_eq!(q.pair(), OperandPair::new(9, 2));
    }
}
