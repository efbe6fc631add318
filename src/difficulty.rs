use std::str::FromStr;

use crate::config::parse_leading_int;

pub const DIFFICULTY_LEVELS: std::ops::RangeInclusive<u8> = 1..=5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum DifficultyGroup {
    #[default]
    Easy,
    Medium,
    Hard,
    Expert,
    God,
}

impl DifficultyGroup {
    pub const ALL: [DifficultyGroup; 5] = [
        DifficultyGroup::Easy,
        DifficultyGroup::Medium,
        DifficultyGroup::Hard,
        DifficultyGroup::Expert,
        DifficultyGroup::God,
    ];
}

impl FromStr for DifficultyGroup {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|g| g.to_string() == lower)
            .ok_or(())
    }
}

/// A validated difficulty choice plus which inputs had to be replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultySelection {
    pub group: DifficultyGroup,
    pub level: u8,
    pub invalid_group: bool,
    pub invalid_level: bool,
}

impl DifficultySelection {
    pub fn has_notice(&self) -> bool {
        self.invalid_group || self.invalid_level
    }

    /// Non-blocking message shown when an input was replaced with a default
    pub fn notice(&self) -> Option<String> {
        match (self.invalid_group, self.invalid_level) {
            (false, false) => None,
            (true, false) => Some(format!("Unknown difficulty group, using '{}'", self.group)),
            (false, true) => Some(format!("Unknown difficulty level, using {}", self.level)),
            (true, true) => Some(format!(
                "Unknown difficulty, using '{}' level {}",
                self.group, self.level
            )),
        }
    }
}

impl Default for DifficultySelection {
    fn default() -> Self {
        Self {
            group: DifficultyGroup::default(),
            level: *DIFFICULTY_LEVELS.start(),
            invalid_group: false,
            invalid_level: false,
        }
    }
}

/// Validate raw group and level inputs. A missing input counts as invalid.
pub fn validate(group: Option<&str>, level: Option<&str>) -> DifficultySelection {
    let parsed_group = group.and_then(|g| g.parse::<DifficultyGroup>().ok());
    let parsed_level = level
        .and_then(parse_leading_int)
        .and_then(|l| u8::try_from(l).ok())
        .filter(|l| DIFFICULTY_LEVELS.contains(l));

    DifficultySelection {
        group: parsed_group.unwrap_or_default(),
        level: parsed_level.unwrap_or(*DIFFICULTY_LEVELS.start()),
        invalid_group: parsed_group.is_none(),
        invalid_level: parsed_level.is_none(),
    }
}
