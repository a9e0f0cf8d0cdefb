use alloc::string::String;
use alloc::vec::Vec;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::*;

pub const PREFERENCES_KEY: &str = "minefield.preferences";
pub const HIGH_SCORES_KEY: &str = "minefield.high-scores";

/// Entries kept per difficulty.
pub const HIGH_SCORE_LIMIT: usize = 10;

pub const CUSTOM_ROWS: (Coord, Coord) = (5, 30);
pub const CUSTOM_COLS: (Coord, Coord) = (5, 50);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Expert,
    Custom(BoardConfig),
}

impl Difficulty {
    /// Custom board clamped to the supported range, always leaving room for a safe first click.
    pub fn custom(size: Coord2, mines: CellCount) -> Self {
        Self::Custom(clamp_custom(size, mines))
    }

    pub fn config(self) -> BoardConfig {
        match self {
            Self::Beginner => BoardConfig::new_unchecked((9, 9), 10),
            Self::Intermediate => BoardConfig::new_unchecked((16, 16), 40),
            Self::Expert => BoardConfig::new_unchecked((16, 30), 99),
            // stored records may carry out-of-range values
            Self::Custom(config) => clamp_custom(config.size, config.mines),
        }
    }

    pub const fn is_custom(self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

fn clamp_custom((rows, cols): Coord2, mines: CellCount) -> BoardConfig {
    let rows = rows.clamp(CUSTOM_ROWS.0, CUSTOM_ROWS.1);
    let cols = cols.clamp(CUSTOM_COLS.0, CUSTOM_COLS.1);
    // worst case: a first click away from the edges
    let mines = mines.clamp(1, eligible_cell_count((rows, cols), (1, 1)));
    BoardConfig::new_unchecked((rows, cols), mines)
}

/// JSON record persisted by the caller under a fixed key.
///
/// Reading never fails: absent or unreadable data yields the default record.
pub trait StoredRecord: Serialize + DeserializeOwned + Default {
    const KEY: &'static str;

    fn load_or_default(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            log::debug!("No stored {}, using defaults", Self::KEY);
            return Self::default();
        };
        serde_json::from_str(raw).unwrap_or_else(|err| {
            log::warn!("Unreadable {}, using defaults: {}", Self::KEY, err);
            Self::default()
        })
    }

    fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub difficulty: Difficulty,
    pub questions_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Beginner,
            questions_enabled: true,
        }
    }
}

impl StoredRecord for Preferences {
    const KEY: &'static str = PREFERENCES_KEY;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub seconds: u32,
    pub moves: u32,
}

/// Best finishing times per preset difficulty, fastest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighScores {
    pub beginner: Vec<Score>,
    pub intermediate: Vec<Score>,
    pub expert: Vec<Score>,
}

impl HighScores {
    pub fn scores(&self, difficulty: Difficulty) -> &[Score] {
        match difficulty {
            Difficulty::Beginner => &self.beginner,
            Difficulty::Intermediate => &self.intermediate,
            Difficulty::Expert => &self.expert,
            Difficulty::Custom(_) => &[],
        }
    }

    /// Inserts `score` and returns its 0-based rank, or `None` if it did not make the table.
    ///
    /// Custom boards have no table.
    pub fn record(&mut self, difficulty: Difficulty, score: Score) -> Option<usize> {
        let scores = match difficulty {
            Difficulty::Beginner => &mut self.beginner,
            Difficulty::Intermediate => &mut self.intermediate,
            Difficulty::Expert => &mut self.expert,
            Difficulty::Custom(_) => return None,
        };

        let key = (score.seconds, score.moves);
        let rank = scores.partition_point(|other| (other.seconds, other.moves) <= key);
        if rank >= HIGH_SCORE_LIMIT {
            return None;
        }
        scores.insert(rank, score);
        scores.truncate(HIGH_SCORE_LIMIT);
        Some(rank)
    }
}

impl StoredRecord for HighScores {
    const KEY: &'static str = HIGH_SCORES_KEY;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_classic_sizes() {
        assert_eq!(Difficulty::Beginner.config(), BoardConfig::new_unchecked((9, 9), 10));
        assert_eq!(Difficulty::Intermediate.config().total_cells(), 256);
        assert_eq!(Difficulty::Expert.config().mines, 99);
    }

    #[test]
    fn custom_board_is_clamped() {
        let config = Difficulty::custom((2, 200), 1000).config();

        assert_eq!(config.size, (5, 50));
        assert_eq!(config.mines, 241);
        assert_eq!(Difficulty::custom((10, 10), 0).config().mines, 1);
        assert_eq!(Difficulty::custom((5, 5), 999).config().mines, 16);
    }

    #[test]
    fn deserialized_custom_board_is_clamped() {
        let raw = r#"{"difficulty":{"Custom":{"size":[1,1],"mines":9}},"questions_enabled":false}"#;
        let preferences = Preferences::load_or_default(Some(raw));

        assert!(!preferences.questions_enabled);
        assert_eq!(preferences.difficulty.config(), BoardConfig::new_unchecked((5, 5), 9));
    }

    #[test]
    fn missing_or_malformed_preferences_fall_back() {
        assert_eq!(Preferences::load_or_default(None), Preferences::default());
        assert_eq!(Preferences::load_or_default(Some("{not json")), Preferences::default());
        assert_eq!(HighScores::load_or_default(Some("42")), HighScores::default());
    }

    #[test]
    fn partial_record_keeps_defaults_for_missing_fields() {
        let preferences = Preferences::load_or_default(Some(r#"{"difficulty":"Expert"}"#));

        assert_eq!(preferences.difficulty, Difficulty::Expert);
        assert!(preferences.questions_enabled);
    }

    #[test]
    fn preferences_survive_json() {
        let preferences = Preferences {
            difficulty: Difficulty::custom((20, 40), 150),
            questions_enabled: false,
        };
        let json = preferences.to_json().unwrap();

        assert_eq!(Preferences::load_or_default(Some(&json)), preferences);
    }

    #[test]
    fn high_scores_stay_sorted_and_capped() {
        let mut scores = HighScores::default();
        for seconds in (1..=12).rev() {
            let score = Score {
                seconds: seconds * 10,
                moves: 30,
            };
            scores.record(Difficulty::Beginner, score);
        }

        let beginner = scores.scores(Difficulty::Beginner);
        assert_eq!(beginner.len(), HIGH_SCORE_LIMIT);
        assert_eq!(beginner[0].seconds, 10);
        assert!(beginner.windows(2).all(|pair| pair[0].seconds <= pair[1].seconds));
    }

    #[test]
    fn record_reports_rank() {
        let mut scores = HighScores::default();
        let score = |seconds, moves| Score { seconds, moves };
        assert_eq!(scores.record(Difficulty::Expert, score(200, 300)), Some(0));
        assert_eq!(scores.record(Difficulty::Expert, score(100, 250)), Some(0));
        assert_eq!(scores.record(Difficulty::Expert, score(100, 260)), Some(1));
        let custom = Difficulty::custom((9, 9), 5);
        assert_eq!(scores.record(custom, Score { seconds: 1, moves: 1 }), None);

        for _ in 0..10 {
            scores.record(Difficulty::Expert, score(50, 100));
        }
        assert_eq!(scores.record(Difficulty::Expert, score(999, 1)), None);
    }

    #[test]
    fn session_follows_preferences() {
        let preferences = Preferences {
            difficulty: Difficulty::Intermediate,
            questions_enabled: false,
        };
        let session = GameSession::from_preferences(&preferences);

        assert_eq!(session.board().size(), (16, 16));
        assert!(!session.questions_enabled());
    }
}
