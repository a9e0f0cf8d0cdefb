use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Idle -> Playing (first reveal)
/// - Idle -> Won (first reveal clears the board)
/// - Playing -> Won | Lost
/// - Playing <-> Paused
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Waiting for the first reveal, mines not placed yet
    #[default]
    Idle,
    Playing,
    Paused,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Single owner of the current [`Board`] for one game.
///
/// Drives mine placement on the first reveal and decides win or loss after each move. Markers are
/// accepted before the first reveal; nothing is accepted once the game is won or lost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    board: Board,
    state: GameState,
    move_count: u32,
    questions_enabled: bool,
}

impl GameSession {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            board: Board::new(config),
            state: GameState::default(),
            move_count: 0,
            questions_enabled: true,
        }
    }

    pub fn from_preferences(preferences: &Preferences) -> Self {
        Self::new(preferences.difficulty.config()).with_questions(preferences.questions_enabled)
    }

    pub fn with_questions(mut self, enabled: bool) -> Self {
        self.questions_enabled = enabled;
        self
    }

    /// Throws the current board away and starts over with the same configuration.
    pub fn restart(&mut self, config: BoardConfig) {
        log::debug!("Restarting game, previous state: {:?}", self.state);
        *self = Self::new(config).with_questions(self.questions_enabled);
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn questions_enabled(&self) -> bool {
        self.questions_enabled
    }

    pub fn mines_remaining(&self) -> isize {
        self.board.mines_remaining()
    }

    pub fn reveal<R>(&mut self, coords: Coord2, rng: &mut R) -> Result<RevealOutcome>
    where
        R: Rng + ?Sized,
    {
        let coords = self.board.validate_coords(coords)?;
        self.check_accepts_moves()?;

        let cell = self.board[coords];
        if cell.is_revealed() || cell.is_flagged() {
            return Ok(RevealOutcome::NoChange);
        }

        if self.state.is_idle() {
            self.board = self
                .board
                .place_mines(coords, rng)
                .with_neighbor_counts();
            self.state = GameState::Playing;
            log::debug!("Game started at {:?}", coords);
        }

        self.board = self.board.reveal(coords);
        self.move_count += 1;

        Ok(if self.board[coords].is_mine() {
            self.board = self.board.reveal_all_mines(coords);
            self.end_game(false);
            RevealOutcome::HitMine
        } else if self.board.is_won() {
            self.end_game(true);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        })
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_accepts_moves()?;

        let next = self.board.toggle_flag(coords);
        Ok(self.apply_mark(next))
    }

    pub fn toggle_question(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_accepts_moves()?;

        if !self.questions_enabled {
            return Ok(MarkOutcome::NoChange);
        }
        let next = self.board.toggle_question(coords);
        Ok(self.apply_mark(next))
    }

    pub fn pause(&mut self) -> Result<()> {
        match self.state {
            GameState::Playing => {
                self.state = GameState::Paused;
                Ok(())
            }
            GameState::Paused | GameState::Idle => Ok(()),
            GameState::Won | GameState::Lost => Err(GameError::AlreadyEnded),
        }
    }

    pub fn resume(&mut self) -> Result<()> {
        match self.state {
            GameState::Paused => {
                self.state = GameState::Playing;
                Ok(())
            }
            GameState::Playing | GameState::Idle => Ok(()),
            GameState::Won | GameState::Lost => Err(GameError::AlreadyEnded),
        }
    }

    fn apply_mark(&mut self, next: Board) -> MarkOutcome {
        if next == self.board {
            MarkOutcome::NoChange
        } else {
            self.board = next;
            MarkOutcome::Changed
        }
    }

    fn end_game(&mut self, won: bool) {
        self.state = if won { GameState::Won } else { GameState::Lost };
        log::debug!(
            "Game ended: {:?} after {} moves",
            self.state,
            self.move_count
        );
    }

    fn check_accepts_moves(&self) -> Result<()> {
        match self.state {
            GameState::Idle | GameState::Playing => Ok(()),
            GameState::Paused => Err(GameError::Paused),
            GameState::Won | GameState::Lost => Err(GameError::AlreadyEnded),
        }
    }
}
