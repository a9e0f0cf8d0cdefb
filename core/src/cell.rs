use serde::{Deserialize, Serialize};

/// Player marker on an unrevealed cell. Flag and question are mutually exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellMark {
    #[default]
    None,
    Flagged,
    Questioned,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) mine: bool,
    pub(crate) revealed: bool,
    pub(crate) mark: CellMark,
    pub(crate) neighbor_mines: u8,
    pub(crate) exploded: bool,
}

impl Cell {
    pub const fn is_mine(&self) -> bool {
        self.mine
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(&self) -> bool {
        matches!(self.mark, CellMark::Flagged)
    }

    pub const fn is_questioned(&self) -> bool {
        matches!(self.mark, CellMark::Questioned)
    }

    pub const fn mark(&self) -> CellMark {
        self.mark
    }

    /// Mined neighbors; only meaningful once counts have been computed, always 0 for mines.
    pub const fn neighbor_mines(&self) -> u8 {
        self.neighbor_mines
    }

    /// Set only on the mine that ended the game.
    pub const fn is_exploded(&self) -> bool {
        self.exploded
    }

    pub(crate) fn open(&mut self) {
        self.revealed = true;
        self.mark = CellMark::None;
    }
}
