use alloc::collections::VecDeque;
use core::ops::Index;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Immutable minefield value.
///
/// Every operation returns a new board and leaves `self` untouched, so callers can keep the
/// previous value around and diff it against the new one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    cells: Array2<Cell>,
    total_mines: CellCount,
    mines_placed: bool,
}

impl Board {
    /// Empty board: no mines, every cell hidden and unmarked.
    pub fn new(config: BoardConfig) -> Self {
        Self {
            cells: Array2::default(config.size.to_nd_index()),
            total_mines: config.mines,
            mines_placed: false,
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        // both construction paths keep the axes within Coord
        (rows as Coord, cols as Coord)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn total_mines(&self) -> CellCount {
        self.total_mines
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.total_mines)
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn config(&self) -> BoardConfig {
        BoardConfig::new_unchecked(self.size(), self.total_mines)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell(&self, coords: Coord2) -> Option<&Cell> {
        self.validate_coords(coords)
            .ok()
            .map(|coords| &self.cells[coords.to_nd_index()])
    }

    /// All cells in row-major order along with their position.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, &Cell)> {
        self.cells
            .indexed_iter()
            .map(|((row, col), cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    /// Places the mines for a game whose first reveal is at `first_click`.
    ///
    /// Neither `first_click` nor any of its neighbors receives a mine. If the configured count does
    /// not fit outside that zone, every eligible cell is mined and the returned board's
    /// [`Board::total_mines`] reflects the reduced count. Neighbor counts are not touched, see
    /// [`Board::with_neighbor_counts`].
    pub fn place_mines<R>(&self, first_click: Coord2, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        if self.mines_placed {
            log::warn!("Mines already placed, ignoring second placement");
            return self.clone();
        }
        let Some(first_click) = self.checked_coords(first_click) else {
            return self.clone();
        };

        let size = self.size();
        let mine_indices = sample_mine_indices(size, first_click, self.total_mines, rng);
        let placed: CellCount = mine_indices.len().try_into().unwrap_or(CellCount::MAX);

        let mut next = self.clone();
        for index in mine_indices {
            next.cells[from_flat_index(index, size).to_nd_index()].mine = true;
        }
        next.total_mines = placed;
        next.mines_placed = true;
        log::debug!("Placed {} mines on a {:?} board", placed, size);
        next
    }

    /// Fills in [`Cell::neighbor_mines`] for every safe cell.
    pub fn with_neighbor_counts(&self) -> Self {
        let mut next = self.clone();
        for ((row, col), cell) in next.cells.indexed_iter_mut() {
            cell.neighbor_mines = if cell.mine {
                0
            } else {
                self.iter_neighbors((row as Coord, col as Coord))
                    .filter(|&pos| self.cells[pos.to_nd_index()].mine)
                    .count() as u8
            };
        }
        next
    }

    /// Reveals the cell at `coords`, flooding through zero-count cells.
    ///
    /// Revealed, flagged or out-of-bounds cells yield an unchanged board. A mine is simply revealed:
    /// deciding the game is lost is left to the caller.
    pub fn reveal(&self, coords: Coord2) -> Self {
        let Some(coords) = self.checked_coords(coords) else {
            return self.clone();
        };
        let target = self.cells[coords.to_nd_index()];
        if target.revealed || target.is_flagged() {
            return self.clone();
        }

        let mut next = self.clone();
        next.cells[coords.to_nd_index()].open();
        if target.mine || target.neighbor_mines > 0 {
            return next;
        }

        let mut visited: Array2<bool> = Array2::default(self.cells.raw_dim());
        visited[coords.to_nd_index()] = true;
        let mut to_visit = VecDeque::from([coords]);
        let mut flooded = 1usize;

        while let Some(zero_coords) = to_visit.pop_front() {
            for pos in next.iter_neighbors(zero_coords) {
                if core::mem::replace(&mut visited[pos.to_nd_index()], true) {
                    continue;
                }

                let cell = &mut next.cells[pos.to_nd_index()];
                if cell.revealed || cell.is_flagged() || cell.mine {
                    continue;
                }

                cell.open();
                flooded += 1;
                if cell.neighbor_mines == 0 {
                    to_visit.push_back(pos);
                }
            }
        }

        log::trace!("Reveal at {:?} opened {} cells", coords, flooded);
        next
    }

    /// Flags an unrevealed cell, or removes its flag. Flagging replaces a question mark.
    pub fn toggle_flag(&self, coords: Coord2) -> Self {
        self.update_mark(coords, |cell| match cell.mark {
            _ if cell.revealed => None,
            CellMark::Flagged => Some(CellMark::None),
            CellMark::None | CellMark::Questioned => Some(CellMark::Flagged),
        })
    }

    /// Toggles a question mark on a cell that is neither revealed nor flagged.
    pub fn toggle_question(&self, coords: Coord2) -> Self {
        self.update_mark(coords, |cell| match cell.mark {
            _ if cell.revealed => None,
            CellMark::Flagged => None,
            CellMark::None => Some(CellMark::Questioned),
            CellMark::Questioned => Some(CellMark::None),
        })
    }

    /// Reveals every mine after the one at `exploded` went off.
    ///
    /// Only the mine at `exploded` is marked as exploded; safe cells keep their reveal state.
    pub fn reveal_all_mines(&self, exploded: Coord2) -> Self {
        let exploded = self.checked_coords(exploded);
        let mut next = self.clone();

        for ((row, col), cell) in next.cells.indexed_iter_mut() {
            cell.exploded = false;
            if cell.mine {
                cell.open();
                cell.exploded = exploded == Some((row as Coord, col as Coord));
            }
        }

        if let Some(coords) = exploded {
            if !self.cells[coords.to_nd_index()].mine {
                log::warn!("No mine at exploded position {:?}", coords);
            }
        }
        next
    }

    /// Whether every safe cell has been revealed. Markers are ignored.
    pub fn is_won(&self) -> bool {
        self.revealed_count() == self.safe_cell_count()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.count_cells(Cell::is_revealed)
    }

    pub fn flag_count(&self) -> CellCount {
        self.count_cells(Cell::is_flagged)
    }

    pub fn question_count(&self) -> CellCount {
        self.count_cells(Cell::is_questioned)
    }

    /// Mines not yet accounted for by flags, negative when over-flagged.
    pub fn mines_remaining(&self) -> isize {
        (self.total_mines as isize) - (self.flag_count() as isize)
    }

    fn count_cells(&self, predicate: impl Fn(&Cell) -> bool) -> CellCount {
        self.cells
            .iter()
            .filter(|&cell| predicate(cell))
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    fn update_mark(&self, coords: Coord2, toggle: impl FnOnce(&Cell) -> Option<CellMark>) -> Self {
        let Some(coords) = self.checked_coords(coords) else {
            return self.clone();
        };
        let mut next = self.clone();
        if let Some(mark) = toggle(&self.cells[coords.to_nd_index()]) {
            next.cells[coords.to_nd_index()].mark = mark;
        }
        next
    }

    fn checked_coords(&self, coords: Coord2) -> Option<Coord2> {
        match self.validate_coords(coords) {
            Ok(coords) => Some(coords),
            Err(err) => {
                log::warn!("{} {:?} on a {:?} board, ignored", err, coords, self.size());
                None
            }
        }
    }
}

/// Unchecked wire form of [`Board`].
#[derive(Deserialize)]
struct RawBoard {
    cells: Array2<Cell>,
    total_mines: CellCount,
    mines_placed: bool,
}

impl TryFrom<RawBoard> for Board {
    type Error = GameError;

    fn try_from(raw: RawBoard) -> Result<Self> {
        let (rows, cols) = raw.cells.dim();
        let max = usize::from(Coord::MAX);
        if rows == 0 || cols == 0 || rows > max || cols > max {
            return Err(GameError::InvalidBoardShape);
        }

        let mut mines: CellCount = 0;
        for cell in &raw.cells {
            let marked = !matches!(cell.mark, CellMark::None);
            if (cell.revealed && marked)
                || (cell.exploded && !cell.mine)
                || cell.neighbor_mines > 8
            {
                return Err(GameError::InvalidCellState);
            }
            mines += CellCount::from(cell.mine);
        }

        let consistent = if raw.mines_placed {
            mines == raw.total_mines
        } else {
            mines == 0 && usize::from(raw.total_mines) <= raw.cells.len()
        };
        if !consistent {
            return Err(GameError::MineCountMismatch);
        }

        Ok(Self {
            cells: raw.cells,
            total_mines: raw.total_mines,
            mines_placed: raw.mines_placed,
        })
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
