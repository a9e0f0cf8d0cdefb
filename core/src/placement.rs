use alloc::vec::Vec;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::*;

/// Whether `coords` is the first-click cell or one of its neighbors.
pub(crate) fn in_start_zone(coords: Coord2, start: Coord2) -> bool {
    coords.0.abs_diff(start.0) <= 1 && coords.1.abs_diff(start.1) <= 1
}

/// Number of cells that may hold a mine when the game opens at `start`.
pub fn eligible_cell_count(size: Coord2, start: Coord2) -> CellCount {
    let zone = NeighborIter::new(start, size).count() as CellCount + 1;
    mult(size.0, size.1).saturating_sub(zone)
}

/// Picks up to `count` distinct row-major cell indices uniformly at random, never inside the
/// first-click zone around `start`.
///
/// Runs a partial Fisher-Yates over the eligible cells, so only `count` swaps are made. When more
/// mines are requested than there are eligible cells, every eligible cell is returned.
pub fn sample_mine_indices<R>(size: Coord2, start: Coord2, count: CellCount, rng: &mut R) -> Vec<usize>
where
    R: Rng + ?Sized,
{
    let total_cells = mult(size.0, size.1) as usize;
    let mut eligible: Vec<usize> = (0..total_cells)
        .filter(|&index| !in_start_zone(from_flat_index(index, size), start))
        .collect();

    let requested = usize::from(count);
    if requested > eligible.len() {
        log::warn!(
            "Not enough room for mines, requested {} but only fits {}",
            requested,
            eligible.len()
        );
    }

    let amount = requested.min(eligible.len());
    let (chosen, _) = eligible.partial_shuffle(rng, amount);
    chosen.to_vec()
}
