use ndarray::Array2;

use super::*;

/// Purely random placement that never puts a mine on the first opened cell.
///
/// All cell indices are shuffled and the first `mines` of them become mines. When the start cell lands inside that
/// prefix it is swapped with the index just past the cutoff, which keeps the mine count exact.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffleGenerator {
    seed: u64,
    start: Coordinate,
}

impl ShuffleGenerator {
    pub fn new(seed: u64, start: Coordinate) -> Self {
        Self { seed, start }
    }
}

impl MinefieldGenerator for ShuffleGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        use rand::prelude::*;

        let width = config.width();
        let total_cells = usize::from(config.total_cells());
        let mines = usize::from(config.mines());
        let start = self.start.to_linear(width);

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut positions: Vec<usize> = (0..total_cells).collect();
        positions.shuffle(&mut rng);

        // config guarantees mines < total_cells, so `mines` is a valid index
        if let Some(i) = positions[..mines].iter().position(|&pos| pos == start) {
            log::trace!("start cell {} drawn as mine, swapping out", self.start);
            positions.swap(i, mines);
        }

        let mut mine_mask: Array2<bool> = Array2::default(config.size().to_nd_index());
        for &pos in &positions[..mines] {
            mine_mask[Coordinate::from_linear(pos, width).to_nd_index()] = true;
        }

        match MineLayout::from_mine_mask(mine_mask) {
            Ok(layout) => layout,
            Err(err) => unreachable!("generated layout must match its config: {err}"),
        }
    }
}
