use core::ops::{BitOr, Index};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use event::*;
pub use generator::*;
pub use interpreter::*;
pub use rules::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod event;
mod generator;
mod interpreter;
mod rules;
mod session;
mod types;

/// Board dimensions and mine count, validated on construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    height: Coord,
    width: Coord,
    mines: CellCount,
}

impl GameConfig {
    pub fn new(height: Coord, width: Coord, mines: CellCount) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(GameError::InvalidDimensions);
        }
        if mines == 0 {
            return Err(GameError::NoMines);
        }
        if mines >= mult(height, width) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(height, width, mines))
    }

    const fn new_unchecked(height: Coord, width: Coord, mines: CellCount) -> Self {
        Self {
            height,
            width,
            mines,
        }
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked(9, 9, 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked(16, 16, 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked(16, 30, 99)
    }

    pub const fn height(&self) -> Coord {
        self.height
    }

    pub const fn width(&self) -> Coord {
        self.width
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    /// `(height, width)`, the bounds every coordinate is checked against.
    pub const fn size(&self) -> (Coord, Coord) {
        (self.height, self.width)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.height, self.width)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }

    pub fn validate_coords(&self, coords: Coordinate) -> Result<Coordinate> {
        if coords.is_within(self.size()) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::expert()
    }
}

/// Where the mines are. Produced by a generator or supplied as a fixed board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    config: GameConfig,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        let height = Coord::try_from(rows).map_err(|_| GameError::InvalidDimensions)?;
        let width = Coord::try_from(cols).map_err(|_| GameError::InvalidDimensions)?;
        let mines = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        let mines = CellCount::try_from(mines).map_err(|_| GameError::TooManyMines)?;
        let config = GameConfig::new(height, width, mines)?;
        Ok(Self { mine_mask, config })
    }

    pub fn from_mine_coords(size: (Coord, Coord), mine_coords: &[Coordinate]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if !coords.is_within(size) {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    /// Builds a layout from text rows where `*` marks a mine and any other character a safe cell.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
        if rows.iter().any(|row| row.as_ref().chars().count() != width) {
            return Err(GameError::InvalidDimensions);
        }

        let mut mine_mask: Array2<bool> = Array2::default([height, width]);
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.as_ref().chars().enumerate() {
                mine_mask[[row, col]] = ch == '*';
            }
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn game_config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> (Coord, Coord) {
        self.config.size()
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines()
    }

    pub fn contains_mine(&self, coords: Coordinate) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coordinate) -> u8 {
        // at most eight neighbours
        self.mine_mask
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count() as u8
    }

    pub fn value_at(&self, coords: Coordinate) -> CellValue {
        if self[coords] {
            CellValue::Mine
        } else {
            CellValue::Adjacent(self.adjacent_mine_count(coords))
        }
    }
}

impl Index<Coordinate> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coordinate) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

/// What an action did to the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    NoChange,
    Changed,
    HitMine,
    Won,
}

impl ActionOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Used to merge outcomes when a chord opens several cells.
impl BitOr for ActionOutcome {
    type Output = ActionOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use ActionOutcome::*;
        match (self, rhs) {
            (HitMine, _) | (_, HitMine) => HitMine,
            (Won, _) | (_, Won) => Won,
            (Changed, _) | (_, Changed) => Changed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_bad_dimensions_and_mine_counts() {
        assert_eq!(GameConfig::new(0, 5, 1), Err(GameError::InvalidDimensions));
        assert_eq!(GameConfig::new(5, 0, 1), Err(GameError::InvalidDimensions));
        assert_eq!(GameConfig::new(3, 3, 0), Err(GameError::NoMines));
        assert_eq!(GameConfig::new(3, 3, 9), Err(GameError::TooManyMines));
        assert_eq!(GameConfig::new(3, 3, 8).map(|c| c.safe_cells()), Ok(1));
    }

    #[test]
    fn presets_are_valid_configs() {
        for preset in [
            GameConfig::beginner(),
            GameConfig::intermediate(),
            GameConfig::expert(),
        ] {
            let checked = GameConfig::new(preset.height(), preset.width(), preset.mines());
            assert_eq!(checked, Ok(preset));
        }
    }

    #[test]
    fn layout_from_rows_counts_neighbors() {
        let layout = MineLayout::from_rows(&["*..", "...", "..*"]).unwrap();

        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.size(), (3, 3));
        assert_eq!(layout.value_at(Coordinate::new(0, 0)), CellValue::Mine);
        assert_eq!(layout.value_at(Coordinate::new(1, 1)), CellValue::Adjacent(2));
        assert_eq!(layout.value_at(Coordinate::new(0, 2)), CellValue::EMPTY);
    }

    #[test]
    fn layout_rejects_ragged_rows_and_stray_coords() {
        assert_eq!(
            MineLayout::from_rows(&["*..", ".."]),
            Err(GameError::InvalidDimensions)
        );
        assert_eq!(
            MineLayout::from_mine_coords((2, 2), &[Coordinate::new(2, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn outcome_merge_prefers_mine_then_win() {
        use ActionOutcome::*;
        assert_eq!(Changed | HitMine, HitMine);
        assert_eq!(Won | Changed, Won);
        assert_eq!(NoChange | Changed, Changed);
        assert_eq!(NoChange | NoChange, NoChange);
    }
}
