use core::fmt;
use core::ops::BitOr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Valid transitions:
/// - NotStarted -> Running
/// - Running -> Won
/// - Running -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No cell opened yet, the grid may not exist
    #[default]
    NotStarted,
    Running,
    Won,
    Lost,
}

impl GamePhase {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Semantic action produced by the interpreter and consumed by [`Board::execute`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Open,
    ToggleFlag,
    OpenNeighbours,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub coordinate: Coordinate,
    pub kind: ActionKind,
}

impl ActionRequest {
    pub const fn new(coordinate: Coordinate, kind: ActionKind) -> Self {
        Self { coordinate, kind }
    }
}

/// Represents one game from first click to win or loss.
///
/// Mines are placed lazily on the first open so that the first cell is always safe. Every state change is recorded
/// as a [`BoardEvent`] which callers collect with [`Board::drain_events`].
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    config: GameConfig,
    rules: Rules,
    seed: u64,
    cells: Option<Array2<Cell>>,
    phase: GamePhase,
    flag_budget: i32,
    opened_safe: CellCount,
    triggered_mine: Option<Coordinate>,
    events: Vec<BoardEvent>,
}

impl Board {
    /// A board whose mines are placed from `seed` when the first cell is opened.
    pub fn new(config: GameConfig, rules: Rules, seed: u64) -> Self {
        Self {
            config,
            rules,
            seed,
            cells: None,
            phase: GamePhase::default(),
            flag_budget: i32::from(config.mines()),
            opened_safe: 0,
            triggered_mine: None,
            events: Vec::new(),
        }
    }

    /// A board with a fixed mine layout, random generation is skipped.
    pub fn with_layout(layout: &MineLayout, rules: Rules) -> Self {
        let mut board = Self::new(layout.game_config(), rules, 0);
        board.cells = Some(build_cells(layout));
        board
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    /// Mines minus placed flags, negative when the player over-flags.
    pub fn flag_budget(&self) -> i32 {
        self.flag_budget
    }

    pub fn triggered_mine(&self) -> Option<Coordinate> {
        self.triggered_mine
    }

    pub fn is_generated(&self) -> bool {
        self.cells.is_some()
    }

    /// Snapshot of a cell, `None` before the grid exists or outside of it.
    pub fn cell_at(&self, coords: Coordinate) -> Option<Cell> {
        self.cells.as_ref()?.get(coords.to_nd_index()).copied()
    }

    /// All cells in row-major order, empty before the grid exists.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flat_map(|cells| cells.iter())
    }

    /// Notifications not yet collected, oldest first.
    pub fn pending_events(&self) -> &[BoardEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = BoardEvent> + '_ {
        self.events.drain(..)
    }

    pub fn execute(&mut self, request: ActionRequest) -> Result<ActionOutcome> {
        let ActionRequest { coordinate, kind } = request;
        log::debug!("execute {:?} at {}", kind, coordinate);
        match kind {
            ActionKind::Open => self.open(coordinate),
            ActionKind::ToggleFlag => self.toggle_flag(coordinate),
            ActionKind::OpenNeighbours => self.open_neighbours(coordinate),
        }
    }

    /// Open a closed cell, generating the grid first if this is the first move.
    pub fn open(&mut self, coords: Coordinate) -> Result<ActionOutcome> {
        let coords = self.config.validate_coords(coords)?;

        if self.phase.is_ready() {
            self.start(coords);
        }

        Ok(self.open_cell(coords))
    }

    pub fn toggle_flag(&mut self, coords: Coordinate) -> Result<ActionOutcome> {
        use ActionOutcome::*;

        let coords = self.config.validate_coords(coords)?;

        if self.phase.is_finished() {
            log::debug!("ignoring flag at {}, game already ended", coords);
            return Ok(NoChange);
        }

        let Some(cells) = self.cells.as_mut() else {
            log::debug!("ignoring flag at {}, no cell opened yet", coords);
            return Ok(NoChange);
        };

        let cell = &mut cells[coords.to_nd_index()];
        let event = match cell.state() {
            CellState::Opened => return Ok(NoChange),
            CellState::Closed if self.rules.cap_flags && self.flag_budget <= 0 => {
                log::debug!("ignoring flag at {}, no flags left", coords);
                return Ok(NoChange);
            }
            CellState::Closed => {
                cell.set_flag(true);
                self.flag_budget -= 1;
                BoardEvent::CellFlagged(*cell)
            }
            CellState::Flagged => {
                cell.set_flag(false);
                self.flag_budget += 1;
                BoardEvent::CellUnflagged(*cell)
            }
        };
        self.events.push(event);

        let won = self.check_won();
        self.events.push(BoardEvent::FlagBudgetChanged(self.flag_budget));

        Ok(if won { Won } else { Changed })
    }

    /// Chord: open every unflagged neighbour once the flags around an opened number match it.
    pub fn open_neighbours(&mut self, coords: Coordinate) -> Result<ActionOutcome> {
        use ActionOutcome::*;

        let coords = self.config.validate_coords(coords)?;

        if self.phase.is_finished() {
            log::debug!("ignoring chord at {}, game already ended", coords);
            return Ok(NoChange);
        }

        let Some(cells) = self.cells.as_ref() else {
            return Ok(NoChange);
        };

        let target = cells[coords.to_nd_index()];
        let (true, CellValue::Adjacent(count)) = (target.is_opened(), target.value()) else {
            return Ok(NoChange);
        };

        let (flagged, unflagged): (SmallVec<[Coordinate; 8]>, SmallVec<[Coordinate; 8]>) = cells
            .iter_neighbors(coords)
            .partition(|&pos| cells[pos.to_nd_index()].is_flagged());

        if flagged.len() != usize::from(count) {
            log::debug!(
                "chord at {} needs {} flags, found {}",
                coords,
                count,
                flagged.len()
            );
            return Ok(NoChange);
        }

        if matches!(self.rules.chord, ChordPolicy::StrictFlags)
            && flagged.iter().any(|&pos| !cells[pos.to_nd_index()].is_mine())
        {
            log::debug!("chord at {} trusted a flag on a safe cell", coords);
            self.lose(None);
            return Ok(HitMine);
        }

        Ok(unflagged
            .into_iter()
            .map(|pos| self.open_cell(pos))
            .fold(NoChange, BitOr::bitor))
    }

    fn start(&mut self, first: Coordinate) {
        if self.cells.is_none() {
            let layout = ShuffleGenerator::new(self.seed, first).generate(self.config);
            let cells = build_cells(&layout);
            log::debug!("generated board from {}:\n{}", first, ValueGrid(&cells));
            self.cells = Some(cells);
        }

        self.phase = GamePhase::Running;
        log::debug!("game started at {}", first);
        self.events.push(BoardEvent::GameStarted);
    }

    /// Open a single cell and flood-fill from it when it is empty.
    fn open_cell(&mut self, coords: Coordinate) -> ActionOutcome {
        use ActionOutcome::*;

        let bounds = self.config.size();
        let Some(cells) = self.cells.as_mut() else {
            return NoChange;
        };

        let cell = &mut cells[coords.to_nd_index()];
        if !cell.is_closed() {
            log::trace!("cell at {} is {:?}, not opening", coords, cell.state());
            return NoChange;
        }
        if self.phase.is_finished() {
            log::debug!("ignoring open at {}, game already ended", coords);
            return NoChange;
        }

        cell.open();
        self.events.push(BoardEvent::CellOpened(*cell));

        if cell.is_mine() {
            self.lose(Some(coords));
            return HitMine;
        }

        self.opened_safe += 1;
        log::debug!("opened cell at {}, value: {:?}", coords, cell.value());

        if cell.value().is_empty() {
            // explicit stack, neighbours pushed in reverse so they pop in scan order
            let mut to_visit: Vec<Coordinate> = Vec::new();
            push_reversed(&mut to_visit, coords.neighbors(bounds));

            while let Some(visit_coords) = to_visit.pop() {
                let visit = &mut cells[visit_coords.to_nd_index()];

                // skip flagged or already opened cells
                if !visit.is_closed() {
                    continue;
                }

                visit.open();
                self.opened_safe += 1;
                self.events.push(BoardEvent::CellOpened(*visit));
                log::trace!("flood opened cell at {}, value: {:?}", visit_coords, visit.value());

                if visit.value().is_empty() {
                    push_reversed(&mut to_visit, visit_coords.neighbors(bounds));
                }
            }
        }

        if self.check_won() { Won } else { Changed }
    }

    /// Ends the game as lost, opening the remaining mines and pointing out misplaced flags.
    fn lose(&mut self, triggered: Option<Coordinate>) {
        self.phase = GamePhase::Lost;
        self.triggered_mine = triggered;
        log::debug!("game lost, triggered mine: {:?}", triggered);
        self.events.push(BoardEvent::GameLost);

        let Some(cells) = self.cells.as_mut() else {
            return;
        };

        for cell in cells.iter_mut() {
            match (cell.is_mine(), cell.state()) {
                (true, CellState::Closed) => {
                    cell.open();
                    self.events.push(BoardEvent::CellOpened(*cell));
                }
                (false, CellState::Flagged) => {
                    self.events.push(BoardEvent::CellFlaggedIncorrectly(*cell));
                }
                _ => {}
            }
        }
    }

    /// Moves a running game to won when the configured rule is satisfied.
    fn check_won(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Running) {
            return false;
        }

        let won = match self.rules.win {
            WinRule::SafeCellsOpened => self.opened_safe == self.config.safe_cells(),
            WinRule::AllCellsAccounted => {
                self.flag_budget == 0 && self.cells().all(|cell| !cell.is_closed())
            }
        };

        if won {
            self.phase = GamePhase::Won;
            log::debug!("game won");
            self.events.push(BoardEvent::GameWon);
        }
        won
    }
}

fn build_cells(layout: &MineLayout) -> Array2<Cell> {
    Array2::from_shape_fn(layout.size().to_nd_index(), |(row, col)| {
        let coords = Coordinate::new(row as Coord, col as Coord);
        Cell::new(coords, layout.value_at(coords))
    })
}

fn push_reversed(stack: &mut Vec<Coordinate>, neighbors: NeighborIter) {
    let neighbors: SmallVec<[Coordinate; 8]> = neighbors.collect();
    stack.extend(neighbors.into_iter().rev());
}

/// What the player sees, one character per cell: `#` closed, `F` flag, `*` mine, `.` empty, digits otherwise.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (height, width) = self.config.size();
        for row in 0..height {
            for col in 0..width {
                let ch = match self.cell_at(Coordinate::new(row, col)) {
                    None => '#',
                    Some(cell) => match (cell.state(), cell.value()) {
                        (CellState::Closed, _) => '#',
                        (CellState::Flagged, _) => 'F',
                        (CellState::Opened, CellValue::Mine) => '*',
                        (CellState::Opened, CellValue::Adjacent(0)) => '.',
                        (CellState::Opened, CellValue::Adjacent(n)) => char::from(b'0' + n),
                    },
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Debug view of the hidden values.
struct ValueGrid<'a>(&'a Array2<Cell>);

impl fmt::Display for ValueGrid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.0.rows() {
            for cell in row {
                match cell.value() {
                    CellValue::Mine => write!(f, "  *")?,
                    CellValue::Adjacent(n) => write!(f, "{n:3}")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
