use chrono::prelude::*;
use core::fmt;

use crate::*;

/// One player's sitting: a board and an interpreter per game, plus the listeners that outlive restarts.
pub struct GameSession {
    config: GameConfig,
    rules: Rules,
    seed: Option<u64>,
    games_started: u64,
    board: Board,
    interpreter: ActionInterpreter,
    listeners: Vec<Box<dyn BoardListener>>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl GameSession {
    /// Session drawing a fresh random seed for every game.
    pub fn new(config: GameConfig, rules: Rules) -> Self {
        Self::create(config, rules, None)
    }

    /// Session whose `n`-th game is seeded with `seed + n`, so a replay produces the same boards.
    pub fn with_seed(config: GameConfig, rules: Rules, seed: u64) -> Self {
        Self::create(config, rules, Some(seed))
    }

    fn create(config: GameConfig, rules: Rules, seed: Option<u64>) -> Self {
        let board = Board::new(config, rules, game_seed(seed, 0));
        Self {
            config,
            rules,
            seed,
            games_started: 0,
            board,
            interpreter: ActionInterpreter::new(),
            listeners: Vec::new(),
            started_at: None,
            ended_at: None,
        }
    }

    pub fn subscribe(&mut self, listener: impl BoardListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// How many seconds have passed since the game started, 0 if it hasn't started
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or(now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    /// Feed a raw pointer event, executing the action it completes, if any.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<Option<ActionOutcome>> {
        match self.interpreter.handle(event) {
            Some(request) => self.execute(request).map(Some),
            None => Ok(None),
        }
    }

    pub fn execute(&mut self, request: ActionRequest) -> Result<ActionOutcome> {
        let outcome = self.board.execute(request);
        self.dispatch();
        outcome
    }

    /// Throws away the current board and interpreter and sets up a fresh game.
    pub fn restart(&mut self) {
        self.games_started += 1;
        let seed = game_seed(self.seed, self.games_started);
        log::debug!("restarting, game #{}", self.games_started);
        self.board = Board::new(self.config, self.rules, seed);
        self.interpreter = ActionInterpreter::new();
        self.started_at = None;
        self.ended_at = None;
    }

    fn dispatch(&mut self) {
        for event in self.board.drain_events() {
            match event {
                BoardEvent::GameStarted => self.started_at = Some(Utc::now()),
                BoardEvent::GameWon | BoardEvent::GameLost => self.ended_at = Some(Utc::now()),
                _ => {}
            }
            for listener in self.listeners.iter_mut() {
                listener.on_event(&event);
            }
        }
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("config", &self.config)
            .field("rules", &self.rules)
            .field("seed", &self.seed)
            .field("games_started", &self.games_started)
            .field("phase", &self.board.phase())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn game_seed(seed: Option<u64>, game: u64) -> u64 {
    match seed {
        Some(seed) => seed.wrapping_add(game),
        None => rand::random(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use std::cell::RefCell;
    use std::rc::Rc;

    const LEFT: MouseButtons = MouseButtons::LEFT;
    const RIGHT: MouseButtons = MouseButtons::RIGHT;

    fn recorder(session: &mut GameSession) -> Rc<RefCell<Vec<BoardEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        session.subscribe(move |event: &BoardEvent| sink.borrow_mut().push(*event));
        events
    }

    fn click(session: &mut GameSession, coords: Coordinate, button: MouseButtons) -> Option<ActionOutcome> {
        session
            .handle_pointer(PointerEvent::press(coords, button))
            .unwrap();
        session
            .handle_pointer(PointerEvent::release(coords, button))
            .unwrap()
    }

    #[test]
    fn pointer_events_reach_the_board_and_listeners() {
        let mut session = GameSession::with_seed(GameConfig::beginner(), Rules::default(), 5);
        let first = recorder(&mut session);
        let second = recorder(&mut session);

        let outcome = click(&mut session, Coordinate::new(4, 4), LEFT);

        assert!(outcome.is_some_and(ActionOutcome::has_update));
        assert_eq!(session.board().phase(), GamePhase::Running);
        assert!(session.started_at().is_some());
        let events = first.borrow();
        assert_eq!(events.first(), Some(&BoardEvent::GameStarted));
        assert!(matches!(events.get(1), Some(BoardEvent::CellOpened(_))));
        assert_eq!(*events, *second.borrow());
    }

    #[test]
    fn flag_gesture_reports_budget() {
        let mut session = GameSession::with_seed(GameConfig::beginner(), Rules::default(), 5);
        click(&mut session, Coordinate::new(4, 4), LEFT);
        let events = recorder(&mut session);

        let target = session
            .board()
            .cells()
            .find(|cell| cell.is_closed())
            .map(Cell::coordinate)
            .unwrap();
        click(&mut session, target, RIGHT);

        assert_eq!(session.board().flag_budget(), 9);
        assert_eq!(
            events.borrow().last(),
            Some(&BoardEvent::FlagBudgetChanged(9))
        );
    }

    #[test]
    fn restart_discards_board_and_pending_gesture() {
        let mut session = GameSession::with_seed(GameConfig::beginner(), Rules::default(), 5);
        let events = recorder(&mut session);
        click(&mut session, Coordinate::new(0, 0), LEFT);
        session
            .handle_pointer(PointerEvent::press(Coordinate::new(1, 1), LEFT))
            .unwrap();

        session.restart();
        events.borrow_mut().clear();

        assert_eq!(session.board().phase(), GamePhase::NotStarted);
        assert!(!session.board().is_generated());
        assert_eq!(session.started_at(), None);
        let outcome = session
            .handle_pointer(PointerEvent::release(Coordinate::new(1, 1), LEFT))
            .unwrap();
        assert_eq!(outcome, None);
        // listeners stay subscribed across games
        click(&mut session, Coordinate::new(0, 0), LEFT);
        assert_eq!(events.borrow().first(), Some(&BoardEvent::GameStarted));
    }

    #[test]
    fn fixed_seed_reproduces_games() {
        let config = GameConfig::intermediate();
        let start = Coordinate::new(3, 3);
        let mut a = GameSession::with_seed(config, Rules::default(), 99);
        let mut b = GameSession::with_seed(config, Rules::default(), 99);
        click(&mut a, start, LEFT);
        click(&mut b, start, LEFT);
        assert_eq!(a.board().to_string(), b.board().to_string());

        a.restart();
        click(&mut a, start, LEFT);
        let mut expected = Board::new(config, Rules::default(), 100);
        expected.open(start).unwrap();
        assert_eq!(a.board().to_string(), expected.to_string());
    }

    #[test]
    fn out_of_range_request_is_an_error_without_events() {
        let mut session = GameSession::with_seed(GameConfig::beginner(), Rules::default(), 1);
        let events = recorder(&mut session);

        let request = ActionRequest::new(Coordinate::new(9, 9), ActionKind::Open);
        assert_eq!(session.execute(request), Err(GameError::InvalidCoords));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn elapsed_time_stops_when_game_ends() {
        let mut session = GameSession::with_seed(GameConfig::new(3, 3, 8).unwrap(), Rules::default(), 1);
        assert_eq!(session.elapsed_secs(Utc::now()), 0);

        // the only safe cell is the first one opened, so this wins right away
        click(&mut session, Coordinate::new(1, 1), LEFT);

        assert_eq!(session.board().phase(), GamePhase::Won);
        let started_at = session.started_at().unwrap();
        let ended_at = session.ended_at().unwrap();
        assert!(ended_at >= started_at);
        let later = ended_at + TimeDelta::seconds(30);
        assert_eq!(session.elapsed_secs(later), session.elapsed_secs(ended_at));
    }
}
