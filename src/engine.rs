use crate::config::{Settings, BEST_SCORE_KEY, FOOD_REWARD, SPEED_CAP, SPEED_FLOOR, SPEED_STEP};
use crate::render::{self, DrawCommand};
use crate::store::ScoreStore;
use crate::timer::{TickTimer, TickToken};
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;
use std::time::Duration;

const INITIAL_SNAKE_LENGTH: i16 = 3;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cell {
    pub x: i16,
    pub y: i16,
}

impl Cell {
    pub const fn new(x: i16, y: i16) -> Self {
        Cell { x, y }
    }

    pub fn step(self, direction: Direction) -> Cell {
        match direction {
            Direction::Up => Cell { x: self.x, y: self.y - 1 },
            Direction::Down => Cell { x: self.x, y: self.y + 1 },
            Direction::Left => Cell { x: self.x - 1, y: self.y },
            Direction::Right => Cell { x: self.x + 1, y: self.y },
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Collision {
    Wall,
    Body,
}

/// What a single tick did to the game.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum TickOutcome {
    /// Paused, over, or the tick came from a schedule that has since been replaced.
    Skipped,
    Moved,
    Ate,
    Crashed(Collision),
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// Head first.
    pub snake: VecDeque<Cell>,
    pub direction: Direction,
    pub pending_direction: Direction,
    /// `None` only once the snake covers every cell.
    pub food: Option<Cell>,
    pub score: u32,
    pub best_score: u32,
    pub speed_multiplier: f64,
    pub paused: bool,
    pub game_over: bool,
}

impl GameState {
    pub fn head(&self) -> Cell {
        self.snake[0]
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.snake.contains(&cell)
    }
}

/// Owns the game state and applies every rule that changes it.
pub struct GameEngine<R: Rng, S: ScoreStore> {
    settings: Settings,
    state: GameState,
    timer: TickTimer,
    rng: R,
    store: S,
}

impl<R: Rng, S: ScoreStore> GameEngine<R, S> {
    pub fn new(settings: Settings, rng: R, store: S) -> Self {
        let best_score = store.get(BEST_SCORE_KEY).unwrap_or(0);
        let timer = TickTimer::new(settings.tick_interval(1.0));
        let mut engine = GameEngine {
            settings,
            state: GameState {
                snake: VecDeque::new(),
                direction: Direction::Right,
                pending_direction: Direction::Right,
                food: None,
                score: 0,
                best_score,
                speed_multiplier: 1.0,
                paused: false,
                game_over: false,
            },
            timer,
            rng,
            store,
        };
        engine.reset();
        engine
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Starts a fresh round. Also serves as restart from any state.
    pub fn reset(&mut self) {
        let center = Cell::new(self.settings.cols / 2, self.settings.rows / 2);
        self.state.snake = (0..INITIAL_SNAKE_LENGTH)
            .map(|i| Cell::new(center.x - i, center.y))
            .collect();
        self.state.direction = Direction::Right;
        self.state.pending_direction = Direction::Right;
        self.state.score = 0;
        self.state.speed_multiplier = 1.0;
        self.state.paused = false;
        self.state.game_over = false;
        self.place_food();
        self.timer.start(self.settings.tick_interval(1.0));
        info!("New round on a {}x{} grid", self.settings.cols, self.settings.rows);
    }

    pub fn set_direction(&mut self, requested: Direction) {
        if self.state.game_over || requested == self.state.direction.opposite() {
            return;
        }
        if self.state.pending_direction != requested {
            self.state.pending_direction = requested;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.state.game_over {
            return;
        }
        self.state.paused = !self.state.paused;
        if self.state.paused {
            self.timer.cancel();
        } else {
            self.timer.restart();
        }
    }

    /// Nudges the speed by `delta`, rounded to one decimal and clamped to the
    /// manual range.
    pub fn adjust_speed(&mut self, delta: f64) {
        let nudged = ((self.state.speed_multiplier + delta) * 10.0).round() / 10.0;
        self.state.speed_multiplier = nudged.clamp(SPEED_FLOOR, SPEED_CAP);
        self.reschedule();
    }

    fn reschedule(&mut self) {
        let interval = self.settings.tick_interval(self.state.speed_multiplier);
        self.timer.reschedule(interval);
        debug!(
            "Speed {:.2}x, tick every {:?}",
            self.state.speed_multiplier,
            self.timer.interval()
        );
    }

    /// Feeds frame time to the schedule and runs the tick if one is due.
    pub fn update(&mut self, dt: Duration) -> Option<TickOutcome> {
        let token = self.timer.poll(dt)?;
        Some(self.tick_scheduled(token))
    }

    /// Runs a tick only if `token` still belongs to the active schedule.
    pub fn tick_scheduled(&mut self, token: TickToken) -> TickOutcome {
        if !self.timer.is_current(token) {
            debug!("Dropping tick from a replaced schedule");
            return TickOutcome::Skipped;
        }
        self.tick()
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.state.paused || self.state.game_over {
            return TickOutcome::Skipped;
        }
        self.state.direction = self.state.pending_direction;
        let new_head = self.state.head().step(self.state.direction);

        if !self.in_bounds(new_head) {
            return self.crash(Collision::Wall);
        }

        let eats = self.state.food == Some(new_head);
        let grows = eats && self.state.speed_multiplier < SPEED_CAP;
        // The tail cell is vacated this tick unless the snake grows.
        let blocking = if grows {
            self.state.snake.len()
        } else {
            self.state.snake.len() - 1
        };
        if self.state.snake.iter().take(blocking).any(|&c| c == new_head) {
            return self.crash(Collision::Body);
        }

        self.state.snake.push_front(new_head);
        if !grows {
            self.state.snake.pop_back();
        }
        if !eats {
            return TickOutcome::Moved;
        }

        self.state.score += FOOD_REWARD;
        if self.state.score > self.state.best_score {
            self.state.best_score = self.state.score;
            self.store.set(BEST_SCORE_KEY, self.state.best_score);
            info!("New best score: {}", self.state.best_score);
        }
        self.place_food();
        if grows {
            self.state.speed_multiplier = (self.state.speed_multiplier + SPEED_STEP).min(SPEED_CAP);
            self.reschedule();
        }
        TickOutcome::Ate
    }

    fn crash(&mut self, collision: Collision) -> TickOutcome {
        debug!("Collision {:?} at score {}", collision, self.state.score);
        self.state.game_over = true;
        self.timer.cancel();
        TickOutcome::Crashed(collision)
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.settings.cols && cell.y >= 0 && cell.y < self.settings.rows
    }

    /// Drops food on a random free cell: rejection sampling first, then a scan
    /// of the free cells so a crowded grid still terminates.
    pub fn place_food(&mut self) {
        let (cols, rows) = (self.settings.cols, self.settings.rows);
        let attempts = cols as usize * rows as usize * 2;
        for _ in 0..attempts {
            let cell = Cell::new(self.rng.gen_range(0..cols), self.rng.gen_range(0..rows));
            if !self.state.occupies(cell) {
                self.state.food = Some(cell);
                return;
            }
        }

        let free: Vec<Cell> = (0..rows)
            .flat_map(|y| (0..cols).map(move |x| Cell::new(x, y)))
            .filter(|&cell| !self.state.occupies(cell))
            .collect();
        self.state.food = free.choose(&mut self.rng).copied();
        if self.state.food.is_none() {
            warn!("No free cell left for food");
        }
    }

    pub fn render(&self) -> Vec<DrawCommand> {
        render::frame(&self.state, &self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const RNG_SEED: u64 = 0x5eed;

    fn engine(cols: i16, rows: i16) -> GameEngine<StdRng, MemoryStore> {
        let settings = Settings { cols, rows, ..Settings::default() };
        GameEngine::new(settings, StdRng::seed_from_u64(RNG_SEED), MemoryStore::default())
    }

    fn with_snake(engine: &mut GameEngine<StdRng, MemoryStore>, cells: &[(i16, i16)], direction: Direction) {
        engine.state.snake = cells.iter().map(|&(x, y)| Cell::new(x, y)).collect();
        engine.state.direction = direction;
        engine.state.pending_direction = direction;
    }

    fn cells(engine: &GameEngine<StdRng, MemoryStore>) -> Vec<(i16, i16)> {
        engine.state.snake.iter().map(|c| (c.x, c.y)).collect()
    }

    #[test]
    fn test_reset_centers_snake() {
        let engine = engine(10, 10);
        let state = engine.state();
        assert_eq!(cells(&engine), vec![(5, 5), (4, 5), (3, 5)]);
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.score, 0);
        assert_eq!(state.speed_multiplier, 1.0);
        assert!(!state.paused && !state.game_over);
        let food = state.food.unwrap();
        assert!(!state.occupies(food));
        assert_eq!(engine.timer.interval(), Duration::from_millis(140));
    }

    #[test]
    fn test_eating_grows_and_speeds_up() {
        let mut engine = engine(10, 10);
        engine.state.food = Some(Cell::new(6, 5));

        assert_eq!(engine.tick(), TickOutcome::Ate);
        let state = engine.state();
        assert_eq!(state.head(), Cell::new(6, 5));
        assert_eq!(state.score, 10);
        assert_eq!(state.snake.len(), 4);
        assert!((state.speed_multiplier - 1.05).abs() < 1e-9);
        assert_eq!(engine.timer.interval(), engine.settings().tick_interval(state.speed_multiplier));
        assert!(!state.occupies(state.food.unwrap()));
    }

    #[test]
    fn test_eating_at_cap_keeps_length() {
        let mut engine = engine(10, 10);
        engine.state.speed_multiplier = SPEED_CAP;
        engine.state.food = Some(Cell::new(6, 5));

        assert_eq!(engine.tick(), TickOutcome::Ate);
        assert_eq!(cells(&engine), vec![(6, 5), (5, 5), (4, 5)]);
        assert_eq!(engine.state().score, 10);
        assert_eq!(engine.state().speed_multiplier, SPEED_CAP);
    }

    #[test]
    fn test_plain_move_keeps_length() {
        let mut engine = engine(10, 10);
        engine.state.food = Some(Cell::new(0, 0));

        assert_eq!(engine.tick(), TickOutcome::Moved);
        assert_eq!(cells(&engine), vec![(6, 5), (5, 5), (4, 5)]);
        assert_eq!(engine.state().score, 0);
    }

    #[test]
    fn test_wall_collision_ends_game() {
        let mut engine = engine(10, 10);
        with_snake(&mut engine, &[(0, 5), (1, 5), (2, 5)], Direction::Left);

        assert_eq!(engine.tick(), TickOutcome::Crashed(Collision::Wall));
        assert!(engine.state().game_over);
        assert_eq!(cells(&engine), vec![(0, 5), (1, 5), (2, 5)]);

        // Over is terminal: nothing moves until restart.
        assert_eq!(engine.tick(), TickOutcome::Skipped);
        assert!(engine.update(Duration::from_secs(1)).is_none());
        engine.toggle_pause();
        assert!(!engine.state().paused);
    }

    #[test]
    fn test_opposite_direction_rejected() {
        let mut engine = engine(10, 10);
        engine.state.food = Some(Cell::new(0, 0));
        engine.set_direction(Direction::Left);
        assert_eq!(engine.state().pending_direction, Direction::Right);

        engine.tick();
        assert_eq!(engine.state().direction, Direction::Right);
        assert_eq!(engine.state().head(), Cell::new(6, 5));
    }

    #[test]
    fn test_set_direction_is_idempotent() {
        let mut engine = engine(10, 10);
        engine.set_direction(Direction::Up);
        engine.set_direction(Direction::Up);
        assert_eq!(engine.state().pending_direction, Direction::Up);
        assert_eq!(engine.state().direction, Direction::Right);
    }

    #[test]
    fn test_direction_ignored_after_game_over() {
        let mut engine = engine(10, 10);
        engine.state.game_over = true;
        engine.set_direction(Direction::Up);
        assert_eq!(engine.state().pending_direction, Direction::Right);
    }

    #[test]
    fn test_moving_into_vacated_tail_is_allowed() {
        let mut engine = engine(10, 10);
        engine.state.food = Some(Cell::new(0, 0));
        // A 2x2 loop heading up; left of the head is the tail.
        with_snake(&mut engine, &[(5, 5), (5, 6), (4, 6), (4, 5)], Direction::Up);
        engine.set_direction(Direction::Left);

        assert_eq!(engine.tick(), TickOutcome::Moved);
        assert_eq!(cells(&engine), vec![(4, 5), (5, 5), (5, 6), (4, 6)]);
        assert!(!engine.state().game_over);
    }

    #[test]
    fn test_moving_into_body_ends_game() {
        let mut engine = engine(10, 10);
        engine.state.food = Some(Cell::new(0, 0));
        with_snake(&mut engine, &[(5, 5), (5, 6), (4, 6), (4, 5), (4, 4)], Direction::Up);
        engine.set_direction(Direction::Left);

        assert_eq!(engine.tick(), TickOutcome::Crashed(Collision::Body));
        assert!(engine.state().game_over);
        assert_eq!(engine.state().snake.len(), 5);
    }

    #[test]
    fn test_best_score_persists_across_engines() {
        let mut engine = engine(10, 10);
        engine.state.food = Some(Cell::new(6, 5));
        engine.tick();
        assert_eq!(engine.state().best_score, 10);
        assert_eq!(engine.store.get(BEST_SCORE_KEY), Some(10));

        let store = engine.store.clone();
        let settings = Settings { cols: 10, rows: 10, ..Settings::default() };
        let reloaded = GameEngine::new(settings, StdRng::seed_from_u64(RNG_SEED), store);
        assert_eq!(reloaded.state().best_score, 10);
        assert_eq!(reloaded.state().score, 0);
    }

    #[test]
    fn test_best_score_not_lowered() {
        let mut store = MemoryStore::default();
        store.set(BEST_SCORE_KEY, 50);
        let settings = Settings { cols: 10, rows: 10, ..Settings::default() };
        let mut engine = GameEngine::new(settings, StdRng::seed_from_u64(RNG_SEED), store);
        engine.state.food = Some(Cell::new(6, 5));
        engine.tick();

        assert_eq!(engine.state().best_score, 50);
        assert_eq!(engine.store.get(BEST_SCORE_KEY), Some(50));
    }

    #[test]
    fn test_adjust_speed_rounds_and_clamps() {
        let mut engine = engine(10, 10);
        engine.adjust_speed(0.1);
        assert!((engine.state().speed_multiplier - 1.1).abs() < 1e-9);
        assert_eq!(engine.timer.interval(), engine.settings().tick_interval(1.1));

        for _ in 0..40 {
            engine.adjust_speed(0.1);
        }
        assert_eq!(engine.state().speed_multiplier, SPEED_CAP);

        for _ in 0..40 {
            engine.adjust_speed(-0.1);
        }
        assert_eq!(engine.state().speed_multiplier, SPEED_FLOOR);

        engine.state.speed_multiplier = 1.04;
        engine.adjust_speed(-0.1);
        assert!((engine.state().speed_multiplier - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_pause_freezes_ticks() {
        let mut engine = engine(10, 10);
        engine.toggle_pause();
        let before = engine.state().clone();

        assert_eq!(engine.tick(), TickOutcome::Skipped);
        assert!(engine.update(Duration::from_secs(1)).is_none());
        assert_eq!(engine.state(), &before);

        engine.toggle_pause();
        assert!(!engine.state().paused);
        assert!(engine.update(Duration::from_millis(100)).is_none());
        assert!(engine.update(Duration::from_millis(40)).is_some());
    }

    #[test]
    fn test_speed_change_while_paused_applies_on_resume() {
        let mut engine = engine(10, 10);
        engine.toggle_pause();
        engine.adjust_speed(1.0);
        engine.toggle_pause();

        assert_eq!(engine.timer.interval(), Duration::from_millis(70));
        assert!(engine.update(Duration::from_millis(70)).is_some());
    }

    #[test]
    fn test_stale_token_is_ignored() {
        let mut engine = engine(10, 10);
        engine.timer.start(Duration::from_millis(10));
        let token = engine.timer.poll(Duration::from_millis(10)).unwrap();
        engine.reset();

        assert_eq!(engine.tick_scheduled(token), TickOutcome::Skipped);
        assert_eq!(cells(&engine), vec![(5, 5), (4, 5), (3, 5)]);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut engine = engine(10, 10);
        with_snake(&mut engine, &[(9, 0), (8, 0), (7, 0)], Direction::Up);
        engine.tick();
        assert!(engine.state().game_over);

        engine.reset();
        assert!(!engine.state().game_over);
        assert_eq!(cells(&engine), vec![(5, 5), (4, 5), (3, 5)]);
        assert!(engine.update(Duration::from_millis(140)).is_some());
    }

    #[test]
    fn test_food_fills_last_free_cell() {
        let mut engine = engine(4, 1);
        assert_eq!(cells(&engine), vec![(2, 0), (1, 0), (0, 0)]);
        assert_eq!(engine.state().food, Some(Cell::new(3, 0)));

        with_snake(&mut engine, &[(3, 0), (2, 0), (1, 0), (0, 0)], Direction::Right);
        engine.place_food();
        assert_eq!(engine.state().food, None);
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        let mut engine = engine(8, 6);
        let mut rng = StdRng::seed_from_u64(RNG_SEED + 1);
        let directions = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

        for _ in 0..2000 {
            let before = engine.state().clone();
            engine.set_direction(*directions.choose(&mut rng).unwrap());
            let outcome = engine.tick();
            let state = engine.state();

            assert!(state.snake.iter().all(|c| engine.in_bounds(*c)));
            assert_ne!(state.direction, before.direction.opposite());
            for (i, a) in state.snake.iter().enumerate() {
                assert!(!state.snake.iter().skip(i + 1).any(|b| b == a));
            }
            if let Some(food) = state.food {
                assert!(!state.occupies(food));
            }
            match outcome {
                TickOutcome::Moved => assert_eq!(state.snake.len(), before.snake.len()),
                TickOutcome::Ate if before.speed_multiplier < SPEED_CAP => {
                    assert_eq!(state.snake.len(), before.snake.len() + 1)
                }
                TickOutcome::Ate => assert_eq!(state.snake.len(), before.snake.len()),
                TickOutcome::Crashed(_) => {
                    assert_eq!(state.snake, before.snake);
                    engine.reset();
                }
                TickOutcome::Skipped => unreachable!(),
            }
        }
    }
}
