use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::warn;

use super::{
    config::GameConfig,
    state::{CollisionType, GameState, Position, Snake},
};

/// What happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Whether the snake ate the fruit this tick
    pub ate_fruit: bool,
    /// Type of collision if one occurred
    pub collision: Option<CollisionType>,
    /// Whether the round is over
    pub terminated: bool,
}

impl TickOutcome {
    fn idle() -> Self {
        Self {
            ate_fruit: false,
            collision: None,
            terminated: true,
        }
    }
}

/// Drives the snake simulation: round setup, ticks and fruit placement
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Engine with reproducible fruit placement
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fresh round: starting snake heading right, empty queue, score zero
    pub fn reset(&mut self) -> GameState {
        let snake = self.config.starting_snake();
        let food = self.spawn_food(&snake);

        let mut state = GameState::new(
            snake,
            Position::new(0, 0),
            self.config.grid_width,
            self.config.grid_height,
        )
        .with_queue_capacity(self.config.move_queue_capacity);
        state.food = food;
        state
    }

    /// Advance the round by one cell
    pub fn tick(&mut self, state: &mut GameState) -> TickOutcome {
        if !state.is_alive {
            return TickOutcome::idle();
        }

        // A queued reversal is consumed but leaves the heading unchanged
        if let Some(next) = state.next_move() {
            if !state.snake.direction.is_opposite(next) {
                state.snake.direction = next;
            }
        }

        let new_head = state.snake.head().moved_in_direction(state.snake.direction);
        state.steps += 1;

        if let Some(collision) = self.check_collision(state, new_head) {
            state.is_alive = false;
            return TickOutcome {
                ate_fruit: false,
                collision: Some(collision),
                terminated: true,
            };
        }

        let ate_fruit = state.food == Some(new_head);
        state.snake.advance_to(new_head, ate_fruit);

        if ate_fruit {
            state.score += 1;
            state.food = self.spawn_food(&state.snake);
        }

        TickOutcome {
            ate_fruit,
            collision: None,
            terminated: false,
        }
    }

    /// Collision test against the body as it stands before this tick's tail removal
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.snake.occupies(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a free cell off row 0 and column 0 for the next fruit
    fn spawn_food(&mut self, snake: &Snake) -> Option<Position> {
        let width = self.config.grid_width as i32;
        let height = self.config.grid_height as i32;
        if width < 2 || height < 2 {
            return None;
        }

        for _ in 0..self.config.max_fruit_attempts {
            let pos = Position::new(self.rng.gen_range(1..width), self.rng.gen_range(1..height));
            if !snake.occupies(pos) {
                return Some(pos);
            }
        }

        let free: Vec<Position> = (1..height)
            .flat_map(|y| (1..width).map(move |x| Position::new(x, y)))
            .filter(|pos| !snake.occupies(*pos))
            .collect();

        let choice = free.choose(&mut self.rng).copied();
        warn!(
            free_cells = free.len(),
            snake_len = snake.len(),
            placed = choice.is_some(),
            "fruit placement fell back to scanning free cells"
        );
        choice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::default(), 7)
    }

    fn steer_toward_food(state: &GameState) -> Direction {
        let head = state.snake.head();
        match state.food {
            Some(food) if food.x > head.x => Direction::Right,
            Some(food) if food.x < head.x => Direction::Left,
            Some(food) if food.y > head.y => Direction::Down,
            _ => Direction::Up,
        }
    }

    #[test]
    fn test_reset() {
        let mut engine = engine();
        let state = engine.reset();

        assert!(state.is_alive);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.pending_len(), 0);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), Position::new(10, 8));
        assert_eq!(state.snake.direction, Direction::Right);

        let food = state.food.unwrap();
        assert!(!state.snake.occupies(food));
        assert!(food.x >= 1 && food.y >= 1);
    }

    #[test]
    fn test_reset_clears_previous_round() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.enqueue_move(Direction::Up);
        state.score = 4;
        state.is_alive = false;

        let state = engine.reset();
        assert!(state.is_alive);
        assert_eq!(state.score, 0);
        assert_eq!(state.pending_len(), 0);
    }

    #[test]
    fn test_queued_turn_moves_head_up() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.food = Some(Position::new(1, 1));

        state.enqueue_move(Direction::Up);
        let outcome = engine.tick(&mut state);

        assert!(!outcome.terminated);
        assert_eq!(state.snake.head(), Position::new(10, 7));
        assert_eq!(state.snake.direction, Direction::Up);
        assert_eq!(state.snake.len(), 3);
        assert!(state.is_alive);
    }

    #[test]
    fn test_queued_reversal_is_rejected() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.food = Some(Position::new(1, 1));

        state.enqueue_move(Direction::Left);
        engine.tick(&mut state);

        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.snake.head(), Position::new(11, 8));
        assert_eq!(state.pending_len(), 0);
    }

    #[test]
    fn test_one_queued_move_consumed_per_tick() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.food = Some(Position::new(1, 1));

        state.enqueue_move(Direction::Up);
        state.enqueue_move(Direction::Left);
        engine.tick(&mut state);
        assert_eq!(state.snake.direction, Direction::Up);
        assert_eq!(state.pending_len(), 1);

        engine.tick(&mut state);
        assert_eq!(state.snake.direction, Direction::Left);
        assert_eq!(state.snake.head(), Position::new(9, 7));
    }

    #[test]
    fn test_food_consumption_grows_and_respawns() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.food = Some(Position::new(11, 8));

        let outcome = engine.tick(&mut state);

        assert!(outcome.ate_fruit);
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 4);
        let food = state.food.unwrap();
        assert!(!state.snake.occupies(food));
    }

    #[test]
    fn test_wall_collision_is_terminal() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.food = Some(Position::new(20, 1));

        state.enqueue_move(Direction::Up);
        engine.tick(&mut state);
        state.enqueue_move(Direction::Left);

        let mut last = None;
        for _ in 0..20 {
            let outcome = engine.tick(&mut state);
            if outcome.collision.is_some() {
                last = outcome.collision;
            }
        }

        assert!(!state.is_alive);
        assert_eq!(last, Some(CollisionType::Wall));
        assert_eq!(state.snake.head(), Position::new(0, 7));

        let steps = state.steps;
        let outcome = engine.tick(&mut state);
        assert!(outcome.terminated);
        assert!(!state.is_alive);
        assert_eq!(state.steps, steps);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 1);
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 5);
        let mut state = GameState::new(snake, Position::new(8, 8), 10, 10);

        // Right, Down, Left, Up loops the head back into its own body
        state.enqueue_move(Direction::Down);
        state.enqueue_move(Direction::Left);
        state.enqueue_move(Direction::Up);
        engine.tick(&mut state);
        engine.tick(&mut state);
        let outcome = engine.tick(&mut state);

        assert!(outcome.terminated);
        assert_eq!(outcome.collision, Some(CollisionType::SelfCollision));
    }

    #[test]
    fn test_tail_cell_counts_as_body_on_the_same_tick() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 1);
        // Square loop: head at (5,5) with the tail at (5,4), right above it
        let snake = Snake {
            body: vec![
                Position::new(5, 5),
                Position::new(6, 5),
                Position::new(6, 4),
                Position::new(5, 4),
            ],
            direction: Direction::Left,
        };
        let mut state = GameState::new(snake, Position::new(8, 8), 10, 10);

        state.enqueue_move(Direction::Up);
        let outcome = engine.tick(&mut state);

        assert_eq!(outcome.collision, Some(CollisionType::SelfCollision));
    }

    #[test]
    fn test_body_length_tracks_score_and_fruit_stays_off_body() {
        let mut engine = engine();

        for _ in 0..5 {
            let mut state = engine.reset();
            for _ in 0..400 {
                state.enqueue_move(steer_toward_food(&state));
                engine.tick(&mut state);
                if !state.is_alive {
                    break;
                }
                assert_eq!(state.snake.len(), 3 + state.score as usize);
                if let Some(food) = state.food {
                    assert!(!state.snake.occupies(food));
                }
            }
        }
    }

    #[test]
    fn test_fruit_fallback_finds_last_free_cell() {
        let config = GameConfig {
            max_fruit_attempts: 0,
            ..GameConfig::new(3, 3)
        };
        let mut engine = GameEngine::with_seed(config, 3);
        let snake = Snake {
            body: vec![Position::new(1, 1), Position::new(2, 1), Position::new(2, 2)],
            direction: Direction::Left,
        };

        assert_eq!(engine.spawn_food(&snake), Some(Position::new(1, 2)));
    }

    #[test]
    fn test_fruit_absent_when_board_is_full() {
        let mut engine = GameEngine::with_seed(GameConfig::new(3, 3), 3);
        let snake = Snake {
            body: vec![
                Position::new(1, 1),
                Position::new(2, 1),
                Position::new(2, 2),
                Position::new(1, 2),
            ],
            direction: Direction::Down,
        };

        assert_eq!(engine.spawn_food(&snake), None);
    }
}
