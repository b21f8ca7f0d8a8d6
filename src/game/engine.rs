use log::{debug, info, warn};
use rand::{Rng, rngs::StdRng, seq::SliceRandom};

use super::{
    action::Direction,
    config::{GameConfig, INITIAL_SNAKE_LENGTH},
    error::Result,
    grid::Cell,
    obstacles::load_obstacles,
    placement::{sample_free_cell, sample_spawn},
    state::{FoodKind, FoodPool, ObstacleSet, Occupancy, Round, Snake},
};

/// Why a snake was taken out of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elimination {
    /// Ran off a solid border
    Border,
    Obstacle,
    SelfCollision,
    /// Ran into the body of the snake at this index
    Snake(usize),
}

/// What happened to one snake during a tick
#[derive(Debug, Clone, PartialEq)]
pub struct SnakeEvent {
    pub player: usize,
    /// Food eaten this tick
    pub ate: Option<FoodKind>,
    pub elimination: Option<Elimination>,
}

/// Events of all snakes that moved during a tick, in update order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub events: Vec<SnakeEvent>,
}

impl TickReport {
    pub fn eliminations(&self) -> impl Iterator<Item = (usize, Elimination)> + '_ {
        self.events
            .iter()
            .filter_map(|event| event.elimination.map(|cause| (event.player, cause)))
    }
}

/// The rule engine: builds rounds and advances them tick by tick
pub struct GameEngine<R = StdRng> {
    config: GameConfig,
    rng: R,
}

impl<R: Rng> GameEngine<R> {
    /// Create a new game engine with the given configuration and random source
    pub fn new(config: GameConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build a fresh round: obstacles first, then snakes, then food
    pub fn new_round(&mut self) -> Result<Round> {
        let grid = self.config.grid();

        let obstacles = match self.config.obstacles.choose(&mut self.rng) {
            Some(path) => {
                debug!("using obstacle map {:?}", path);
                load_obstacles(path, &grid)?
            }
            None => ObstacleSet::new(),
        };

        let mut food = FoodPool::new();
        let mut snakes: Vec<Snake> = Vec::with_capacity(self.config.players.len());
        for player in &self.config.players {
            let occupancy = Occupancy {
                obstacles: &obstacles,
                food: &food,
                snakes: &snakes,
            };
            let tail = sample_spawn(
                &mut self.rng,
                &grid,
                occupancy,
                Direction::Right,
                INITIAL_SNAKE_LENGTH,
            )?;
            snakes.push(Snake::new(
                player.name.clone(),
                player.color,
                tail,
                Direction::Right,
                INITIAL_SNAKE_LENGTH,
                grid.field_size,
            ));
        }

        let kinds = std::iter::repeat_n(FoodKind::Regular, self.config.food as usize)
            .chain(std::iter::repeat_n(FoodKind::Super, self.config.super_food as usize));
        for kind in kinds {
            let occupancy = Occupancy {
                obstacles: &obstacles,
                food: &food,
                snakes: &snakes,
            };
            let cell = sample_free_cell(&mut self.rng, &grid, occupancy)?;
            food.push(cell, kind);
        }

        info!(
            "new round: {} snake(s), {} food, {} obstacle cell(s)",
            snakes.len(),
            food.len(),
            obstacles.len()
        );

        Ok(Round::new(grid, snakes, food, obstacles))
    }

    /// Advance every living snake by one step, in index order
    ///
    /// Each snake sees the state left by the snakes updated before it in the
    /// same tick.
    pub fn tick(&mut self, round: &mut Round) -> TickReport {
        let mut report = TickReport::default();

        for index in 0..round.snakes.len() {
            if !round.snakes[index].alive {
                continue;
            }
            report.events.push(self.advance(round, index));
        }

        round.ticks += 1;
        report
    }

    fn advance(&mut self, round: &mut Round, index: usize) -> SnakeEvent {
        let mut event = SnakeEvent {
            player: index,
            ate: None,
            elimination: None,
        };

        let snake = &round.snakes[index];
        let Some(new_head) = round.grid.step(snake.head(), snake.heading) else {
            event.elimination = Some(self.eliminate(round, index, Elimination::Border));
            return event;
        };

        round.snakes[index].segments.push_back(new_head);

        // only the first matching slot is eaten
        match round.food.slot_at(new_head) {
            Some(slot) => {
                let kind = round.food.items()[slot].kind;
                let reward = self.reward(kind);
                let snake = &mut round.snakes[index];
                snake.score = snake.score.saturating_add(reward);
                event.ate = Some(kind);

                // on a full board the item stays put until a cell frees up
                match sample_free_cell(&mut self.rng, &round.grid, round.occupancy()) {
                    Ok(cell) => {
                        round.food.relocate(slot, cell);
                        debug!(
                            "{} ate {:?} food at {}, respawned at {}",
                            round.snakes[index].name, kind, new_head, cell
                        );
                    }
                    Err(err) => {
                        warn!(
                            "{} ate {:?} food at {}, left in place: {}",
                            round.snakes[index].name, kind, new_head, err
                        );
                    }
                }
            }
            None => {
                round.snakes[index].segments.pop_front();
            }
        }

        let collision = if round.obstacles.contains(&new_head) {
            Some(Elimination::Obstacle)
        } else {
            body_collision(&round.snakes, index, new_head)
        };
        if let Some(cause) = collision {
            event.elimination = Some(self.eliminate(round, index, cause));
        }

        event
    }

    fn eliminate(&self, round: &mut Round, index: usize, cause: Elimination) -> Elimination {
        let snake = &mut round.snakes[index];
        snake.alive = false;
        info!(
            "{} eliminated at tick {} ({:?}), score {}",
            snake.name, round.ticks, cause, snake.score
        );
        cause
    }

    fn reward(&self, kind: FoodKind) -> u32 {
        match kind {
            FoodKind::Regular => self.config.food_score,
            FoodKind::Super => self.config.super_food_score,
        }
    }
}

/// Find a body segment under `head`, ignoring the head of the moving snake itself
fn body_collision(snakes: &[Snake], index: usize, head: Cell) -> Option<Elimination> {
    snakes.iter().enumerate().find_map(|(other, snake)| {
        let own_head = (other == index).then(|| snake.len() - 1);
        let hit = snake
            .segments
            .iter()
            .enumerate()
            .any(|(segment, cell)| *cell == head && Some(segment) != own_head);

        hit.then_some(if other == index {
            Elimination::SelfCollision
        } else {
            Elimination::Snake(other)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::{Color, PlayerConfig};
    use crate::game::error::GameError;
    use crate::game::grid::{BorderPolicy, Grid};
    use image::{Rgba, RgbaImage};
    use rand::SeedableRng;

    fn engine(config: GameConfig) -> GameEngine<StdRng> {
        GameEngine::new(config, StdRng::seed_from_u64(42))
    }

    fn snake(name: &str, tail: Cell, heading: Direction) -> Snake {
        Snake::new(name, Color(0x00FF00FF), tail, heading, 5, 20)
    }

    fn round(snakes: Vec<Snake>, food: &[Cell], border: BorderPolicy) -> Round {
        let mut pool = FoodPool::new();
        for cell in food {
            pool.push(*cell, FoodKind::Regular);
        }
        Round::new(Grid::new(200, 200, 20, border), snakes, pool, ObstacleSet::new())
    }

    #[test]
    fn test_new_round() {
        let config = GameConfig {
            players: vec![
                PlayerConfig::default(),
                PlayerConfig::default(),
                PlayerConfig::default(),
            ],
            food: 4,
            super_food: 2,
            ..Default::default()
        };
        let mut engine = engine(config);
        let round = engine.new_round().unwrap();

        assert_eq!(round.snakes.len(), 3);
        assert_eq!(round.food.len(), 6);
        assert_eq!(round.ticks, 0);
        assert!(round.obstacles.is_empty());

        for snake in &round.snakes {
            assert!(snake.alive);
            assert_eq!(snake.len(), INITIAL_SNAKE_LENGTH);
            assert_eq!(snake.heading, Direction::Right);
            assert_eq!(snake.score, 0);
            assert!(snake.segments.iter().all(|cell| round.grid.contains(*cell)));
        }

        // no two things share a cell
        let mut cells: Vec<Cell> = round
            .snakes
            .iter()
            .flat_map(|snake| snake.segments.iter().copied())
            .chain(round.food.items().iter().map(|item| item.cell))
            .collect();
        let total = cells.len();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), total);
    }

    #[test]
    fn test_new_round_with_obstacle_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wall.png");
        let mut bitmap = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        for y in 0..10 {
            bitmap.put_pixel(5, y, Rgba([0, 0, 0, 255]));
        }
        bitmap.save(&path).unwrap();

        let config = GameConfig {
            width: 200,
            height: 200,
            obstacles: vec![path],
            ..Default::default()
        };
        let mut engine = engine(config);
        let round = engine.new_round().unwrap();

        assert_eq!(round.obstacles.len(), 10);
        for snake in &round.snakes {
            assert!(snake.segments.iter().all(|cell| !round.obstacles.contains(cell)));
        }
        for item in round.food.items() {
            assert!(!round.obstacles.contains(&item.cell));
        }
    }

    #[test]
    fn test_new_round_rejects_mismatched_obstacle_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.png");
        RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 255]))
            .save(&path)
            .unwrap();

        let mut engine = engine(GameConfig {
            obstacles: vec![path],
            ..Default::default()
        });
        assert!(matches!(
            engine.new_round(),
            Err(GameError::InvalidObstacleImage { .. })
        ));
    }

    #[test]
    fn test_new_round_exhausts_tiny_arena() {
        let mut engine = engine(GameConfig {
            width: 100,
            height: 20,
            players: vec![PlayerConfig::default(), PlayerConfig::default()],
            ..Default::default()
        });
        assert!(matches!(
            engine.new_round(),
            Err(GameError::PlacementExhausted { .. })
        ));
    }

    #[test]
    fn test_move_without_food() {
        let mut engine = engine(GameConfig::default());
        let mut round = round(
            vec![snake("a", Cell::new(20, 100), Direction::Right)],
            &[Cell::new(0, 0)],
            BorderPolicy::Solid,
        );

        let report = engine.tick(&mut round);

        let snake = &round.snakes[0];
        assert_eq!(snake.len(), 5);
        assert_eq!(snake.head(), Cell::new(120, 100));
        assert_eq!(snake.tail(), Cell::new(40, 100));
        assert_eq!(snake.score, 0);
        assert!(snake.alive);
        assert_eq!(round.ticks, 1);
        assert_eq!(report.events[0].ate, None);
        assert_eq!(report.events[0].elimination, None);
    }

    #[test]
    fn test_food_consumption_grows_snake() {
        let mut engine = engine(GameConfig::default());
        let mut round = round(
            vec![snake("a", Cell::new(20, 100), Direction::Right)],
            &[Cell::new(120, 100), Cell::new(0, 0)],
            BorderPolicy::Solid,
        );

        let report = engine.tick(&mut round);

        let snake = &round.snakes[0];
        assert_eq!(snake.len(), 6);
        assert_eq!(snake.tail(), Cell::new(20, 100));
        assert_eq!(snake.head(), Cell::new(120, 100));
        assert_eq!(snake.score, 10);
        assert_eq!(report.events[0].ate, Some(FoodKind::Regular));

        assert_eq!(round.food.len(), 2);
        assert_eq!(round.food.items()[1].cell, Cell::new(0, 0));
        let respawned = round.food.items()[0].cell;
        assert!(!snake.occupies(respawned));
        assert_ne!(respawned, Cell::new(0, 0));
    }

    #[test]
    fn test_super_food_reward() {
        let mut engine = engine(GameConfig {
            super_food_score: 50,
            ..Default::default()
        });
        let mut round = round(
            vec![snake("a", Cell::new(20, 100), Direction::Right)],
            &[],
            BorderPolicy::Solid,
        );
        round.food.push(Cell::new(120, 100), FoodKind::Super);

        engine.tick(&mut round);

        assert_eq!(round.snakes[0].score, 50);
        assert_eq!(round.food.items()[0].kind, FoodKind::Super);
    }

    #[test]
    fn test_only_one_food_per_tick() {
        let mut engine = engine(GameConfig::default());
        let mut round = round(
            vec![snake("a", Cell::new(20, 100), Direction::Right)],
            &[Cell::new(120, 100), Cell::new(120, 100)],
            BorderPolicy::Solid,
        );

        engine.tick(&mut round);

        assert_eq!(round.snakes[0].score, 10);
        assert_eq!(round.snakes[0].len(), 6);
        assert_ne!(round.food.items()[0].cell, Cell::new(120, 100));
        assert_eq!(round.food.items()[1].cell, Cell::new(120, 100));
    }

    #[test]
    fn test_frozen_snake_is_untouched() {
        let mut engine = engine(GameConfig::default());
        let mut frozen = snake("a", Cell::new(20, 100), Direction::Right);
        frozen.alive = false;
        let before = frozen.clone();
        let mut round = round(vec![frozen], &[Cell::new(120, 100)], BorderPolicy::Solid);

        let report = engine.tick(&mut round);

        assert_eq!(round.snakes[0], before);
        assert!(report.events.is_empty());
        assert_eq!(round.food.items()[0].cell, Cell::new(120, 100));
    }

    #[test]
    fn test_solid_border_eliminates_without_growth() {
        let mut engine = engine(GameConfig::default());
        let snake = snake("a", Cell::new(80, 100), Direction::Left);
        assert_eq!(snake.head(), Cell::new(0, 100));
        let before = snake.segments.clone();
        let mut round = round(vec![snake], &[Cell::new(0, 0)], BorderPolicy::Solid);

        let report = engine.tick(&mut round);

        assert!(!round.snakes[0].alive);
        assert_eq!(round.snakes[0].segments, before);
        assert_eq!(
            report.eliminations().collect::<Vec<_>>(),
            vec![(0, Elimination::Border)]
        );
    }

    #[test]
    fn test_wrap_border() {
        let mut engine = engine(GameConfig::default());
        let mut round = round(
            vec![
                snake("left", Cell::new(80, 100), Direction::Left),
                snake("right", Cell::new(100, 40), Direction::Right),
            ],
            &[Cell::new(0, 0)],
            BorderPolicy::Wrap,
        );
        assert_eq!(round.snakes[1].head(), Cell::new(180, 40));

        engine.tick(&mut round);

        assert!(round.snakes[0].alive);
        assert_eq!(round.snakes[0].head(), Cell::new(180, 100));
        assert_eq!(round.snakes[0].len(), 5);
        assert!(round.snakes[1].alive);
        assert_eq!(round.snakes[1].head(), Cell::new(0, 40));
    }

    #[test]
    fn test_obstacle_collision() {
        let mut engine = engine(GameConfig::default());
        let mut round = round(
            vec![snake("a", Cell::new(20, 100), Direction::Right)],
            &[Cell::new(0, 0)],
            BorderPolicy::Solid,
        );
        round.obstacles.insert(Cell::new(120, 100));

        let report = engine.tick(&mut round);

        assert!(!round.snakes[0].alive);
        assert_eq!(round.snakes[0].head(), Cell::new(120, 100));
        assert_eq!(report.events[0].elimination, Some(Elimination::Obstacle));
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine(GameConfig::default());
        // Body: (40,100) .. (120,100), head at (120,100)
        let mut round = round(
            vec![snake("a", Cell::new(40, 100), Direction::Right)],
            &[Cell::new(0, 0)],
            BorderPolicy::Solid,
        );

        // Down: head (120,120)
        round.snakes[0].heading = Direction::Down;
        engine.tick(&mut round);
        // Left: head (100,120)
        round.snakes[0].heading = Direction::Left;
        engine.tick(&mut round);
        assert!(round.snakes[0].alive);
        // Up: (100,100) is still part of the body
        round.snakes[0].heading = Direction::Up;
        let report = engine.tick(&mut round);

        assert!(!round.snakes[0].alive);
        assert_eq!(report.events[0].elimination, Some(Elimination::SelfCollision));
    }

    #[test]
    fn test_reversing_into_neck_is_fatal() {
        let mut engine = engine(GameConfig::default());
        let mut round = round(
            vec![snake("a", Cell::new(40, 100), Direction::Right)],
            &[Cell::new(0, 0)],
            BorderPolicy::Solid,
        );
        round.snakes[0].heading = Direction::Left;

        engine.tick(&mut round);

        assert!(!round.snakes[0].alive);
    }

    #[test]
    fn test_moving_into_vacated_tail_is_safe() {
        let mut engine = engine(GameConfig::default());
        // a 2x2 loop: the head chases the tail around
        let mut looping = snake("a", Cell::new(40, 40), Direction::Right);
        looping.segments = [
            Cell::new(40, 60),
            Cell::new(40, 40),
            Cell::new(60, 40),
            Cell::new(60, 60),
        ]
        .into_iter()
        .collect();
        looping.heading = Direction::Left;
        let mut round = round(vec![looping], &[Cell::new(0, 0)], BorderPolicy::Solid);

        engine.tick(&mut round);

        assert!(round.snakes[0].alive);
        assert_eq!(round.snakes[0].head(), Cell::new(40, 60));
    }

    #[test]
    fn test_collision_with_other_snake() {
        let mut engine = engine(GameConfig::default());
        let mut round = round(
            vec![
                snake("a", Cell::new(0, 100), Direction::Right),
                snake("b", Cell::new(40, 0), Direction::Down),
            ],
            &[Cell::new(0, 0)],
            BorderPolicy::Solid,
        );
        // b's next step lands on the middle of a's body
        assert_eq!(round.snakes[1].head(), Cell::new(40, 80));

        let report = engine.tick(&mut round);

        assert!(round.snakes[0].alive);
        assert!(!round.snakes[1].alive);
        assert_eq!(
            report.eliminations().collect::<Vec<_>>(),
            vec![(1, Elimination::Snake(0))]
        );
    }

    #[test]
    fn test_later_snake_sees_earlier_moves() {
        let mut engine = engine(GameConfig::default());
        // a's head moves to (100,100); b's head then moves onto it
        let mut round = round(
            vec![
                snake("a", Cell::new(0, 100), Direction::Right),
                snake("b", Cell::new(100, 0), Direction::Down),
            ],
            &[Cell::new(0, 0)],
            BorderPolicy::Solid,
        );
        assert_eq!(round.snakes[0].head(), Cell::new(80, 100));
        assert_eq!(round.snakes[1].head(), Cell::new(100, 80));

        engine.tick(&mut round);

        assert!(round.snakes[0].alive);
        assert!(!round.snakes[1].alive);
        assert_eq!(round.snakes[1].head(), Cell::new(100, 100));
    }

    #[test]
    fn test_earlier_snake_does_not_see_later_moves() {
        let mut engine = engine(GameConfig::default());
        // same meeting point, update order swapped
        let mut round = round(
            vec![
                snake("b", Cell::new(100, 0), Direction::Down),
                snake("a", Cell::new(0, 100), Direction::Right),
            ],
            &[Cell::new(0, 0)],
            BorderPolicy::Solid,
        );

        engine.tick(&mut round);

        assert!(round.snakes[0].alive);
        assert!(!round.snakes[1].alive);
    }

    #[test]
    fn test_eliminated_body_still_blocks() {
        let mut engine = engine(GameConfig::default());
        let mut dead = snake("dead", Cell::new(100, 0), Direction::Down);
        dead.alive = false;
        let mut round = round(
            vec![dead, snake("a", Cell::new(0, 40), Direction::Right)],
            &[Cell::new(180, 180)],
            BorderPolicy::Solid,
        );

        engine.tick(&mut round);

        assert_eq!(round.snakes[1].head(), Cell::new(100, 40));
        assert!(!round.snakes[1].alive);
    }

    #[test]
    fn test_food_pool_cardinality_is_invariant() {
        let config = GameConfig {
            width: 200,
            height: 200,
            food: 10,
            super_food: 3,
            cycle_border: true,
            players: vec![PlayerConfig::default()],
            ..Default::default()
        };
        let mut engine = engine(config);
        let mut round = engine.new_round().unwrap();

        let turns = [Direction::Down, Direction::Right, Direction::Up, Direction::Right];
        for step in 0..200 {
            if step % 7 == 0 {
                round.snakes[0].heading = turns[(step / 7) % turns.len()];
            }
            engine.tick(&mut round);
            assert_eq!(round.food.len(), 13);
        }
    }

    #[test]
    fn test_eating_on_full_board_keeps_food_in_place() {
        let config = GameConfig {
            width: 120,
            height: 20,
            food: 1,
            cycle_border: true,
            players: vec![PlayerConfig::default()],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        let grid = config.grid();
        let mut engine = engine(config);

        let mut pool = FoodPool::new();
        pool.push(Cell::new(100, 0), FoodKind::Regular);
        let mut round = Round::new(
            grid,
            vec![snake("a", Cell::new(0, 0), Direction::Right)],
            pool,
            ObstacleSet::new(),
        );

        // the snake fills all six cells once it eats
        let report = engine.tick(&mut round);

        assert_eq!(report.events[0].ate, Some(FoodKind::Regular));
        assert_eq!(report.eliminations().count(), 0);
        let snake = &round.snakes[0];
        assert!(snake.alive);
        assert_eq!(snake.len(), 6);
        assert_eq!(snake.score, 10);
        assert_eq!(round.food.len(), 1);
        assert_eq!(round.food.items()[0].cell, Cell::new(100, 0));

        // still a plain state transition afterwards
        let report = engine.tick(&mut round);
        assert_eq!(report.events.len(), 1);
        assert_eq!(round.snakes[0].head(), Cell::new(0, 0));
        assert_eq!(round.snakes[0].len(), 6);
    }
}
