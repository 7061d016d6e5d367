//! The entity model: everything on the grid
use super::direction::Direction;
use super::food::{Food, FoodKind, Foods};
use super::grid::{manhattan, Grid};
use super::snake::Snake;
use crate::consts;
use rand::{seq::IteratorRandom, Rng};
use ratatui::layout::Position;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct World {
    grid: Grid,
    pub(super) snake: Snake,
    pub(super) foods: Foods,
    pub(super) obstacles: HashSet<Position>,
}

impl World {
    /// Create a world with a fresh snake at the start cell and nothing else on
    /// the grid
    pub(crate) fn new(grid: Grid) -> World {
        World {
            grid,
            snake: Snake::new(consts::START_POSITION, Direction::East),
            foods: Foods::default(),
            obstacles: HashSet::new(),
        }
    }

    pub(crate) fn grid(&self) -> Grid {
        self.grid
    }

    pub(crate) fn snake(&self) -> &Snake {
        &self.snake
    }

    pub(crate) fn foods(&self) -> &Foods {
        &self.foods
    }

    pub(crate) fn obstacles(&self) -> &HashSet<Position> {
        &self.obstacles
    }

    /// Test whether the snake's head shares a cell with an obstacle
    pub(crate) fn head_on_obstacle(&self) -> bool {
        self.obstacles.contains(&self.snake.head())
    }

    /// Commit a new direction for the snake.  Returns `false` if it was
    /// rejected as a reversal.
    pub(crate) fn turn(&mut self, direction: Direction) -> bool {
        self.snake.turn(direction)
    }

    /// Move the head one cell forwards, keeping the tail in place.  Returns
    /// the new head position.
    pub(crate) fn push_head(&mut self) -> Position {
        let head = self.snake.next_head(self.grid);
        self.snake.push_head(head);
        head
    }

    pub(crate) fn drop_tail(&mut self) {
        self.snake.drop_tail();
    }

    pub(crate) fn shrink_snake(&mut self) {
        self.snake.shrink();
    }

    pub(crate) fn set_food(&mut self, kind: FoodKind, food: Option<Food>) {
        self.foods.set(kind, food);
    }

    /// Test whether `pos` is covered by the snake, an obstacle, or a live food
    fn taken(&self, pos: Position) -> bool {
        self.snake.segments().contains(&pos)
            || self.obstacles.contains(&pos)
            || self.foods.at(pos).is_some()
    }

    /// Pick a random cell that passes `accept` and is not already taken
    fn free_cell<R, F>(
        &self,
        rng: &mut R,
        what: &'static str,
        accept: F,
    ) -> Result<Position, SpawnError>
    where
        R: Rng,
        F: Fn(Position) -> bool,
    {
        self.grid
            .positions()
            .filter(|&p| !self.taken(p) && accept(p))
            .choose(rng)
            .ok_or(SpawnError(what))
    }

    /// Place a new food of `kind` on a free cell, replacing any live food of
    /// that kind
    pub(crate) fn spawn_food<R: Rng>(
        &mut self,
        kind: FoodKind,
        rng: &mut R,
    ) -> Result<Food, SpawnError> {
        self.foods.set(kind, None);
        let pos = self.free_cell(rng, kind.as_str(), |_| true)?;
        let food = Food {
            pos,
            value: kind.roll_value(rng),
        };
        self.foods.set(kind, Some(food));
        Ok(food)
    }

    /// Spawn a new standard food and, independently for each other kind that
    /// has no live instance, roll for that kind to spawn as well
    pub(crate) fn spawn_food_wave<R: Rng>(
        &mut self,
        rng: &mut R,
    ) -> Result<Vec<FoodKind>, SpawnError> {
        let mut spawned = Vec::new();
        let _ = self.spawn_food(FoodKind::Standard, rng)?;
        spawned.push(FoodKind::Standard);
        for kind in FoodKind::iter().filter(|&k| k != FoodKind::Standard) {
            if rng.random_bool(kind.spawn_probability()) && !self.foods.is_live(kind) {
                let _ = self.spawn_food(kind, rng)?;
                spawned.push(kind);
            }
        }
        Ok(spawned)
    }

    /// Replace the obstacle set with [`OBSTACLE_COUNT`][consts::OBSTACLE_COUNT]
    /// fresh obstacles, none of them on the snake, on a food, or within
    /// [`OBSTACLE_CLEARANCE`][consts::OBSTACLE_CLEARANCE] of the head
    pub(crate) fn regenerate_obstacles<R: Rng>(&mut self, rng: &mut R) -> Result<(), SpawnError> {
        self.obstacles.clear();
        let head = self.snake.head();
        for _ in 0..consts::OBSTACLE_COUNT {
            let pos = self.free_cell(rng, "obstacle", |p| {
                manhattan(p, head) >= consts::OBSTACLE_CLEARANCE
            })?;
            self.obstacles.insert(pos);
        }
        Ok(())
    }
}

/// There was no free cell left on the grid for something that needed to be
/// placed
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("no free cell left on the grid to place {0}")]
pub(crate) struct SpawnError(pub(crate) &'static str);
