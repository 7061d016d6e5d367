mod direction;
mod effects;
mod engine;
mod food;
mod grid;
mod pace;
mod snake;
mod world;
pub(crate) use self::grid::{Grid, GridError};
pub(crate) use self::world::SpawnError;
use self::direction::Direction;
use self::effects::Effects;
use self::engine::StepOutcome;
use self::pace::Pace;
use self::world::World;
use crate::consts;
use crate::util::{center_rect, get_display_area};
use log::info;
use rand::{rngs::ThreadRng, Rng};
use ratatui::{
    buffer::{Buffer, Cell},
    layout::{Constraint, Layout, Margin, Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};
use std::time::{Duration, Instant};

/// Where a [`Game`] is in its lifecycle
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum RunState {
    /// No run has started yet, or the last one has been acknowledged
    Idle,
    Running,
    /// The last run ended and its score has been added to the total
    GameOver,
}

/// The player's choice of styles for the play field
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Skin {
    pub(crate) snake: Style,
    /// Style filling every empty cell inside the border
    pub(crate) background: Style,
}

impl Default for Skin {
    fn default() -> Skin {
        Skin {
            snake: consts::SNAKE_STYLE,
            background: Style::new(),
        }
    }
}

/// The game loop controller: owns the world, the timed effects, the pace, and
/// the score, and decides when the next tick is due
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Game<R = ThreadRng> {
    rng: R,
    world: World,
    effects: Effects,
    pace: Pace,
    /// Direction requested by the player, committed at the start of the next
    /// tick
    pending: Direction,
    score: u32,
    total_score: u64,
    level: u32,
    state: RunState,
    next_tick: Option<Instant>,
    skin: Skin,
}

impl Game<ThreadRng> {
    pub(crate) fn new(grid: Grid, total_score: u64) -> Self {
        Game::new_with_rng(grid, total_score, rand::rng())
    }
}

impl<R: Rng> Game<R> {
    /// Create an idle game on `grid`, carrying over the cumulative score from
    /// previous sessions
    pub(crate) fn new_with_rng(grid: Grid, total_score: u64, rng: R) -> Game<R> {
        Game {
            rng,
            world: World::new(grid),
            effects: Effects::default(),
            pace: Pace::new(),
            pending: Direction::East,
            score: 0,
            total_score,
            level: 1,
            state: RunState::Idle,
            next_tick: None,
            skin: Skin::default(),
        }
    }

    pub(crate) fn with_skin(mut self, skin: Skin) -> Game<R> {
        self.skin = skin;
        self
    }

    /// Begin a new run: reset the world, effects, pace, and score, place the
    /// obstacles and the first food wave, and schedule the first tick.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the grid is too crowded to place the obstacles or the
    /// first standard food.  The game is left idle.
    pub(crate) fn start(&mut self, now: Instant) -> Result<(), SpawnError> {
        self.world = World::new(self.world.grid());
        self.effects.clear();
        self.pace = Pace::new();
        self.pending = self.world.snake().direction();
        self.score = 0;
        self.level = 1;
        self.state = RunState::Idle;
        self.next_tick = None;
        self.world.regenerate_obstacles(&mut self.rng)?;
        let _ = self.world.spawn_food_wave(&mut self.rng)?;
        self.state = RunState::Running;
        self.next_tick = Some(now + self.pace.interval());
        info!(
            "Started a new run on a {}x{} grid",
            self.world.grid().width,
            self.world.grid().height
        );
        Ok(())
    }

    /// Run a tick if one is due at `now` and schedule the next one from the
    /// effective interval after the tick.  Returns `None` if no tick ran.
    ///
    /// # Errors
    ///
    /// Propagates the [`SpawnError`] from [`Game::step()`]; the run is over
    /// in that case.
    pub(crate) fn poll(&mut self, now: Instant) -> Result<Option<StepOutcome>, SpawnError> {
        let Some(when) = self.next_tick else {
            return Ok(None);
        };
        if self.state != RunState::Running || when > now {
            return Ok(None);
        }
        let outcome = self.step(now)?;
        if self.state == RunState::Running {
            self.next_tick = Some(now + self.pace.interval());
        }
        Ok(Some(outcome))
    }

    /// Record the direction the player wants the snake to take next.  Vectors
    /// that are not one of the four unit directions are ignored.
    pub(crate) fn set_pending_direction(&mut self, dx: i32, dy: i32) {
        if let Some(d) = Direction::from_delta(dx, dy) {
            self.pending = d;
        }
    }
}

impl<R> Game<R> {
    /// How long the shell may wait for input before the next tick is due, or
    /// `None` if no tick is scheduled
    pub(crate) fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.next_tick.map(|when| when.saturating_duration_since(now))
    }

    /// Cancel the scheduled tick
    pub(crate) fn stop(&mut self) {
        self.next_tick = None;
    }

    /// Dismiss a finished run, returning to the idle state
    pub(crate) fn acknowledge(&mut self) {
        if self.state == RunState::GameOver {
            self.state = RunState::Idle;
        }
    }

    pub(crate) fn state(&self) -> RunState {
        self.state
    }

    pub(crate) fn running(&self) -> bool {
        self.state == RunState::Running
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn total_score(&self) -> u64 {
        self.total_score
    }

    pub(crate) fn level(&self) -> u32 {
        self.level
    }

    pub(crate) fn speed_level(&self) -> u32 {
        self.pace.speed_level()
    }

    pub(crate) fn interval(&self) -> Duration {
        self.pace.interval()
    }

    pub(crate) fn effects(&self) -> &Effects {
        &self.effects
    }

    /// Finish the current run: stop the loop and add the run's score to the
    /// total.  Only the first call after a run starts has any effect.
    fn end_run(&mut self) {
        if self.state != RunState::Running {
            return;
        }
        self.state = RunState::GameOver;
        self.stop();
        self.total_score = self.total_score.saturating_add(u64::from(self.score));
        info!(
            "Game over with score {} at level {}; total score is now {}",
            self.score, self.level, self.total_score
        );
    }

    fn status_line(&self) -> String {
        let mut s = format!(
            " Score: {}   Level: {}   Speed: {}   Total: {}",
            self.score,
            self.level(),
            self.speed_level(),
            self.total_score
        );
        for kind in self.effects().active() {
            s.push_str("   ");
            s.push_str(kind.label());
        }
        s
    }

    fn collided(&self) -> bool {
        self.state == RunState::GameOver
            && (self.world.snake().hits_body() || self.world.head_on_obstacle())
    }
}

impl<R> Widget for &Game<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [score_area, block_area, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(display);
        Line::styled(self.status_line(), consts::SCORE_BAR_STYLE).render(score_area, buf);

        let mut block_size = self.world.grid().size();
        block_size.width = block_size.width.saturating_add(2);
        block_size.height = block_size.height.saturating_add(2);
        let block_area = center_rect(block_area, block_size);
        DottedBorder.render(block_area, buf);

        let field = block_area.inner(Margin::new(1, 1));
        buf.set_style(field, self.skin.background);
        let mut canvas = Canvas {
            area: field,
            ground: self.skin.background,
            buf,
        };
        if self.state != RunState::Idle {
            let snake = self.world.snake();
            for p in snake.body() {
                canvas.draw_cell(p, consts::SNAKE_BODY_SYMBOL, self.skin.snake);
            }
            for (kind, food) in self.world.foods().live() {
                canvas.draw_cell(food.pos, kind.symbol(), kind.style());
            }
            for &pos in self.world.obstacles() {
                canvas.draw_cell(pos, consts::OBSTACLE_SYMBOL, consts::OBSTACLE_STYLE);
            }
            // Draw the head last so that, if it's a collision, we overwrite
            // whatever it's colliding with
            if self.collided() {
                canvas.draw_cell(
                    snake.head(),
                    consts::COLLISION_SYMBOL,
                    consts::COLLISION_STYLE,
                );
            } else {
                canvas.draw_cell(snake.head(), snake.head_symbol(), self.skin.snake);
            }
        }

        match self.state {
            RunState::Idle => {
                Line::from_iter([
                    Span::raw(" Press "),
                    Span::styled("n", consts::KEY_STYLE),
                    Span::raw(" to start a new run"),
                ])
                .render(msg1_area, buf);
                Line::from_iter([
                    Span::raw(" Steer with arrows, wasd, or hjkl — Quit ("),
                    Span::styled("q", consts::KEY_STYLE),
                    Span::raw(")"),
                ])
                .render(msg2_area, buf);
            }
            RunState::Running => (),
            RunState::GameOver => {
                Span::from(format!(
                    " — GAME OVER — Score: {} — Total: {}",
                    self.score, self.total_score
                ))
                .render(msg1_area, buf);
                Line::from_iter([
                    Span::raw(" New Run ("),
                    Span::styled("r", consts::KEY_STYLE),
                    Span::raw(") — Continue ("),
                    Span::styled("Enter", consts::KEY_STYLE),
                    Span::raw(") — Quit ("),
                    Span::styled("q", consts::KEY_STYLE),
                    Span::raw(")"),
                ])
                .render(msg2_area, buf);
            }
        }
    }
}

/// A view of `area` within `buf` addressed relative to its top-left corner.
/// Nothing is drawn outside of `area`.
#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    /// Style that drawn cells are layered over
    ground: Style,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        let x = self.area.x.checked_add(pos.x)?;
        let y = self.area.y.checked_add(pos.y)?;
        let pos = Position::new(x, y);
        if !self.area.contains(pos) {
            return None;
        }
        self.buf.cell_mut(pos)
    }

    fn draw_char(&mut self, pos: Position, symbol: char) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.set_char(symbol);
        }
    }

    fn draw_cell(&mut self, pos: Position, symbol: char, style: Style) {
        let ground = self.ground;
        if let Some(cell) = self.cell_mut(pos) {
            cell.set_char(symbol);
            cell.set_style(Style::reset().patch(ground).patch(style));
        }
    }
}

/// A border drawn with dots, marking edges that the snake wraps around
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct DottedBorder;

impl Widget for DottedBorder {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let size = area.as_size();
        let max_x = size.width.saturating_sub(1);
        let max_y = size.height.saturating_sub(1);
        let mut canvas = Canvas {
            area,
            ground: Style::new(),
            buf,
        };
        canvas.draw_char(Position::ORIGIN, '·');
        canvas.draw_char(Position::new(max_x, 0), '·');
        canvas.draw_char(Position::new(max_x, max_y), '·');
        canvas.draw_char(Position::new(0, max_y), '·');
        for x in 1..max_x {
            canvas.draw_char(Position::new(x, 0), '⋯');
            canvas.draw_char(Position::new(x, max_y), '⋯');
        }
        for y in 1..max_y {
            canvas.draw_char(Position::new(0, y), '⋮');
            canvas.draw_char(Position::new(max_x, y), '⋮');
        }
    }
}
