//! Assorted constants & hard-coded configuration
use ratatui::{
    layout::{Position, Size},
    style::{Color, Modifier, Style},
};
use std::time::Duration;

/// Name of the directories holding the program's configuration & data files
pub(crate) const PROGRAM_NAME: &str = "powersnake";

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window.
///
/// Cf. [`crate::util::get_display_area()`]
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: 80,
    height: 25,
};

/// The largest grid that fits in the display area along with its border, the
/// score bar, and the two message lines below it
pub(crate) const MAX_GRID_SIZE: Size = Size {
    width: DISPLAY_SIZE.width - 2,
    height: DISPLAY_SIZE.height - 5,
};

/// Default width in pixels of the viewport from which the grid is derived
pub(crate) const DEFAULT_VIEWPORT_WIDTH: u32 = 600;

/// Default height in pixels of the viewport from which the grid is derived
pub(crate) const DEFAULT_VIEWPORT_HEIGHT: u32 = 400;

/// Default edge length in pixels of a single grid cell
pub(crate) const DEFAULT_CELL_SIZE: u32 = 20;

/// Cell occupied by the snake's head at the start of every run
pub(crate) const START_POSITION: Position = Position { x: 10, y: 10 };

/// Tick interval at speed level 0
pub(crate) const INITIAL_INTERVAL: Duration = Duration::from_millis(150);

/// The tick interval never drops below this, however many speed levels have
/// been reached
pub(crate) const MIN_INTERVAL: Duration = Duration::from_millis(50);

/// Amount by which the tick interval shrinks on each speed level
pub(crate) const SPEED_STEP: Duration = Duration::from_millis(2);

/// The slow effect never stretches the tick interval beyond this
pub(crate) const MAX_SLOW_INTERVAL: Duration = Duration::from_millis(200);

/// The speed level increases once the score exceeds this many points times
/// the next speed level
pub(crate) const SPEED_THRESHOLD: u32 = 5000;

/// The level increases once the score reaches this many points times the
/// current level
pub(crate) const LEVEL_THRESHOLD: u32 = 2000;

/// How long each power-up effect lasts after its food is eaten
pub(crate) const EFFECT_DURATION: Duration = Duration::from_secs(5);

/// Inclusive range of point values for standard food
pub(crate) const STANDARD_FOOD_VALUES: std::ops::RangeInclusive<u32> = 1..=10;

/// Points awarded for eating special food
pub(crate) const SPECIAL_FOOD_BONUS: u32 = 500;

/// Snake length never drops below this when shrinking
pub(crate) const MIN_SHRUNK_LENGTH: usize = 3;

/// Number of obstacles placed at the start of a run and on every level up
pub(crate) const OBSTACLE_COUNT: usize = 5;

/// Obstacles are never placed closer than this (Manhattan distance) to the
/// snake's head
pub(crate) const OBSTACLE_CLEARANCE: u32 = 3;

/// Number of entries kept on the leaderboard
pub(crate) const LEADERBOARD_SIZE: usize = 10;

/// Width of the leaderboard panel shown when a run ends, including its border
pub(crate) const LEADERBOARD_PANEL_WIDTH: u16 = 32;

/// Player name submitted to the leaderboard when none is configured
pub(crate) const DEFAULT_PLAYER_NAME: &str = "player";

/// Glyph for the snake's head when it is moving north/up
pub(crate) const SNAKE_HEAD_NORTH_SYMBOL: char = 'v';

/// Glyph for the snake's head when it is moving south/down
pub(crate) const SNAKE_HEAD_SOUTH_SYMBOL: char = '^';

/// Glyph for the snake's head when it is moving east/right
pub(crate) const SNAKE_HEAD_EAST_SYMBOL: char = '<';

/// Glyph for the snake's head when it is moving west/left
pub(crate) const SNAKE_HEAD_WEST_SYMBOL: char = '>';

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: char = '⚬';

/// Glyph for standard food
pub(crate) const STANDARD_FOOD_SYMBOL: char = '●';

/// Glyph for special (bonus) food
pub(crate) const SPECIAL_FOOD_SYMBOL: char = '★';

/// Glyph for slow food
pub(crate) const SLOW_FOOD_SYMBOL: char = '◐';

/// Glyph for freeze food
pub(crate) const FREEZE_FOOD_SYMBOL: char = '✱';

/// Glyph for shrink food
pub(crate) const SHRINK_FOOD_SYMBOL: char = '▾';

/// Glyph for double-points food
pub(crate) const DOUBLE_POINTS_FOOD_SYMBOL: char = '✚';

/// Glyph for obstacles
pub(crate) const OBSTACLE_SYMBOL: char = '█';

/// Glyph for the snake's head when it's collided with an obstacle or itself
pub(crate) const COLLISION_SYMBOL: char = '×';

/// Default style for the snake's head and body
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Style for standard food
pub(crate) const STANDARD_FOOD_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for special food
pub(crate) const SPECIAL_FOOD_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

/// Style for slow food
pub(crate) const SLOW_FOOD_STYLE: Style = Style::new().fg(Color::Magenta);

/// Style for freeze food
pub(crate) const FREEZE_FOOD_STYLE: Style = Style::new().fg(Color::Cyan);

/// Style for shrink food
pub(crate) const SHRINK_FOOD_STYLE: Style = Style::new().fg(Color::LightYellow);

/// Style for double-points food
pub(crate) const DOUBLE_POINTS_FOOD_STYLE: Style = Style::new().fg(Color::LightMagenta);

/// Style for obstacles
pub(crate) const OBSTACLE_STYLE: Style = Style::new().fg(Color::Blue);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);
