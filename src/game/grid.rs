use crate::consts;
use ratatui::layout::{Position, Positions, Rect, Size};
use std::borrow::Borrow;
use thiserror::Error;

/// The dimensions of the playing field, in cells.  Movement wraps around all
/// four edges.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Grid {
    pub(crate) width: u16,
    pub(crate) height: u16,
}

impl Grid {
    pub(crate) fn new(width: u16, height: u16) -> Grid {
        Grid { width, height }
    }

    /// Derive the grid from a viewport measured in pixels.  Both viewport
    /// dimensions must be positive multiples of `cell_size`, and the resulting
    /// grid must contain [`START_POSITION`][consts::START_POSITION] and fit
    /// within [`MAX_GRID_SIZE`][consts::MAX_GRID_SIZE].
    pub(crate) fn from_viewport(
        width: u32,
        height: u32,
        cell_size: u32,
    ) -> Result<Grid, GridError> {
        if cell_size == 0 {
            return Err(GridError::ZeroCellSize);
        }
        if width == 0 || height == 0 || width % cell_size != 0 || height % cell_size != 0 {
            return Err(GridError::Misaligned {
                width,
                height,
                cell_size,
            });
        }
        let (Ok(cols), Ok(rows)) = (
            u16::try_from(width / cell_size),
            u16::try_from(height / cell_size),
        ) else {
            return Err(GridError::TooLarge { width, height });
        };
        let grid = Grid::new(cols, rows);
        if !grid.contains(consts::START_POSITION) {
            return Err(GridError::TooSmall {
                width: cols,
                height: rows,
            });
        }
        if cols > consts::MAX_GRID_SIZE.width || rows > consts::MAX_GRID_SIZE.height {
            return Err(GridError::ExceedsDisplay {
                width: cols,
                height: rows,
            });
        }
        Ok(grid)
    }

    pub(crate) fn size(self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub(crate) fn contains(self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Iterate over every cell of the grid, row by row
    pub(crate) fn positions(self) -> Positions {
        Rect::from((Position::ORIGIN, self.size())).positions()
    }

    /// Offset `pos` by `(dx, dy)` with toroidal wraparound
    pub(crate) fn advance(self, pos: Position, dx: i32, dy: i32) -> Position {
        Position {
            x: wrap(pos.x, dx, self.width),
            y: wrap(pos.y, dy, self.height),
        }
    }
}

fn wrap(coord: u16, delta: i32, max: u16) -> u16 {
    let wrapped = (i32::from(coord) + delta).rem_euclid(i32::from(max));
    u16::try_from(wrapped).expect("wrapped coordinate should be less than a u16 bound")
}

/// Test whether `pos` is one of `cells`
pub(crate) fn occupied<I>(cells: I, pos: Position) -> bool
where
    I: IntoIterator,
    I::Item: Borrow<Position>,
{
    cells.into_iter().any(|p| *p.borrow() == pos)
}

pub(crate) fn manhattan(a: Position, b: Position) -> u32 {
    u32::from(a.x.abs_diff(b.x)) + u32::from(a.y.abs_diff(b.y))
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum GridError {
    #[error("cell size must be positive")]
    ZeroCellSize,
    #[error("viewport {width}x{height} is not a positive multiple of the cell size {cell_size}")]
    Misaligned {
        width: u32,
        height: u32,
        cell_size: u32,
    },
    #[error("viewport {width}x{height} yields too many cells")]
    TooLarge { width: u32, height: u32 },
    #[error("a {width}x{height} grid does not contain the starting cell")]
    TooSmall { width: u16, height: u16 },
    #[error(
        "a {width}x{height} grid does not fit on screen; at most {}x{} cells are allowed",
        consts::MAX_GRID_SIZE.width,
        consts::MAX_GRID_SIZE.height
    )]
    ExceedsDisplay { width: u16, height: u16 },
}
