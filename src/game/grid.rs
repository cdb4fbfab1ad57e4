use crate::consts;
use ratatui::layout::{Position, Positions, Rect, Size};
use serde::Deserialize;
use thiserror::Error;

/// The dimensions of the playing field, in cells.  Both dimensions are always
/// positive.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(try_from = "RawGridSpec")]
pub(crate) struct GridSpec {
    columns: u16,
    rows: u16,
}

impl GridSpec {
    pub(crate) fn new(columns: u16, rows: u16) -> Result<GridSpec, GridError> {
        if columns == 0 || rows == 0 {
            Err(GridError { columns, rows })
        } else {
            Ok(GridSpec { columns, rows })
        }
    }

    /// Return the largest grid that can be drawn in a terminal of size `area`,
    /// leaving room for the border, status bar, and message lines
    pub(crate) fn fit(area: Size) -> Result<GridSpec, GridError> {
        let columns = area
            .width
            .min(consts::DISPLAY_SIZE.width)
            .saturating_sub(consts::DISPLAY_CHROME_WIDTH);
        let rows = area
            .height
            .min(consts::DISPLAY_SIZE.height)
            .saturating_sub(consts::DISPLAY_CHROME_HEIGHT);
        GridSpec::new(columns, rows)
    }

    pub(crate) fn columns(self) -> u16 {
        self.columns
    }

    pub(crate) fn rows(self) -> u16 {
        self.rows
    }

    pub(crate) fn size(self) -> Size {
        Size {
            width: self.columns,
            height: self.rows,
        }
    }

    /// The center cell, rounding down & to the right
    pub(crate) fn center(self) -> Position {
        Position::new(self.columns / 2, self.rows / 2)
    }

    #[cfg(test)]
    pub(crate) fn contains(self, pos: Position) -> bool {
        pos.x < self.columns && pos.y < self.rows
    }

    /// Iterate over every cell in the grid, row by row
    pub(crate) fn positions(self) -> Positions {
        Rect::from((Position::ORIGIN, self.size())).positions()
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
struct RawGridSpec {
    columns: u16,
    rows: u16,
}

impl TryFrom<RawGridSpec> for GridSpec {
    type Error = GridError;

    fn try_from(value: RawGridSpec) -> Result<GridSpec, GridError> {
        GridSpec::new(value.columns, value.rows)
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("grid must have at least one column and one row, got {columns}×{rows}")]
pub(crate) struct GridError {
    columns: u16,
    rows: u16,
}

/// What happens when the snake runs off an edge of the grid
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum BoundaryPolicy {
    /// The snake reappears at the opposite edge
    #[default]
    Wrap,

    /// The game ends
    Wall,
}

impl BoundaryPolicy {
    pub(crate) fn wraps(self) -> bool {
        self == BoundaryPolicy::Wrap
    }
}
