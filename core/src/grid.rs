use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default side length of a single grid cell measured in world units.
pub const DEFAULT_CELL_SIZE: f32 = 64.0;

/// Semantic tag stored in every cell of a [`GridMap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridCell {
    /// Open floor that entities may occupy.
    Empty,
    /// Solid wall that blocks movement and terminates rays.
    Wall,
    /// Treasure room that spawns health pickups on entry.
    Treasure,
    /// Trap room that ambushes the player with a burst of monsters.
    Trap,
    /// Boss room that summons a boss monster.
    Boss,
    /// Level exit that advances the campaign.
    Exit,
}

impl GridCell {
    /// Decodes a level file tag into a cell.
    ///
    /// Level files use `0` for empty floor, `1` for walls and `2..=5` for the
    /// treasure, trap, boss and exit special areas respectively.
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Empty),
            1 => Some(Self::Wall),
            2 => Some(Self::Treasure),
            3 => Some(Self::Trap),
            4 => Some(Self::Boss),
            5 => Some(Self::Exit),
            _ => None,
        }
    }

    /// Encodes the cell back into its level file tag.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Wall => 1,
            Self::Treasure => 2,
            Self::Trap => 3,
            Self::Boss => 4,
            Self::Exit => 5,
        }
    }

    /// Reports whether the cell blocks movement and rays.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }

    /// Returns the special area carried by the cell, if any.
    #[must_use]
    pub const fn special_area(self) -> Option<SpecialArea> {
        match self {
            Self::Treasure => Some(SpecialArea::Treasure),
            Self::Trap => Some(SpecialArea::Trap),
            Self::Boss => Some(SpecialArea::Boss),
            Self::Exit => Some(SpecialArea::Exit),
            Self::Empty | Self::Wall => None,
        }
    }
}

/// Special areas that trigger a one-shot effect when the player walks in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialArea {
    /// Spawns a batch of health pickups.
    Treasure,
    /// Spawns an immediate ambush of monsters around the player.
    Trap,
    /// Spawns a guaranteed boss.
    Boss,
    /// Advances to the next level.
    Exit,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Reasons a level matrix fails to load into a [`GridMap`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GridMapError {
    /// The matrix has no rows or its first row has no columns.
    #[error("level grid must contain at least one row and one column")]
    Empty,
    /// A row length differs from the first row.
    #[error("row {row} has {found} cells but the grid is {expected} cells wide")]
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A cell uses a tag outside the level vocabulary.
    #[error("unknown cell tag {tag} at column {column}, row {row}")]
    UnknownTag {
        /// Column of the offending cell.
        column: usize,
        /// Row of the offending cell.
        row: usize,
        /// Tag that failed to decode.
        tag: u8,
    },
    /// The cell size is not a positive finite number.
    #[error("cell size must be positive (received {cell_size})")]
    InvalidCellSize {
        /// Rejected cell size.
        cell_size: f32,
    },
}

/// Immutable tile matrix describing the layout of a single level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridMap {
    columns: u32,
    rows: u32,
    cell_size: f32,
    cells: Vec<GridCell>,
}

impl GridMap {
    /// Builds a grid from a row-major tag matrix.
    ///
    /// Every row must be as wide as the first and every tag must decode via
    /// [`GridCell::from_tag`].
    pub fn from_rows<R>(rows: &[R], cell_size: f32) -> Result<Self, GridMapError>
    where
        R: AsRef<[u8]>,
    {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GridMapError::InvalidCellSize { cell_size });
        }

        let width = rows.first().map_or(0, |row| row.as_ref().len());
        if width == 0 {
            return Err(GridMapError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridMapError::RaggedRow {
                    row: row_index,
                    expected: width,
                    found: row.len(),
                });
            }

            for (column_index, tag) in row.iter().copied().enumerate() {
                let cell = GridCell::from_tag(tag).ok_or(GridMapError::UnknownTag {
                    column: column_index,
                    row: row_index,
                    tag,
                })?;
                cells.push(cell);
            }
        }

        Ok(Self {
            columns: width as u32,
            rows: rows.len() as u32,
            cell_size,
            cells,
        })
    }

    /// Builds an open arena enclosed by a single ring of walls.
    ///
    /// Dimensions are raised to at least 3×3 so the arena always has one
    /// walkable cell, and a non-positive cell size falls back to
    /// [`DEFAULT_CELL_SIZE`].
    #[must_use]
    pub fn bordered(columns: u32, rows: u32, cell_size: f32) -> Self {
        let columns = columns.max(3);
        let rows = rows.max(3);
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            DEFAULT_CELL_SIZE
        };

        let mut cells = Vec::with_capacity((columns * rows) as usize);
        for row in 0..rows {
            for column in 0..columns {
                let edge = row == 0 || column == 0 || row + 1 == rows || column + 1 == columns;
                cells.push(if edge { GridCell::Wall } else { GridCell::Empty });
            }
        }

        Self {
            columns,
            rows,
            cell_size,
            cells,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square cell expressed in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Total width of the grid measured in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_size
    }

    /// Total height of the grid measured in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }

    /// Returns the cell at the signed coordinate, treating anything outside
    /// the grid as [`GridCell::Wall`].
    #[must_use]
    pub fn cell_at(&self, column: i64, row: i64) -> GridCell {
        if column < 0 || row < 0 {
            return GridCell::Wall;
        }

        self.cell(CellCoord::new(
            u32::try_from(column).unwrap_or(u32::MAX),
            u32::try_from(row).unwrap_or(u32::MAX),
        ))
        .unwrap_or(GridCell::Wall)
    }

    /// Returns the cell at the coordinate, or `None` when out of bounds.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<GridCell> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Returns the cell containing the world position, treating anything
    /// outside the grid as [`GridCell::Wall`].
    #[must_use]
    pub fn cell_at_position(&self, position: Vec2) -> GridCell {
        let column = (position.x / self.cell_size).floor();
        let row = (position.y / self.cell_size).floor();
        if !(column.is_finite() && row.is_finite()) {
            return GridCell::Wall;
        }
        self.cell_at(column as i64, row as i64)
    }

    /// Converts a world position into the cell containing it.
    #[must_use]
    pub fn cell_of(&self, position: Vec2) -> Option<CellCoord> {
        if !(position.x.is_finite() && position.y.is_finite()) {
            return None;
        }
        if position.x < 0.0 || position.y < 0.0 {
            return None;
        }

        let cell = CellCoord::new(
            (position.x / self.cell_size).floor() as u32,
            (position.y / self.cell_size).floor() as u32,
        );
        self.index(cell).map(|_| cell)
    }

    /// Reports whether an entity may stand at the world position.
    ///
    /// Out-of-bounds positions are always rejected, as are wall cells.
    #[must_use]
    pub fn is_walkable_position(&self, position: Vec2) -> bool {
        self.cell_of(position)
            .and_then(|cell| self.cell(cell))
            .map_or(false, |cell| !cell.is_wall())
    }

    /// World-space centre of the provided cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            (cell.column() as f32 + 0.5) * self.cell_size,
            (cell.row() as f32 + 0.5) * self.cell_size,
        )
    }

    /// Iterator over every non-wall cell in row-major order.
    pub fn walkable_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_wall())
            .map(move |(index, _)| {
                let index = index as u32;
                CellCoord::new(index % columns, index / columns)
            })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
