use std::time::Duration;

use glam::Vec2;
use raycrawl_core::{CellCoord, GridMap, GridMapError, DEFAULT_CELL_SIZE};
use thiserror::Error;

const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(300);
const BUILTIN_SPAWN: CellCoord = CellCoord::new(1, 1);
const BUILTIN_MONSTER_CAPS: [usize; 5] = [15, 20, 25, 30, 40];

const BUILTIN_LEVELS: [[&str; 16]; 5] = [
    [
        "1111111111111111",
        "1000000000000001",
        "1011110110111101",
        "1010000000000101",
        "1010110110110101",
        "1000000200000001",
        "1010110110110101",
        "1010000000000101",
        "1011110110111101",
        "1000000003300001",
        "1011110110111101",
        "1010000000000101",
        "1010110110110101",
        "1000000000000001",
        "1011111111111151",
        "1111111111111111",
    ],
    [
        "1111111111111111",
        "1000000000000001",
        "1011111111111101",
        "1010000000000101",
        "1010111111110101",
        "1010100000010101",
        "1010101111010101",
        "1010101440010101",
        "1010101001010101",
        "1010101111010101",
        "1010100330010101",
        "1010111111110101",
        "1010000000000101",
        "1011111111111101",
        "1200000000000051",
        "1111111111111111",
    ],
    [
        "1111111111111111",
        "1000000000000001",
        "1011110011111101",
        "1010000000000101",
        "1010111001110101",
        "1000100000010001",
        "1110103333010111",
        "1000003333000001",
        "1000003333000001",
        "1110103333010111",
        "1000100000010001",
        "1010111001110101",
        "1010000000000101",
        "1011110011111101",
        "1000000200000051",
        "1111111111111111",
    ],
    [
        "1111111111111111",
        "1000000000000001",
        "1010101010101001",
        "1000000000000001",
        "1010101010101001",
        "1000000330000001",
        "1010103333101001",
        "1000000330000001",
        "1010101010101001",
        "1000000040000001",
        "1010101010101001",
        "1000000000000001",
        "1010101010101001",
        "1020000000000001",
        "1000000000000051",
        "1111111111111111",
    ],
    [
        "1111111111111111",
        "1000000000000001",
        "1011100000011101",
        "1010000000000101",
        "1010001111000101",
        "1000001441000001",
        "1000001001000001",
        "1002000000000201",
        "1000000000000001",
        "1000033333300001",
        "1000033333300001",
        "1010000000000101",
        "1010000000000101",
        "1011100000011101",
        "1000000000000051",
        "1111111111111111",
    ],
];

/// Reasons a level or campaign definition is rejected.
#[derive(Debug, PartialEq, Error)]
pub enum LevelError {
    /// The tag matrix failed to load.
    #[error(transparent)]
    Map(#[from] GridMapError),
    /// The player spawn point lies inside a wall or outside the grid.
    #[error("player spawn ({x}, {y}) is not on a walkable cell")]
    SpawnBlocked {
        /// Horizontal spawn coordinate.
        x: f32,
        /// Vertical spawn coordinate.
        y: f32,
    },
    /// A level row contains a character that is not a decimal digit.
    #[error("row {row} contains the non-digit character {found:?}")]
    NonDigit {
        /// Index of the offending row.
        row: usize,
        /// Offending character.
        found: char,
    },
    /// The campaign contains no levels.
    #[error("a campaign requires at least one level")]
    EmptyCampaign,
}

/// Static description of a single level.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelDefinition {
    map: GridMap,
    spawn: Vec2,
    time_limit: Duration,
    monster_cap: usize,
}

impl LevelDefinition {
    /// Creates a level, validating that the spawn point is walkable.
    pub fn new(
        map: GridMap,
        spawn: Vec2,
        time_limit: Duration,
        monster_cap: usize,
    ) -> Result<Self, LevelError> {
        if !map.is_walkable_position(spawn) {
            return Err(LevelError::SpawnBlocked {
                x: spawn.x,
                y: spawn.y,
            });
        }

        Ok(Self {
            map,
            spawn,
            time_limit,
            monster_cap,
        })
    }

    /// Parses a level whose rows are strings of tag digits.
    pub fn from_digit_rows<S>(
        rows: &[S],
        cell_size: f32,
        spawn: CellCoord,
        time_limit: Duration,
        monster_cap: usize,
    ) -> Result<Self, LevelError>
    where
        S: AsRef<str>,
    {
        let mut matrix = Vec::with_capacity(rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let tags = row
                .as_ref()
                .chars()
                .map(|character| {
                    character
                        .to_digit(10)
                        .map(|digit| digit as u8)
                        .ok_or(LevelError::NonDigit {
                            row: row_index,
                            found: character,
                        })
                })
                .collect::<Result<Vec<u8>, _>>()?;
            matrix.push(tags);
        }

        let map = GridMap::from_rows(&matrix, cell_size)?;
        let spawn = map.cell_center(spawn);
        Self::new(map, spawn, time_limit, monster_cap)
    }

    /// Tile layout of the level.
    #[must_use]
    pub const fn map(&self) -> &GridMap {
        &self.map
    }

    /// Position the player starts from.
    #[must_use]
    pub const fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Time the player has to reach the exit.
    #[must_use]
    pub const fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Maximum number of live monsters the spawner maintains.
    #[must_use]
    pub const fn monster_cap(&self) -> usize {
        self.monster_cap
    }
}

/// Ordered, non-empty list of levels played in sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Campaign {
    levels: Vec<LevelDefinition>,
}

impl Campaign {
    /// Creates a campaign from the provided levels.
    pub fn new(levels: Vec<LevelDefinition>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::EmptyCampaign);
        }
        Ok(Self { levels })
    }

    /// The five-level campaign bundled with the engine.
    #[must_use]
    pub fn builtin() -> Self {
        let levels: Vec<_> = BUILTIN_LEVELS
            .iter()
            .zip(BUILTIN_MONSTER_CAPS)
            .filter_map(|(rows, cap)| {
                LevelDefinition::from_digit_rows(
                    rows,
                    DEFAULT_CELL_SIZE,
                    BUILTIN_SPAWN,
                    DEFAULT_TIME_LIMIT,
                    cap,
                )
                .map_err(|error| log::error!("built-in level rejected: {error}"))
                .ok()
            })
            .collect();

        Self::new(levels).unwrap_or_else(|_| Self::fallback())
    }

    fn fallback() -> Self {
        let map = GridMap::bordered(16, 16, DEFAULT_CELL_SIZE);
        let spawn = map.cell_center(BUILTIN_SPAWN);
        Self {
            levels: vec![LevelDefinition {
                map,
                spawn,
                time_limit: DEFAULT_TIME_LIMIT,
                monster_cap: BUILTIN_MONSTER_CAPS[0],
            }],
        }
    }

    /// Number of levels in the campaign.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always `false`; campaigns are non-empty by construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level at the provided zero-based index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LevelDefinition> {
        self.levels.get(index)
    }

    pub(crate) fn level(&self, index: usize) -> &LevelDefinition {
        let last = self.levels.len().saturating_sub(1);
        &self.levels[index.min(last)]
    }
}
