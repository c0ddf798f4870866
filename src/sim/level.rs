//! Tile-map levels
//!
//! A level file is rows of whitespace-separated tile codes:
//! `0` empty, `1` solid brick, `2..=5` destructible bricks.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GameObject, Sprite};
use crate::consts::{BRICK_COLORS, SOLID_BRICK_COLOR};
use crate::error::{Error, Result};

/// Highest tile code with a defined brick
pub const MAX_TILE: u32 = 5;

/// The four built-in levels, embedded for builds without a filesystem
pub const BUILTIN_LEVELS: [(&str, &str); 4] = [
    ("one", include_str!("../../levels/one.lvl")),
    ("two", include_str!("../../levels/two.lvl")),
    ("three", include_str!("../../levels/three.lvl")),
    ("four", include_str!("../../levels/four.lvl")),
];

/// Rectangular grid of tile codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTileGrid")]
pub struct TileGrid {
    pub name: String,
    rows: Vec<Vec<u32>>,
}

/// Unchecked form of `TileGrid` as it appears in serialized data
#[derive(Deserialize)]
struct RawTileGrid {
    name: String,
    rows: Vec<Vec<u32>>,
}

impl TryFrom<RawTileGrid> for TileGrid {
    type Error = Error;

    fn try_from(raw: RawTileGrid) -> Result<Self> {
        Self::from_rows(raw.name, raw.rows)
    }
}

impl TileGrid {
    /// Parse level text; `name` is used in error messages
    pub fn parse(name: &str, text: &str) -> Result<Self> {
        let mut rows: Vec<Vec<u32>> = Vec::new();

        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            let row_index = rows.len();
            let row = line
                .split_whitespace()
                .enumerate()
                .map(|(column, token)| {
                    token.parse().map_err(|_| Error::BadTile {
                        name: name.to_string(),
                        row: row_index,
                        column,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<u32>>>()?;
            rows.push(row);
        }

        Self::from_rows(name, rows)
    }

    /// Build a grid from tile codes, checking codes, shape and size
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<u32>>) -> Result<Self> {
        let name = name.into();

        let width = match rows.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(Error::EmptyLevel(name)),
        };

        for (row_index, row) in rows.iter().enumerate() {
            if let Some((column, &code)) = row.iter().enumerate().find(|(_, c)| **c > MAX_TILE) {
                return Err(Error::UnknownTile {
                    name,
                    row: row_index,
                    column,
                    code,
                });
            }
            if row.len() != width {
                return Err(Error::RaggedLevel {
                    name,
                    row: row_index,
                    expected: width,
                    actual: row.len(),
                });
            }
        }

        Ok(Self { name, rows })
    }

    /// Read and parse a level file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::LevelRead {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let grid = Self::parse(&name, &text)?;
        log::info!(
            "Loaded level '{}' ({}x{}) from {}",
            grid.name,
            grid.columns(),
            grid.rows(),
            path.display()
        );
        Ok(grid)
    }

    /// The embedded levels, in play order
    pub fn builtin() -> Result<Vec<Self>> {
        BUILTIN_LEVELS
            .iter()
            .map(|(name, text)| Self::parse(name, text))
            .collect()
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> usize {
        self.rows[0].len()
    }

    pub fn tile(&self, row: usize, column: usize) -> u32 {
        self.rows[row][column]
    }
}

/// Bricks of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub bricks: Vec<GameObject>,
}

impl Level {
    /// Lay the grid out over a `width` x `height` area anchored at the origin
    pub fn build(grid: &TileGrid, width: f32, height: f32) -> Self {
        let unit = Vec2::new(width / grid.columns() as f32, height / grid.rows() as f32);
        let mut bricks = Vec::new();

        for row in 0..grid.rows() {
            for column in 0..grid.columns() {
                let position = Vec2::new(column as f32, row as f32) * unit;
                match grid.tile(row, column) {
                    0 => {}
                    1 => bricks.push(
                        GameObject::new(position, unit, Sprite::BlockSolid)
                            .with_color(SOLID_BRICK_COLOR)
                            .solid(),
                    ),
                    code => bricks.push(
                        GameObject::new(position, unit, Sprite::Block)
                            .with_color(BRICK_COLORS[(code - 2) as usize]),
                    ),
                }
            }
        }

        Self { bricks }
    }

    /// True once every destructible brick is destroyed
    pub fn is_completed(&self) -> bool {
        self.bricks.iter().all(|b| b.solid || b.destroyed)
    }

    /// Bricks still in play
    pub fn live_bricks(&self) -> impl Iterator<Item = &GameObject> {
        self.bricks.iter().filter(|b| !b.destroyed)
    }

    /// Destructible bricks still standing
    pub fn remaining(&self) -> usize {
        self.bricks.iter().filter(|b| !b.solid && !b.destroyed).count()
    }
}

/// Ordered level definitions with one current level
#[derive(Debug, Clone, Serialize)]
pub struct LevelSet {
    grids: Vec<TileGrid>,
    current: usize,
    area: Vec2,
    active: Level,
}

impl LevelSet {
    /// Build the set; bricks cover an `area` sized region at the origin
    pub fn new(grids: Vec<TileGrid>, area: Vec2) -> Result<Self> {
        let first = grids.first().ok_or(Error::NoLevels)?;
        let active = Level::build(first, area.x, area.y);
        Ok(Self {
            grids,
            current: 0,
            area,
            active,
        })
    }

    /// Load every file in order; any unreadable file fails the whole set
    pub fn load<P: AsRef<Path>>(paths: &[P], area: Vec2) -> Result<Self> {
        let grids = paths
            .iter()
            .map(TileGrid::load)
            .collect::<Result<Vec<_>>>()?;
        Self::new(grids, area)
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_name(&self) -> &str {
        &self.grids[self.current].name
    }

    pub fn current(&self) -> &Level {
        &self.active
    }

    pub fn current_mut(&mut self) -> &mut Level {
        &mut self.active
    }

    /// Make `index` the current level with fresh bricks
    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.grids.len() {
            return Err(Error::LevelIndex {
                index,
                count: self.grids.len(),
            });
        }
        self.current = index;
        self.reset();
        Ok(())
    }

    /// Rebuild the current level's bricks
    pub fn reset(&mut self) {
        self.active = Level::build(&self.grids[self.current], self.area.x, self.area.y);
    }
}
