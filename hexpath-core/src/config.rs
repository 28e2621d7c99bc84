//! Board configuration: size, endpoints, walls and layout scale

use crate::board::{Cell, Layout, Topology};
use crate::error::{HexPathError, Rejection, Result};
use crate::grid::check_dimensions;
use anyhow::Context;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reference board edge length
pub const DEFAULT_SIZE: usize = 8;

/// Pixel scale of the layout space
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Overall scale applied to the hex spacing
    pub zoom: f64,
    /// Horizontal distance between hex centres before zoom
    pub hex_width: f64,
    /// Vertical distance between rows before zoom
    pub hex_height: f64,
    /// Global shift in hexes so the board sits in positive space
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            zoom: 0.25,
            hex_width: 280.0,
            hex_height: 240.0,
            offset_x: 1.0,
            offset_y: 1.0,
        }
    }
}

impl LayoutConfig {
    pub fn to_layout(&self, topology: Topology) -> Layout {
        Layout {
            topology,
            x_spacing: self.hex_width * self.zoom,
            y_spacing: self.hex_height * self.zoom,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
        }
    }
}

/// Everything needed to build a [`crate::Session`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
    pub start: Cell,
    pub end: Cell,
    pub walls: Vec<Cell>,
    pub topology: Topology,
    pub layout: LayoutConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            start: Cell::new(0, 0),
            end: Cell::new(DEFAULT_SIZE as i32 - 1, DEFAULT_SIZE as i32 - 1),
            walls: Vec::new(),
            topology: Topology::Rhombus,
            layout: LayoutConfig::default(),
        }
    }
}

impl BoardConfig {
    /// Empty board of the given size, start in the top-left corner and end
    /// in the bottom-right
    pub fn new(width: usize, height: usize) -> Self {
        let last = |n: usize| i32::try_from(n).unwrap_or(i32::MAX).saturating_sub(1);
        Self {
            width,
            height,
            end: Cell::new(last(width), last(height)),
            ..Default::default()
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout.to_layout(self.topology)
    }

    fn contains(&self, cell: Cell) -> bool {
        cell.col >= 0
            && cell.row >= 0
            && (cell.col as usize) < self.width
            && (cell.row as usize) < self.height
    }

    fn check_bounds(&self, cell: Cell) -> Result<()> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(HexPathError::InvalidCoordinate {
                col: cell.col,
                row: cell.row,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Check that this config describes a buildable board
    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.width, self.height)?;
        self.check_bounds(self.start)?;
        self.check_bounds(self.end)?;
        if self.start == self.end {
            return Err(Rejection::EndpointsOverlap.into());
        }
        for &wall in &self.walls {
            self.check_bounds(wall)?;
            if wall == self.start || wall == self.end {
                return Err(Rejection::WallOnEndpoint.into());
            }
        }
        Ok(())
    }

    /// Walls with duplicates removed, first occurrence kept
    pub fn unique_walls(&self) -> Vec<Cell> {
        let mut seen = FxHashSet::default();
        self.walls.iter().copied().filter(|&w| seen.insert(w)).collect()
    }

    // ========================================================================
    // RANDOM BOARDS
    // ========================================================================

    /// Replace the walls with a random scatter covering roughly `density`
    /// of the non-endpoint cells
    pub fn with_random_walls<R: Rng>(mut self, density: f64, rng: &mut R) -> Self {
        let density = density.clamp(0.0, 1.0);
        self.walls.clear();
        for row in 0..self.height as i32 {
            for col in 0..self.width as i32 {
                let cell = Cell::new(col, row);
                if cell == self.start || cell == self.end {
                    continue;
                }
                if rng.gen_bool(density) {
                    self.walls.push(cell);
                }
            }
        }
        self
    }

    /// Reproducible random board
    pub fn random(width: usize, height: usize, density: f64, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        BoardConfig::new(width, height).with_random_walls(density, &mut rng)
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read board file: {}", path.display()))?;
        let config: BoardConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse board file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write board file: {}", path.display()))?;
        Ok(())
    }
}
