//! Character-grid maps and the maze generator.
//!
//! Rows run along world Z, columns along world X. The grid is centred on the
//! origin: cell `(x, z)` sits at world `(x - width/2, z - height/2)`.
//!
//! - `#` is a wall: one obstacle box per cell.
//! - `S` is the spawn: the player starts there at eye height. If several exist the last one wins.
//! - Anything else is open floor.

use std::path::Path;

use bevy::prelude::*;

use crate::config::MazeConfig;
use crate::error::{MapDefect, MazeError};
use crate::spatial::{Aabb, ObstacleSet};

pub const WALL_CHAR: char = '#';
pub const SPAWN_CHAR: char = 'S';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Wall,
    Spawn,
    Open,
}

impl CellKind {
    pub fn from_char(ch: char) -> Self {
        match ch {
            WALL_CHAR => CellKind::Wall,
            SPAWN_CHAR => CellKind::Spawn,
            _ => CellKind::Open,
        }
    }
}

/// A validated, rectangular, immutable map grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGrid {
    width: usize,
    height: usize,
    /// Row-major, `height * width` cells.
    cells: Vec<CellKind>,
}

impl MazeGrid {
    /// Build a grid from already-split rows. Width is counted in characters.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, MazeError> {
        let Some(first) = rows.first() else {
            return Err(MapDefect::Empty.into());
        };
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(MapDefect::ZeroWidth.into());
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            let before = cells.len();
            cells.extend(row.as_ref().chars().map(CellKind::from_char));
            let found = cells.len() - before;
            if found != width {
                return Err(MapDefect::Ragged {
                    row: row_idx,
                    expected: width,
                    found,
                }
                .into());
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// Parse map file text: trailing whitespace is dropped, rows split on newlines.
    pub fn parse(text: &str) -> Result<Self, MazeError> {
        let trimmed = text.trim_end();
        if trimmed.is_empty() {
            return Err(MapDefect::Empty.into());
        }
        let rows: Vec<&str> = trimmed.lines().collect();
        Self::from_rows(&rows)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, x: usize, z: usize) -> Option<CellKind> {
        if x >= self.width || z >= self.height {
            return None;
        }
        Some(self.cells[z * self.width + x])
    }

    /// All cells as `(x, z, kind)`, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, CellKind)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, kind)| (i % width, i / width, *kind))
    }

    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|k| **k == kind).count()
    }

    /// World X/Z of a cell centre.
    #[inline]
    pub fn cell_world_xz(&self, x: usize, z: usize) -> Vec2 {
        let offset_x = self.width as f32 / 2.0;
        let offset_z = self.height as f32 / 2.0;
        Vec2::new(x as f32 - offset_x, z as f32 - offset_z)
    }

    /// Floor tile positions (Y = 0), one per cell, for rendering.
    pub fn floor_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.cells().map(move |(x, z, _)| {
            let xz = self.cell_world_xz(x, z);
            Vec3::new(xz.x, 0.0, xz.y)
        })
    }

    /// Ceiling tile positions, one per cell, for rendering.
    pub fn ceiling_positions(&self, ceiling_y: f32) -> impl Iterator<Item = Vec3> + '_ {
        self.floor_positions().map(move |p| Vec3::new(p.x, ceiling_y, p.z))
    }
}

/// Static world produced by [`generate`].
#[derive(Resource, Debug, Clone)]
pub struct MazeLayout {
    pub obstacles: ObstacleSet,
    /// Last spawn cell encountered, at eye height.
    pub spawn: Option<Vec3>,
    /// Number of spawn cells seen (more than one means the last won).
    pub spawn_count: usize,
    pub floor_y: f32,
    pub ceiling_y: f32,
}

impl MazeLayout {
    /// Where the player starts. Without a spawn cell that is the origin.
    pub fn spawn_point(&self) -> Vec3 {
        self.spawn.unwrap_or(Vec3::ZERO)
    }

    /// Wall centres for rendering.
    pub fn wall_centers(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.obstacles.iter().map(Aabb::center)
    }

    pub fn from_text(text: &str, config: &MazeConfig) -> Result<Self, MazeError> {
        let grid = MazeGrid::parse(text)?;
        Ok(generate(&grid, config))
    }

    pub fn load_from_file(path: impl AsRef<Path>, config: &MazeConfig) -> Result<(MazeGrid, Self), MazeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| MazeError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let grid = MazeGrid::parse(&text)?;
        let layout = generate(&grid, config);
        Ok((grid, layout))
    }
}

/// Turn a grid into obstacle boxes and a spawn point. Pure and deterministic.
pub fn generate(grid: &MazeGrid, config: &MazeConfig) -> MazeLayout {
    let wall_size = config.wall_size();
    let wall_center_y = wall_size.y * 0.5;

    let mut boxes = Vec::with_capacity(grid.count(CellKind::Wall));
    let mut spawn = None;
    let mut spawn_count = 0;

    for (x, z, kind) in grid.cells() {
        let xz = grid.cell_world_xz(x, z);
        match kind {
            CellKind::Wall => {
                let center = Vec3::new(xz.x, wall_center_y, xz.y);
                boxes.push(Aabb::from_center_size(center, wall_size));
            }
            CellKind::Spawn => {
                spawn = Some(Vec3::new(xz.x, config.eye_height, xz.y));
                spawn_count += 1;
            }
            CellKind::Open => {}
        }
    }

    match spawn_count {
        0 => warn!("Map has no spawn cell; player starts at the origin"),
        1 => {}
        n => warn!("Map has {} spawn cells; using the last one", n),
    }
    debug!(
        "Generated {}x{} maze: {} walls, spawn {:?}",
        grid.width(),
        grid.height(),
        boxes.len(),
        spawn
    );

    MazeLayout {
        obstacles: ObstacleSet::from_boxes(boxes),
        spawn,
        spawn_count,
        floor_y: 0.0,
        ceiling_y: config.ceiling_height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> MazeConfig {
        MazeConfig::default()
    }

    #[test]
    fn test_reference_scenario() {
        let grid = MazeGrid::from_rows(&["#S#", "#.#", "###"]).unwrap();
        let layout = generate(&grid, &cfg());

        assert_eq!(layout.obstacles.len(), 7);
        // S is at column 1, row 0: (1 - 1.5, 0 - 1.5)
        assert_eq!(layout.spawn, Some(Vec3::new(-0.5, 1.8, -1.5)));
        assert_eq!(layout.spawn_count, 1);
    }

    #[test]
    fn test_one_obstacle_per_wall_cell() {
        let rows = ["#.#..#", "S#...#", "######", "......"];
        let grid = MazeGrid::from_rows(&rows).unwrap();
        let expected = rows.iter().flat_map(|r| r.chars()).filter(|c| *c == '#').count();
        let layout = generate(&grid, &cfg());
        assert_eq!(layout.obstacles.len(), expected);
        assert_eq!(grid.count(CellKind::Wall), expected);
    }

    #[test]
    fn test_wall_box_placement() {
        let grid = MazeGrid::from_rows(&["#."]).unwrap();
        let layout = generate(&grid, &cfg());
        let wall = layout.obstacles.get(0).unwrap();
        // width 2, height 1: cell (0, 0) -> (-1.0, -0.5)
        assert_eq!(wall.center(), Vec3::new(-1.0, 1.0, -0.5));
        assert_eq!(wall.size(), Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(wall.min.y, 0.0);
        assert_eq!(wall.max.y, 2.0);
    }

    #[test]
    fn test_last_spawn_wins() {
        let grid = MazeGrid::from_rows(&["S..", "...", "..S"]).unwrap();
        let layout = generate(&grid, &cfg());
        assert_eq!(layout.spawn_count, 2);
        assert_eq!(layout.spawn, Some(Vec3::new(0.5, 1.8, 0.5)));
    }

    #[test]
    fn test_no_spawn_falls_back_to_origin() {
        let grid = MazeGrid::from_rows(&["#.", ".#"]).unwrap();
        let layout = generate(&grid, &cfg());
        assert_eq!(layout.spawn, None);
        assert_eq!(layout.spawn_point(), Vec3::ZERO);
    }

    #[test]
    fn test_open_only_grid_has_no_obstacles() {
        let grid = MazeGrid::from_rows(&["...", ".S.", "..."]).unwrap();
        let layout = generate(&grid, &cfg());
        assert!(layout.obstacles.is_empty());
    }

    #[test]
    fn test_generate_is_deterministic() {
        let grid = MazeGrid::parse("#####\n#S..#\n#.#.#\n#...#\n#####\n").unwrap();
        let a = generate(&grid, &cfg());
        let b = generate(&grid, &cfg());

        assert_eq!(a.spawn, b.spawn);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        for (x, y) in a.obstacles.iter().zip(b.obstacles.iter()) {
            assert_eq!(x.min.to_array().map(f32::to_bits), y.min.to_array().map(f32::to_bits));
            assert_eq!(x.max.to_array().map(f32::to_bits), y.max.to_array().map(f32::to_bits));
        }
    }

    #[test]
    fn test_ragged_grid_rejected() {
        let err = MazeGrid::from_rows(&["###", "#S", "###"]).unwrap_err();
        assert_eq!(
            err,
            MazeError::InvalidMap(MapDefect::Ragged {
                row: 1,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_empty_grids_rejected() {
        let none: [&str; 0] = [];
        assert_eq!(
            MazeGrid::from_rows(&none).unwrap_err(),
            MazeError::InvalidMap(MapDefect::Empty)
        );
        assert_eq!(
            MazeGrid::from_rows(&["", ""]).unwrap_err(),
            MazeError::InvalidMap(MapDefect::ZeroWidth)
        );
        assert_eq!(
            MazeGrid::parse("  \n\n").unwrap_err(),
            MazeError::InvalidMap(MapDefect::Empty)
        );
    }

    #[test]
    fn test_parse_trims_trailing_whitespace_and_crlf() {
        let grid = MazeGrid::parse("#S#\r\n#.#\r\n###\r\n\n").unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.cell(1, 0), Some(CellKind::Spawn));
        assert_eq!(grid.cell(1, 1), Some(CellKind::Open));
        assert_eq!(grid.cell(3, 0), None);
    }

    #[test]
    fn test_width_counts_characters_not_bytes() {
        let grid = MazeGrid::from_rows(&["#é#", "#S#"]).unwrap();
        assert_eq!(grid.width(), 3);
    }

    #[test]
    fn test_tile_positions_cover_every_cell() {
        let grid = MazeGrid::from_rows(&["#S", ".."]).unwrap();
        let floors: Vec<Vec3> = grid.floor_positions().collect();
        let ceilings: Vec<Vec3> = grid.ceiling_positions(2.0).collect();
        assert_eq!(floors.len(), 4);
        assert_eq!(ceilings.len(), 4);
        assert_eq!(floors[0], Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(ceilings[3], Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_from_text_propagates_map_errors() {
        let err = MazeLayout::from_text("##\n#", &cfg()).unwrap_err();
        assert!(matches!(err, MazeError::InvalidMap(MapDefect::Ragged { .. })));
    }
}
