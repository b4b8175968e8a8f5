use std::path::PathBuf;

use thiserror::Error;

pub type TileId = u32;

/// Pixel-space point or offset, y pointing down.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error("required resource not found: {path}")]
    ResourceNotFound { path: PathBuf },
    #[error("failed to read resource {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("tileset geometry must have at least one column")]
    ZeroColumns,
    #[error("tileset tile size must be non-zero, got {width}x{height}")]
    ZeroTileSize { width: u32, height: u32 },
}

/// Row-major grid of tile ids. Cell `(x, y)` lives at `y * width + x`.
///
/// Bounds come from `width` and `height` alone. The stored layer may be
/// shorter (or absent); cells without an entry have no tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    width: u32,
    height: u32,
    tiles: Vec<TileId>,
}

impl TileMap {
    pub fn new(width: u32, height: u32, tiles: Vec<TileId>) -> Self {
        Self {
            width,
            height,
            tiles,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn tile_at(&self, x: u32, y: u32) -> Option<TileId> {
        self.index_of(x, y)
            .and_then(|index| self.tiles.get(index).copied())
    }
}

/// Collision attribute codes laid out like the owning [`TileMap`].
///
/// An empty map means the level carries no collision layer at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionMap {
    codes: Vec<u8>,
}

impl CollisionMap {
    pub fn new(codes: Vec<u8>) -> Self {
        Self { codes }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_absent(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn code_at(&self, index: usize) -> Option<u8> {
        self.codes.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_map_indexing_and_bounds() {
        let map = TileMap::new(3, 2, vec![10, 11, 12, 13, 14, 15]);
        assert_eq!(map.index_of(0, 0), Some(0));
        assert_eq!(map.index_of(2, 1), Some(5));
        assert_eq!(map.tile_at(1, 1), Some(14));
        assert_eq!(map.index_of(3, 0), None);
        assert_eq!(map.tile_at(0, 2), None);
    }

    #[test]
    fn bounds_come_from_dimensions_not_layer_length() {
        let map = TileMap::new(3, 1, Vec::new());
        assert_eq!(map.cell_count(), 3);
        assert_eq!(map.index_of(2, 0), Some(2));
        assert_eq!(map.tile_at(2, 0), None);

        let long = TileMap::new(1, 1, vec![5, 6]);
        assert_eq!(long.tile_at(0, 0), Some(5));
        assert_eq!(long.index_of(1, 0), None);
    }

    #[test]
    fn zero_sized_map_is_an_empty_level() {
        let map = TileMap::new(0, 0, Vec::new());
        assert_eq!(map.index_of(0, 0), None);
    }

    #[test]
    fn collision_map_reports_missing_cells() {
        assert!(CollisionMap::empty().is_absent());
        let short = CollisionMap::new(vec![0, 1]);
        assert_eq!(short.code_at(1), Some(1));
        assert_eq!(short.code_at(2), None);
    }
}
