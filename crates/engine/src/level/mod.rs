mod collision;
mod loader;
mod tileset;
mod types;

use std::path::{Path, PathBuf};

use tracing::info;

pub use collision::{attribute_at, world_to_tile, CollisionAttribute, MovementPolicy};
pub use loader::{flatten_rows, load_map, normalize_map, RawMapPayload};
pub use tileset::{load_tileset_geometry, rect_for, SourceRect, TilesetGeometry};
pub use types::{CollisionMap, ConfigurationError, LevelLoadError, TileId, TileMap, Vec2};

pub const DEFAULT_MAP_FILE: &str = "map001.json";

/// Files that make up one playable level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelPaths {
    pub map: PathBuf,
    pub tileset_meta: PathBuf,
    pub tileset_image: PathBuf,
    pub actor_image: PathBuf,
}

impl LevelPaths {
    pub fn under_root(root: &Path) -> Self {
        let assets = root.join("assets");
        Self {
            map: root.join("data").join(DEFAULT_MAP_FILE),
            tileset_meta: assets.join("tilesets_meta.json"),
            tileset_image: assets.join("tilesets.png"),
            actor_image: assets.join("player.png"),
        }
    }
}

/// Immutable level data shared by collision and rendering for a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub tiles: TileMap,
    pub collision: CollisionMap,
    pub geometry: TilesetGeometry,
}

impl Level {
    pub fn new(tiles: TileMap, collision: CollisionMap, geometry: TilesetGeometry) -> Self {
        Self {
            tiles,
            collision,
            geometry,
        }
    }

    pub fn attribute_at(&self, point: Vec2) -> CollisionAttribute {
        attribute_at(
            point,
            &self.tiles,
            &self.collision,
            self.geometry.tile_width(),
            self.geometry.tile_height(),
        )
    }
}

/// Loads the map and tileset geometry. Either file missing aborts startup.
pub fn load_level(paths: &LevelPaths) -> Result<Level, LevelLoadError> {
    let (tiles, collision) = load_map(&paths.map)?;
    let geometry = load_tileset_geometry(&paths.tileset_meta)?;
    info!(
        map = %paths.map.display(),
        width = tiles.width(),
        height = tiles.height(),
        has_collision = !collision.is_absent(),
        "level_loaded"
    );
    Ok(Level::new(tiles, collision, geometry))
}
