use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::loader::{parse_json_resource, read_resource};
use super::types::{ConfigurationError, LevelLoadError, TileId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Layout of the tileset atlas. Construction guarantees every field is
/// non-zero, so indexing never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilesetGeometry {
    tile_width: u32,
    tile_height: u32,
    columns: u32,
}

#[derive(Debug, Deserialize)]
struct TilesetMetaDocument {
    tile_width: u32,
    tile_height: u32,
    columns: u32,
}

impl TilesetGeometry {
    pub fn new(tile_width: u32, tile_height: u32, columns: u32) -> Result<Self, ConfigurationError> {
        if columns == 0 {
            return Err(ConfigurationError::ZeroColumns);
        }
        if tile_width == 0 || tile_height == 0 {
            return Err(ConfigurationError::ZeroTileSize {
                width: tile_width,
                height: tile_height,
            });
        }
        Ok(Self {
            tile_width,
            tile_height,
            columns,
        })
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rect_for(&self, tile_id: TileId) -> SourceRect {
        rect_for(tile_id, self)
    }
}

/// Maps an authored tile id to its cell in the atlas.
///
/// Ids are 1-based in map files; `0` and `1` both land on atlas cell 0.
pub fn rect_for(tile_id: TileId, geometry: &TilesetGeometry) -> SourceRect {
    let index = tile_id.saturating_sub(1);
    let col = index % geometry.columns;
    let row = index / geometry.columns;
    // Ids past the atlas saturate instead of overflowing; the blit clips them.
    SourceRect {
        x: col.saturating_mul(geometry.tile_width),
        y: row.saturating_mul(geometry.tile_height),
        w: geometry.tile_width,
        h: geometry.tile_height,
    }
}

pub fn load_tileset_geometry(path: &Path) -> Result<TilesetGeometry, LevelLoadError> {
    let raw = read_resource(path)?;
    let document: TilesetMetaDocument = parse_json_resource(&raw, path)?;
    let geometry =
        TilesetGeometry::new(document.tile_width, document.tile_height, document.columns)?;
    info!(
        path = %path.display(),
        tile_width = geometry.tile_width,
        tile_height = geometry.tile_height,
        columns = geometry.columns,
        "tileset_meta_loaded"
    );
    Ok(geometry)
}
