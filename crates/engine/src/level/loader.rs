use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};

use super::types::{CollisionMap, LevelLoadError, TileId, TileMap};

/// Map document as authored: nested rows, every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawMapPayload {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub tiles: Option<Vec<Vec<TileId>>>,
    #[serde(default)]
    pub collision_map: Option<Vec<Vec<u8>>>,
}

pub fn load_map(path: &Path) -> Result<(TileMap, CollisionMap), LevelLoadError> {
    let raw = read_resource(path)?;
    let payload: RawMapPayload = parse_json_resource(&raw, path)?;
    let (tile_map, collision_map) = normalize_map(payload);
    info!(
        path = %path.display(),
        width = tile_map.width(),
        height = tile_map.height(),
        tile_count = tile_map.tiles().len(),
        collision_count = collision_map.len(),
        "map_loaded"
    );
    let expected = tile_map.cell_count();
    if tile_map.tiles().len() != expected {
        warn!(
            path = %path.display(),
            layer = "tiles",
            expected,
            actual = tile_map.tiles().len(),
            "map_layer_size_mismatch"
        );
    }
    if collision_map.is_absent() {
        warn!(path = %path.display(), "map_has_no_collision_layer");
    } else if collision_map.len() != expected {
        warn!(
            path = %path.display(),
            layer = "collision_map",
            expected,
            actual = collision_map.len(),
            "map_layer_size_mismatch"
        );
    }
    Ok((tile_map, collision_map))
}

/// Flattens the authored rows. Missing fields become zero dimensions or
/// empty layers; layer lengths are not checked against the dimensions.
pub fn normalize_map(payload: RawMapPayload) -> (TileMap, CollisionMap) {
    let width = payload.width.unwrap_or(0);
    let height = payload.height.unwrap_or(0);
    let tiles = flatten_rows(payload.tiles.unwrap_or_default());
    let codes = flatten_rows(payload.collision_map.unwrap_or_default());

    (TileMap::new(width, height, tiles), CollisionMap::new(codes))
}

pub fn flatten_rows<T>(rows: Vec<Vec<T>>) -> Vec<T> {
    let total = rows.iter().map(Vec::len).sum();
    let mut flat = Vec::with_capacity(total);
    for row in rows {
        flat.extend(row);
    }
    flat
}

pub(crate) fn read_resource(path: &Path) -> Result<String, LevelLoadError> {
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            LevelLoadError::ResourceNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LevelLoadError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

pub(crate) fn parse_json_resource<T: DeserializeOwned>(
    raw: &str,
    path: &Path,
) -> Result<T, LevelLoadError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, T>(&mut deserializer).map_err(|error| {
        let field_path = error.path().to_string();
        let source = error.into_inner();
        let message = if field_path.is_empty() || field_path == "." {
            source.to_string()
        } else {
            format!("at {field_path}: {source}")
        };
        LevelLoadError::Parse {
            path: path.to_path_buf(),
            message,
        }
    })
}
