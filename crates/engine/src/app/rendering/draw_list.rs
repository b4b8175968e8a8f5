use crate::app::movement::{Actor, MovementConfig};
use crate::level::{Level, SourceRect, TileMap, TilesetGeometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawLayer {
    Tile,
    Actor,
}

/// Copy `source` from the layer's image to `(dest_x, dest_y)` on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommand {
    pub layer: DrawLayer,
    pub source: SourceRect,
    pub dest_x: i32,
    pub dest_y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TileRectInclusive {
    pub(crate) x_min: u32,
    pub(crate) x_max: u32,
    pub(crate) y_min: u32,
    pub(crate) y_max: u32,
}

/// Screen position of tile `(x, y)` once the map offset is applied.
pub fn tile_to_screen_px(
    x: u32,
    y: u32,
    geometry: &TilesetGeometry,
    map_offset_tiles: (i32, i32),
) -> (i32, i32) {
    let column = x as i64 + map_offset_tiles.0 as i64;
    let row = y as i64 + map_offset_tiles.1 as i64;
    (
        (column * geometry.tile_width() as i64) as i32,
        (row * geometry.tile_height() as i64) as i32,
    )
}

/// Builds the frame's draw list: visible tiles row-major, then the actor.
pub fn build_draw_list(
    level: &Level,
    actor: &Actor,
    config: &MovementConfig,
    viewport: Viewport,
    commands: &mut Vec<DrawCommand>,
) {
    commands.clear();

    if let Some(visible) = visible_tile_rect(
        &level.tiles,
        &level.geometry,
        config.map_offset_tiles,
        viewport,
    ) {
        for y in visible.y_min..=visible.y_max {
            for x in visible.x_min..=visible.x_max {
                let Some(tile_id) = level.tiles.tile_at(x, y) else {
                    continue;
                };
                let (dest_x, dest_y) =
                    tile_to_screen_px(x, y, &level.geometry, config.map_offset_tiles);
                commands.push(DrawCommand {
                    layer: DrawLayer::Tile,
                    source: level.geometry.rect_for(tile_id),
                    dest_x,
                    dest_y,
                });
            }
        }
    }

    commands.push(DrawCommand {
        layer: DrawLayer::Actor,
        source: SourceRect {
            x: 0,
            y: 0,
            w: actor.sprite_width,
            h: actor.sprite_height,
        },
        dest_x: actor.position.x.round() as i32,
        dest_y: actor.position.y.round() as i32,
    });
}

pub(crate) fn visible_tile_rect(
    tiles: &TileMap,
    geometry: &TilesetGeometry,
    map_offset_tiles: (i32, i32),
    viewport: Viewport,
) -> Option<TileRectInclusive> {
    if tiles.width() == 0 || tiles.height() == 0 || viewport.width == 0 || viewport.height == 0 {
        return None;
    }

    let (x_min, x_max) = visible_axis_range(
        tiles.width(),
        geometry.tile_width(),
        map_offset_tiles.0,
        viewport.width,
    )?;
    let (y_min, y_max) = visible_axis_range(
        tiles.height(),
        geometry.tile_height(),
        map_offset_tiles.1,
        viewport.height,
    )?;

    Some(TileRectInclusive {
        x_min,
        x_max,
        y_min,
        y_max,
    })
}

// A cell at grid index `i` covers [(i + offset) * tile, (i + offset + 1) * tile).
fn visible_axis_range(
    cell_count: u32,
    tile_size: u32,
    offset_tiles: i32,
    viewport_size: u32,
) -> Option<(u32, u32)> {
    let offset = offset_tiles as i64;
    let cells_on_screen = (viewport_size as i64 + tile_size as i64 - 1) / tile_size as i64;
    let min = (-offset).max(0);
    let max = (cells_on_screen - 1 - offset).min(cell_count as i64 - 1);
    if min > max {
        return None;
    }
    Some((min as u32, max as u32))
}
