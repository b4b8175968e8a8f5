use std::path::Path;
use std::sync::Arc;

use image::ImageReader;
use pixels::{Error, Pixels, SurfaceTexture};
use tracing::warn;
use winit::window::Window;

use crate::level::{LevelPaths, SourceRect};

use super::{DrawCommand, DrawLayer, RenderError, RenderSink, BACKGROUND_COLOR};

const TILE_FALLBACK_EVEN_COLOR: [u8; 4] = [74, 112, 56, 255];
const TILE_FALLBACK_ODD_COLOR: [u8; 4] = [112, 83, 58, 255];
const ACTOR_FALLBACK_COLOR: [u8; 4] = [220, 220, 240, 255];

struct LoadedImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

/// Composites draw lists into a fixed-size pixel buffer scaled to the window.
pub struct PixelsRenderer {
    pixels: Pixels<'static>,
    frame_width: u32,
    frame_height: u32,
    tileset: Option<LoadedImage>,
    actor_sprite: Option<LoadedImage>,
}

impl PixelsRenderer {
    pub fn new(
        window: Arc<Window>,
        frame_width: u32,
        frame_height: u32,
        paths: &LevelPaths,
    ) -> Result<Self, Error> {
        let surface_size = window.inner_size();
        let surface = SurfaceTexture::new(surface_size.width, surface_size.height, window);
        let pixels = Pixels::new(frame_width, frame_height, surface)?;
        Ok(Self {
            pixels,
            frame_width,
            frame_height,
            tileset: load_image_or_warn(&paths.tileset_image, "tileset"),
            actor_sprite: load_image_or_warn(&paths.actor_image, "actor"),
        })
    }

    pub fn resize_surface(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels
            .resize_surface(width, height)
            .map_err(RenderError::ResizeSurface)
    }
}

impl RenderSink for PixelsRenderer {
    fn present(&mut self, commands: &[DrawCommand]) -> Result<(), RenderError> {
        compose_frame(
            self.pixels.frame_mut(),
            self.frame_width,
            self.frame_height,
            commands,
            self.tileset.as_ref(),
            self.actor_sprite.as_ref(),
        );
        self.pixels.render().map_err(RenderError::Present)
    }
}

fn compose_frame(
    frame: &mut [u8],
    width: u32,
    height: u32,
    commands: &[DrawCommand],
    tileset: Option<&LoadedImage>,
    actor_sprite: Option<&LoadedImage>,
) {
    for chunk in frame.chunks_exact_mut(4) {
        chunk.copy_from_slice(&BACKGROUND_COLOR);
    }

    for command in commands {
        let image = match command.layer {
            DrawLayer::Tile => tileset,
            DrawLayer::Actor => actor_sprite,
        };
        match image {
            Some(image) => blit_rect(
                frame,
                width,
                height,
                image,
                command.source,
                command.dest_x,
                command.dest_y,
            ),
            None => fill_rect_clipped(
                frame,
                width,
                height,
                command.dest_x,
                command.dest_y,
                command.source.w,
                command.source.h,
                fallback_color(command),
            ),
        }
    }
}

fn fallback_color(command: &DrawCommand) -> [u8; 4] {
    match command.layer {
        DrawLayer::Actor => ACTOR_FALLBACK_COLOR,
        DrawLayer::Tile => {
            let source = command.source;
            let cell = source.x / source.w.max(1) + source.y / source.h.max(1);
            if cell % 2 == 0 {
                TILE_FALLBACK_EVEN_COLOR
            } else {
                TILE_FALLBACK_ODD_COLOR
            }
        }
    }
}

/// Copies `source` out of `image` onto the frame at `(dest_x, dest_y)`,
/// clipping against both the image and the frame. Fully transparent source
/// pixels are skipped.
fn blit_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    image: &LoadedImage,
    source: SourceRect,
    dest_x: i32,
    dest_y: i32,
) {
    if image.rgba.len() < image.width as usize * image.height as usize * 4 {
        return;
    }
    let src_w = source.w.min(image.width.saturating_sub(source.x)) as i64;
    let src_h = source.h.min(image.height.saturating_sub(source.y)) as i64;

    let left = (dest_x as i64).max(0);
    let top = (dest_y as i64).max(0);
    let right = (dest_x as i64 + src_w).min(width as i64);
    let bottom = (dest_y as i64 + src_h).min(height as i64);
    if left >= right || top >= bottom {
        return;
    }

    let frame_width = width as usize;
    let image_width = image.width as usize;
    for out_y in top..bottom {
        let src_y = source.y as usize + (out_y - dest_y as i64) as usize;
        for out_x in left..right {
            let src_x = source.x as usize + (out_x - dest_x as i64) as usize;
            let src_offset = (src_y * image_width + src_x) * 4;
            let alpha = image.rgba[src_offset + 3];
            if alpha == 0 {
                continue;
            }
            let dst_offset = (out_y as usize * frame_width + out_x as usize) * 4;
            frame[dst_offset..dst_offset + 4]
                .copy_from_slice(&image.rgba[src_offset..src_offset + 4]);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn fill_rect_clipped(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: u32,
    rect_height: u32,
    color: [u8; 4],
) {
    let left = (x as i64).max(0);
    let top = (y as i64).max(0);
    let right = (x as i64 + rect_width as i64).min(width as i64);
    let bottom = (y as i64 + rect_height as i64).min(height as i64);
    if left >= right || top >= bottom {
        return;
    }
    let frame_width = width as usize;
    for row in top..bottom {
        for col in left..right {
            let offset = (row as usize * frame_width + col as usize) * 4;
            if let Some(pixel) = frame.get_mut(offset..offset + 4) {
                pixel.copy_from_slice(&color);
            }
        }
    }
}

fn load_image_or_warn(path: &Path, role: &'static str) -> Option<LoadedImage> {
    match load_image_rgba(path) {
        Ok(image) => Some(image),
        Err(reason) => {
            warn!(
                role,
                path = %path.display(),
                reason = reason.as_str(),
                "renderer_image_load_failed_using_fallback"
            );
            None
        }
    }
}

fn load_image_rgba(path: &Path) -> Result<LoadedImage, String> {
    let reader = ImageReader::open(path).map_err(|error| format!("file_open_failed:{error}"))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedImage {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}
