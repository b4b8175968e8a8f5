mod draw_list;
mod renderer;

use thiserror::Error;

pub use draw_list::{build_draw_list, tile_to_screen_px, DrawCommand, DrawLayer, Viewport};
pub use renderer::PixelsRenderer;

pub const BACKGROUND_COLOR: [u8; 4] = [80, 120, 255, 255];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to present frame: {0}")]
    Present(#[source] pixels::Error),
    #[error("failed to resize render surface: {0}")]
    ResizeSurface(#[source] pixels::TextureError),
}

/// Receives one ordered draw list per frame and is responsible for pixels.
pub trait RenderSink {
    fn present(&mut self, commands: &[DrawCommand]) -> Result<(), RenderError>;
}

/// Keeps every submitted frame instead of drawing it.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    frames: Vec<Vec<DrawCommand>>,
}

impl RecordingRenderer {
    pub fn frames(&self) -> &[Vec<DrawCommand>] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&[DrawCommand]> {
        self.frames.last().map(Vec::as_slice)
    }
}

impl RenderSink for RecordingRenderer {
    fn present(&mut self, commands: &[DrawCommand]) -> Result<(), RenderError> {
        self.frames.push(commands.to_vec());
        Ok(())
    }
}
