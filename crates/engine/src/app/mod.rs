mod frame_loop;
mod input;
mod loop_runner;
mod movement;
mod pacing;
mod profiler;
mod rendering;

pub use frame_loop::{FrameLoop, RunReport, TickReport};
pub use input::{Direction, InputSnapshot, InputSource};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use movement::{
    step, Actor, ActorConfig, MovementConfig, MovementController, StepOutcome,
    DEFAULT_FOOT_OFFSET_PX, DEFAULT_MAP_OFFSET_TILES,
};
pub use pacing::{FixedRateClock, FrameClock, UnpacedClock};
pub use profiler::{LoopMetricsSnapshot, LoopProfiler, NoopProfiler, Profiler, RunSummary};
pub use rendering::{
    build_draw_list, tile_to_screen_px, DrawCommand, DrawLayer, PixelsRenderer,
    RecordingRenderer, RenderError, RenderSink, Viewport, BACKGROUND_COLOR,
};
