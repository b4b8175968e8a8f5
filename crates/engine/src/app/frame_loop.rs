use tracing::info;

use crate::level::Level;

use super::input::{InputSnapshot, InputSource};
use super::movement::{Actor, MovementController, StepOutcome};
use super::pacing::FrameClock;
use super::profiler::Profiler;
use super::rendering::{build_draw_list, DrawCommand, RenderError, RenderSink, Viewport};

const UPDATE_PROFILER_TAG: &str = "mainloop_update";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub outcome: StepOutcome,
    pub command_count: usize,
    pub running: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub ticks: u64,
}

/// Drives `PollInput -> Update -> Emit`, then waits on the clock.
///
/// The renderer, clock and profiler are owned collaborators so each can be
/// swapped independently. Quitting takes effect after the current tick has
/// emitted its frame.
pub struct FrameLoop<R, C, P> {
    level: Level,
    movement: MovementController,
    viewport: Viewport,
    renderer: R,
    clock: C,
    profiler: P,
    draw_list: Vec<DrawCommand>,
    running: bool,
    started: bool,
    tick_count: u64,
}

impl<R: RenderSink, C: FrameClock, P: Profiler> FrameLoop<R, C, P> {
    pub fn new(
        level: Level,
        movement: MovementController,
        viewport: Viewport,
        renderer: R,
        clock: C,
        profiler: P,
    ) -> Self {
        Self {
            level,
            movement,
            viewport,
            renderer,
            clock,
            profiler,
            draw_list: Vec::new(),
            running: false,
            started: false,
            tick_count: 0,
        }
    }

    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.running = true;
        self.profiler.start();
        let actor = self.movement.actor();
        info!(
            x = actor.position.x,
            y = actor.position.y,
            speed = actor.speed,
            "frame_loop_started"
        );
    }

    /// Runs the update and emit phases for one already-polled snapshot.
    ///
    /// A render failure aborts the tick before it is counted.
    pub fn tick(&mut self, input: InputSnapshot) -> Result<TickReport, RenderError> {
        if input.quit_requested() && self.running {
            self.running = false;
            info!(tick = self.tick_count, "shutdown_requested");
        }

        let input_vector = input.movement_vector(self.movement.actor().speed);
        let outcome = self.movement.step(input_vector, &self.level);

        build_draw_list(
            &self.level,
            self.movement.actor(),
            self.movement.config(),
            self.viewport,
            &mut self.draw_list,
        );
        if let Err(error) = self.renderer.present(&self.draw_list) {
            self.running = false;
            return Err(error);
        }

        self.tick_count += 1;
        self.profiler.update(UPDATE_PROFILER_TAG);
        Ok(TickReport {
            tick: self.tick_count,
            outcome,
            command_count: self.draw_list.len(),
            running: self.running,
        })
    }

    pub fn wait_for_next_frame(&mut self) {
        self.clock.wait_for_next_frame();
    }

    pub fn finish(&mut self) -> RunReport {
        self.running = false;
        self.profiler.summary();
        info!(ticks = self.tick_count, "frame_loop_finished");
        RunReport {
            ticks: self.tick_count,
        }
    }

    /// Loops until the input source signals quit.
    pub fn run<I: InputSource>(&mut self, input: &mut I) -> Result<RunReport, RenderError> {
        self.start();
        while self.running {
            let snapshot = input.poll();
            let report = self.tick(snapshot)?;
            if report.running {
                self.wait_for_next_frame();
            }
        }
        Ok(self.finish())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn actor(&self) -> &Actor {
        self.movement.actor()
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn profiler(&self) -> &P {
        &self.profiler
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::app::input::Direction;
    use crate::app::movement::MovementConfig;
    use crate::app::pacing::UnpacedClock;
    use crate::app::profiler::NoopProfiler;
    use crate::app::rendering::{DrawLayer, RecordingRenderer};
    use crate::level::{CollisionAttribute, CollisionMap, TileMap, TilesetGeometry, Vec2};

    struct ScriptedInput {
        snapshots: VecDeque<InputSnapshot>,
    }

    impl ScriptedInput {
        fn new(snapshots: Vec<InputSnapshot>) -> Self {
            Self {
                snapshots: snapshots.into(),
            }
        }
    }

    impl InputSource for ScriptedInput {
        fn poll(&mut self) -> InputSnapshot {
            self.snapshots.pop_front().unwrap_or_else(InputSnapshot::quit)
        }
    }

    #[derive(Default)]
    struct CountingClock {
        waits: u32,
    }

    impl FrameClock for CountingClock {
        fn wait_for_next_frame(&mut self) {
            self.waits += 1;
        }
    }

    #[derive(Default)]
    struct CallLog {
        calls: Vec<String>,
    }

    impl Profiler for CallLog {
        fn start(&mut self) {
            self.calls.push("start".to_string());
        }

        fn update(&mut self, tag: &'static str) {
            self.calls.push(format!("update:{tag}"));
        }

        fn summary(&mut self) {
            self.calls.push("summary".to_string());
        }
    }

    struct FailingRenderer;

    impl RenderSink for FailingRenderer {
        fn present(&mut self, _commands: &[DrawCommand]) -> Result<(), RenderError> {
            Err(RenderError::Present(pixels::Error::AdapterNotFound))
        }
    }

    fn strip_level() -> Level {
        let tiles = TileMap::new(3, 1, vec![1, 2, 3]);
        let collision = CollisionMap::new(vec![0, 1, 0]);
        let geometry = TilesetGeometry::new(16, 16, 8).expect("geometry");
        Level::new(tiles, collision, geometry)
    }

    fn controller(x: f32, speed: f32) -> MovementController {
        MovementController::new(
            Actor {
                position: Vec2::new(x, 0.0),
                sprite_width: 16,
                sprite_height: 16,
                speed,
            },
            MovementConfig {
                map_offset_tiles: (0, 0),
                ..MovementConfig::default()
            },
        )
    }

    fn frame_loop<R: RenderSink>(
        renderer: R,
        speed: f32,
    ) -> FrameLoop<R, CountingClock, CallLog> {
        FrameLoop::new(
            strip_level(),
            controller(0.0, speed),
            Viewport {
                width: 320,
                height: 240,
            },
            renderer,
            CountingClock::default(),
            CallLog::default(),
        )
    }

    fn right() -> InputSnapshot {
        InputSnapshot::empty().with_held(Direction::Right, true)
    }

    #[test]
    fn each_tick_emits_tiles_then_actor() {
        let mut frame_loop = frame_loop(RecordingRenderer::default(), 2.0);
        frame_loop.start();
        let report = frame_loop.tick(right()).expect("tick");

        assert_eq!(report.command_count, 4);
        let frame = frame_loop.renderer().last_frame().expect("frame");
        assert!(frame[..3].iter().all(|c| c.layer == DrawLayer::Tile));
        assert_eq!(frame[3].layer, DrawLayer::Actor);
        assert_eq!((frame[3].dest_x, frame[3].dest_y), (2, 0));
    }

    #[test]
    fn blocked_move_is_reported_and_position_kept() {
        let mut frame_loop = frame_loop(RecordingRenderer::default(), 16.0);
        frame_loop.start();
        let report = frame_loop.tick(right()).expect("tick");

        assert_eq!(
            report.outcome,
            StepOutcome::Blocked {
                attribute: CollisionAttribute::Solid
            }
        );
        assert_eq!(frame_loop.actor().position, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn run_stops_after_quit_tick_is_emitted() {
        let mut frame_loop = frame_loop(RecordingRenderer::default(), 2.0);
        let mut input = ScriptedInput::new(vec![right(), right(), right().with_quit_requested(true)]);

        let report = frame_loop.run(&mut input).expect("run");

        assert_eq!(report.ticks, 3);
        assert_eq!(frame_loop.renderer().frames().len(), 3);
        // The quit tick still moves and draws; only the trailing wait is skipped.
        assert_eq!(frame_loop.actor().position, Vec2::new(6.0, 0.0));
        assert_eq!(frame_loop.clock.waits, 2);
        assert!(!frame_loop.is_running());
    }

    #[test]
    fn profiler_hooks_follow_run_lifecycle() {
        let mut frame_loop = frame_loop(RecordingRenderer::default(), 2.0);
        let mut input = ScriptedInput::new(vec![right()]);

        frame_loop.run(&mut input).expect("run");

        assert_eq!(
            frame_loop.profiler().calls,
            vec![
                "start".to_string(),
                "update:mainloop_update".to_string(),
                "update:mainloop_update".to_string(),
                "summary".to_string(),
            ]
        );
    }

    #[test]
    fn zero_input_ticks_never_move_the_actor() {
        let mut frame_loop = frame_loop(RecordingRenderer::default(), 2.0);
        let mut input = ScriptedInput::new(vec![InputSnapshot::empty(); 5]);

        let report = frame_loop.run(&mut input).expect("run");

        assert_eq!(report.ticks, 6);
        assert_eq!(frame_loop.actor().position, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn render_failure_aborts_run_without_counting_tick() {
        let mut frame_loop = frame_loop(FailingRenderer, 2.0);
        let mut input = ScriptedInput::new(vec![right()]);

        let err = frame_loop.run(&mut input).expect_err("render failure");

        assert!(matches!(err, RenderError::Present(_)));
        assert_eq!(frame_loop.tick_count(), 0);
        assert!(!frame_loop.is_running());
        assert_eq!(frame_loop.clock.waits, 0);
    }

    #[test]
    fn headless_run_with_noop_collaborators() {
        let tiles = TileMap::new(3, 1, Vec::new());
        let collision = CollisionMap::new(vec![0, 1, 0]);
        let geometry = TilesetGeometry::new(16, 16, 8).expect("geometry");
        let mut frame_loop = FrameLoop::new(
            Level::new(tiles, collision, geometry),
            controller(0.0, 2.0),
            Viewport {
                width: 320,
                height: 240,
            },
            RecordingRenderer::default(),
            UnpacedClock,
            NoopProfiler,
        );
        let mut input = ScriptedInput::new(vec![right(); 4]);

        let report = frame_loop.run(&mut input).expect("run");

        assert_eq!(report.ticks, 5);
        // The fourth step would put the foot on the solid middle cell.
        assert_eq!(frame_loop.actor().position, Vec2::new(6.0, 0.0));
        // No tile layer: every frame carries only the actor.
        let frame = frame_loop.renderer().last_frame().expect("frame");
        assert_eq!(frame.len(), 1);
        assert_eq!(frame[0].layer, DrawLayer::Actor);
    }

    #[test]
    fn start_is_idempotent() {
        let mut frame_loop = frame_loop(RecordingRenderer::default(), 2.0);
        frame_loop.start();
        frame_loop.start();
        assert_eq!(frame_loop.profiler().calls, vec!["start".to_string()]);
    }
}
