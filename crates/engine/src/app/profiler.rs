use std::time::{Duration, Instant};

use tracing::info;

/// Lifecycle hooks the frame loop calls once per run, tick and shutdown.
pub trait Profiler {
    fn start(&mut self);
    fn update(&mut self, tag: &'static str);
    fn summary(&mut self);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProfiler;

impl Profiler for NoopProfiler {
    fn start(&mut self) {}

    fn update(&mut self, _tag: &'static str) {}

    fn summary(&mut self) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub tps: f32,
    pub frame_time_ms: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub total_ticks: u64,
    pub elapsed: Duration,
    pub average_tps: f32,
}

/// Logs tick rate and tick spacing every `interval`, plus a run summary.
#[derive(Debug)]
pub struct LoopProfiler {
    interval: Duration,
    run_start: Option<Instant>,
    interval_start: Instant,
    last_tick: Option<Instant>,
    ticks: u32,
    tick_spacing_sum: Duration,
    total_ticks: u64,
    last_snapshot: Option<LoopMetricsSnapshot>,
}

impl LoopProfiler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            run_start: None,
            interval_start: Instant::now(),
            last_tick: None,
            ticks: 0,
            tick_spacing_sum: Duration::ZERO,
            total_ticks: 0,
            last_snapshot: None,
        }
    }

    pub fn last_snapshot(&self) -> Option<LoopMetricsSnapshot> {
        self.last_snapshot
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    fn start_at(&mut self, now: Instant) {
        self.run_start = Some(now);
        self.interval_start = now;
        self.last_tick = None;
        self.ticks = 0;
        self.tick_spacing_sum = Duration::ZERO;
        self.total_ticks = 0;
        self.last_snapshot = None;
    }

    fn record_tick_at(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        if let Some(previous) = self.last_tick {
            self.tick_spacing_sum = self
                .tick_spacing_sum
                .saturating_add(now.saturating_duration_since(previous));
        }
        self.last_tick = Some(now);
        self.ticks = self.ticks.saturating_add(1);
        self.total_ticks = self.total_ticks.saturating_add(1);

        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let spacing_samples = self.ticks.saturating_sub(1);
        let frame_time_ms = if spacing_samples == 0 {
            0.0
        } else {
            (self.tick_spacing_sum.as_secs_f32() / spacing_samples as f32) * 1000.0
        };
        let snapshot = LoopMetricsSnapshot {
            tps: self.ticks as f32 / elapsed_seconds,
            frame_time_ms,
        };

        self.interval_start = now;
        self.ticks = 0;
        self.tick_spacing_sum = Duration::ZERO;
        self.last_tick = Some(now);
        self.last_snapshot = Some(snapshot);
        Some(snapshot)
    }

    fn summary_at(&self, now: Instant) -> RunSummary {
        let elapsed = self
            .run_start
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default();
        let elapsed_seconds = elapsed.as_secs_f32();
        let average_tps = if elapsed_seconds > 0.0 {
            self.total_ticks as f32 / elapsed_seconds
        } else {
            0.0
        };
        RunSummary {
            total_ticks: self.total_ticks,
            elapsed,
            average_tps,
        }
    }
}

impl Profiler for LoopProfiler {
    fn start(&mut self) {
        self.start_at(Instant::now());
        info!(
            interval_ms = self.interval.as_millis() as u64,
            "profiler_started"
        );
    }

    fn update(&mut self, tag: &'static str) {
        if let Some(snapshot) = self.record_tick_at(Instant::now()) {
            info!(
                tag,
                tps = snapshot.tps,
                frame_time_ms = snapshot.frame_time_ms,
                total_ticks = self.total_ticks,
                "loop_metrics"
            );
        }
    }

    fn summary(&mut self) {
        let summary = self.summary_at(Instant::now());
        info!(
            total_ticks = summary.total_ticks,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            average_tps = summary.average_tps,
            "profiler_summary"
        );
    }
}
