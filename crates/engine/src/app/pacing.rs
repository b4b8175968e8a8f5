use std::thread;
use std::time::{Duration, Instant};

/// External pacing signal awaited between ticks.
pub trait FrameClock {
    fn wait_for_next_frame(&mut self);
}

/// Sleeps away whatever is left of the frame budget since the last release.
#[derive(Debug)]
pub struct FixedRateClock {
    frame_target: Option<Duration>,
    last_release: Instant,
}

impl FixedRateClock {
    pub fn new(target_fps: Option<u32>) -> Self {
        Self {
            frame_target: target_frame_duration(normalize_fps_cap(target_fps)),
            last_release: Instant::now(),
        }
    }

    pub fn frame_target(&self) -> Option<Duration> {
        self.frame_target
    }
}

impl FrameClock for FixedRateClock {
    fn wait_for_next_frame(&mut self) {
        let elapsed = Instant::now().saturating_duration_since(self.last_release);
        let sleep = compute_cap_sleep(elapsed, self.frame_target);
        if sleep > Duration::ZERO {
            thread::sleep(sleep);
        }
        self.last_release = Instant::now();
    }
}

/// Never blocks. Useful for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnpacedClock;

impl FrameClock for UnpacedClock {
    fn wait_for_next_frame(&mut self) {}
}

pub(crate) fn normalize_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

pub(crate) fn target_frame_duration(fps: Option<u32>) -> Option<Duration> {
    fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

pub(crate) fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

pub(crate) fn format_fps_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_fps_budget_is_one_sixtieth() {
        let duration = target_frame_duration(Some(60)).expect("duration");
        assert!((duration.as_secs_f64() - (1.0 / 60.0)).abs() < 0.000_001);
    }

    #[test]
    fn zero_fps_disables_pacing() {
        assert_eq!(normalize_fps_cap(Some(0)), None);
        assert_eq!(normalize_fps_cap(Some(60)), Some(60));
        assert_eq!(FixedRateClock::new(Some(0)).frame_target(), None);
    }

    #[test]
    fn no_sleep_when_frame_ran_over_budget() {
        let sleep = compute_cap_sleep(Duration::from_millis(20), target_frame_duration(Some(60)));
        assert_eq!(sleep, Duration::ZERO);
    }

    #[test]
    fn sleeps_the_remaining_budget() {
        let target = Duration::from_millis(16);
        let sleep = compute_cap_sleep(Duration::from_millis(5), Some(target));
        assert_eq!(sleep, Duration::from_millis(11));
    }

    #[test]
    fn unpaced_cap_formats_as_off() {
        assert_eq!(format_fps_cap(None), "off");
        assert_eq!(format_fps_cap(Some(60)), "60");
    }
}
