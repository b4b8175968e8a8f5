use crate::level::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    const fn slot(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Held directional keys plus the quit signal, sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    held: [bool; 4],
    quit_requested: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn quit() -> Self {
        Self::default().with_quit_requested(true)
    }

    pub fn with_held(mut self, direction: Direction, is_held: bool) -> Self {
        self.held[direction.slot()] = is_held;
        self
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        self.held[direction.slot()]
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Per-axis movement of `speed` pixels. Opposite keys cancel and
    /// diagonals are not normalized.
    pub fn movement_vector(&self, speed: f32) -> Vec2 {
        let axis = |negative: Direction, positive: Direction| {
            let mut delta = 0.0;
            if self.is_held(negative) {
                delta -= speed;
            }
            if self.is_held(positive) {
                delta += speed;
            }
            delta
        };
        Vec2 {
            x: axis(Direction::Left, Direction::Right),
            y: axis(Direction::Up, Direction::Down),
        }
    }
}

/// Source of per-tick input snapshots.
pub trait InputSource {
    fn poll(&mut self) -> InputSnapshot;
}
