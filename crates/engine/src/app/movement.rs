use tracing::debug;

use crate::level::{CollisionAttribute, Level, Vec2};

pub const DEFAULT_FOOT_OFFSET_PX: f32 = 3.0;
pub const DEFAULT_MAP_OFFSET_TILES: (i32, i32) = (1, 0);

/// Knobs of the collision sampling model.
///
/// `map_offset_tiles` is where tile (0,0) is drawn, in whole tiles. The
/// renderer and the foot-point sampler both read it so that the actor collides
/// with what is drawn under its feet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementConfig {
    pub foot_offset_px: f32,
    pub map_offset_tiles: (i32, i32),
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            foot_offset_px: DEFAULT_FOOT_OFFSET_PX,
            map_offset_tiles: DEFAULT_MAP_OFFSET_TILES,
        }
    }
}

impl MovementConfig {
    pub fn map_offset_px(&self, tile_width: u32, tile_height: u32) -> Vec2 {
        Vec2 {
            x: self.map_offset_tiles.0 as f32 * tile_width as f32,
            y: self.map_offset_tiles.1 as f32 * tile_height as f32,
        }
    }
}

/// Spawn parameters for the single controllable actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorConfig {
    pub spawn: Vec2,
    pub speed: f32,
    pub sprite_width: u32,
    pub sprite_height: u32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            spawn: Vec2::new(100.0, 100.0),
            speed: 2.0,
            sprite_width: 16,
            sprite_height: 16,
        }
    }
}

impl ActorConfig {
    pub fn spawn_actor(&self) -> Actor {
        Actor {
            position: self.spawn,
            sprite_width: self.sprite_width,
            sprite_height: self.sprite_height,
            speed: self.speed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    pub position: Vec2,
    pub sprite_width: u32,
    pub sprite_height: u32,
    pub speed: f32,
}

impl Actor {
    /// Ground-contact sample for an actor standing at `position`.
    pub fn foot_point_at(&self, position: Vec2, foot_offset_px: f32) -> Vec2 {
        Vec2 {
            x: position.x + self.sprite_width as f32 / 2.0,
            y: position.y + self.sprite_height as f32 - foot_offset_px,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    Idle,
    Moved { attribute: CollisionAttribute },
    Blocked { attribute: CollisionAttribute },
}

/// Applies one frame of movement to a copy of `actor`.
///
/// Collision is sampled at a single foot point of the candidate position. A
/// denied move rejects both axes together.
pub fn step(actor: Actor, input_vector: Vec2, level: &Level, config: &MovementConfig) -> Actor {
    step_with_outcome(actor, input_vector, level, config).0
}

fn step_with_outcome(
    actor: Actor,
    input_vector: Vec2,
    level: &Level,
    config: &MovementConfig,
) -> (Actor, StepOutcome) {
    if input_vector.is_zero() {
        return (actor, StepOutcome::Idle);
    }

    let candidate = actor.position + input_vector;
    let foot = actor.foot_point_at(candidate, config.foot_offset_px);
    let offset = config.map_offset_px(level.geometry.tile_width(), level.geometry.tile_height());
    let sample = Vec2 {
        x: foot.x - offset.x,
        y: foot.y - offset.y,
    };
    let attribute = level.attribute_at(sample);

    if attribute.allows_movement() {
        let moved = Actor {
            position: candidate,
            ..actor
        };
        (moved, StepOutcome::Moved { attribute })
    } else {
        (actor, StepOutcome::Blocked { attribute })
    }
}

/// Sole owner of the actor's position during a run.
#[derive(Debug, Clone)]
pub struct MovementController {
    actor: Actor,
    config: MovementConfig,
}

impl MovementController {
    pub fn new(actor: Actor, config: MovementConfig) -> Self {
        Self { actor, config }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn step(&mut self, input_vector: Vec2, level: &Level) -> StepOutcome {
        let (next, outcome) = step_with_outcome(self.actor, input_vector, level, &self.config);
        if let StepOutcome::Blocked { attribute } = outcome {
            debug!(
                x = self.actor.position.x,
                y = self.actor.position.y,
                dx = input_vector.x,
                dy = input_vector.y,
                attribute = ?attribute,
                "movement_blocked"
            );
        }
        self.actor = next;
        outcome
    }
}
