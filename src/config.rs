use std::f32::consts::PI;

use thiserror::Error;

/// Engine tuning. Immutable after construction; `new` rejects degenerate
/// values so the cast/motion loops never have to re-validate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Total angular spread of the ray fan, radians.
    pub fov: f32,
    /// Number of rays per frame; the scene spans this many column bands.
    pub ray_count: usize,
    /// How far a ray may travel, in cell units.
    pub max_depth: f32,
    /// Radial march increment, in cell units. Must stay ≤ 1 cell so a ray
    /// cannot step over a one-cell-thick wall.
    pub step: f32,
    /// Translation per tick, in cell units.
    pub move_speed: f32,
    /// Rotation per tick, radians.
    pub turn_speed: f32,
    /// Offset of the four axis probe points around a candidate position.
    pub collision_radius: f32,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("field of view must be positive, got {0}")]
    Fov(f32),
    #[error("ray count must be nonzero")]
    RayCount,
    #[error("max depth must be positive, got {0}")]
    MaxDepth(f32),
    #[error("radial step must be positive, got {0}")]
    Step(f32),
    #[error("collision radius must be non-negative, got {0}")]
    CollisionRadius(f32),
}

impl EngineConfig {
    pub fn new(
        fov: f32,
        ray_count: usize,
        max_depth: f32,
        step: f32,
        move_speed: f32,
        turn_speed: f32,
        collision_radius: f32,
    ) -> Result<Self, ConfigError> {
        if !(fov > 0.0) {
            return Err(ConfigError::Fov(fov));
        }
        if ray_count == 0 {
            return Err(ConfigError::RayCount);
        }
        if !(max_depth > 0.0) {
            return Err(ConfigError::MaxDepth(max_depth));
        }
        if !(step > 0.0) {
            return Err(ConfigError::Step(step));
        }
        if !(collision_radius >= 0.0) {
            return Err(ConfigError::CollisionRadius(collision_radius));
        }
        Ok(Self {
            fov,
            ray_count,
            max_depth,
            step,
            move_speed,
            turn_speed,
            collision_radius,
        })
    }
}

impl Default for EngineConfig {
    /// The stock tuning: 60° fan of 240 rays marched at 0.1-cell steps out
    /// to 16 cells, with the classic slow walk.
    fn default() -> Self {
        Self::new(PI / 3.0, 240, 16.0, 0.1, 0.05, 0.05, 0.2).expect("stock tuning is valid")
    }
}
