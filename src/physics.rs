//! Arcade car kinematics
//!
//! A single forward velocity, a 2D position on the ground plane and a yaw
//! angle, advanced once per frame from the held controls. There is no mass,
//! no grip and no collision: acceleration, friction, braking and a speed
//! clamp are applied in a fixed order every tick.

use crate::input::InputSnapshot;
use serde::{Deserialize, Serialize};

/// Tuning constants, all per tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarTuning {
    /// Velocity added per tick while accelerating
    pub acceleration: f32,
    /// Velocity multiplier applied every tick (< 1)
    pub friction: f32,
    /// Extra velocity multiplier while braking
    pub brake_factor: f32,
    /// Forward speed cap; reverse is capped at half of it
    pub max_speed: f32,
    /// Yaw change per tick while steering (radians)
    pub turn_speed: f32,
    /// Minimum |velocity| before steering has any effect
    pub turn_threshold: f32,
}

impl Default for CarTuning {
    fn default() -> Self {
        Self {
            acceleration: 0.015,
            friction: 0.97,
            brake_factor: 0.8,
            max_speed: 0.6,
            turn_speed: 0.04,
            turn_threshold: 0.01,
        }
    }
}

impl CarTuning {
    pub fn max_reverse_speed(&self) -> f32 {
        self.max_speed / 2.0
    }
}

/// Kinematic car state on the ground plane
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CarState {
    /// Signed forward velocity (world units per tick)
    pub velocity: f32,
    pub x: f32,
    pub z: f32,
    /// Heading; yaw 0 faces +z
    pub yaw_rad: f32,
}

impl CarState {
    /// Back to the origin, stopped, facing +z
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Advance the car by one tick
pub fn step(state: &mut CarState, tuning: &CarTuning, input: &InputSnapshot) {
    if input.reset {
        state.reset();
    }

    // 1. Throttle
    if input.forward {
        state.velocity += tuning.acceleration;
    }
    if input.reverse {
        state.velocity -= tuning.acceleration;
    }

    // 2. Rolling friction, every tick
    state.velocity *= tuning.friction;

    // 3. Brake
    if input.brake {
        state.velocity *= tuning.brake_factor;
    }

    // 4. Speed limits
    state.velocity = state
        .velocity
        .clamp(-tuning.max_reverse_speed(), tuning.max_speed);

    // 5. Steering, mirrored when reversing
    if state.velocity.abs() > tuning.turn_threshold {
        let direction = if state.velocity > 0.0 { 1.0 } else { -1.0 };
        if input.left {
            state.yaw_rad += tuning.turn_speed * direction;
        }
        if input.right {
            state.yaw_rad -= tuning.turn_speed * direction;
        }
    }

    // 6. Move along the heading
    state.x += state.yaw_rad.sin() * state.velocity;
    state.z += state.yaw_rad.cos() * state.velocity;
}
