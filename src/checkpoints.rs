//! Sequential checkpoints
//!
//! Only the current checkpoint is ever tested, so they can only be reached in
//! order and at most one per check.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Default trigger radius around a checkpoint
pub const DEFAULT_CHECKPOINT_RADIUS: f32 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub position: Vec3,
    pub reached: bool,
}

impl Checkpoint {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            reached: false,
        }
    }

    /// Distance on the ground plane, ignoring elevation
    pub fn ground_distance(&self, position: Vec3) -> f32 {
        Vec2::new(self.position.x, self.position.z)
            .distance(Vec2::new(position.x, position.z))
    }
}

#[derive(Debug, Clone)]
pub struct CheckpointTracker {
    checkpoints: Vec<Checkpoint>,
    current: usize,
    radius: f32,
}

impl CheckpointTracker {
    pub fn new(radius: f32) -> Self {
        Self {
            checkpoints: Vec::new(),
            current: 0,
            radius,
        }
    }

    pub fn with_points(radius: f32, points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut tracker = Self::new(radius);
        for point in points {
            tracker.add_checkpoint(point);
        }
        tracker
    }

    pub fn add_checkpoint(&mut self, position: Vec3) {
        self.checkpoints.push(Checkpoint::new(position));
    }

    /// Test the car against the current checkpoint.
    ///
    /// Returns the index of the checkpoint reached by this call, if any.
    pub fn check(&mut self, car_position: Vec3) -> Option<usize> {
        let index = self.current;
        let checkpoint = self.checkpoints.get_mut(index)?;

        if checkpoint.ground_distance(car_position) < self.radius {
            checkpoint.reached = true;
            self.current += 1;
            info!("Checkpoint {} reached!", self.current);
            return Some(index);
        }
        None
    }

    /// Index of the next checkpoint to reach (== len once all are reached)
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&Checkpoint> {
        self.checkpoints.get(self.current)
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        !self.checkpoints.is_empty() && self.current >= self.checkpoints.len()
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}
