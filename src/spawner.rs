//! Decoration batches waiting on their visual asset
//!
//! A batch with a model path places nothing until the model has loaded; if it
//! never loads the batch is dropped without an error. Batches using a
//! primitive shape are placed on the first poll.

use crate::assets::{AssetHandle, AssetLoader, AssetStatus};
use crate::config::{DecorationSettings, PlacementSettings, Primitive};
use crate::procgen::{place, Heightfield, PlacementParams};
use crate::scene::{SceneObject, SceneSink, Shape, Transform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

enum SpawnState {
    Waiting(AssetHandle),
    Ready(Shape),
    Done,
}

pub struct DecorationSpawner {
    name: String,
    color: [f32; 3],
    params: PlacementParams,
    rng: StdRng,
    state: SpawnState,
    placed: usize,
}

impl DecorationSpawner {
    /// `batch` offsets the placement seed so batches do not share a layout
    pub fn new(
        settings: &DecorationSettings,
        placement: &PlacementSettings,
        batch: u64,
        loader: &AssetLoader,
    ) -> Self {
        let state = match &settings.model {
            Some(model) => SpawnState::Waiting(loader.load(model)),
            None => SpawnState::Ready(primitive_shape(settings.primitive)),
        };

        Self {
            name: settings.name.clone(),
            color: settings.color,
            params: PlacementParams {
                count: settings.count,
                scale_range: (settings.scale_min, settings.scale_max),
                exclusion_radius: placement.exclusion_radius,
                random_yaw: settings.random_yaw,
            },
            rng: StdRng::seed_from_u64(placement.seed.wrapping_add(batch)),
            state,
            placed: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, SpawnState::Done)
    }

    /// Instances added to the scene so far
    pub fn placed(&self) -> usize {
        self.placed
    }

    /// Advance the batch; returns how many instances were added this call
    pub fn poll<S: SceneSink>(&mut self, heightfield: &Heightfield, scene: &mut S) -> usize {
        let shape = match std::mem::replace(&mut self.state, SpawnState::Done) {
            SpawnState::Done => return 0,
            SpawnState::Ready(shape) => shape,
            SpawnState::Waiting(mut handle) => match handle.poll() {
                AssetStatus::Pending => {
                    self.state = SpawnState::Waiting(handle);
                    return 0;
                }
                AssetStatus::Ready(asset) => Shape::Model {
                    mesh_count: asset.model.map_or(0, |m| m.mesh_count),
                    asset: asset.id,
                },
                AssetStatus::Failed(e) => {
                    debug!("Skipping {} decorations, {} unavailable: {}", self.name, handle.id(), e);
                    return 0;
                }
            },
        };

        let instances = place(&self.name, &self.params, heightfield, &mut self.rng);
        for instance in &instances {
            let transform = Transform {
                position: instance.position,
                yaw_rad: instance.yaw_rad,
                scale: instance.scale,
            };
            scene.add_object(
                SceneObject::new(self.name.clone(), shape.clone())
                    .with_transform(transform)
                    .with_color(self.color),
            );
        }

        self.placed += instances.len();
        info!(
            "Placed {} {} decorations ({} attempts)",
            instances.len(),
            self.name,
            self.params.count
        );
        instances.len()
    }
}

fn primitive_shape(primitive: Primitive) -> Shape {
    match primitive {
        Primitive::Cone => Shape::Cone {
            radius: 2.0,
            height: 10.0,
            segments: 6,
        },
        Primitive::Cuboid => Shape::Cuboid {
            width: 3.0,
            height: 2.0,
            depth: 3.0,
        },
    }
}
