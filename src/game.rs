use crate::assets::{AssetHandle, AssetLoader, AssetStatus};
use crate::checkpoints::CheckpointTracker;
use crate::config::GameConfig;
use crate::input::InputSnapshot;
use crate::physics::{self, CarState, CarTuning};
use crate::procgen::{generate_heightfield, get_preset, Heightfield, TerrainGrid, TerrainShape};
use crate::scene::{ObjectId, Scene, SceneObject, SceneSink, Shape, Transform, GREEN, RED};
use crate::spawner::DecorationSpawner;
use crate::terrain_mesh::TerrainMeshBuilder;
use glam::Vec3;
use tracing::{info, warn};

/// Radius of the checkpoint marker spheres
const CHECKPOINT_MARKER_RADIUS: f32 = 5.0;
const PLACEHOLDER_COLOR: [f32; 3] = [0.0, 1.0, 0.8];
pub const PLACEHOLDER_STATUS: &str = "Model not found - using placeholder";

enum CarModel {
    Loading(AssetHandle),
    Attached,
}

/// One running driving scene
///
/// Owns the simulation state and pushes everything renderable into the
/// scene sink. [`Game::tick`] is the only mutator and runs once per frame.
pub struct Game<S: SceneSink = Scene> {
    scene: S,
    heightfield: Heightfield,
    tuning: CarTuning,
    car: CarState,
    car_object: ObjectId,
    car_model: CarModel,
    spawners: Vec<DecorationSpawner>,
    checkpoints: CheckpointTracker,
    checkpoint_objects: Vec<ObjectId>,
    frame: u64,
    status: Option<String>,
}

impl<S: SceneSink> Game<S> {
    /// Generate the world and start asset loads. Must be called inside a
    /// tokio runtime.
    pub fn new(config: &GameConfig, loader: &AssetLoader, mut scene: S) -> Self {
        let shape = get_preset(&config.terrain.preset).unwrap_or_else(|| {
            warn!("Unknown terrain preset '{}', using desert", config.terrain.preset);
            TerrainShape::desert()
        });

        let grid = TerrainGrid::new(config.terrain.size, config.terrain.segments);
        let heightfield = generate_heightfield(grid, config.terrain.seed, &shape);

        let surface = TerrainMeshBuilder::build(&heightfield, shape.ground_color);
        info!(
            "Terrain mesh: {} vertices, {} triangles",
            surface.vertices.len(),
            surface.triangle_count()
        );
        scene.add_object(
            SceneObject::new("terrain", Shape::Terrain(surface)).with_color(shape.ground_color),
        );

        let checkpoints = CheckpointTracker::with_points(
            config.checkpoints.radius,
            config.checkpoints.points.iter().map(|p| Vec3::from_array(*p)),
        );
        let checkpoint_objects = checkpoints
            .checkpoints()
            .iter()
            .enumerate()
            .map(|(i, cp)| {
                scene.add_object(
                    SceneObject::new(
                        format!("checkpoint_{}", i + 1),
                        Shape::Sphere {
                            radius: CHECKPOINT_MARKER_RADIUS,
                        },
                    )
                    .with_transform(Transform::at(cp.position))
                    .with_color(RED)
                    .wireframe(),
                )
            })
            .collect();

        let car_object = scene.add_object(SceneObject::new("car", Shape::Empty));

        let spawners = config
            .decorations
            .iter()
            .enumerate()
            .map(|(i, settings)| DecorationSpawner::new(settings, &config.placement, i as u64, loader))
            .collect();

        let mut game = Self {
            scene,
            heightfield,
            tuning: config.car.tuning.clone(),
            car: CarState::default(),
            car_object,
            car_model: CarModel::Attached,
            spawners,
            checkpoints,
            checkpoint_objects,
            frame: 0,
            status: None,
        };

        match &config.car.model {
            Some(model) => {
                game.car_model = CarModel::Loading(loader.load(model));
                game.status = Some("Loading car model...".to_string());
            }
            None => game.attach_placeholder(),
        }
        game.sync_car_transform();

        game
    }

    /// Run one frame. Returns the index of a checkpoint reached this frame.
    pub fn tick(&mut self, input: &InputSnapshot) -> Option<usize> {
        self.poll_car_model();

        for spawner in &mut self.spawners {
            spawner.poll(&self.heightfield, &mut self.scene);
        }

        physics::step(&mut self.car, &self.tuning, input);
        let position = self.sync_car_transform();

        let reached = self.checkpoints.check(position);
        if let Some(index) = reached {
            if let Some(object) = self
                .checkpoint_objects
                .get(index)
                .and_then(|&id| self.scene.object_mut(id))
            {
                object.color = GREEN;
            }
            if self.checkpoints.is_complete() {
                info!("All {} checkpoints reached in {} frames", self.checkpoints.len(), self.frame);
            }
        }

        self.frame += 1;
        reached
    }

    fn poll_car_model(&mut self) {
        let CarModel::Loading(handle) = &mut self.car_model else {
            return;
        };

        match handle.poll() {
            AssetStatus::Pending => {}
            AssetStatus::Ready(asset) => {
                info!("Car model {} loaded", asset.id);
                let mesh_count = asset.model.map_or(0, |m| m.mesh_count);
                if let Some(car) = self.scene.object_mut(self.car_object) {
                    car.shape = Shape::Model {
                        asset: asset.id,
                        mesh_count,
                    };
                }
                self.car_model = CarModel::Attached;
                self.status = None;
            }
            AssetStatus::Failed(e) => {
                warn!("Car model {} unavailable: {}", handle.id(), e);
                self.attach_placeholder();
            }
        }
    }

    fn attach_placeholder(&mut self) {
        if let Some(car) = self.scene.object_mut(self.car_object) {
            car.shape = Shape::Cuboid {
                width: 1.2,
                height: 0.6,
                depth: 2.5,
            };
            car.color = PLACEHOLDER_COLOR;
        }
        self.car_model = CarModel::Attached;
        self.status = Some(PLACEHOLDER_STATUS.to_string());
    }

    /// Put the car object on the terrain under the car
    fn sync_car_transform(&mut self) -> Vec3 {
        let position = self.car_position();
        if let Some(car) = self.scene.object_mut(self.car_object) {
            car.transform.position = position;
            car.transform.yaw_rad = self.car.yaw_rad;
        }
        position
    }

    /// Car position with elevation taken from the terrain
    pub fn car_position(&self) -> Vec3 {
        Vec3::new(
            self.car.x,
            self.heightfield.sample(self.car.x, self.car.z),
            self.car.z,
        )
    }

    pub fn car(&self) -> &CarState {
        &self.car
    }

    pub fn tuning(&self) -> &CarTuning {
        &self.tuning
    }

    pub fn heightfield(&self) -> &Heightfield {
        &self.heightfield
    }

    pub fn checkpoints(&self) -> &CheckpointTracker {
        &self.checkpoints
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// True while the car model or any decoration batch is still pending
    pub fn is_loading(&self) -> bool {
        matches!(self.car_model, CarModel::Loading(_))
            || self.spawners.iter().any(|s| !s.is_done())
    }

    pub fn decorations_placed(&self) -> usize {
        self.spawners.iter().map(DecorationSpawner::placed).sum()
    }
}
