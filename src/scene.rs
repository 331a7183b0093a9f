//! Scene-graph boundary
//!
//! The game only needs to add objects and later update their transforms,
//! shapes and colours. [`SceneSink`] is that surface; [`Scene`] is a plain
//! in-memory implementation the terminal host reads from.

use crate::terrain_mesh::TerrainSurface;
use glam::Vec3;

pub type ObjectId = usize;

pub const RED: [f32; 3] = [1.0, 0.0, 0.0];
pub const GREEN: [f32; 3] = [0.0, 1.0, 0.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub yaw_rad: f32,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw_rad: 0.0,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub enum Shape {
    /// Group with nothing attached yet
    Empty,
    Terrain(TerrainSurface),
    /// Loaded model, referenced by asset id
    Model { asset: String, mesh_count: usize },
    Cone { radius: f32, height: f32, segments: u32 },
    Cuboid { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32 },
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub shape: Shape,
    pub transform: Transform,
    pub color: [f32; 3],
    pub wireframe: bool,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            transform: Transform::default(),
            color: [1.0, 1.0, 1.0],
            wireframe: false,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn wireframe(mut self) -> Self {
        self.wireframe = true;
        self
    }
}

/// Where the game puts renderable objects
pub trait SceneSink {
    fn add_object(&mut self, object: SceneObject) -> ObjectId;

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject>;
}

#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// Objects whose name matches exactly
    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SceneObject> + 'a {
        self.objects.iter().filter(move |o| o.name == name)
    }
}

impl SceneSink for Scene {
    fn add_object(&mut self, object: SceneObject) -> ObjectId {
        self.objects.push(object);
        self.objects.len() - 1
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_update() {
        let mut scene = Scene::new();
        let id = scene.add_object(SceneObject::new("car", Shape::Empty));
        scene.add_object(SceneObject::new("tree", Shape::Sphere { radius: 1.0 }));

        scene.object_mut(id).unwrap().transform.position = Vec3::new(1.0, 2.0, 3.0);

        assert_eq!(scene.objects().len(), 2);
        assert_eq!(scene.object(id).unwrap().transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.named("tree").count(), 1);
        assert!(scene.object_mut(7).is_none());
    }
}
