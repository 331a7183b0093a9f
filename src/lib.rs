//! Arcade driving over procedurally generated terrain
//!
//! The simulation core (heightfield, decorations, car kinematics,
//! checkpoints) is independent of any renderer; [`scene::SceneSink`] is the
//! boundary to whatever draws it and [`hud`] is the bundled terminal host.

pub mod assets;
pub mod checkpoints;
pub mod config;
pub mod game;
pub mod hud;
pub mod input;
pub mod logging;
pub mod physics;
pub mod procgen;
pub mod scene;
pub mod spawner;
pub mod terrain_mesh;
