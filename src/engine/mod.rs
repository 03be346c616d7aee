// Engine module - simulation core plus the wgpu/winit backends it runs on

pub mod assets;
pub mod camera;
pub mod debug_overlay;
pub mod entity;
pub mod input;
pub mod mesh;
pub mod player;
pub mod renderer;
pub mod scene;
pub mod sphere;
pub mod spawner;
