pub mod camera;
pub mod mesh;
pub mod ray;
pub mod renderer;
