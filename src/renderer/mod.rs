//! WebGPU rendering module
//!
//! Colored triangle lists rebuilt every frame. The scene is a few dozen
//! quads and fans, so per-frame buffer churn is irrelevant.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::build_scene;
pub use vertex::Vertex;
