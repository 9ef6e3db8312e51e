pub mod ambient;
pub mod atmosphere;
pub mod camera;
pub mod color;
pub mod compositor;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod field;
pub mod lifecycle;
pub mod progress;
pub mod quality;
pub mod scenes;
pub mod signal;
pub mod texture;

pub use atmosphere::*;
pub use camera::*;
pub use color::*;
pub use compositor::*;
pub use config::*;
pub use constants::*;
pub use engine::*;
pub use error::*;
pub use field::*;
pub use lifecycle::*;
pub use progress::*;
pub use quality::*;
pub use scenes::*;
pub use signal::*;
pub use texture::*;
