//! # windglobe
//!
//! An interactive globe with an animated wind layer, rendered with wgpu.
//!
//! Three layers stack back to front: a textured Phong-shaded earth, a thin
//! translucent atmosphere shell, and 18,000 additive particles streaming
//! along a procedural tangential flow just above the surface. The particle
//! set is generated once on the CPU; per-frame motion is pure vertex-shader
//! math, so the whole animation costs two small uniform writes per layer.
//!
//! ## Quick Start
//!
//! ```ignore
//! use windglobe::AppConfig;
//!
//! fn main() {
//!     env_logger::init();
//!     if let Err(err) = windglobe::app::run(AppConfig::default()) {
//!         eprintln!("{err}");
//!     }
//! }
//! ```
//!
//! ## Controls
//!
//! - Drag with the left mouse button to orbit; motion eases out on release.
//! - Scroll to dolly between the configured distance bounds.
//! - Space freezes the wind flow (layer spin keeps going).
//!
//! ## Configuration
//!
//! Everything tweakable lives in [`AppConfig`] and its nested
//! [`WindConfig`], [`GlobeConfig`], and [`CameraConfig`]. All values are
//! session constants. Setting [`WindConfig::displacement`] to zero turns
//! the wind layer into static points; there is no other switch.
//!
//! ## Flow model
//!
//! Each particle keeps a rest position on a shell just above the globe and
//! a speed attribute in `[0.4, 1.6)`. Per frame the vertex shader offsets
//! the rest position along `cross(n, WIND_AXIS)`, scaled by a latitude
//! swirl factor and a per-particle phase oscillation, then re-projects onto
//! the shell. The same math is exposed on the CPU as [`wind::displace`] so
//! positions can be predicted and tested without a GPU.

pub mod app;
pub mod camera;
pub mod config;
pub mod error;
pub mod globe;
mod gpu;
pub mod texture;
pub mod time;
pub mod wind;

pub use app::run;
pub use camera::OrbitCamera;
pub use config::{AppConfig, CameraConfig, GlobeConfig, WindConfig};
pub use error::{AppError, GpuError, TextureError};
pub use glam::{Vec2, Vec3, Vec4};
pub use time::Clock;
pub use wind::{generate_particles, WindParticle, WIND_AXIS};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use windglobe::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::run;
    pub use crate::camera::OrbitCamera;
    pub use crate::config::{AppConfig, CameraConfig, GlobeConfig, WindConfig};
    pub use crate::error::{AppError, GpuError, TextureError};
    pub use crate::time::Clock;
    pub use crate::wind::{displace, generate_particles, WindParticle, WIND_AXIS};
    pub use crate::{Vec2, Vec3, Vec4};
}
