//! # Festive Particles
//!
//! An interactive particle holiday scene. Thousands of ornaments morph
//! between a conical tree, an explosion that follows the pointer, a photo
//! backdrop and a two-line text greeting, while a small flock of elves orbits
//! the tree.
//!
//! The simulation is renderer-agnostic: a [`Scene`] produces one [`Frame`] of
//! per-instance transforms per tick, and anything that can draw instanced
//! sprites can consume it. The bundled binary does so with wgpu and winit.
//!
//! ## Quick Start
//!
//! ```ignore
//! use festive_particles::prelude::*;
//!
//! let mut scene = Scene::new(&SceneConfig::new().with_seed(1));
//! scene.set_pointer(Vec2::new(0.2, -0.1));
//!
//! let frame = scene.step(0.016);
//! assert_eq!(frame.mode, SceneMode::Tree);
//! assert_eq!(frame.particles.len(), 6000);
//!
//! // Click: Tree -> Explode.
//! scene.advance();
//!
//! // A new greeting always lands in Text mode.
//! scene.set_greeting(Greeting::new("peace on", "earth"));
//! assert_eq!(scene.mode(), SceneMode::Text);
//! ```
//!
//! ## Modes
//!
//! | Mode | Particles | Star & elves |
//! |------|-----------|--------------|
//! | Tree | conical tree, slow spin, pointer sway | shown |
//! | Explode | spherical shell around the pointer | hidden |
//! | Image | as Explode, photo drawn on top | hidden |
//! | Text | rasterized greeting, surplus on an outer ring | hidden |
//!
//! Clicking cycles Tree → Explode → Image → Text. Image needs a photo; without
//! one the cycle goes straight to Text.

pub mod camera;
pub mod config;
pub mod elves;
pub mod error;
pub mod gpu;
pub mod greeting;
pub mod input;
pub mod instance;
pub mod mode;
pub mod palette;
pub mod particles;
pub mod photo;
pub mod pointer;
pub mod scene;
pub mod shapes;
pub mod text;
pub mod time;
mod window;

/// Default number of ornament particles.
pub const PARTICLE_COUNT: usize = 6000;
/// Default number of orbiting elves.
pub const ELF_COUNT: usize = 50;

pub use camera::Camera;
pub use config::SceneConfig;
pub use error::{AppError, ConfigError, GpuError, GreetingError, PhotoError};
pub use glam::{Quat, Vec2, Vec3};
pub use greeting::{Greeting, GreetingService, GreetingWorker};
pub use instance::Instance;
pub use mode::{ModeController, SceneMode, Transition};
pub use photo::{Photo, PhotoView};
pub use scene::{Frame, Scene};
pub use window::run;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use festive_particles::prelude::*;
/// ```
pub mod prelude {
    pub use crate::camera::Camera;
    pub use crate::config::SceneConfig;
    pub use crate::greeting::{
        generate_or_fallback, CommandGreetingService, Greeting, GreetingService, GreetingWorker,
        OfflineGreetingService,
    };
    pub use crate::instance::Instance;
    pub use crate::mode::{SceneMode, Transition};
    pub use crate::photo::{Photo, PhotoView};
    pub use crate::scene::{Frame, Scene};
    pub use crate::time::SceneClock;
    pub use crate::{Quat, Vec2, Vec3};
}
