//! Error types for festive-particles.
//!
//! The simulation core has no fatal errors: greeting failures fall back to a
//! fixed greeting and photo failures leave Image mode locked. These types
//! cover the collaborators and the native front end.

use thiserror::Error;

/// Errors from a greeting generation collaborator.
///
/// Never surfaced to the simulation; see
/// [`generate_or_fallback`](crate::greeting::generate_or_fallback).
#[derive(Debug, Error)]
pub enum GreetingError {
    /// The external command could not be started.
    #[error("failed to launch greeting command: {0}")]
    Spawn(#[from] std::io::Error),
    /// The external command ran but reported failure.
    #[error("greeting command exited with status {status:?}: {stderr}")]
    CommandFailed {
        /// Exit code, if the process exited normally.
        status: Option<i32>,
        /// Trimmed standard error output.
        stderr: String,
    },
    /// The external command ran past its deadline and was killed.
    #[error("greeting command timed out after {0:?}")]
    TimedOut(std::time::Duration),
    /// The response was not valid UTF-8.
    #[error("greeting response is not valid UTF-8")]
    InvalidUtf8,
    /// The response was not the expected JSON object.
    #[error("malformed greeting response: {0}")]
    Parse(#[from] serde_json::Error),
    /// A required line was absent or blank.
    #[error("greeting response is missing `{0}`")]
    MissingLine(&'static str),
    /// Nothing to generate a greeting for.
    #[error("recipient is empty")]
    EmptyRecipient,
}

/// Errors that can occur while loading a photo.
#[derive(Debug, Error)]
pub enum PhotoError {
    /// The file could not be read or decoded.
    #[error("failed to load photo: {0}")]
    Image(#[from] image::ImageError),
}

/// Errors that can occur while loading a [`SceneConfig`](crate::SceneConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The config file is not valid JSON for `SceneConfig`.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; ensure your system supports Vulkan, Metal, DX12 or WebGPU")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
}

/// Errors that can occur when running the native scene.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to create or run the event loop.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create the window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
}
