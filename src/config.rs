//! Scene configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! {
//!     "particle_count": 3000,
//!     "greeting_command": { "program": "greet-llm", "args": ["--json"], "timeout_ms": 8000 }
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::ConfigError;
use crate::greeting::DEFAULT_GREETING_TIMEOUT;
use crate::{ELF_COUNT, PARTICLE_COUNT};

/// Native window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Festive Particles".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// External program used to generate greetings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetingCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// How long a single run may take before it is killed.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_GREETING_TIMEOUT.as_millis() as u64
}

/// Everything needed to build a [`Scene`](crate::Scene) and its window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of ornament particles.
    pub particle_count: usize,
    /// Number of orbiting elves.
    pub elf_count: usize,
    pub camera: Camera,
    pub window: WindowConfig,
    /// Greeting generator; `None` uses the offline generator.
    pub greeting_command: Option<GreetingCommand>,
    /// Random seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            elf_count: ELF_COUNT,
            camera: Camera::new(),
            window: WindowConfig::default(),
            greeting_command: None,
            seed: None,
        }
    }
}

impl SceneConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&text)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Set the number of ornament particles.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the number of orbiting elves.
    pub fn with_elf_count(mut self, count: usize) -> Self {
        self.elf_count = count;
        self
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    /// Set the window title and initial size.
    pub fn with_window(mut self, title: impl Into<String>, width: u32, height: u32) -> Self {
        self.window = WindowConfig {
            title: title.into(),
            width,
            height,
        };
        self
    }

    /// Generate greetings with an external program.
    pub fn with_greeting_command<I, S>(mut self, program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.greeting_command = Some(GreetingCommand {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout_ms: default_timeout_ms(),
        });
        self
    }

    /// Change the greeting command's timeout. No effect without a command.
    pub fn with_greeting_timeout(mut self, timeout: Duration) -> Self {
        if let Some(command) = &mut self.greeting_command {
            command.timeout_ms = timeout.as_millis() as u64;
        }
        self
    }

    /// Fix the random seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
