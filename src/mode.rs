//! Display modes and the click-driven mode cycle.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four exclusive display configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SceneMode {
    /// Conical tree with star and orbiting elves.
    #[default]
    Tree,
    /// Particle sphere following the pointer.
    Explode,
    /// Like `Explode`, with the uploaded photo shown on top.
    Image,
    /// Particles spell the current greeting.
    Text,
}

impl SceneMode {
    /// All modes in cycle order.
    pub const ALL: [SceneMode; 4] = [
        SceneMode::Tree,
        SceneMode::Explode,
        SceneMode::Image,
        SceneMode::Text,
    ];

    /// Next mode in the fixed cycle, ignoring guards.
    pub fn next(self) -> Self {
        match self {
            SceneMode::Tree => SceneMode::Explode,
            SceneMode::Explode => SceneMode::Image,
            SceneMode::Image => SceneMode::Text,
            SceneMode::Text => SceneMode::Tree,
        }
    }

    /// Whether particle targets track the pointer every frame.
    pub fn follows_pointer(self) -> bool {
        matches!(self, SceneMode::Explode | SceneMode::Image)
    }

    /// Whether the star and the orbiting elves are shown.
    pub fn shows_decorations(self) -> bool {
        self == SceneMode::Tree
    }

    /// Amplitude of the per-particle scale twinkle.
    pub fn twinkle_amplitude(self) -> f32 {
        if self == SceneMode::Tree {
            0.6
        } else {
            0.4
        }
    }

    /// Short status label for the mode.
    pub fn status_text(self) -> &'static str {
        match self {
            SceneMode::Tree => "TREE MODE",
            SceneMode::Explode => "MAGIC ATMOSPHERE",
            SceneMode::Image => "PHOTO MEMORY",
            SceneMode::Text => "GREETINGS",
        }
    }
}

impl fmt::Display for SceneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status_text())
    }
}

/// Outcome of a mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Mode before the change.
    pub from: SceneMode,
    /// Mode after the change.
    pub to: SceneMode,
    /// Image mode was requested without a photo and skipped to Text.
    ///
    /// Callers should tell the user to upload a photo.
    pub skipped_image: bool,
}

/// Finite-state machine over [`SceneMode`].
///
/// Pure bookkeeping: the owning [`Scene`](crate::Scene) applies the side
/// effects of entering a mode.
#[derive(Debug, Clone, Default)]
pub struct ModeController {
    mode: SceneMode,
}

impl ModeController {
    /// Start in Tree mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    pub fn mode(&self) -> SceneMode {
        self.mode
    }

    /// Move to the next mode in the cycle.
    ///
    /// Image mode needs a photo; without one the controller lands on Text and
    /// reports the skip instead of staying put.
    pub fn advance(&mut self, has_photo: bool) -> Transition {
        let from = self.mode;
        let mut to = from.next();
        let skipped_image = to == SceneMode::Image && !has_photo;
        if skipped_image {
            to = SceneMode::Text;
        }
        self.mode = to;
        Transition {
            from,
            to,
            skipped_image,
        }
    }

    /// Jump straight to `mode`, bypassing the cycle.
    pub fn force(&mut self, mode: SceneMode) -> Transition {
        let from = self.mode;
        self.mode = mode;
        Transition {
            from,
            to: mode,
            skipped_image: false,
        }
    }
}
