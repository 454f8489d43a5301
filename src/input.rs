//! Window input, reduced to what the scene reacts to.
//!
//! [`Input`] collects raw winit events between frames. Per-frame state
//! (clicks, drag deltas, wheel, typed text, dropped files) is cleared by
//! [`Input::begin_frame`]; the pointer position persists.
//!
//! A left press and release that travel less than [`CLICK_SLOP`] pixels is a
//! click; anything longer is a drag.

use std::collections::HashSet;
use std::path::PathBuf;

use glam::Vec2;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Maximum pointer travel, in pixels, for a press and release to count as a click.
pub const CLICK_SLOP: f32 = 4.0;

/// Pixels per wheel line, matching browser line-mode scrolling.
const PIXELS_PER_LINE: f32 = 100.0;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    fn from_winit(button: WinitMouseButton) -> Option<Self> {
        match button {
            WinitMouseButton::Left => Some(MouseButton::Left),
            WinitMouseButton::Right => Some(MouseButton::Right),
            WinitMouseButton::Middle => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

/// Keys the front end binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    G,
    Enter,
    Escape,
    Backspace,
    Other,
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::KeyG => KeyCode::G,
            WinitKeyCode::Enter | WinitKeyCode::NumpadEnter => KeyCode::Enter,
            WinitKeyCode::Escape => KeyCode::Escape,
            WinitKeyCode::Backspace => KeyCode::Backspace,
            _ => KeyCode::Other,
        }
    }
}

/// Convert a pixel position to normalized device coordinates (+Y up).
pub fn screen_to_ndc(position: Vec2, window_size: (u32, u32)) -> Vec2 {
    let (w, h) = window_size;
    if w == 0 || h == 0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        (position.x / w as f32) * 2.0 - 1.0,
        1.0 - (position.y / h as f32) * 2.0,
    )
}

/// Input state accumulated since the last frame.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    buttons_held: HashSet<MouseButton>,

    cursor: Vec2,
    /// Where the left button went down, while it is held.
    press_origin: Option<Vec2>,
    /// Furthest the pointer strayed from `press_origin`.
    press_travel: f32,

    clicks: u32,
    left_drag: Vec2,
    right_drag: Vec2,
    wheel_pixels: f32,
    typed: String,
    dropped: Vec<PathBuf>,

    window_size: (u32, u32),
}

impl Input {
    pub fn new() -> Self {
        Self {
            window_size: (800, 600),
            ..Default::default()
        }
    }

    /// Check if a key went down this frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Pointer position in pixels from the top-left corner.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Pointer position in normalized device coordinates.
    pub fn pointer_ndc(&self) -> Vec2 {
        screen_to_ndc(self.cursor, self.window_size)
    }

    /// Left clicks completed this frame.
    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    /// Pointer movement this frame while only the left button was held.
    pub fn left_drag(&self) -> Vec2 {
        self.left_drag
    }

    /// Pointer movement this frame while the right button was held.
    pub fn right_drag(&self) -> Vec2 {
        self.right_drag
    }

    /// Wheel movement this frame in pixels; positive scrolls down.
    pub fn wheel_pixels(&self) -> f32 {
        self.wheel_pixels
    }

    /// Printable characters typed this frame.
    pub fn typed_text(&self) -> &str {
        &self.typed
    }

    /// Take the files dropped onto the window this frame.
    pub fn take_dropped_files(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.dropped)
    }

    /// Clear per-frame state.
    pub(crate) fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.clicks = 0;
        self.left_drag = Vec2::ZERO;
        self.right_drag = Vec2::ZERO;
        self.wheel_pixels = 0.0;
        self.typed.clear();
        self.dropped.clear();
    }

    pub(crate) fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Process a winit window event.
    pub(crate) fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.key(KeyCode::from(code), event.state == ElementState::Pressed);
                }
                if event.state == ElementState::Pressed {
                    if let Some(text) = &event.text {
                        self.type_text(text);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = MouseButton::from_winit(*button) {
                    self.button(button, *state == ElementState::Pressed);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports scrolling up as positive; the photo zoom
                // expects browser-style deltas.
                self.wheel_pixels -= match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y * PIXELS_PER_LINE,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
            }
            WindowEvent::DroppedFile(path) => self.dropped.push(path.clone()),
            _ => {}
        }
    }

    fn key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            // No repeats.
            if self.keys_held.insert(key) {
                self.keys_pressed.insert(key);
            }
        } else {
            self.keys_held.remove(&key);
        }
    }

    fn type_text(&mut self, text: &str) {
        self.typed.extend(text.chars().filter(|c| !c.is_control()));
    }

    fn button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.buttons_held.insert(button);
            if button == MouseButton::Left {
                self.press_origin = Some(self.cursor);
                self.press_travel = 0.0;
            }
            return;
        }

        self.buttons_held.remove(&button);
        if button == MouseButton::Left && self.press_origin.take().is_some() && self.press_travel < CLICK_SLOP {
            self.clicks += 1;
        }
    }

    fn cursor_moved(&mut self, position: Vec2) {
        let delta = position - self.cursor;
        self.cursor = position;

        if let Some(origin) = self.press_origin {
            self.press_travel = self.press_travel.max(origin.distance(position));
        }
        if self.buttons_held.contains(&MouseButton::Right) {
            self.right_drag += delta;
        } else if self.buttons_held.contains(&MouseButton::Left) {
            self.left_drag += delta;
        }
    }
}
