//! Native window front end.
//!
//! Controls:
//! - left click: next mode
//! - drop an image file on the window: use it as the photo
//! - `G`: type a recipient, Enter to request a greeting, Escape to cancel
//! - in Image mode: left drag pans the photo, right drag tilts it, wheel zooms

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::SceneConfig;
use crate::error::AppError;
use crate::gpu::Renderer;
use crate::greeting::{
    CommandGreetingService, GreetingService, GreetingWorker, OfflineGreetingService,
    MAX_RECIPIENT_CHARS,
};
use crate::input::{Input, KeyCode};
use crate::mode::{SceneMode, Transition};
use crate::photo::{Photo, PhotoView};
use crate::scene::Scene;
use crate::time::SceneClock;

/// Open the window and run the scene until it is closed.
pub fn run(config: SceneConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn greeting_service(config: &SceneConfig) -> Arc<dyn GreetingService> {
    match &config.greeting_command {
        Some(command) => {
            log::info!("Greetings from command {:?}", command.program);
            Arc::new(
                CommandGreetingService::new(&command.program)
                    .with_args(command.args.clone())
                    .with_timeout(Duration::from_millis(command.timeout_ms)),
            )
        }
        None => {
            log::info!("No greeting command configured, using offline greetings");
            Arc::new(OfflineGreetingService)
        }
    }
}

/// How long a notice stays in the title.
const NOTICE_DURATION: Duration = Duration::from_secs(4);

const NO_PHOTO_NOTICE: &str = "Upload a photo first: drop an image on the window";

/// A short message shown in the title until it expires.
#[derive(Debug, Clone, PartialEq)]
struct Notice {
    text: &'static str,
    until: Instant,
}

impl Notice {
    /// The notice a mode change calls for, if any.
    fn for_transition(transition: &Transition, now: Instant) -> Option<Self> {
        transition.skipped_image.then(|| Self {
            text: NO_PHOTO_NOTICE,
            until: now + NOTICE_DURATION,
        })
    }

    fn expired(&self, now: Instant) -> bool {
        now >= self.until
    }
}

struct App {
    config: SceneConfig,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    scene: Scene,
    input: Input,
    clock: SceneClock,
    greetings: GreetingWorker,
    photo_view: PhotoView,
    /// Recipient being typed, while the prompt is open.
    prompt: Option<String>,
    notice: Option<Notice>,
    title: String,
    error: Option<AppError>,
}

impl App {
    fn new(config: SceneConfig) -> Self {
        Self {
            scene: Scene::new(&config),
            greetings: GreetingWorker::new(greeting_service(&config)),
            window: None,
            renderer: None,
            input: Input::new(),
            clock: SceneClock::new(),
            photo_view: PhotoView::new(),
            prompt: None,
            notice: None,
            title: String::new(),
            error: None,
            config,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn load_photo(&mut self, path: &Path) {
        match Photo::open(path) {
            Ok(photo) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.set_photo(&photo);
                }
                self.scene.set_photo_available(true);
            }
            Err(e) => log::error!("Could not use {} as a photo: {e}", path.display()),
        }
    }

    fn update_prompt(&mut self) {
        let Some(prompt) = &mut self.prompt else {
            if self.input.key_pressed(KeyCode::G) {
                self.prompt = Some(String::new());
            }
            return;
        };

        for c in self.input.typed_text().chars() {
            if prompt.chars().count() < MAX_RECIPIENT_CHARS {
                prompt.push(c);
            }
        }
        if self.input.key_pressed(KeyCode::Backspace) {
            prompt.pop();
        }
        if self.input.key_pressed(KeyCode::Enter) {
            if self.greetings.submit(prompt) {
                self.prompt = None;
            }
        } else if self.input.key_pressed(KeyCode::Escape) {
            self.prompt = None;
        }
    }

    /// Advance the mode once per click. The open prompt swallows clicks.
    fn apply_clicks(&mut self, clicks: u32, now: Instant) {
        if self.prompt.is_some() {
            return;
        }
        for _ in 0..clicks {
            let transition = self.scene.advance();
            log::info!("{} -> {}", transition.from, transition.to);
            if let Some(notice) = Notice::for_transition(&transition, now) {
                self.notice = Some(notice);
            }
        }
    }

    /// Apply this frame's input to the scene.
    fn update(&mut self) {
        for path in self.input.take_dropped_files() {
            self.load_photo(&path);
        }

        self.update_prompt();

        self.apply_clicks(self.input.clicks(), Instant::now());

        if self.scene.mode() == SceneMode::Image {
            self.photo_view.pan(self.input.left_drag());
            self.photo_view.rotate(self.input.right_drag());
            self.photo_view.zoom_by(self.input.wheel_pixels());
        }
        self.photo_view.sync_mode(self.scene.mode());

        self.scene.set_pointer(self.input.pointer_ndc());

        if let Some(greeting) = self.greetings.poll() {
            self.scene.set_greeting(greeting);
        }

        self.input.begin_frame();
        self.update_title();
    }

    fn update_title(&mut self) {
        let now = Instant::now();
        if self.notice.as_ref().is_some_and(|n| n.expired(now)) {
            self.notice = None;
        }

        let base = &self.config.window.title;
        let title = match (&self.prompt, &self.notice) {
            (Some(prompt), _) => format!("{base} - Greeting for: {prompt}_"),
            (None, Some(notice)) => format!("{base} - {} ({})", self.scene.mode(), notice.text),
            (None, None) if self.greetings.is_busy() => {
                format!("{base} - {} (the elves are writing...)", self.scene.mode())
            }
            (None, None) => format!("{base} - {}", self.scene.mode()),
        };
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.update();

        let elapsed = self.clock.tick();
        if let Some(fps) = self.clock.take_fps() {
            log::debug!("{fps:.1} fps");
        }

        let camera = *self.scene.camera();
        let frame = self.scene.step(elapsed);
        if let Some(renderer) = &mut self.renderer {
            match renderer.render(&camera, &frame, &self.photo_view) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost) => renderer.resize(winit::dpi::PhysicalSize {
                    width: renderer.config.width,
                    height: renderer.config.height,
                }),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory");
                    event_loop.exit();
                }
                Err(e) => log::warn!("Render error: {e:?}"),
            }
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let capacity = self.config.particle_count + self.config.elf_count + 1;
        match pollster::block_on(Renderer::new(window.clone(), capacity)) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(e) => return self.fail(event_loop, e.into()),
        }

        let size = window.inner_size();
        self.input.set_window_size(size.width, size.height);
        self.scene.set_viewport(size.width, size.height);
        self.window = Some(window);
        self.update_title();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
                self.input
                    .set_window_size(physical_size.width, physical_size.height);
                self.scene
                    .set_viewport(physical_size.width, physical_size.height);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
