use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::caster::RayHit;
use crate::config::EngineConfig;
use crate::motion::MoveIntent;
use crate::player::Player;
use crate::world::{DEFAULT_LAYOUT, World};

mod caster;
mod config;
mod motion;
mod player;
mod renderer;
mod world;

/// Simulation tick length. Motion speeds in `EngineConfig` are per tick, so
/// the tick rate is fixed and rendering free-runs on top of it.
const TICK: Duration = Duration::from_micros(1_000_000 / 60);

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,

    world: World,
    player: Player,
    config: EngineConfig,
    hits: Vec<Option<RayHit>>,

    // Input and tick pacing
    keys_down: HashSet<KeyCode>,
    last_tick: Instant,
    tick_debt: Duration,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,
}

impl Default for App {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            window: None,
            surface: None,

            world: World::from_layout(&DEFAULT_LAYOUT),
            player: Player::new(2.5, 2.5, 0.0),
            hits: vec![None; config.ray_count],
            config,

            keys_down: HashSet::new(),
            last_tick: Instant::now(),
            tick_debt: Duration::ZERO,

            frame_counter: 0,
            last_fps_print: Instant::now(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title("Gridcast")
            .with_inner_size(LogicalSize::new(800.0, 600.0));

        let window = Rc::new(event_loop.create_window(attributes).expect("create window"));

        let context = softbuffer::Context::new(window.clone()).expect("softbuffer context");
        let surface =
            softbuffer::Surface::new(&context, window.clone()).expect("softbuffer surface");

        self.surface = Some(surface);
        self.window = Some(window);

        self.last_tick = Instant::now();
        self.window.as_ref().unwrap().request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        ..
                    },
                ..
            } => {
                if let PhysicalKey::Code(code) = physical_key {
                    use winit::event::ElementState;
                    match state {
                        ElementState::Pressed => {
                            self.keys_down.insert(code);
                        }
                        ElementState::Released => {
                            self.keys_down.remove(&code);
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                self.pump_ticks();

                let (window, surface) = match (&self.window, &mut self.surface) {
                    (Some(w), Some(s)) if w.id() == id => (w, s),
                    _ => return,
                };

                let size = window.inner_size();
                let (dw, dh) = (size.width as usize, size.height as usize);
                if dw == 0 || dh == 0 {
                    return; // Minimized window, skip drawing
                }

                surface
                    .resize(
                        NonZeroU32::new(dw as u32).unwrap(),
                        NonZeroU32::new(dh as u32).unwrap(),
                    )
                    .unwrap();

                caster::cast_rays(&self.world, &self.player, &self.config, &mut self.hits);

                let mut buf = surface.buffer_mut().expect("buffer_mut");
                renderer::render_frame(&mut buf, dw, dh, &self.world, &self.player, &self.hits);

                buf.present().unwrap();

                // Print FPS
                self.frame_counter += 1;
                let now = Instant::now();
                if now.duration_since(self.last_fps_print).as_secs_f32() >= 1.0 {
                    let fps = self.frame_counter as f32
                        / now.duration_since(self.last_fps_print).as_secs_f32();
                    println!("FPS: {fps:.1}");
                    self.frame_counter = 0;
                    self.last_fps_print = now;
                }

                self.window.as_ref().unwrap().request_redraw();
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl App {
    /// Run every simulation tick owed since the last frame. Elapsed time is
    /// capped so a paused or dragged window does not burst hundreds of
    /// catch-up ticks.
    fn pump_ticks(&mut self) {
        let now = Instant::now();
        let mut elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        if elapsed > Duration::from_millis(100) {
            elapsed = Duration::from_millis(100);
        }
        self.tick_debt += elapsed;

        while self.tick_debt >= TICK {
            self.tick_debt -= TICK;
            self.step();
        }
    }

    fn step(&mut self) {
        let mut intent = MoveIntent::default();
        if self.keys_down.contains(&KeyCode::KeyW) {
            intent.forward += 1.0;
        }
        if self.keys_down.contains(&KeyCode::KeyS) {
            intent.forward -= 1.0;
        }
        if self.keys_down.contains(&KeyCode::KeyD) {
            intent.turn += 1.0;
        }
        if self.keys_down.contains(&KeyCode::KeyA) {
            intent.turn -= 1.0;
        }

        motion::apply(&mut self.player, intent, &self.world, &self.config);
    }
}

fn main() {
    let event_loop = EventLoop::new().unwrap();

    // Wait instead of Poll: every redraw requests the next one, so the loop
    // stays busy without spinning on the event queue.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::default();
    let _ = event_loop.run_app(&mut app);
}
