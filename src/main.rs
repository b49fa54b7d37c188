//! Meteor Strike entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use meteor_strike::consts::*;
    use meteor_strike::renderer::{RenderState, build_scene};
    use meteor_strike::settings::Settings;
    use meteor_strike::sim::{GamePhase, GameState, InputEvent, apply_input, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        settings: Settings,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed),
                render_state: None,
                settings: Settings::load(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run one simulation tick and refresh the FPS estimate
        fn update(&mut self, time: f64) {
            tick(&mut self.state);

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = build_scene(&self.state, &self.settings);
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD text sinks in the DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            set_text(
                &document,
                "bullet-count",
                &format!("Bullets: {} / {}", self.state.shots_fired, MAX_BULLETS),
            );
            set_text(&document, "level", &format!("Level {}", self.state.level()));

            if self.state.level() == 1 {
                set_text(
                    &document,
                    "destroyed-meteors",
                    &format!(
                        "Destroyed Meteors: {} / {}",
                        self.state.meteors_destroyed, LEVEL1_METEOR_GOAL
                    ),
                );
                set_text(&document, "boss-hp", "");
            } else {
                set_text(
                    &document,
                    "boss-hp",
                    &format!("BOSS HP: {} / {}", self.state.boss_hp, BOSS_MAX_HP),
                );
                set_text(&document, "destroyed-meteors", "");
            }

            if self.settings.show_fps {
                set_text(&document, "hud-fps", &format!("{} FPS", self.fps));
            }
        }

        /// Reveal the terminal overlay with the run's outcome
        fn show_game_over(&self) {
            let message = match self.state.phase {
                GamePhase::Victory => "Victory! You completed all levels.",
                _ => "YOU LOSE",
            };

            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            set_text(&document, "game-over-message", message);
            if let Some(el) = document.get_element_by_id("game-over") {
                let _ = el.set_attribute("class", "");
            }
        }
    }

    fn set_text(document: &web_sys::Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Meteor Strike starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // The arena is a fixed-size drawable area
        canvas.set_width(ARENA_WIDTH as u32);
        canvas.set_height(ARENA_HEIGHT as u32);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state =
            RenderState::new(surface, &adapter, ARENA_WIDTH as u32, ARENA_HEIGHT as u32).await;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(game.clone());
        setup_restart_button();

        // Start the frame loop
        request_animation_frame(game);

        log::info!("Meteor Strike running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            // Discrete press events only; unrecognized keys are ignored
            let input = match event.key().as_str() {
                "ArrowLeft" => InputEvent::MoveLeft,
                "ArrowRight" => InputEvent::MoveRight,
                " " => InputEvent::Fire,
                _ => return,
            };
            apply_input(&mut game.borrow_mut().state, input);
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_button() {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Restart rebuilds the whole session from scratch
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                if let Some(window) = web_sys::window() {
                    let _ = window.location().reload();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let halted = {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();

            if g.state.phase.is_terminal() {
                g.show_game_over();
                true
            } else {
                false
            }
        };

        if halted {
            log::info!("Frame loop halted");
            return;
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Meteor Strike (native) starting...");
    log::info!("Rendering requires the web build; running a headless session");

    run_headless_session();
}

/// Scripted seeded session: spend the whole shot budget into an empty sky
/// and let the run end on its own.
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_session() {
    use meteor_strike::sim::{GameState, InputEvent, apply_input, tick};

    let mut state = GameState::new(0xC0FFEE);
    for _ in 0..10 {
        apply_input(&mut state, InputEvent::Fire);
    }

    let mut budget = 10_000u32;
    while !state.phase.is_terminal() && budget > 0 {
        tick(&mut state);
        budget -= 1;
    }

    println!(
        "Session ended in {:?} after {} ticks",
        state.phase, state.time_ticks
    );
}
