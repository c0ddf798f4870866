//! Breakout entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use breakout::Settings;
    use breakout::consts::SIM_DT;
    use breakout::renderer::GpuRenderer;
    use breakout::sim::{Autopilot, FrameClock, Game, Key, Keys, run_frame};

    /// Browser-side state around the simulation
    struct App {
        game: Game,
        renderer: Option<GpuRenderer>,
        clock: FrameClock,
        /// Keys currently held, sampled once per frame
        keys: Keys,
        /// Plays by itself when set (toggled with `i`)
        autopilot: Option<Autopilot>,
        /// Persisted copy; preset changes apply on the next page load
        settings: Settings,
        last_time: f64,
    }

    impl App {
        fn new(game: Game, settings: Settings) -> Self {
            Self {
                game,
                settings,
                renderer: None,
                clock: FrameClock::new(),
                keys: Keys::default(),
                autopilot: None,
                last_time: 0.0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let keys = match self.autopilot.as_mut() {
                Some(pilot) => pilot.keys(&self.game),
                None => self.keys,
            };
            run_frame(&mut self.game, &mut self.clock, dt, &keys);
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref mut renderer) = self.renderer {
                // requestAnimationFrame time is in milliseconds
                self.game.render(renderer, (time / 1000.0) as f32);
            }
        }

        fn key_down(&mut self, name: &str) {
            if let Some(key) = Key::from_dom_key(name) {
                self.keys.set(key, true);
                return;
            }
            match name {
                "i" | "I" => {
                    self.autopilot = match self.autopilot {
                        Some(_) => None,
                        None => Some(Autopilot::new()),
                    };
                    log::info!("Autopilot: {}", self.autopilot.is_some());
                }
                "q" | "Q" => {
                    let preset = self.settings.quality.next();
                    self.settings.apply_preset(preset);
                    self.settings.save();
                    log::info!("Quality preset {} saved, reload to apply", preset.as_str());
                }
                "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9" => {
                    let index = name.parse::<usize>().unwrap_or(1) - 1;
                    if let Err(e) = self.game.set_level(index) {
                        log::warn!("{e}");
                    }
                    self.clock.reset();
                }
                _ => {}
            }
        }

        fn key_up(&mut self, name: &str) {
            if let Some(key) = Key::from_dom_key(name) {
                self.keys.set(key, false);
            }
        }
    }

    pub async fn run() -> breakout::Result<()> {
        log::info!("Breakout starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return Ok(());
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return Ok(());
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No <canvas id=\"canvas\"> element");
            return Ok(());
        };

        let mut settings = Settings::load();
        settings.seed = js_sys::Date::now() as u64;

        // Canvas backing store at device resolution; the playfield is scaled to fit
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(0) as f64;
        let client_h = canvas.client_height().max(0) as f64;
        let (width, height) = if client_w > 0.0 && client_h > 0.0 {
            ((client_w * dpr) as u32, (client_h * dpr) as u32)
        } else {
            (settings.screen_width as u32, settings.screen_height as u32)
        };
        canvas.set_width(width);
        canvas.set_height(height);

        let game = Game::with_builtin_levels(settings.clone())?;
        let app = Rc::new(RefCell::new(App::new(game, settings.clone())));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let renderer = GpuRenderer::new(surface, &adapter, width, height, &settings).await?;
        app.borrow_mut().renderer = Some(renderer);

        setup_input_handlers(&window, app.clone());

        // Start game loop
        request_animation_frame(app);

        log::info!("Breakout running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        // Key down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let name = event.key();
                if matches!(name.as_str(), " " | "ArrowLeft" | "ArrowRight") {
                    event.prevent_default();
                }
                app.borrow_mut().key_down(&name);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: key-up events are lost, so release everything
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().keys = Keys::default();
                log::debug!("Window blurred, keys released");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            // Calculate delta time
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt);
            a.render(time);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {e}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use breakout::Settings;
    use breakout::renderer::CommandLog;
    use breakout::sim::{Autopilot, FrameClock, Game, run_frame};

    env_logger::init();
    log::info!("Breakout (native) starting...");
    log::info!("Native mode runs headless with the autopilot - run with `trunk serve` for the web version");

    let settings = Settings::load_or_default("breakout.json");
    let mut game = match Game::load(settings) {
        Ok(game) => game,
        Err(e) => {
            log::error!("{e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    let mut autopilot = Autopilot::new();
    let mut clock = FrameClock::new();
    let mut frame = CommandLog::new();

    // Ten seconds at 60 fps
    let frame_dt = 1.0 / 60.0;
    let mut steps = 0;
    for i in 0..600 {
        let keys = autopilot.keys(&game);
        steps += run_frame(&mut game, &mut clock, frame_dt, &keys);
        frame.clear();
        game.render(&mut frame, i as f32 * frame_dt);
    }

    let level = game.levels.current();
    println!(
        "Level '{}': {} of {} bricks left after {} steps ({} draws in the last frame)",
        game.levels.current_name(),
        level.remaining(),
        level.bricks.iter().filter(|b| !b.solid).count(),
        steps,
        frame.draw_count()
    );
    std::process::ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
