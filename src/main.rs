//! Hoop Shot entry point
//!
//! On the web the page owns the 3D scene and the physics engine; this side
//! runs the round, reports events back to the page, and keeps the HUD
//! current. Natively it plays one idle-mode round against the headless feed.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use hoop_shot::consts::*;
    use hoop_shot::sim::{CollisionSample, GameEvent, GameState, Hud, TickInput, tick};
    use hoop_shot::{Scene, Settings};

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        scene: Scene,
        settings: Settings,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Events waiting for the page to pick up
        outbox: Vec<GameEvent>,
        last_hud: Option<Hud>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            let scene = Scene::standard();
            let input = TickInput {
                idle_mode: settings.idle_on_start,
                ..Default::default()
            };
            Self {
                state: GameState::new(seed, &settings, &scene),
                scene,
                settings,
                accumulator: 0.0,
                last_time: 0.0,
                input,
                outbox: Vec::new(),
                last_hud: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.launch = None;
                self.input.restart = false;
                self.input.samples.clear();
                self.input.removed.clear();
            }
            self.outbox.extend(self.state.drain_events());

            // Track frame times for FPS
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

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let hud = self.state.hud();
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if self.last_hud != Some(hud) {
                if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                    el.set_text_content(Some(&hud.score.to_string()));
                }
                if let Some(el) = document.query_selector("#hud-time .hud-value").ok().flatten() {
                    el.set_text_content(Some(&hud.time_left_secs.to_string()));
                }
                if let Some(el) = document.get_element_by_id("hud-over") {
                    let class = if hud.game_over { "overlay" } else { "overlay hidden" };
                    let _ = el.set_attribute("class", class);
                }
                self.last_hud = Some(hud);
            }

            if self.settings.show_fps {
                if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }
        }

        /// Turn a click on the canvas into a launch direction
        fn aim_from_click(&mut self, canvas: &HtmlCanvasElement, event: &MouseEvent) {
            let rect = canvas.get_bounding_client_rect();
            if rect.width() <= 0.0 || rect.height() <= 0.0 {
                return;
            }
            let ndc_x = ((event.client_x() as f64 - rect.left()) / rect.width() * 2.0 - 1.0) as f32;
            let ndc_y = (1.0 - (event.client_y() as f64 - rect.top()) / rect.height() * 2.0) as f32;
            let aspect = (rect.width() / rect.height()) as f32;

            self.input.launch = Some(self.scene.camera.ray_direction(ndc_x, ndc_y, aspect));
        }
    }

    fn with_game<R>(f: impl FnOnce(&mut Game) -> R) -> Option<R> {
        GAME.with(|slot| {
            let game = slot.borrow().clone()?;
            let mut g = game.borrow_mut();
            Some(f(&mut g))
        })
    }

    /// Court layout for the page to build meshes and colliders from
    #[wasm_bindgen]
    pub fn hoop_scene_json() -> String {
        with_game(|g| g.scene.to_json()).unwrap_or_else(|| Scene::standard().to_json())
    }

    /// Sensor callback: a ball started overlapping a trigger region
    #[wasm_bindgen]
    pub fn hoop_region_enter(body: u32, region: u32, vertical_velocity: f32) {
        with_game(|g| {
            g.input
                .samples
                .push(CollisionSample::enter(body, region, vertical_velocity))
        });
    }

    /// Sensor callback: a ball stopped overlapping a trigger region
    #[wasm_bindgen]
    pub fn hoop_region_exit(body: u32, region: u32, vertical_velocity: f32) {
        with_game(|g| {
            g.input
                .samples
                .push(CollisionSample::exit(body, region, vertical_velocity))
        });
    }

    /// The page removed a body on its own (fell off the court, went to sleep)
    #[wasm_bindgen]
    pub fn hoop_ball_removed(body: u32) {
        with_game(|g| g.input.removed.push(body));
    }

    /// Launch along a world-space direction (for custom input schemes)
    #[wasm_bindgen]
    pub fn hoop_launch(x: f32, y: f32, z: f32) {
        with_game(|g| g.input.launch = Some(glam::Vec3::new(x, y, z)));
    }

    #[wasm_bindgen]
    pub fn hoop_restart() {
        with_game(|g| g.input.restart = true);
    }

    #[wasm_bindgen]
    pub fn hoop_set_idle(enabled: bool) {
        with_game(|g| {
            g.input.idle_mode = enabled;
            g.settings.idle_on_start = enabled;
            g.settings.save();
            log::info!("Idle mode: {}", enabled);
        });
    }

    /// Pending events as a JSON array (spawn, despawn, recolor, ...)
    #[wasm_bindgen]
    pub fn hoop_drain_events() -> String {
        with_game(|g| {
            let events = std::mem::take(&mut g.outbox);
            serde_json::to_string(&events).unwrap_or_else(|e| {
                log::error!("Event serialization failed: {}", e);
                String::from("[]")
            })
        })
        .unwrap_or_else(|| String::from("[]"))
    }

    #[wasm_bindgen]
    pub fn hoop_hud_json() -> String {
        with_game(|g| serde_json::to_string(&g.state.hud()).unwrap_or_default()).unwrap_or_default()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Hoop Shot starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));
        log::info!("Game initialized with seed: {}", seed);

        GAME.with(|slot| *slot.borrow_mut() = Some(game.clone()));

        match document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        {
            Some(canvas) => setup_click_to_launch(canvas, game.clone()),
            None => log::warn!("No #canvas element, click-to-launch disabled"),
        }
        setup_restart_button(game.clone());

        request_animation_frame(game);
        log::info!("Hoop Shot running!");
    }

    fn setup_click_to_launch(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let target = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            game.borrow_mut().aim_from_click(&target, &event);
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.restart = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use hoop_shot::consts::SIM_DT;
    use hoop_shot::sim::{GameEvent, GameState, HeadlessWorld, TickInput, tick};
    use hoop_shot::{Scene, Settings};

    env_logger::init();
    log::info!("Hoop Shot (native) starting...");
    log::info!("Playing one idle round against the headless feed - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(42);

    let scene = Scene::standard();
    let settings = Settings::load();
    let mut state = GameState::new(seed, &settings, &scene);
    let mut world = HeadlessWorld::new(&scene);
    let mut input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let mut launched = 0u32;
    while !state.is_over() {
        input.samples = world.step(SIM_DT);
        input.removed = world.drain_removed();
        tick(&mut state, &input, SIM_DT);

        let events = state.drain_events();
        world.apply(&events);
        for event in &events {
            match event {
                GameEvent::BallLaunched(_) => launched += 1,
                GameEvent::BasketMade(made) => {
                    println!("{:>6.2}s  basket by ball {} -> {}", state.elapsed_secs, made.body, made.score)
                }
                GameEvent::GameOver { score } => println!("Game over, final score {}", score),
                _ => {}
            }
        }
    }

    let hud = state.hud();
    println!("Seed {}: {} / {} shots made", seed, hud.score, launched);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
