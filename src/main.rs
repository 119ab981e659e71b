//! Arcade Driving entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use arcade_driving::persistence::{KeyValueStore, LocalStorage, MemoryStore};
    use arcade_driving::platform::{
        Command, Direction, Viewport, command_for_key, direction_for_key,
    };
    use arcade_driving::renderer::{RenderState, build_frame};
    use arcade_driving::sim::{DriveInput, GamePhase, Snapshot};
    use arcade_driving::{Session, Settings};

    /// HUD fuel percentage below which the gauge is highlighted
    const LOW_FUEL: u32 = 30;

    /// Game instance holding all state
    struct Game {
        session: Session<Box<dyn KeyValueStore>>,
        render_state: Option<RenderState>,
        input: DriveInput,
        /// A frame callback is scheduled
        loop_active: bool,
    }

    impl Game {
        /// Render the current state
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = build_frame(self.session.state(), self.session.settings());
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements and overlays in the DOM
        fn update_hud(&self, snapshot: &Snapshot) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            set_hud_value(&document, "hud-speed", &format!("{} km/h", snapshot.speed));
            set_hud_value(&document, "hud-distance", &format!("{} m", snapshot.distance));
            set_hud_value(&document, "hud-score", &snapshot.score.to_string());
            set_hud_value(&document, "hud-fuel", &format!("{}%", snapshot.fuel));
            set_hud_value(&document, "hud-best", &snapshot.best.to_string());

            if let Some(el) = document.get_element_by_id("hud-fuel") {
                let class = if snapshot.fuel < LOW_FUEL {
                    "hud-item low-fuel"
                } else {
                    "hud-item"
                };
                let _ = el.set_attribute("class", class);
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.session.settings().show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    set_hud_value(&document, "hud-fps", &self.session.fps().to_string());
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            let phase = self.session.phase();
            set_overlay(&document, "start-overlay", phase == GamePhase::Idle);
            set_overlay(&document, "game-over", phase == GamePhase::GameOver);
            if phase == GamePhase::GameOver {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&snapshot.score.to_string()));
                }
                if let Some(el) = document.get_element_by_id("final-best") {
                    el.set_text_content(Some(&snapshot.best.to_string()));
                }
            }
        }
    }

    fn set_hud_value(document: &Document, id: &str, text: &str) {
        if let Some(el) = document
            .query_selector(&format!("#{} .hud-value", id))
            .ok()
            .flatten()
        {
            el.set_text_content(Some(text));
        }
    }

    fn set_overlay(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let class = if visible { "overlay" } else { "overlay hidden" };
            let _ = el.set_attribute("class", class);
        }
    }

    /// Open LocalStorage, or keep scores in memory for this page only
    fn open_store() -> Box<dyn KeyValueStore> {
        match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("LocalStorage unavailable ({}), best score will not persist", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    /// Viewport for the current window size
    fn window_viewport(window: &web_sys::Window, settings: &Settings) -> Viewport {
        let inner_w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(settings.max_canvas_width as f64);
        let inner_h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(settings.max_canvas_height as f64);
        Viewport::fit(
            inner_w as f32,
            inner_h as f32,
            window.device_pixel_ratio() as f32,
            settings,
        )
    }

    fn apply_canvas_size(canvas: &HtmlCanvasElement, viewport: Viewport) {
        let (width, height) = viewport.physical_size();
        canvas.set_width(width);
        canvas.set_height(height);
        let _ = canvas.set_attribute(
            "style",
            &format!("width:{}px;height:{}px", viewport.width, viewport.height),
        );
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Arcade Driving starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let store = open_store();
        let settings = Settings::load(&store);
        let viewport = window_viewport(&window, &settings);
        apply_canvas_size(&canvas, viewport);

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(store, viewport, settings, seed);
        let game = Rc::new(RefCell::new(Game {
            session,
            render_state: None,
            input: DriveInput::default(),
            loop_active: false,
        }));

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

        match RenderState::new(surface, &adapter, viewport).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Could not create GPU device: {}", e),
        }

        setup_keyboard(game.clone());
        setup_pads(game.clone());
        setup_buttons(game.clone());
        setup_resize(canvas, game.clone());

        // Idle frame behind the start overlay
        {
            let mut g = game.borrow_mut();
            g.render();
            let snapshot = g.session.snapshot();
            g.update_hud(&snapshot);
        }

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        log::info!("Arcade Driving ready");
    }

    /// Start a fresh run and make sure the frame loop is scheduled
    fn start_run(game: &Rc<RefCell<Game>>) {
        let seed = js_sys::Date::now() as u64;
        let schedule = {
            let mut g = game.borrow_mut();
            g.session.start(seed);
            let snapshot = g.session.snapshot();
            g.update_hud(&snapshot);
            !std::mem::replace(&mut g.loop_active, true)
        };
        if schedule {
            request_animation_frame(game.clone());
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down: hold a direction or trigger a command
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if let Some(direction) = direction_for_key(&code) {
                    event.prevent_default();
                    game.borrow_mut().input.set(direction, true);
                    return;
                }
                let phase = game.borrow().session.phase();
                match command_for_key(&code) {
                    Some(Command::Start) if phase != GamePhase::Running => {
                        event.prevent_default();
                        start_run(&game);
                    }
                    Some(Command::Restart) if phase == GamePhase::GameOver => {
                        event.prevent_default();
                        start_run(&game);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up: release a direction
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(direction) = direction_for_key(&event.code()) {
                    event.prevent_default();
                    game.borrow_mut().input.set(direction, false);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key releases are lost while the window is unfocused
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.clear();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// On-screen direction pads for touch devices
    fn setup_pads(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for direction in Direction::ALL {
            let Some(pad) = document.get_element_by_id(direction.pad_id()) else {
                continue;
            };

            for (event_name, held) in [
                ("pointerdown", true),
                ("pointerup", false),
                ("pointerleave", false),
                ("pointercancel", false),
            ] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                    event.prevent_default();
                    game.borrow_mut().input.set(direction, held);
                });
                let _ = pad
                    .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    if game.borrow().session.phase() != GamePhase::Running {
                        start_run(&game);
                    }
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let mut g = game.borrow_mut();
            let viewport = window_viewport(&window, g.session.settings());
            if viewport == g.session.viewport() {
                return;
            }
            apply_canvas_size(&canvas, viewport);
            g.session.resize(viewport);
            if let Some(ref mut render_state) = g.render_state {
                render_state.resize(viewport);
            }
            // A running loop picks up the new state on its next frame
            if !g.loop_active {
                g.render();
                let snapshot = g.session.snapshot();
                g.update_hud(&snapshot);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
        let keep_running = {
            let mut g = game.borrow_mut();
            let input = g.input;
            let frame = g.session.frame(time, &input);
            g.render();
            g.update_hud(&frame.snapshot);
            g.loop_active = frame.keep_running;
            frame.keep_running
        };

        if keep_running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use arcade_driving::persistence::MemoryStore;
    use arcade_driving::platform::Viewport;
    use arcade_driving::renderer::build_frame;
    use arcade_driving::{QualityPreset, Session, Settings};

    env_logger::init();
    log::info!("Arcade Driving (native) starting...");
    log::info!("Rendering needs a browser - run with `trunk serve`; running a headless autopilot");

    // Usage: arcade-driving [seed] [low|medium|high]
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let quality = args
        .next()
        .and_then(|s| QualityPreset::from_str(&s))
        .unwrap_or_default();

    let mut session = Session::new(
        MemoryStore::new(),
        Viewport::new(900.0, 700.0, 1.0),
        Settings::from_preset(quality),
        seed,
    );
    session.start(seed);

    // Ten simulated minutes at ~60 FPS
    let mut time = 0.0;
    let mut snapshot = session.snapshot();
    for _ in 0..36_000 {
        let input = autopilot::steer(session.state());
        let frame = session.frame(time, &input);
        snapshot = frame.snapshot;
        if !frame.keep_running {
            break;
        }
        time += 16.0;
    }

    log::info!(
        "Autopilot finished: {:?} after {} steps",
        session.state().end_reason,
        session.state().steps
    );
    let vertices = build_frame(session.state(), session.settings());
    log::info!(
        "Final frame: {} vertices at {} quality",
        vertices.len(),
        quality.as_str()
    );

    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not encode snapshot: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Lane-picking driver for headless runs
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use arcade_driving::sim::{DriveInput, GameState};

    /// How far above the car traffic is considered a threat
    const LOOKAHEAD: f32 = 400.0;
    /// Dead zone around the target lane center
    const SETTLE: f32 = 4.0;

    /// Hold the throttle and steer toward the lane with the most room ahead
    pub fn steer(state: &GameState) -> DriveInput {
        let road = &state.road;
        let car = state.vehicle.rect;
        let car_x = car.center().x;

        let lane_of = |x: f32| {
            ((x - road.left) / road.lane_width())
                .floor()
                .clamp(0.0, (road.lane_count - 1) as f32) as u32
        };

        // Gap between the car's nose and the nearest obstacle in each lane
        let mut clearance = vec![LOOKAHEAD; road.lane_count as usize];
        for obstacle in &state.obstacles {
            let gap = car.top() - obstacle.rect.bottom();
            if gap > -car.size.y && gap < LOOKAHEAD {
                let lane = lane_of(obstacle.rect.center().x) as usize;
                clearance[lane] = clearance[lane].min(gap);
            }
        }

        let current = lane_of(car_x);
        let mut target = current;
        for lane in 0..road.lane_count {
            let better = clearance[lane as usize] > clearance[target as usize];
            let closer_tie = clearance[lane as usize] == clearance[target as usize]
                && lane.abs_diff(current) < target.abs_diff(current);
            if better || closer_tie {
                target = lane;
            }
        }

        let target_x = road.lane_center(target);
        DriveInput {
            left: target_x < car_x - SETTLE,
            right: target_x > car_x + SETTLE,
            up: true,
            down: false,
        }
    }
}
