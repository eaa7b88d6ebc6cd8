//! Queue Breaker entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, PageTransitionEvent, PointerEvent};

    use queue_breaker::Tuning;
    use queue_breaker::persistence::{LocalStore, StageProgress};
    use queue_breaker::platform::{ends_frame_loop, to_logical};
    use queue_breaker::platform::web::FrameLoop;
    use queue_breaker::renderer::CanvasRenderer;
    use queue_breaker::renderer::palette::orb_paint;
    use queue_breaker::sim::{GameEvent, GameState, GameStatus, PointerInput};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        progress: StageProgress<LocalStore>,
        document: Document,
    }

    impl Game {
        /// One animation frame: simulate, persist, draw
        fn frame(&mut self, timestamp: f64) {
            self.state.frame(timestamp);
            self.handle_events();

            if let Err(e) = self.renderer.render(&self.state) {
                log::warn!("Render error: {:?}", e);
            }
            self.update_hud();
        }

        fn handle_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::StageStarted { stage } => self.progress.save(stage),
                    GameEvent::StageCleared { stage } => {
                        log::info!("Stage {} cleared, loading next", stage)
                    }
                    GameEvent::OutOfProjectiles { stage } => {
                        log::info!("Out of projectiles on stage {}", stage)
                    }
                    _ => {}
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let document = &self.document;

            if let Some(el) = document.get_element_by_id("hud-stage") {
                el.set_text_content(Some(&format!("Stage {}", self.state.stage)));
            }

            // Next orb badge
            match self.state.next_projectile() {
                Some(next) => {
                    if let Some(el) = document.get_element_by_id("hud-orb") {
                        let _ = el.set_attribute("class", "orb");
                        let _ = el.set_attribute(
                            "style",
                            &format!("background: {}", orb_paint(next.kind)),
                        );
                    }
                    if let Some(el) = document.get_element_by_id("hud-orb-kind") {
                        el.set_text_content(Some(next.kind.as_str()));
                    }
                    if let Some(el) = document.get_element_by_id("hud-orb-damage") {
                        el.set_text_content(Some(&format!("DMG {}", next.damage)));
                    }
                }
                None => {
                    if let Some(el) = document.get_element_by_id("hud-orb") {
                        let _ = el.set_attribute("class", "orb hidden");
                    }
                    if let Some(el) = document.get_element_by_id("hud-orb-kind") {
                        el.set_text_content(Some("No orbs remaining"));
                    }
                    if let Some(el) = document.get_element_by_id("hud-orb-damage") {
                        el.set_text_content(None);
                    }
                }
            }

            if let Some(el) = document.get_element_by_id("hud-message") {
                el.set_text_content(self.state.message.as_deref());
            }

            // Retry button only after a loss
            if let Some(el) = document.get_element_by_id("retry-btn") {
                let class = if self.state.status == GameStatus::Lost {
                    ""
                } else {
                    "hidden"
                };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    /// Optional tuning overrides from `<canvas data-tuning='{...}'>`
    fn read_tuning(canvas: &HtmlCanvasElement) -> Tuning {
        match canvas.get_attribute("data-tuning") {
            Some(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring invalid data-tuning: {}", e);
                Tuning::default()
            }),
            None => Tuning::default(),
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Queue Breaker starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let tuning = read_tuning(&canvas);
        let renderer = CanvasRenderer::new(&canvas, tuning.width, tuning.height)?;

        let mut progress = StageProgress::new(LocalStore::new());
        let stage = progress.initial_stage();
        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(stage, tuning),
            renderer,
            progress,
            document: document.clone(),
        }));
        log::info!("Game initialized at stage {}", stage);

        setup_input_handlers(&canvas, game.clone());
        setup_retry_button(&document, game.clone());

        // Start game loop
        let frame_game = game.clone();
        let frame_loop = FrameLoop::start(move |timestamp| {
            frame_game.borrow_mut().frame(timestamp);
        })?;
        setup_teardown(&window, frame_loop);

        log::info!("Queue Breaker running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer offsets are in CSS pixels; the playfield is in logical units
        fn logical_point(canvas: &HtmlCanvasElement, tuning: &Tuning, event: &PointerEvent) -> Vec2 {
            to_logical(
                Vec2::new(event.offset_x() as f32, event.offset_y() as f32),
                Vec2::new(canvas.client_width() as f32, canvas.client_height() as f32),
                Vec2::new(tuning.width, tuning.height),
            )
        }

        // Pointer down - pick origin and start aiming
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let p = logical_point(&canvas_clone, &g.state.tuning, &event);
                g.state.handle_pointer(PointerInput::Down(p));
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer move - re-aim while dragging
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                if !g.state.aim.dragging {
                    return;
                }
                event.prevent_default();
                let p = logical_point(&canvas_clone, &g.state.tuning, &event);
                g.state.handle_pointer(PointerInput::Move(p));
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer up - fire
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().state.handle_pointer(PointerInput::Up);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer leave / cancel - drop the drag without firing
        for name in ["pointerleave", "pointercancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().state.handle_pointer(PointerInput::Leave);
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_retry_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("retry-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().state.retry();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Cancel the frame loop when the page is unloaded for good.
    ///
    /// A page entering the back/forward cache keeps its loop; the browser
    /// suspends animation frames until it is shown again.
    fn setup_teardown(window: &web_sys::Window, frame_loop: FrameLoop) {
        let slot = Rc::new(RefCell::new(Some(frame_loop)));
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
            if !ends_frame_loop(event.persisted()) {
                log::debug!("Page cached, keeping frame loop");
                return;
            }
            if let Some(frame_loop) = slot.borrow_mut().take() {
                frame_loop.cancel();
            }
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Queue Breaker failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::f32::consts::PI;

    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use queue_breaker::Tuning;
    use queue_breaker::consts::{AIM_MARGIN, ORIGIN_INSET};
    use queue_breaker::persistence::{MemoryStore, StageProgress};
    use queue_breaker::sim::{GameEvent, GameState, GameStatus};

    /// Simulated frame length (ms)
    const FRAME_MS: f64 = 1000.0 / 60.0;

    #[derive(Debug, Default)]
    pub struct Summary {
        pub stage: u32,
        pub shots: u32,
        pub stages_cleared: u32,
        pub retries: u32,
        pub blocks_destroyed: u32,
    }

    /// Play with random aims until `target_stage` is reached or `max_shots` are spent
    pub fn run(seed: u64, target_stage: u32, max_shots: u32) -> Summary {
        let mut rng = Pcg32::seed_from_u64(seed);
        let tuning = Tuning::default();
        let mut progress = StageProgress::new(MemoryStore::new());
        let mut state = GameState::new(progress.initial_stage(), tuning);
        let mut summary = Summary::default();
        let mut now = 0.0f64;

        while summary.shots < max_shots && state.stage < target_stage {
            match state.status {
                GameStatus::Idle => {
                    let x = rng.random_range(ORIGIN_INSET..tuning.width - ORIGIN_INSET);
                    let angle = rng.random_range((-PI + AIM_MARGIN)..-AIM_MARGIN);
                    let line_y = tuning.launch_line_y();

                    state.pointer_down(Vec2::new(x, line_y - 100.0));
                    let origin = Vec2::new(state.aim.origin_x, line_y);
                    state.pointer_move(origin + Vec2::from_angle(angle) * 100.0);
                    if !state.pointer_up() {
                        log::warn!("Launch refused on stage {}", state.stage);
                        break;
                    }
                    summary.shots += 1;
                }
                GameStatus::Firing | GameStatus::Won => {
                    now += FRAME_MS;
                    state.frame(now);
                }
                GameStatus::Lost => {
                    summary.retries += 1;
                    state.retry();
                }
            }

            for event in state.drain_events() {
                match event {
                    GameEvent::StageStarted { stage } => progress.save(stage),
                    GameEvent::StageCleared { .. } => summary.stages_cleared += 1,
                    GameEvent::BlockDestroyed { .. } => summary.blocks_destroyed += 1,
                    _ => {}
                }
            }
        }

        summary.stage = state.stage;
        summary
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    log::info!("Queue Breaker (native) starting...");
    log::info!("Native mode runs a headless auto-play session - run with `trunk serve` for the web version");

    let summary = headless::run(0x5EED, 4, 400);
    println!(
        "Reached stage {} after {} shots ({} stages cleared, {} blocks destroyed, {} retries)",
        summary.stage,
        summary.shots,
        summary.stages_cleared,
        summary.blocks_destroyed,
        summary.retries
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
