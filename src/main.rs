//! Roll-Playing Game entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use roll_playing::audio::WebAudio;
    use roll_playing::consts::FPS;
    use roll_playing::platform::{AssetStore, CanvasRenderer, clock_seed, read_tuning};
    use roll_playing::{App, InputState, Settings};

    /// Canvas element ids, tried in order
    const CANVAS_IDS: [&str; 2] = ["gameCanvas", "canvas"];

    /// Game instance holding all state
    struct Game {
        app: App,
        input: InputState,
        audio: WebAudio,
        renderer: CanvasRenderer,
    }

    impl Game {
        fn tick(&mut self) {
            self.input.sample();
            self.app.update(&self.input, &mut self.audio);
            self.app.draw(&mut self.renderer);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Roll-Playing Game starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = CANVAS_IDS
            .iter()
            .find_map(|id| document.get_element_by_id(id))
            .ok_or("no canvas")?
            .dyn_into()?;

        let tuning = read_tuning(&document);
        let settings = Settings::default();
        let seed = clock_seed();
        let audio = WebAudio::new(&settings);
        let renderer = CanvasRenderer::new(&canvas, AssetStore::load()?)?;
        let game = Rc::new(RefCell::new(Game {
            app: App::new(seed, tuning, settings),
            input: InputState::new(),
            audio,
            renderer,
        }));

        setup_input_handlers(&window, &canvas, game.clone())?;

        // Fixed tick rate; requestAnimationFrame would tie game speed to the display
        let closure = Closure::<dyn FnMut()>::new(move || game.borrow_mut().tick());
        window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            (1000 / FPS) as i32,
        )?;
        closure.forget();

        log::info!("Roll-Playing Game running at {FPS} ticks per second");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Keys are tracked by their lowercase name
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_down(&event.key().to_lowercase());
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key().to_lowercase());
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.mouse_move(event.offset_x() as f32, event.offset_y() as f32);
                g.input.mouse_down();
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.mouse_up();
            });
            canvas.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .input
                    .mouse_move(event.offset_x() as f32, event.offset_y() as f32);
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Roll-Playing Game (native) starting...");
    log::info!("Native mode has no window - build for wasm32 to play in the browser");

    println!("\nRunning headless autoplay...");
    autoplay();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one run to the lose screen by always spending the first ready die
#[cfg(not(target_arch = "wasm32"))]
fn autoplay() {
    use roll_playing::audio::RecordingAudio;
    use roll_playing::consts::CANVAS_SCALE;
    use roll_playing::platform::clock_seed;
    use roll_playing::ui::RecordingRenderer;
    use roll_playing::{App, InputState, Settings, Tuning};

    const MAX_CLICKS: usize = 10_000;

    let mut app = App::new(clock_seed(), Tuning::default(), Settings::default());
    let mut input = InputState::new();
    let mut audio = RecordingAudio::default();
    let mut renderer = RecordingRenderer::new();

    let mut clicks = 0;
    while let Some(target) = app.autoplay_target() {
        if clicks == MAX_CLICKS {
            println!("✗ Gave up after {MAX_CLICKS} clicks on the {} screen", app.screen().name());
            return;
        }
        input.mouse_move(target.x * CANVAS_SCALE, target.y * CANVAS_SCALE);
        for down in [true, false] {
            if down {
                input.mouse_down();
            } else {
                input.mouse_up();
            }
            input.sample();
            app.update(&input, &mut audio);
            app.draw(&mut renderer);
        }
        clicks += 1;
    }
    println!(
        "✓ Run ended after {clicks} clicks and {} sounds",
        audio.played.len()
    );
}
