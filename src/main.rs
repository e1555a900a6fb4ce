//! Halftone Waves entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, PointerEvent, TouchEvent};

    use halftone_waves::renderer::DotRenderer;
    use halftone_waves::sim::{ColorMode, WaveState};
    use halftone_waves::Settings;

    /// App instance holding all state
    struct App {
        state: WaveState,
        renderer: Option<DotRenderer>,
        settings: Settings,
        canvas: HtmlCanvasElement,
    }

    impl App {
        /// Convert a client-space point to surface (backing store) coordinates
        fn client_to_surface(&self, client_x: f64, client_y: f64) -> (f64, f64) {
            let rect = self.canvas.get_bounding_client_rect();
            // The backing store may be smaller than CSS size x DPR when the
            // device caps the surface, so scale by the actual ratio
            let scale = |backing: u32, css: f64| {
                if css > 0.0 { backing as f64 / css } else { 1.0 }
            };
            (
                (client_x - rect.left()) * scale(self.canvas.width(), rect.width()),
                (client_y - rect.top()) * scale(self.canvas.height(), rect.height()),
            )
        }

        /// Match the canvas backing store to its CSS size, within device limits
        fn sync_size(&mut self) {
            let (mut width, mut height) = css_pixel_size(&self.canvas);
            if let Some(ref mut renderer) = self.renderer {
                (width, height) = renderer.resize(width, height);
            }
            if (width, height) == self.state.size() {
                return;
            }
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.state.on_resize(width, height);
        }

        fn set_mode(&mut self, mode: ColorMode) {
            self.state.set_mode(mode);
            self.settings.color_mode = mode;
            self.settings.save();
        }

        fn toggle_combine(&mut self) {
            let combine = self.state.combine_policy().toggled();
            self.state.set_combine_policy(combine);
            self.settings.combine = combine;
            self.settings.save();
        }

        /// One scheduling signal = one simulation tick
        fn frame(&mut self) {
            let primitives = self.state.tick();
            if let Some(ref mut renderer) = self.renderer {
                match renderer.render(&primitives) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        renderer.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    /// Canvas CSS size in device pixels
    fn css_pixel_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        (
            (canvas.client_width() as f64 * dpr) as u32,
            (canvas.client_height() as f64 * dpr) as u32,
        )
    }

    fn build_state(settings: &Settings, width: u32, height: u32, seed: u64) -> WaveState {
        let mut state = match WaveState::with_tuning(settings.tuning.clone(), width, height, seed) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("Invalid tuning ({}), using defaults", e);
                WaveState::new(width, height, seed)
            }
        };
        state.set_mode(settings.color_mode);
        state.set_combine_policy(settings.combine);
        state
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Halftone Waves starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (css_width, css_height) = css_pixel_size(&canvas);
        canvas.set_width(css_width);
        canvas.set_height(css_height);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let renderer = DotRenderer::new(surface, &adapter, css_width, css_height).await;

        // Canvas and simulation share the size the device accepted
        let (width, height) = renderer.size();
        canvas.set_width(width);
        canvas.set_height(height);
        let state = build_state(&settings, width, height, seed);
        log::info!("Wave state initialized at {}x{} with seed: {}", width, height, seed);

        let app = Rc::new(RefCell::new(App {
            state,
            renderer: Some(renderer),
            settings,
            canvas: canvas.clone(),
        }));

        setup_input_handlers(&canvas, app.clone());
        setup_mode_buttons(app.clone());
        setup_resize(app.clone());

        request_animation_frame(app);

        log::info!("Halftone Waves running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse / pen press (touch is handled separately so each finger counts)
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                if event.pointer_type() == "touch" {
                    return;
                }
                let mut a = app.borrow_mut();
                let (x, y) = a.client_to_surface(event.client_x() as f64, event.client_y() as f64);
                a.state.on_impulse(x, y);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start: one impulse per new finger
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let touches = event.changed_touches();
                let mut a = app.borrow_mut();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        let (x, y) =
                            a.client_to_surface(touch.client_x() as f64, touch.client_y() as f64);
                        a.state.on_impulse(x, y);
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.key().as_str() {
                    "r" | "R" => a.set_mode(ColorMode::Rainbow),
                    "d" | "D" => a.set_mode(ColorMode::Default),
                    "c" | "C" => a.toggle_combine(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_mode_buttons(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        for (id, mode) in [
            ("mode-default", ColorMode::Default),
            ("mode-rainbow", ColorMode::Rainbow),
        ] {
            if let Some(btn) = document.get_element_by_id(id) {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    app.borrow_mut().set_mode(mode);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().sync_size();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            frame_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>) {
        app.borrow_mut().frame();
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Halftone Waves (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the interactive version");

    headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive a scripted session and log how the dot count evolves
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo() {
    use halftone_waves::{ColorMode, Settings, WaveState};

    let settings = Settings::load();
    let mut state = match WaveState::with_tuning(settings.tuning, 640, 480, 0x5eed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid tuning: {}", e);
            return;
        }
    };
    state.set_combine_policy(settings.combine);

    state.on_impulse(320.0, 240.0);
    state.set_mode(ColorMode::Rainbow);
    state.on_impulse(80.0, 60.0);

    let mut peak = 0;
    loop {
        if state.time_ticks() == 30 {
            state.set_mode(ColorMode::Default);
            state.on_impulse(600.0, 400.0);
        }
        let dots = state.tick();
        peak = peak.max(dots.len());
        if state.time_ticks() % 10 == 0 {
            log::info!(
                "tick {:>4}: {:>5} dots, {} impulses",
                state.time_ticks(),
                dots.len(),
                state.pool().len()
            );
        }
        if state.pool().is_empty() {
            break;
        }
    }

    println!(
        "Simulated {} ticks, peak {} dots per frame",
        state.time_ticks(),
        peak
    );
}
