mod app;
mod engine;
mod ui;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, MouseEvent, WebGlRenderingContext, WheelEvent, Window};

use crate::app::{HoverChange, Viewer};
use crate::engine::renderer::Renderer;

thread_local! {
    static VIEWER: RefCell<Option<Viewer>> = RefCell::new(None);
}

pub(crate) fn with_viewer<R>(f: impl FnOnce(&mut Viewer) -> R) -> Option<R> {
    VIEWER.with(|slot| slot.borrow_mut().as_mut().map(f))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;
    let canvas = document
        .get_element_by_id("canvas")
        .ok_or("No canvas")?
        .dyn_into::<HtmlCanvasElement>()?;

    let (width, height) = viewport_size(&window);
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);

    let gl = canvas
        .get_context("webgl")?
        .ok_or("No WebGL")?
        .dyn_into::<WebGlRenderingContext>()?;

    let renderer = Renderer::new(gl)?;
    renderer.resize(width as i32, height as i32);

    let viewer = Viewer::new(renderer, width, height);
    log::info!(
        "scene ready: {} planets, {} stars",
        viewer.session.scene.planets.len(),
        viewer.session.scene.stars.len() / 3
    );
    VIEWER.with(|slot| *slot.borrow_mut() = Some(viewer));

    ui::build_controls(&document)?;
    wire_buttons(&document)?;
    wire_pointer_events(&canvas)?;
    wire_resize(&window, &canvas)?;
    start_animation_loop();

    Ok(())
}

fn viewport_size(window: &Window) -> (f32, f32) {
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (width as f32, height as f32)
}

fn wire_buttons(document: &Document) -> Result<(), JsValue> {
    let doc = document.clone();
    let on_pause = Closure::wrap(Box::new(move || {
        if let Some(paused) = with_viewer(|viewer| viewer.session.toggle_pause()) {
            let label = if paused { "Resume Animation" } else { "Pause Animation" };
            ui::set_button_label(&doc, "pauseResumeButton", label);
        }
    }) as Box<dyn FnMut()>);
    add_click_listener(document, "pauseResumeButton", &on_pause)?;
    on_pause.forget();

    let doc = document.clone();
    let on_light = Closure::wrap(Box::new(move || {
        if let Some(light) = with_viewer(|viewer| viewer.session.toggle_light_mode()) {
            if let Some(body) = doc.body() {
                let result = if light {
                    body.class_list().add_1("light-mode")
                } else {
                    body.class_list().remove_1("light-mode")
                };
                result.ok();
            }
        }
    }) as Box<dyn FnMut()>);
    add_click_listener(document, "toggleLightModeButton", &on_light)?;
    on_light.forget();

    let on_reset = Closure::wrap(Box::new(move || {
        with_viewer(|viewer| viewer.session.reset_camera());
    }) as Box<dyn FnMut()>);
    add_click_listener(document, "resetCameraButton", &on_reset)?;
    on_reset.forget();

    Ok(())
}

fn add_click_listener(
    document: &Document,
    id: &str,
    closure: &Closure<dyn FnMut()>,
) -> Result<(), JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{}", id)))?
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
}

fn wire_pointer_events(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let on_down = Closure::wrap(Box::new(move |event: MouseEvent| {
        with_viewer(|viewer| {
            viewer
                .session
                .pointer_pressed(event.client_x() as f32, event.client_y() as f32)
        });
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("mousedown", on_down.as_ref().unchecked_ref())?;
    on_down.forget();

    let on_up = Closure::wrap(Box::new(move |_event: MouseEvent| {
        with_viewer(|viewer| viewer.session.pointer_released());
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("mouseup", on_up.as_ref().unchecked_ref())?;
    on_up.forget();

    let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
        let window = match web_sys::window() {
            Some(window) => window,
            None => return,
        };
        let (width, height) = viewport_size(&window);
        let change = with_viewer(|viewer| {
            viewer.session.pointer_moved(
                event.client_x() as f32,
                event.client_y() as f32,
                width,
                height,
            )
        });
        if let (Some(change), Some(document)) = (change, window.document()) {
            match change {
                HoverChange::Shown(name) => ui::show_tooltip(&document, name),
                HoverChange::Hidden => ui::hide_tooltip(&document),
                HoverChange::Unchanged => {}
            }
        }
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();

    let on_click = Closure::wrap(Box::new(move |event: MouseEvent| {
        let window = match web_sys::window() {
            Some(window) => window,
            None => return,
        };
        let (width, height) = viewport_size(&window);
        let focused = with_viewer(|viewer| {
            viewer.session.click(
                event.client_x() as f32,
                event.client_y() as f32,
                width,
                height,
                js_sys::Date::now(),
            )
        });
        if let Some(Some(name)) = focused {
            log::info!("focusing camera on {}", name);
        }
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    let on_wheel = Closure::wrap(Box::new(move |event: WheelEvent| {
        event.prevent_default();
        with_viewer(|viewer| viewer.session.wheel(event.delta_y() as f32));
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("wheel", on_wheel.as_ref().unchecked_ref())?;
    on_wheel.forget();

    Ok(())
}

fn wire_resize(window: &Window, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let win = window.clone();
    let canvas = canvas.clone();
    let on_resize = Closure::wrap(Box::new(move || {
        let (width, height) = viewport_size(&win);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        with_viewer(|viewer| {
            viewer.session.resize(width, height);
            viewer.renderer.resize(width as i32, height as i32);
        });
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();
    Ok(())
}

fn start_animation_loop() {
    let f = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if let Some(window) = web_sys::window() {
            let (width, height) = viewport_size(&window);
            with_viewer(|viewer| {
                viewer.session.tick(js_sys::Date::now());
                if let Some(document) = window.document() {
                    match viewer.session.tooltip_position(width, height) {
                        Some((x, y)) => ui::move_tooltip(&document, x, y),
                        None => ui::hide_tooltip(&document),
                    }
                }
                viewer.render();
            });
        }
        request_animation_frame(f.borrow().as_ref().unwrap());
    }) as Box<dyn FnMut()>));

    request_animation_frame(g.borrow().as_ref().unwrap());
}

fn request_animation_frame(f: &Closure<dyn FnMut()>) {
    web_sys::window()
        .unwrap()
        .request_animation_frame(f.as_ref().unchecked_ref())
        .unwrap();
}
