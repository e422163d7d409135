//! DOM side of the viewer: the per-planet speed control panel and the
//! hover tooltip. Everything here assumes the host page provides the
//! `controls-panel` and `planet-tooltip` elements.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, HtmlInputElement};

use crate::app::registry::{speed_to_slider, PLANETS};

/// Build one labeled slider + numeric readout per planet and append them to
/// the controls panel. Slider input writes the planet's speed immediately.
pub fn build_controls(document: &Document) -> Result<(), JsValue> {
    let panel = document
        .get_element_by_id("controls-panel")
        .ok_or("No controls panel")?;
    let speed_controls = document.create_element("div")?;
    panel.append_child(&speed_controls)?;

    for (index, descriptor) in PLANETS.iter().enumerate() {
        let control = document.create_element("div")?;
        control.set_class_name("planet-control");

        let label = document.create_element("label")?;
        label.set_attribute("for", &format!("speed-slider-{index}"))?;
        label.set_text_content(Some(descriptor.name));

        let readout = document.create_element("span")?;
        readout.set_class_name("speed-value");
        readout.set_text_content(Some(&format!("Speed: {:.4}", descriptor.initial_speed)));
        label.append_child(&readout)?;

        let slider: HtmlInputElement = document.create_element("input")?.dyn_into()?;
        slider.set_type("range");
        slider.set_id(&format!("speed-slider-{index}"));
        slider.set_min("0");
        slider.set_max("100");
        slider.set_step("1");
        slider.set_value(&speed_to_slider(descriptor.initial_speed).to_string());

        let readout_for_input = readout.clone();
        let on_input = Closure::wrap(Box::new(move |event: Event| {
            let input = match event.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) {
                Some(input) => input,
                None => return,
            };
            let value = input.value().parse::<f32>().unwrap_or(0.0);
            if let Some(speed) =
                crate::with_viewer(|viewer| viewer.session.set_planet_speed(index, value))
            {
                readout_for_input.set_text_content(Some(&format!("Speed: {:.4}", speed)));
            }
        }) as Box<dyn FnMut(_)>);
        slider.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
        on_input.forget();

        control.append_child(&label)?;
        control.append_child(&slider)?;
        speed_controls.append_child(&control)?;
    }

    Ok(())
}

pub fn show_tooltip(document: &Document, name: &str) {
    if let Some(tooltip) = tooltip_element(document) {
        tooltip.set_text_content(Some(name));
        tooltip.style().set_property("display", "block").ok();
    }
}

pub fn hide_tooltip(document: &Document) {
    if let Some(tooltip) = tooltip_element(document) {
        tooltip.style().set_property("display", "none").ok();
    }
}

/// Pin the tooltip to a screen position; called every frame while a planet
/// is hovered so it tracks the orbiting body.
pub fn move_tooltip(document: &Document, x: f32, y: f32) {
    if let Some(tooltip) = tooltip_element(document) {
        let style = tooltip.style();
        style.set_property("left", &format!("{}px", x)).ok();
        style.set_property("top", &format!("{}px", y)).ok();
        style.set_property("display", "block").ok();
    }
}

pub fn set_button_label(document: &Document, id: &str, text: &str) {
    if let Some(button) = document.get_element_by_id(id) {
        button.set_text_content(Some(text));
    }
}

fn tooltip_element(document: &Document) -> Option<HtmlElement> {
    document
        .get_element_by_id("planet-tooltip")?
        .dyn_into::<HtmlElement>()
        .ok()
}
