//! Shared styling for the preview window

use crate::input::scheme::{ControlScheme, TriggerSignal};
use egui::{Color32, Event, Frame, Stroke};

/// Dark palette, darkest background first
pub struct UiColors;

impl UiColors {
    pub const MAIN_BG: Color32 = Color32::from_rgb(30, 30, 30);
    pub const INNER_BG: Color32 = Color32::from_rgb(25, 25, 25);
    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 60);
    pub const ACTIVE: Color32 = Color32::from_rgb(50, 200, 20);
    pub const INACTIVE: Color32 = Color32::from_rgb(200, 50, 20);
}

pub fn panel_frame() -> Frame {
    Frame::new()
        .fill(UiColors::INNER_BG)
        .stroke(Stroke::new(1.0, UiColors::BORDER))
        .inner_margin(8)
        .corner_radius(4)
}

pub fn scheme_color(scheme: ControlScheme) -> Color32 {
    if scheme.is_gamepad_family() {
        UiColors::ACTIVE
    } else {
        Color32::LIGHT_BLUE
    }
}

/// Trigger implied by one frame of window input. Touch wins, since egui
/// also synthesizes pointer events from touches.
pub fn trigger_from_events(events: &[Event]) -> Option<TriggerSignal> {
    let mut trigger = None;
    for event in events {
        match event {
            Event::Touch { .. } => return Some(TriggerSignal::Touch),
            Event::Key { .. }
            | Event::Text(_)
            | Event::PointerMoved(_)
            | Event::PointerButton { .. }
            | Event::MouseWheel { .. } => trigger = Some(TriggerSignal::KeyboardMouse),
            _ => {}
        }
    }
    trigger
}
