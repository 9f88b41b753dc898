//! Control scheme swapper
//!
//! Owns the transition rules between control schemes. Attaching the swapper
//! applies the startup scheme and registers it on the context's trigger bus;
//! detaching removes that registration but leaves the context's current scheme
//! untouched so late readers still see the last value.

use crate::input::context::InputModeContext;
use crate::input::scheme::{ControlScheme, TriggerSignal};
use crate::input::signal::ListenerId;
use std::rc::Rc;
use tracing::{debug, info};

#[derive(Debug)]
pub struct ControlSchemeSwapper {
    context: Rc<InputModeContext>,
    trigger_listener: ListenerId,
}

impl ControlSchemeSwapper {
    pub fn attach(context: Rc<InputModeContext>) -> Self {
        let initial = context.capabilities().initial_scheme();
        context.set_initial_scheme(initial);

        let weak = Rc::downgrade(&context);
        let trigger_listener = context.triggers().connect(move |signal| {
            if let Some(context) = weak.upgrade() {
                apply_trigger(&context, *signal);
            }
        });
        info!("Control scheme swapper attached, starting in {}", initial);

        Self {
            context,
            trigger_listener,
        }
    }

    pub fn on_gamepad_trigger(&self) -> bool {
        apply_trigger(&self.context, TriggerSignal::Gamepad)
    }

    pub fn on_handheld_trigger(&self) -> bool {
        apply_trigger(&self.context, TriggerSignal::Handheld)
    }

    pub fn on_keyboard_mouse_trigger(&self) -> bool {
        apply_trigger(&self.context, TriggerSignal::KeyboardMouse)
    }

    pub fn on_touch_trigger(&self) -> bool {
        apply_trigger(&self.context, TriggerSignal::Touch)
    }

    pub fn current_scheme(&self) -> ControlScheme {
        self.context.current_scheme()
    }

    /// Unregisters from the trigger bus
    pub fn detach(self) {
        self.context.triggers().disconnect(self.trigger_listener);
        info!(
            "Control scheme swapper detached, scheme stays {}",
            self.context.current_scheme()
        );
    }
}

// Returns true when the signal was accepted and a notification went out
fn apply_trigger(context: &InputModeContext, signal: TriggerSignal) -> bool {
    let caps = context.capabilities();
    let target = match signal {
        TriggerSignal::Gamepad if caps.gamepad => ControlScheme::Gamepad,
        TriggerSignal::Handheld if caps.gamepad && caps.handheld => ControlScheme::Handheld,
        TriggerSignal::Touch if caps.touch => ControlScheme::Touch,
        TriggerSignal::KeyboardMouse => ControlScheme::KeyboardAndMouse,
        _ => {
            debug!("Ignoring {:?}: not supported on this platform", signal);
            return false;
        }
    };
    context.transition_scheme(target)
}
