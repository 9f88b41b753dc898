//! gilrs-backed gamepad monitor
//!
//! Drains pending gilrs events once per frame and turns real gamepad activity
//! into trigger signals. Also serves as the connected-controller list polled
//! by the glyph repository.

use crate::gamepad::vendor::{ConnectedControllers, ControllerDescriptor};
use crate::input::scheme::TriggerSignal;
use gilrs::{Event, EventType, Gilrs};
use tracing::{debug, error, info, warn};

#[derive(Clone, Debug)]
pub struct MonitorSettings {
    pub stick_deadzone: f32,
    /// Report activity as the handheld scheme instead of a plain gamepad
    pub handheld: bool,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            stick_deadzone: 0.2,
            handheld: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Failed to initialize gamepad backend: {0}")]
    InitializationError(String),
}

pub struct GamepadMonitor {
    gilrs: Gilrs,
    settings: MonitorSettings,
}

impl GamepadMonitor {
    pub fn create(settings: MonitorSettings) -> Result<Self, MonitorError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => g,
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(MonitorError::InitializationError(e.to_string()));
            }
        };

        let monitor = Self { gilrs, settings };
        let connected = monitor.connected();
        if connected.is_empty() {
            warn!("No gamepad connected, waiting for one");
        } else {
            info!("Found {} gamepads:", connected.len());
            for (idx, pad) in connected.iter().enumerate() {
                info!(
                    "  [{}] Name: {}, vendor: {:?}, product: {:?}",
                    idx, pad.name, pad.vendor_id, pad.product_id
                );
            }
        }
        Ok(monitor)
    }

    /// Collects at most one trigger signal from all events pending since the last poll
    pub fn poll(&mut self) -> Option<TriggerSignal> {
        let mut active = false;
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            if is_activity(&event, self.settings.stick_deadzone) {
                active = true;
                continue;
            }
            match event {
                EventType::Connected => {
                    info!("Controller connected: {}", self.gilrs.gamepad(id).name());
                }
                EventType::Disconnected => {
                    warn!("Controller disconnected: {}", id);
                }
                _ => debug!("Ignoring gilrs event: {:?}", event),
            }
        }

        active.then_some(if self.settings.handheld {
            TriggerSignal::Handheld
        } else {
            TriggerSignal::Gamepad
        })
    }
}

impl ConnectedControllers for GamepadMonitor {
    fn connected(&self) -> Vec<ControllerDescriptor> {
        self.gilrs
            .gamepads()
            .filter(|(_, pad)| pad.is_connected())
            .map(|(_, pad)| ControllerDescriptor {
                name: pad.name().to_string(),
                vendor_id: pad.vendor_id(),
                product_id: pad.product_id(),
            })
            .collect()
    }
}

// Button presses and stick motion past the deadzone count as user activity
fn is_activity(event: &EventType, deadzone: f32) -> bool {
    match event {
        EventType::ButtonPressed(..) => true,
        EventType::AxisChanged(_, value, _) | EventType::ButtonChanged(_, value, _) => {
            past_deadzone(*value, deadzone)
        }
        _ => false,
    }
}

fn past_deadzone(value: f32, deadzone: f32) -> bool {
    value.abs() >= deadzone
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stick_noise_is_below_deadzone() {
        assert!(!past_deadzone(0.05, 0.2));
        assert!(!past_deadzone(-0.19, 0.2));
        assert!(past_deadzone(-0.6, 0.2));
        assert!(past_deadzone(0.2, 0.2));
    }
}
