//! Input-mode context shared by the swapper, the glyph repository and labels
//!
//! Replaces process-wide statics: every consumer receives the context at
//! construction and subscribes through its [`Signal`]s. The context owns
//!
//! - the current [`ControlScheme`] (written only by the swapper),
//! - the trigger bus fed by the host's input sources,
//! - the `scheme_changed` notification channel,
//! - the slot holding the single live [`GamepadSpriteRepository`].

use crate::error::PromptError;
use crate::gamepad::repository::GamepadSpriteRepository;
use crate::input::scheme::{ControlScheme, PlatformCapabilities, TriggerSignal};
use crate::input::signal::Signal;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, error, info};

pub struct InputModeContext {
    capabilities: PlatformCapabilities,
    scheme: Cell<ControlScheme>,
    triggers: Signal<TriggerSignal>,
    scheme_changed: Signal<ControlScheme>,
    repository: RefCell<Option<Rc<GamepadSpriteRepository>>>,
}

impl InputModeContext {
    pub fn new(capabilities: PlatformCapabilities) -> Rc<Self> {
        info!("Creating input-mode context with {:?}", capabilities);
        Rc::new(Self {
            capabilities,
            scheme: Cell::new(ControlScheme::KeyboardAndMouse),
            triggers: Signal::new("triggers"),
            scheme_changed: Signal::new("scheme_changed"),
            repository: RefCell::new(None),
        })
    }

    pub fn capabilities(&self) -> PlatformCapabilities {
        self.capabilities
    }

    pub fn current_scheme(&self) -> ControlScheme {
        self.scheme.get()
    }

    /// Delivers a trigger signal to whoever listens on the trigger bus
    pub fn fire_trigger(&self, signal: TriggerSignal) -> usize {
        debug!("Trigger signal: {:?}", signal);
        self.triggers.emit(&signal)
    }

    pub fn triggers(&self) -> &Signal<TriggerSignal> {
        &self.triggers
    }

    pub fn scheme_changed(&self) -> &Signal<ControlScheme> {
        &self.scheme_changed
    }

    pub fn repository(&self) -> Option<Rc<GamepadSpriteRepository>> {
        self.repository.borrow().clone()
    }

    /// Drops the live repository. Labels still subscribed to it detach without error.
    pub fn teardown_repository(&self) -> Option<Rc<GamepadSpriteRepository>> {
        let removed = self.repository.borrow_mut().take();
        if removed.is_some() {
            info!("Glyph repository torn down");
        }
        removed
    }

    pub(crate) fn install_repository(
        &self,
        repository: Rc<GamepadSpriteRepository>,
    ) -> Result<(), PromptError> {
        let mut slot = self.repository.borrow_mut();
        if slot.is_some() {
            error!("Duplicate GamepadSpriteRepository, discarding the new instance");
            return Err(PromptError::DuplicateSingleton(
                "GamepadSpriteRepository".to_string(),
            ));
        }
        *slot = Some(repository);
        Ok(())
    }

    // Startup value, no notification since nobody is subscribed yet
    pub(crate) fn set_initial_scheme(&self, scheme: ControlScheme) {
        debug!("Initial control scheme: {}", scheme);
        self.scheme.set(scheme);
    }

    /// Stores `scheme` and notifies. Re-selecting the current scheme is a no-op.
    pub(crate) fn transition_scheme(&self, scheme: ControlScheme) -> bool {
        if self.scheme.get() == scheme {
            return false;
        }
        self.scheme.set(scheme);
        info!("{} in control!", scheme);
        self.scheme_changed.emit(&scheme);
        true
    }
}

impl fmt::Debug for InputModeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputModeContext")
            .field("capabilities", &self.capabilities)
            .field("scheme", &self.scheme.get())
            .field("has_repository", &self.repository.borrow().is_some())
            .finish()
    }
}
