//! Icon label: keeps a label's text in sync with the control scheme and the
//! active vendor glyph sheet.
//!
//! # Lifecycle
//!
//! ```text
//! IconLabelBuilder ──build──► IconLabel<Detached> ──attach──► IconLabel<Attached>
//!                                      ▲                            │
//!                                      └───────────detach───────────┘
//! ```
//!
//! `attach` renders the current state once before subscribing, so the label
//! never shows a stale frame. While attached it reacts to
//!
//! - `scheme_changed`: gamepad-family schemes render the glyph from the
//!   repository's current sheet, other schemes strip the placeholder,
//! - `asset_changed`: always renders the glyph with the new sheet.
//!
//! Render failures inside a notification cannot propagate to the emitter.
//! They are logged, kept as [`IconLabel::last_error`], and the text is left
//! untouched. Direct calls (`attach`, `refresh`, `on_template_changed`)
//! return them.

use crate::error::PromptError;
use crate::gamepad::repository::GamepadSpriteRepository;
use crate::glyph::bindings::ActionBindings;
use crate::glyph::markup::sprite_markup;
use crate::glyph::physical::resolve_physical_control;
use crate::glyph::sheet::GlyphAssetHandle;
use crate::input::context::InputModeContext;
use crate::input::scheme::ControlScheme;
use crate::input::signal::ListenerId;
use crate::label::template;
use crate::label::text::TextTarget;
use statum::{machine, state};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, error, info};

#[state]
#[derive(Debug, Clone)]
pub enum LabelState {
    Detached,
    Attached,
}

#[machine]
pub struct IconLabel<S: LabelState> {
    core: Rc<RefCell<LabelCore>>,
    subscriptions: Option<Subscriptions>,
}

struct Subscriptions {
    context: Rc<InputModeContext>,
    scheme_listener: ListenerId,
    asset_listener: Option<(Weak<GamepadSpriteRepository>, ListenerId)>,
}

#[derive(Clone, Debug)]
enum RenderMode {
    Plain,
    Glyph(GlyphAssetHandle),
}

struct LabelCore {
    action: String,
    template: String,
    bindings: Rc<dyn ActionBindings>,
    target: Rc<RefCell<dyn TextTarget>>,
    mode: RenderMode,
    last_error: Option<PromptError>,
}

impl LabelCore {
    fn on_scheme_changed(
        &mut self,
        scheme: ControlScheme,
        repository: Option<Rc<GamepadSpriteRepository>>,
    ) -> Result<(), PromptError> {
        if !scheme.is_gamepad_family() {
            self.render_plain();
            return Ok(());
        }
        let repository = repository.ok_or_else(|| {
            PromptError::MissingDependency("no glyph repository installed".to_string())
        })?;
        self.render_glyph(&repository.current_asset())
    }

    fn render_glyph(&mut self, asset: &GlyphAssetHandle) -> Result<(), PromptError> {
        let control = resolve_physical_control(self.bindings.as_ref(), &self.action);
        let key = control.glyph_key();
        let sheet = asset.sheet();
        let index = sheet
            .sprite_index(&key)
            .ok_or_else(|| PromptError::GlyphNotFound {
                key: key.clone(),
                sheet: sheet.name().to_string(),
            })?;

        let text = template::substitute(&self.template, &self.action, &sprite_markup(index))?;
        debug!(
            "Label '{}' shows {} (index {}) from '{}'",
            self.action,
            key,
            index,
            sheet.name()
        );
        self.target.borrow_mut().set_text(text);
        self.mode = RenderMode::Glyph(asset.clone());
        Ok(())
    }

    fn render_plain(&mut self) {
        let text = template::strip(&self.template, &self.action);
        self.target.borrow_mut().set_text(text);
        self.mode = RenderMode::Plain;
    }

    fn rerender(&mut self) -> Result<(), PromptError> {
        match self.mode.clone() {
            RenderMode::Glyph(asset) => self.render_glyph(&asset),
            RenderMode::Plain => {
                self.render_plain();
                Ok(())
            }
        }
    }

    fn settle(&mut self, result: Result<(), PromptError>) -> Result<(), PromptError> {
        match &result {
            Ok(()) => self.last_error = None,
            Err(e) => {
                error!("Label '{}' failed to render: {}", self.action, e);
                self.last_error = Some(e.clone());
            }
        }
        result
    }
}

/// Collects a label's collaborators. Each one is required.
#[derive(Default)]
pub struct IconLabelBuilder {
    action: Option<String>,
    bindings: Option<Rc<dyn ActionBindings>>,
    target: Option<Rc<RefCell<dyn TextTarget>>>,
}

impl IconLabelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }

    pub fn bindings(mut self, bindings: Rc<dyn ActionBindings>) -> Self {
        self.bindings = Some(bindings);
        self
    }

    pub fn target(mut self, target: Rc<RefCell<dyn TextTarget>>) -> Self {
        self.target = Some(target);
        self
    }

    pub fn build(self) -> Result<IconLabel<Detached>, PromptError> {
        let missing = |what: &str| PromptError::MissingDependency(format!("label needs {what}"));
        let action = self.action.ok_or_else(|| missing("an action name"))?;
        let bindings = self.bindings.ok_or_else(|| missing("action bindings"))?;
        let target = self.target.ok_or_else(|| missing("a text target"))?;
        Ok(IconLabel::<Detached>::create(action, bindings, target))
    }
}

impl<S: LabelState> IconLabel<S> {
    pub fn action(&self) -> String {
        self.core.borrow().action.clone()
    }

    pub fn template(&self) -> String {
        self.core.borrow().template.clone()
    }

    pub fn text(&self) -> String {
        self.core.borrow().target.borrow().text().to_string()
    }

    pub fn last_error(&self) -> Option<PromptError> {
        self.core.borrow().last_error.clone()
    }
}

impl IconLabel<Detached> {
    // Template is whatever the target shows at bind time
    fn create(
        action: String,
        bindings: Rc<dyn ActionBindings>,
        target: Rc<RefCell<dyn TextTarget>>,
    ) -> Self {
        let template = target.borrow().text().to_string();
        debug!("Binding label '{}' with template '{}'", action, template);
        let core = LabelCore {
            action,
            template,
            bindings,
            target,
            mode: RenderMode::Plain,
            last_error: None,
        };
        Self::new(Rc::new(RefCell::new(core)), None)
    }

    /// Renders the current state, then subscribes to scheme and sheet changes
    pub fn attach(
        mut self,
        context: &Rc<InputModeContext>,
    ) -> Result<IconLabel<Attached>, PromptError> {
        let repository = context.repository();
        {
            let mut core = self.core.borrow_mut();
            let result = core.on_scheme_changed(context.current_scheme(), repository.clone());
            core.settle(result)?;
        }

        let weak_core = Rc::downgrade(&self.core);
        let weak_context = Rc::downgrade(context);
        let scheme_listener = context.scheme_changed().connect(move |scheme| {
            let (Some(core), Some(context)) = (weak_core.upgrade(), weak_context.upgrade()) else {
                return;
            };
            let mut core = core.borrow_mut();
            let result = core.on_scheme_changed(*scheme, context.repository());
            let _ = core.settle(result);
        });

        let asset_listener = repository.as_ref().map(|repository| {
            let weak_core = Rc::downgrade(&self.core);
            let id = repository.asset_changed().connect(move |asset| {
                if let Some(core) = weak_core.upgrade() {
                    let mut core = core.borrow_mut();
                    let result = core.render_glyph(asset);
                    let _ = core.settle(result);
                }
            });
            (Rc::downgrade(repository), id)
        });

        info!("Label '{}' attached", self.core.borrow().action);
        self.subscriptions = Some(Subscriptions {
            context: Rc::clone(context),
            scheme_listener,
            asset_listener,
        });
        Ok(self.transition())
    }
}

impl IconLabel<Attached> {
    /// Re-evaluates the current scheme and sheet
    pub fn refresh(&self) -> Result<(), PromptError> {
        let Some(subscriptions) = self.subscriptions.as_ref() else {
            return Ok(());
        };
        let context = &subscriptions.context;
        let mut core = self.core.borrow_mut();
        let result = core.on_scheme_changed(context.current_scheme(), context.repository());
        core.settle(result)
    }

    /// Same reaction as a `scheme_changed` notification, but the error is returned
    pub fn on_scheme_changed(&self, scheme: ControlScheme) -> Result<(), PromptError> {
        let repository = self
            .subscriptions
            .as_ref()
            .and_then(|subscriptions| subscriptions.context.repository());
        let mut core = self.core.borrow_mut();
        let result = core.on_scheme_changed(scheme, repository);
        core.settle(result)
    }

    /// Renders with `asset` whatever the current scheme
    pub fn on_asset_changed(&self, asset: &GlyphAssetHandle) -> Result<(), PromptError> {
        let mut core = self.core.borrow_mut();
        let result = core.render_glyph(asset);
        core.settle(result)
    }

    /// The text owner replaced the template, e.g. after a language switch
    pub fn on_template_changed(&self, new_template: &str) -> Result<(), PromptError> {
        let mut core = self.core.borrow_mut();
        debug!(
            "Label '{}' template changed: '{}' -> '{}'",
            core.action, core.template, new_template
        );
        core.template = new_template.to_string();
        let result = core.rerender();
        core.settle(result)
    }

    /// Unsubscribes. A repository torn down in the meantime is skipped.
    pub fn detach(mut self) -> IconLabel<Detached> {
        if let Some(subscriptions) = self.subscriptions.take() {
            subscriptions
                .context
                .scheme_changed()
                .disconnect(subscriptions.scheme_listener);
            if let Some((repository, id)) = subscriptions.asset_listener {
                match repository.upgrade() {
                    Some(repository) => {
                        repository.asset_changed().disconnect(id);
                    }
                    None => debug!("Glyph repository already gone, nothing to unsubscribe"),
                }
            }
        }
        info!("Label '{}' detached", self.core.borrow().action);
        self.transition()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamepad::repository::{RepositorySettings, VendorSheets};
    use crate::gamepad::vendor::{ControllerDescriptor, GamepadVendorCategory};
    use crate::glyph::bindings::ActionMap;
    use crate::glyph::sheet::{GlyphSheet, GlyphSprite};
    use crate::input::scheme::{PlatformCapabilities, TriggerSignal};
    use crate::input::swapper::ControlSchemeSwapper;
    use crate::label::text::LabelText;
    use chrono::Local;
    use std::collections::HashMap;

    struct Fixture {
        context: Rc<InputModeContext>,
        swapper: ControlSchemeSwapper,
        bindings: Rc<ActionMap>,
    }

    fn sheet(name: &str, sprites: &[&str]) -> GlyphAssetHandle {
        GlyphAssetHandle::new(GlyphSheet::new(
            name,
            sprites
                .iter()
                .map(|sprite| GlyphSprite::new(sprite, sprite))
                .collect(),
        ))
    }

    fn fixture() -> Fixture {
        let caps = PlatformCapabilities {
            gamepad: true,
            touch: false,
            handheld: true,
        };
        let context = InputModeContext::new(caps);
        let swapper = ControlSchemeSwapper::attach(Rc::clone(&context));

        let generic = sheet("generic", &["btn_a_0", "btn_b_0"]);
        let playstation = sheet("playstation", &["btn_b_0", "btn_a_0"]);
        let sparse = sheet("sparse", &["dpad_up_0"]);
        let sheets = VendorSheets::new(HashMap::from([
            (GamepadVendorCategory::Xbox, generic.clone()),
            (GamepadVendorCategory::PlayStation, playstation),
            (GamepadVendorCategory::Nintendo, sparse),
            (GamepadVendorCategory::Steam, generic.clone()),
            (GamepadVendorCategory::Generic, generic),
        ]))
        .unwrap();
        GamepadSpriteRepository::install(
            &context,
            RepositorySettings::new(true, 1.0),
            sheets,
            &Vec::<ControllerDescriptor>::new(),
            Local::now(),
        )
        .unwrap();

        let bindings = Rc::new(ActionMap::from_pairs([
            ("Confirm", vec!["<Keyboard>/enter", "<Gamepad>/buttonSouth"]),
            ("Back", vec!["<Keyboard>/escape", "<Gamepad>/buttonEast"]),
        ]));

        Fixture {
            context,
            swapper,
            bindings,
        }
    }

    fn label(
        fixture: &Fixture,
        action: &str,
        template: &str,
    ) -> (IconLabel<Detached>, Rc<RefCell<LabelText>>) {
        let text = Rc::new(RefCell::new(LabelText::new(template)));
        let label = IconLabelBuilder::new()
            .action(action)
            .bindings(fixture.bindings.clone())
            .target(text.clone())
            .build()
            .unwrap();
        (label, text)
    }

    fn switch_pad(fixture: &Fixture, name: &str) {
        let repository = fixture.context.repository().unwrap();
        repository.detect_now(&vec![ControllerDescriptor::named(name)]);
    }

    #[test]
    fn renders_glyph_in_place_of_placeholder() {
        let fixture = fixture();
        let (label, text) = label(&fixture, "Confirm", "Press {Confirm} to continue");
        let label = label.attach(&fixture.context).unwrap();

        assert_eq!(label.text(), "Press <sprite index=0> to continue");
        assert!(!text.borrow().text().contains("{Confirm}"));
        assert_eq!(label.template(), "Press {Confirm} to continue");
    }

    #[test]
    fn keyboard_scheme_strips_glyph() {
        let fixture = fixture();
        let (label, _text) = label(&fixture, "Confirm", "Press {Confirm} to continue");
        let label = label.attach(&fixture.context).unwrap();

        assert!(fixture.swapper.on_keyboard_mouse_trigger());

        assert_eq!(label.text(), "Press  to continue");
        assert!(!label.text().contains("<sprite"));
        assert!(!label.text().contains("{Confirm}"));
    }

    #[test]
    fn gamepad_scheme_restores_glyph() {
        let fixture = fixture();
        fixture.context.fire_trigger(TriggerSignal::KeyboardMouse);
        let (label, _text) = label(&fixture, "Back", "{Back} Return");
        let label = label.attach(&fixture.context).unwrap();
        assert_eq!(label.text(), " Return");

        fixture.context.fire_trigger(TriggerSignal::Gamepad);
        assert_eq!(label.text(), "<sprite index=1> Return");

        fixture.context.fire_trigger(TriggerSignal::KeyboardMouse);
        fixture.context.fire_trigger(TriggerSignal::Handheld);
        assert_eq!(label.text(), "<sprite index=1> Return");
    }

    #[test]
    fn missing_placeholder_is_template_mismatch() {
        let fixture = fixture();
        let (label, text) = label(&fixture, "Confirm", "Press X");

        let err = label.attach(&fixture.context).err().unwrap();

        assert!(matches!(err, PromptError::TemplateMismatch { .. }));
        assert_eq!(text.borrow().text(), "Press X");
        assert_eq!(text.borrow().writes(), 0);
        assert_eq!(fixture.context.scheme_changed().listener_count(), 0);
    }

    #[test]
    fn asset_change_rerenders_with_new_sheet() {
        let fixture = fixture();
        let (label, _text) = label(&fixture, "Confirm", "{Confirm}");
        let label = label.attach(&fixture.context).unwrap();
        assert_eq!(label.text(), "<sprite index=0>");

        switch_pad(&fixture, "DualSense Wireless Controller");
        assert_eq!(label.text(), "<sprite index=1>");
    }

    #[test]
    fn asset_change_applies_even_outside_gamepad_scheme() {
        let fixture = fixture();
        let (label, _text) = label(&fixture, "Confirm", "{Confirm}");
        let label = label.attach(&fixture.context).unwrap();
        fixture.context.fire_trigger(TriggerSignal::KeyboardMouse);
        assert_eq!(label.text(), "");

        switch_pad(&fixture, "PS4 Controller");
        assert_eq!(label.text(), "<sprite index=1>");
    }

    #[test]
    fn glyph_miss_during_notification_keeps_text() {
        let fixture = fixture();
        let (label, _text) = label(&fixture, "Confirm", "A: {Confirm}");
        let label = label.attach(&fixture.context).unwrap();
        let before = label.text();

        switch_pad(&fixture, "Nintendo Switch Pro Controller");

        assert_eq!(label.text(), before);
        assert!(matches!(
            label.last_error(),
            Some(PromptError::GlyphNotFound { ref key, .. }) if key == "btn_a_0"
        ));
    }

    #[test]
    fn template_change_event_rerenders() {
        let fixture = fixture();
        let (label, _text) = label(&fixture, "Confirm", "Press {Confirm}");
        let label = label.attach(&fixture.context).unwrap();

        label.on_template_changed("Appuyez sur {Confirm}").unwrap();
        assert_eq!(label.text(), "Appuyez sur <sprite index=0>");

        fixture.context.fire_trigger(TriggerSignal::KeyboardMouse);
        label.on_template_changed("Drücke {Confirm}").unwrap();
        assert_eq!(label.text(), "Drücke ");
    }

    #[test]
    fn detach_tolerates_torn_down_repository() {
        let fixture = fixture();
        let (label, _text) = label(&fixture, "Confirm", "{Confirm}");
        let label = label.attach(&fixture.context).unwrap();

        fixture.context.teardown_repository();
        let detached = label.detach();

        assert_eq!(fixture.context.scheme_changed().listener_count(), 0);
        assert_eq!(detached.action(), "Confirm");
    }

    #[test]
    fn detached_label_ignores_notifications() {
        let fixture = fixture();
        let (label, text) = label(&fixture, "Confirm", "{Confirm}");
        let label = label.attach(&fixture.context).unwrap();
        let repository = fixture.context.repository().unwrap();
        let _detached = label.detach();
        let writes = text.borrow().writes();

        fixture.context.fire_trigger(TriggerSignal::KeyboardMouse);
        switch_pad(&fixture, "DualSense");

        assert_eq!(text.borrow().writes(), writes);
        assert_eq!(repository.asset_changed().listener_count(), 0);
    }

    #[test]
    fn gamepad_scheme_without_repository_is_missing_dependency() {
        let fixture = fixture();
        fixture.context.teardown_repository();
        let (label, _text) = label(&fixture, "Confirm", "{Confirm}");

        let err = label.attach(&fixture.context).err().unwrap();
        assert!(matches!(err, PromptError::MissingDependency(_)));
    }

    #[test]
    fn builder_requires_every_collaborator() {
        let fixture = fixture();
        let missing_target = IconLabelBuilder::new()
            .action("Confirm")
            .bindings(fixture.bindings.clone())
            .build();
        assert!(matches!(missing_target, Err(PromptError::MissingDependency(_))));

        let missing_bindings = IconLabelBuilder::new()
            .action("Confirm")
            .target(Rc::new(RefCell::new(LabelText::new("{Confirm}"))))
            .build();
        assert!(matches!(missing_bindings, Err(PromptError::MissingDependency(_))));
    }

    #[test]
    fn direct_handlers_report_errors() {
        let fixture = fixture();
        let (label, text) = label(&fixture, "Confirm", "{Confirm} OK");
        let label = label.attach(&fixture.context).unwrap();

        label.on_scheme_changed(ControlScheme::KeyboardAndMouse).unwrap();
        assert_eq!(text.borrow().text(), " OK");

        let sparse = sheet("sparse", &["dpad_up_0"]);
        let err = label.on_asset_changed(&sparse).unwrap_err();
        assert!(matches!(err, PromptError::GlyphNotFound { .. }));
        assert_eq!(text.borrow().text(), " OK");
        assert_eq!(label.last_error(), Some(err));
    }

    #[test]
    fn unbound_action_falls_back_to_south_glyph() {
        let fixture = fixture();
        let (label, _text) = label(&fixture, "Hint", "{Hint}");
        let label = label.attach(&fixture.context).unwrap();
        assert_eq!(label.text(), "<sprite index=0>");
        assert!(label.refresh().is_ok());
    }
}
