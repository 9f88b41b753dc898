//! # Prompt preview window
//!
//! eframe host for the prompt components. Every frame it
//!
//! 1. drains the gamepad monitor and forwards its trigger,
//! 2. forwards keyboard/mouse or touch input seen by the window,
//! 3. lets the glyph repository run its periodic vendor check,
//!
//! then draws the current scheme, vendor and each bound label. Label
//! templates can be edited in place to exercise template changes.

pub mod common;

use crate::gamepad::monitor::GamepadMonitor;
use crate::gamepad::vendor::{ConnectedControllers, ControllerDescriptor};
use crate::glyph::markup::expand_markup;
use crate::input::context::InputModeContext;
use crate::input::swapper::ControlSchemeSwapper;
use crate::label::{Attached, IconLabel, LabelText, TextTarget};
use chrono::Local;
use common::{panel_frame, scheme_color, trigger_from_events, UiColors};
use eframe::egui::{self, RichText, ScrollArea, TextEdit};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};

/// A bound label plus the text it writes into
pub struct LabelRow {
    pub label: IconLabel<Attached>,
    pub text: Rc<RefCell<LabelText>>,
    draft: String,
    status: Option<String>,
}

impl LabelRow {
    pub fn new(label: IconLabel<Attached>, text: Rc<RefCell<LabelText>>) -> Self {
        let draft = label.template();
        Self {
            label,
            text,
            draft,
            status: None,
        }
    }
}

pub struct PromptPreviewUI {
    context: Rc<InputModeContext>,
    swapper: Option<ControlSchemeSwapper>,
    monitor: Option<GamepadMonitor>,
    rows: Vec<LabelRow>,
}

impl PromptPreviewUI {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        context: Rc<InputModeContext>,
        swapper: ControlSchemeSwapper,
        monitor: Option<GamepadMonitor>,
        rows: Vec<LabelRow>,
    ) -> Self {
        Self {
            context,
            swapper: Some(swapper),
            monitor,
            rows,
        }
    }

    fn pump_input(&mut self, ctx: &egui::Context) {
        if let Some(signal) = self.monitor.as_mut().and_then(|monitor| monitor.poll()) {
            self.context.fire_trigger(signal);
        }

        if let Some(signal) = ctx.input(|input| trigger_from_events(&input.events)) {
            self.context.fire_trigger(signal);
        }

        if let Some(repository) = self.context.repository() {
            let none: Vec<ControllerDescriptor> = Vec::new();
            let controllers: &dyn ConnectedControllers = match self.monitor.as_ref() {
                Some(monitor) => monitor as &dyn ConnectedControllers,
                None => &none,
            };
            repository.tick(Local::now(), controllers);
        }
    }

    fn render_status(&mut self, ui: &mut egui::Ui) {
        let scheme = self.context.current_scheme();
        ui.horizontal(|ui| {
            ui.label("Scheme:");
            ui.label(RichText::new(scheme.to_string()).color(scheme_color(scheme)).strong());
            ui.separator();

            match self.context.repository() {
                Some(repository) => {
                    let asset = repository.current_asset();
                    ui.label(format!(
                        "Vendor: {} ({})",
                        repository.current_category(),
                        asset.sheet().name()
                    ));
                    if ui.button("Detect now").clicked() {
                        let controllers = self
                            .monitor
                            .as_ref()
                            .map(|monitor| monitor.connected())
                            .unwrap_or_default();
                        if !repository.detect_now(&controllers) {
                            debug!("Vendor unchanged after manual detection");
                        }
                    }
                }
                None => {
                    ui.label(RichText::new("No glyph repository").color(UiColors::INACTIVE));
                }
            }

            let gamepad = if self.monitor.is_some() {
                RichText::new("gamepad backend up").color(UiColors::ACTIVE)
            } else {
                RichText::new("gamepad backend down").color(UiColors::INACTIVE)
            };
            ui.separator();
            ui.label(gamepad);
        });
    }

    fn render_labels(&mut self, ui: &mut egui::Ui) {
        let sheet = self
            .context
            .repository()
            .map(|repository| repository.current_asset());

        ScrollArea::vertical().show(ui, |ui| {
            for row in &mut self.rows {
                panel_frame().show(ui, |ui| {
                    let raw = row.text.borrow().text().to_string();
                    let shown = match sheet.as_ref() {
                        Some(asset) => expand_markup(&raw, asset.sheet()),
                        None => raw.clone(),
                    };
                    ui.label(RichText::new(shown).size(20.0));
                    ui.label(RichText::new(raw).weak().monospace());

                    ui.horizontal(|ui| {
                        ui.label(format!("{}:", row.label.action()));
                        ui.add(TextEdit::singleline(&mut row.draft).desired_width(320.0));
                        if ui.button("Apply").clicked() {
                            row.status = match row.label.on_template_changed(&row.draft) {
                                Ok(()) => None,
                                Err(e) => {
                                    warn!("Template rejected: {}", e);
                                    Some(e.to_string())
                                }
                            };
                        }
                    });

                    if let Some(status) = row.status.clone().or_else(|| {
                        row.label.last_error().map(|e| e.to_string())
                    }) {
                        ui.label(RichText::new(status).color(UiColors::INACTIVE));
                    }
                });
                ui.add_space(4.0);
            }
        });
    }
}

impl eframe::App for PromptPreviewUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump_input(ctx);

        egui::TopBottomPanel::top("status_panel")
            .frame(egui::Frame::new().fill(UiColors::MAIN_BG).inner_margin(6))
            .show(ctx, |ui| self.render_status(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.render_labels(ui));

        // Gamepad events only arrive through polling
        ctx.request_repaint_after(Duration::from_millis(16));
    }
}

impl Drop for PromptPreviewUI {
    fn drop(&mut self) {
        for row in self.rows.drain(..) {
            row.label.detach();
        }
        if let Some(swapper) = self.swapper.take() {
            swapper.detach();
        }
        self.context.teardown_repository();
    }
}
