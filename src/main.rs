pub mod config;
pub mod error;
pub mod gamepad;
pub mod glyph;
pub mod input;
pub mod label;
pub mod ui;

use crate::config::Config;
use crate::gamepad::monitor::GamepadMonitor;
use crate::gamepad::repository::GamepadSpriteRepository;
use crate::gamepad::vendor::{ConnectedControllers, ControllerDescriptor};
use crate::glyph::bindings::ActionBindings;
use crate::input::context::InputModeContext;
use crate::input::swapper::ControlSchemeSwapper;
use crate::label::{IconLabelBuilder, LabelText};
use crate::ui::{LabelRow, PromptPreviewUI};
use chrono::Local;
use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    setup()?;

    let config_path = Config::default_path()?;
    let config = Config::load_or_create(&config_path)?;

    let monitor = match GamepadMonitor::create(config.monitor_settings()) {
        Ok(monitor) => Some(monitor),
        Err(e) => {
            warn!("Continuing without gamepad support: {}", e);
            None
        }
    };

    let capabilities = config.capabilities(monitor.is_some());
    info!("Platform capabilities: {:?}", capabilities);
    let context = InputModeContext::new(capabilities);
    let swapper = ControlSchemeSwapper::attach(Rc::clone(&context));

    let none: Vec<ControllerDescriptor> = Vec::new();
    let controllers: &dyn ConnectedControllers = match monitor.as_ref() {
        Some(monitor) => monitor as &dyn ConnectedControllers,
        None => &none,
    };
    GamepadSpriteRepository::install(
        &context,
        config.repository_settings(),
        config.vendor_sheets()?,
        controllers,
        Local::now(),
    )?;

    let bindings: Rc<dyn ActionBindings> = Rc::new(config.action_map());
    let mut rows = Vec::with_capacity(config.labels.len());
    for label_config in &config.labels {
        let text = Rc::new(RefCell::new(LabelText::new(&label_config.template)));
        let label = IconLabelBuilder::new()
            .action(&label_config.action)
            .bindings(Rc::clone(&bindings))
            .target(text.clone())
            .build()?;
        match label.attach(&context) {
            Ok(label) => rows.push(LabelRow::new(label, text)),
            Err(e) => error!("Skipping label '{}': {}", label_config.template, e),
        }
    }
    info!("{} labels bound", rows.len());

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default()
        .with_title("controlprompt")
        .with_inner_size([720.0, 520.0]);

    eframe::run_native(
        "controlprompt",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(PromptPreviewUI::new(
                cc, context, swapper, monitor, rows,
            )))
        }),
    )
    .map_err(|e| eyre!("Preview window failed: {}", e))
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
