use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, InquireError, Text};
use log::info;
use weathernow_core::{
    Config, HeadlessMap, HttpBackend, MapSession, MemorySurface, Surface, UiEvent, WeatherWidget,
    config::BASE_URL_ENV, map::MAX_ZOOM,
};

use crate::report;

type TerminalWidget = WeatherWidget<MemorySurface, HeadlessMap>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathernow", version, about = "Current weather with a map overlay")]
pub struct Cli {
    /// Backend base URL; overrides the environment and the config file.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the backend base URL and the map zoom.
    Configure,

    /// Show the weather for one city.
    Check {
        /// City name.
        city: String,
    },

    /// Load the backend's default city, then prompt for cities until Esc.
    Run,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Check { city } => {
                let mut widget = build_widget(&config, self.base_url.as_deref())?;
                widget.surface_mut().set_input_value(&city);
                let outcome = widget.check().await;
                println!("{}", report::format(&widget, &outcome, chrono::Local::now()));
                Ok(())
            }
            Command::Run => {
                let mut widget = build_widget(&config, self.base_url.as_deref())?;
                if let Some(outcome) = widget.start().await {
                    println!("{}", report::format(&widget, &outcome, chrono::Local::now()));
                }
                prompt_loop(&mut widget).await
            }
        }
    }
}

fn build_widget(config: &Config, base_url: Option<&str>) -> anyhow::Result<TerminalWidget> {
    let env_value = std::env::var(BASE_URL_ENV).ok();
    let base = config.base_url(base_url, env_value.as_deref());
    if base.is_relative() {
        anyhow::bail!(
            "No backend base URL configured.\n\
             Hint: pass --base-url, set {BASE_URL_ENV}, or run `weathernow configure`."
        );
    }
    info!("using backend {}", base.as_str());

    let backend = Arc::new(HttpBackend::new(base));
    let map = MapSession::new(backend.clone(), Some(HeadlessMap::default())).with_zoom(config.zoom());
    let widget = WeatherWidget::new(backend, MemorySurface::full(), map)?;
    Ok(widget)
}

async fn prompt_loop(widget: &mut TerminalWidget) -> anyhow::Result<()> {
    loop {
        let city = match Text::new("City:").with_help_message("Enter to check, Esc to quit").prompt() {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => return Ok(()),
            Err(err) => return Err(err).context("Failed to read city"),
        };

        widget.surface_mut().set_input_value(&city);
        if let Some(outcome) = widget.handle(UiEvent::KeyDown("Enter".into())).await {
            println!("{}", report::format(widget, &outcome, chrono::Local::now()));
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let current = config.backend_base_url.clone().unwrap_or_default();
    let base_url = Text::new("Backend base URL:")
        .with_default(&current)
        .with_help_message("e.g. https://weather.example.com/api")
        .prompt()
        .context("Failed to read backend base URL")?;

    let zoom = CustomType::<u8>::new("Map zoom (0-19):")
        .with_default(config.zoom())
        .with_error_message("Please enter a number between 0 and 19")
        .prompt()
        .context("Failed to read map zoom")?;

    config.set_base_url(&base_url);
    config.map_zoom = Some(zoom.min(MAX_ZOOM));
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
