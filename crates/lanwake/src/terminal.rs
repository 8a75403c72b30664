//! Terminal front-end for the dashboard: a `Renderer` that follows scans
//! and status changes, and a `Notifier` backed by stderr and dialoguer.
//!
//! One-shot commands print their own result once the operation returns,
//! so the renderer stays silent until a command switches it to live mode.

use std::collections::HashMap;
use std::io::{self, IsTerminal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, warn};

use lanwake_core::{
    DeviceForm, DeviceId, DeviceStatus, DiscoverySession, ManagedDevice, Notice, Notifier,
    Renderer,
};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::output;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Renderer ────────────────────────────────────────────────────────

pub struct TerminalRenderer {
    format: OutputFormat,
    color: bool,
    quiet: bool,
    live: AtomicBool,
    names: Mutex<HashMap<DeviceId, String>>,
    shown: Mutex<IndexMap<DeviceId, DeviceStatus>>,
    spinner: Mutex<Option<ProgressBar>>,
}

/// One line of `status --watch` output in structured formats.
#[derive(Serialize)]
struct StatusChange<'a> {
    id: &'a DeviceId,
    name: &'a str,
    status: &'a DeviceStatus,
}

impl TerminalRenderer {
    pub fn new(global: &GlobalOpts) -> Self {
        Self {
            format: global.output,
            color: output::should_color(global.color),
            quiet: global.quiet,
            live: AtomicBool::new(false),
            names: Mutex::new(HashMap::new()),
            shown: Mutex::new(IndexMap::new()),
            spinner: Mutex::new(None),
        }
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Start or stop following updates as they arrive.
    pub fn set_live(&self, live: bool) {
        self.live.store(live, Ordering::Relaxed);
        if !live {
            if let Some(spinner) = lock(&self.spinner).take() {
                spinner.finish_and_clear();
            }
        }
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::Relaxed)
    }

    fn spin(&self, message: String) {
        let mut slot = lock(&self.spinner);
        let spinner = slot.get_or_insert_with(|| {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
                spinner.set_style(style);
            }
            spinner.enable_steady_tick(Duration::from_millis(80));
            spinner
        });
        spinner.set_message(message);
    }

    fn print_change(&self, id: &DeviceId, status: &DeviceStatus) {
        let names = lock(&self.names);
        let name = names.get(id).map_or(id.as_str(), String::as_str);

        let line = match self.format {
            OutputFormat::Table | OutputFormat::Plain => {
                let label = output::status_label(status, self.color);
                Ok(format!("{name}  {label}"))
            }
            format => output::render_single(
                format,
                &StatusChange { id, name, status },
                |_| String::new(),
                |_| String::new(),
            ),
        };
        match line {
            Ok(line) => output::print_output(&line, self.quiet),
            Err(e) => warn!(error = %e, "could not render status change"),
        }
    }
}

impl Renderer for TerminalRenderer {
    fn render_device_list(&self, devices: &[ManagedDevice]) {
        *lock(&self.names) = devices
            .iter()
            .map(|d| (d.id.clone(), d.name.clone()))
            .collect();
    }

    fn render_discovery(&self, session: &DiscoverySession) {
        if !self.is_live() || self.quiet {
            return;
        }
        if session.active {
            self.spin(format!(
                "Scanning network... {} found, {} new",
                session.count,
                session.new_device_count()
            ));
        } else if let Some(spinner) = lock(&self.spinner).take() {
            spinner.finish_and_clear();
        }
    }

    fn render_status(&self, indicators: &IndexMap<DeviceId, DeviceStatus>) {
        if !self.is_live() {
            *lock(&self.shown) = indicators.clone();
            return;
        }

        let mut changed = Vec::new();
        {
            let mut shown = lock(&self.shown);
            for (id, status) in indicators {
                if shown.get(id) != Some(status) {
                    shown.insert(id.clone(), status.clone());
                    changed.push((id.clone(), status.clone()));
                }
            }
        }
        debug!(changed = changed.len(), "status update");
        for (id, status) in &changed {
            self.print_change(id, status);
        }
    }

    fn clear_discovered(&self) {
        if let Some(spinner) = lock(&self.spinner).take() {
            spinner.finish_and_clear();
        }
    }

    fn open_import_form(&self, form: &DeviceForm) {
        if !self.quiet {
            eprintln!("Importing {} ({}, {})", form.name, form.mac, form.ip);
        }
    }
}

// ── Notifier ────────────────────────────────────────────────────────

pub struct TerminalNotifier {
    yes: bool,
    quiet: bool,
    color: bool,
    interactive: bool,
    declined_unprompted: AtomicBool,
}

impl TerminalNotifier {
    pub fn new(global: &GlobalOpts) -> Self {
        Self {
            yes: global.yes,
            quiet: global.quiet,
            color: output::should_color(global.color),
            interactive: io::stdin().is_terminal() && io::stderr().is_terminal(),
            declined_unprompted: AtomicBool::new(false),
        }
    }

    /// A confirmation was refused because nobody could be asked.
    pub fn declined_unprompted(&self) -> bool {
        self.declined_unprompted.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Notifier for TerminalNotifier {
    async fn notify(&self, notice: Notice) {
        match notice {
            Notice::Error(message) => {
                if self.color {
                    eprintln!("{} {message}", "✗".red());
                } else {
                    eprintln!("✗ {message}");
                }
            }
            Notice::Success(message) if !self.quiet => {
                if self.color {
                    eprintln!("{} {message}", "✓".green());
                } else {
                    eprintln!("✓ {message}");
                }
            }
            Notice::Info(message) if !self.quiet => eprintln!("{message}"),
            Notice::Success(_) | Notice::Info(_) => {}
        }
    }

    async fn confirm(&self, prompt: &str) -> bool {
        if self.yes {
            return true;
        }
        if !self.interactive {
            self.declined_unprompted.store(true, Ordering::Relaxed);
            return false;
        }

        let prompt = prompt.to_owned();
        let answer = tokio::task::spawn_blocking(move || {
            dialoguer::Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()
        })
        .await;

        match answer {
            Ok(Ok(confirmed)) => confirmed,
            Ok(Err(e)) => {
                warn!(error = %e, "confirmation prompt failed");
                false
            }
            Err(e) => {
                warn!(error = %e, "confirmation prompt task failed");
                false
            }
        }
    }
}
