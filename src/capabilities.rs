use crate::config::{AppConfig, BuildProfile};
use crate::error::{ShellError, ShellResult};
use crate::updates;
#[cfg(any(debug_assertions, feature = "devtools"))]
use crate::window::WindowHost;
use std::fmt;
use tauri::{async_runtime, AppHandle, Runtime};

/// Optional startup hooks that must never block window acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Opens the webview inspector on the shell window.
    Devtools,
    /// Checks for a newer release and installs it.
    AutoUpdate,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Devtools => write!(f, "devtools"),
            Capability::AutoUpdate => write!(f, "auto-update"),
        }
    }
}

/// Capabilities selected once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityPlan {
    enabled: Vec<Capability>,
    disabled: Vec<Capability>,
}

impl CapabilityPlan {
    /// Devtools in development builds; auto-update in production unless disabled in config.
    pub fn for_profile(profile: BuildProfile, config: &AppConfig) -> Self {
        let mut plan = Self {
            enabled: Vec::new(),
            disabled: Vec::new(),
        };
        match profile {
            BuildProfile::Development => {
                plan.enabled.push(Capability::Devtools);
                plan.disabled.push(Capability::AutoUpdate);
            }
            BuildProfile::Production => {
                plan.disabled.push(Capability::Devtools);
                if config.auto_update {
                    plan.enabled.push(Capability::AutoUpdate);
                } else {
                    plan.disabled.push(Capability::AutoUpdate);
                }
            }
        }
        plan
    }

    /// One line naming what runs and what was skipped.
    pub fn summary(&self) -> String {
        let names = |caps: &[Capability]| {
            if caps.is_empty() {
                "none".to_string()
            } else {
                caps.iter()
                    .map(Capability::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        };
        format!(
            "enabled: {}; disabled: {}",
            names(&self.enabled),
            names(&self.disabled)
        )
    }

    #[cfg(test)]
    fn capabilities(&self) -> &[Capability] {
        &self.enabled
    }

    /// Runs every capability as its own task, logging failures.
    pub fn spawn_all<R: Runtime>(&self, app: &AppHandle<R>) {
        for capability in self.enabled.iter().copied() {
            let app = app.clone();
            async_runtime::spawn(async move {
                match run_capability(&app, capability).await {
                    Ok(()) => log::info!("Capability '{}' completed", capability),
                    Err(e) => log::error!("Capability '{}' failed: {}", capability, e),
                }
            });
        }
    }
}

async fn run_capability<R: Runtime>(app: &AppHandle<R>, capability: Capability) -> ShellResult<()> {
    match capability {
        Capability::Devtools => open_devtools(app),
        Capability::AutoUpdate => updates::check_for_updates_and_notify(app).await,
    }
}

#[cfg(any(debug_assertions, feature = "devtools"))]
fn open_devtools<R: Runtime>(app: &AppHandle<R>) -> ShellResult<()> {
    let window = app
        .first_live_window()
        .ok_or(ShellError::WindowUnavailable)?;
    window.open_devtools();
    log::debug!("Opened devtools for '{}'", window.label());
    Ok(())
}

#[cfg(not(any(debug_assertions, feature = "devtools")))]
fn open_devtools<R: Runtime>(_app: &AppHandle<R>) -> ShellResult<()> {
    Err(ShellError::DevtoolsUnavailable)
}
