use crate::acquire::acquire_main_window;
use crate::capabilities::CapabilityPlan;
use crate::platform;
use crate::runtime::reset_runtime;
use crate::updates;
use std::fmt;
use tauri::{async_runtime, AppHandle, ExitRequestApi, RunEvent, Runtime};

/// Host events that lead to a window acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Ready,
    #[cfg_attr(not(target_os = "macos"), allow(dead_code))]
    Activate,
    SecondInstance,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Ready => write!(f, "ready"),
            Trigger::Activate => write!(f, "activate"),
            Trigger::SecondInstance => write!(f, "second-instance"),
        }
    }
}

/// Acquires the main window, logging the outcome against the trigger.
async fn acquire_logged<R: Runtime>(app: &AppHandle<R>, trigger: Trigger) {
    match acquire_main_window(app).await {
        Ok(window) => log::info!("Window '{}' focused after {}", window.label(), trigger),
        Err(e) => log::error!("Failed to create window on {}: {}", trigger, e),
    }
}

/// Spawns an acquisition whose failure is logged.
pub fn spawn_acquisition<R: Runtime>(app: &AppHandle<R>, trigger: Trigger) {
    let app = app.clone();
    async_runtime::spawn(async move {
        acquire_logged(&app, trigger).await;
    });
}

/// Host finished initializing: fresh runtime, window, then optional capabilities.
pub fn on_ready<R: Runtime>(app: &AppHandle<R>, plan: CapabilityPlan) {
    reset_runtime(app);
    let app = app.clone();
    async_runtime::spawn(async move {
        acquire_logged(&app, Trigger::Ready).await;
        plan.spawn_all(&app);
    });
}

/// Dock icon reactivation.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub fn on_activate<R: Runtime>(app: &AppHandle<R>) {
    reset_runtime(app);
    spawn_acquisition(app, Trigger::Activate);
}

/// Another launch was attempted while this instance holds the lock.
pub fn on_second_instance<R: Runtime>(app: &AppHandle<R>, args: Vec<String>, cwd: String) {
    log::info!("Second instance launched from '{}' with args {:?}", cwd, args);

    #[cfg(target_os = "linux")]
    crate::window::notify_already_running(app);

    spawn_acquisition(app, Trigger::SecondInstance);
}

/// Exit decision once the last window has closed.
///
/// An exit request with a code was issued explicitly and is never blocked.
pub fn should_prevent_exit(code: Option<i32>, stays_resident: bool) -> bool {
    code.is_none() && stays_resident
}

/// All windows closed: quit, unless the platform keeps apps resident.
pub fn on_exit_requested(code: Option<i32>, api: &ExitRequestApi) {
    if should_prevent_exit(code, platform::current_stays_resident_without_windows()) {
        log::info!("All windows closed, staying resident");
        api.prevent_exit();
    } else {
        log::info!("Exiting (code {:?})", code);
    }
}

/// Routes host run-loop events to the lifecycle handlers.
pub fn handle_run_event<R: Runtime>(app: &AppHandle<R>, event: RunEvent) {
    match event {
        RunEvent::ExitRequested { code, api, .. } => on_exit_requested(code, &api),
        RunEvent::Exit => updates::install_staged_update(app),
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => on_activate(app),
        _ => {}
    }
}
