use crate::error::ShellResult;
use std::sync::{Mutex, MutexGuard};
use tauri::{AppHandle, Manager, Runtime};
use tauri_plugin_notification::NotificationExt;
use tauri_plugin_updater::{Update, UpdaterExt};

/// A downloaded update waiting for the app to exit.
pub struct StagedUpdate {
    pub update: Update,
    pub bytes: Vec<u8>,
}

/// Holds at most one payload until it is taken for installation.
pub struct PendingInstall<T> {
    staged: Mutex<Option<T>>,
}

impl<T> Default for PendingInstall<T> {
    fn default() -> Self {
        Self {
            staged: Mutex::new(None),
        }
    }
}

impl<T> PendingInstall<T> {
    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        match self.staged.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::error!("Pending update lock poisoned, recovering: {}", poisoned);
                poisoned.into_inner()
            }
        }
    }

    /// Stages a payload, returning the one it replaced.
    pub fn stage(&self, payload: T) -> Option<T> {
        self.lock().replace(payload)
    }

    /// Removes the staged payload; later calls return `None`.
    pub fn take(&self) -> Option<T> {
        self.lock().take()
    }
}

pub type PendingUpdate = PendingInstall<StagedUpdate>;

/// Checks for a newer release, downloads it and tells the user it will be
/// applied when the app quits.
///
/// Installation is deferred to [`install_staged_update`]: on Windows the
/// installer terminates the running process.
pub async fn check_for_updates_and_notify<R: Runtime>(app: &AppHandle<R>) -> ShellResult<()> {
    app.plugin(tauri_plugin_updater::Builder::new().build())?;

    let current_version = app.package_info().version.to_string();
    log::info!("Checking for updates (current version {})", current_version);
    let Some(update) = app.updater()?.check().await? else {
        log::info!("No update available");
        return Ok(());
    };

    let new_version = update.version.clone();
    log::info!("Downloading update {}", new_version);
    let bytes = update.download(|_, _| {}, || {}).await?;
    log::info!("Update {} downloaded ({} bytes)", new_version, bytes.len());

    if let Some(replaced) = app
        .state::<PendingUpdate>()
        .stage(StagedUpdate { update, bytes })
    {
        log::info!("Discarded previously staged update {}", replaced.update.version);
    }

    if let Err(e) = app
        .notification()
        .builder()
        .title("Update available")
        .body(format!(
            "Version {} has been downloaded and will be installed when you quit.",
            new_version
        ))
        .show()
    {
        log::warn!("Failed to show update notification: {}", e);
    }
    Ok(())
}

/// Installs a staged update, if any. Called once the app is exiting.
pub fn install_staged_update<R: Runtime>(app: &AppHandle<R>) {
    let Some(pending) = app.try_state::<PendingUpdate>() else {
        return;
    };
    let Some(staged) = pending.take() else {
        return;
    };

    log::info!("Installing update {} on exit", staged.update.version);
    match staged.update.install(&staged.bytes) {
        Ok(()) => log::info!("Update {} installed", staged.update.version),
        Err(e) => log::error!("Failed to install update {}: {}", staged.update.version, e),
    }
}
