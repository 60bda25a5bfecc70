use tauri::{AppHandle, Manager, Runtime, WebviewWindow};

/// Label of the single window this shell manages.
pub const MAIN_WINDOW_LABEL: &str = "main";

/// Window operations needed to bring a window to the foreground.
pub trait FocusTarget {
    fn minimized(&self) -> bool;
    fn restore(&self);
    fn focus(&self);
}

/// Source of the live windows owned by the host.
pub trait WindowHost {
    type Window: FocusTarget;

    /// Returns the first window that has not been destroyed, if any.
    fn first_live_window(&self) -> Option<Self::Window>;
}

/// Un-minimizes the window if needed, then focuses it.
pub fn focus_or_restore<W: FocusTarget>(window: &W) {
    if window.minimized() {
        window.restore();
    }
    window.focus();
}

impl<R: Runtime> FocusTarget for WebviewWindow<R> {
    fn minimized(&self) -> bool {
        self.is_minimized().unwrap_or_else(|e| {
            log::warn!("Failed to query minimized state of '{}': {}", self.label(), e);
            false
        })
    }

    fn restore(&self) {
        if let Err(e) = self.unminimize() {
            log::warn!("Failed to restore window '{}': {}", self.label(), e);
        }
    }

    fn focus(&self) {
        if let Err(e) = self.show() {
            log::warn!("Failed to show window '{}': {}", self.label(), e);
        }
        if let Err(e) = self.set_focus() {
            log::warn!("Failed to focus window '{}': {}", self.label(), e);
        }
    }
}

impl<R: Runtime> WindowHost for AppHandle<R> {
    type Window = WebviewWindow<R>;

    /// Prefers the main window, then the window with the lowest label.
    ///
    /// Tauri drops windows from its registry once destroyed, so every entry is live.
    fn first_live_window(&self) -> Option<WebviewWindow<R>> {
        if let Some(window) = self.get_webview_window(MAIN_WINDOW_LABEL) {
            return Some(window);
        }
        self.webview_windows()
            .into_iter()
            .min_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, window)| window)
    }
}

/// Tells the user the shell is already running when a second launch could not
/// take focus.
///
/// Foregrounding is reliable on Windows and macOS, inconsistent on Linux.
#[cfg(target_os = "linux")]
pub fn notify_already_running<R: Runtime>(app: &AppHandle<R>) {
    use tauri_plugin_notification::Notification;

    let Some(notification) = app.try_state::<Notification<R>>() else {
        log::warn!("Notification plugin not registered, skipping already-running notice");
        return;
    };
    let title = app
        .config()
        .product_name
        .clone()
        .unwrap_or_else(|| "Solo Shell".to_string());
    if let Err(e) = notification
        .builder()
        .title("Already Running")
        .body(format!("{} is already active.", title))
        .show()
    {
        log::warn!("Failed to show already-running notification: {}", e);
    }
}
