use thiserror::Error;

/// Failures surfaced by window acquisition and the best-effort startup capabilities.
#[derive(Debug, Error)]
pub enum ShellError {
    /// A view was created but no window could be reached from it.
    #[error("Window could not be created or restored")]
    WindowUnavailable,

    /// The runtime failed to build a view.
    #[error("Failed to create view: {0}")]
    ViewCreation(String),

    /// The build was compiled without the webview inspector.
    #[error("Devtools are not available in this build")]
    #[cfg_attr(any(debug_assertions, feature = "devtools"), allow(dead_code))]
    DevtoolsUnavailable,

    #[error(transparent)]
    Tauri(#[from] tauri::Error),

    #[error(transparent)]
    Updater(#[from] tauri_plugin_updater::Error),
}

pub type ShellResult<T> = Result<T, ShellError>;
