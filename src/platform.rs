//! Platform conventions that are fixed at startup.

use std::env;

#[cfg(target_os = "windows")]
const WEBVIEW2_ARGS_ENV: &str = "WEBVIEW2_ADDITIONAL_BROWSER_ARGUMENTS";
#[cfg(target_os = "linux")]
const WEBKIT_COMPOSITING_ENV: &str = "WEBKIT_DISABLE_COMPOSITING_MODE";

const DISABLE_GPU_FLAG: &str = "--disable-gpu";

/// Appends `--disable-gpu` to an existing browser argument string unless already present.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn with_disable_gpu(existing: Option<&str>) -> String {
    match existing.map(str::trim).filter(|args| !args.is_empty()) {
        Some(args) if args.split_whitespace().any(|arg| arg == DISABLE_GPU_FLAG) => {
            args.to_string()
        }
        Some(args) => format!("{} {}", args, DISABLE_GPU_FLAG),
        None => DISABLE_GPU_FLAG.to_string(),
    }
}

/// Turns off GPU acceleration in the platform webview.
///
/// Must run before the Tauri builder creates any webview. macOS exposes no
/// switch for WKWebView, so this is a no-op there.
pub fn disable_hardware_acceleration() {
    #[cfg(target_os = "windows")]
    {
        let args = with_disable_gpu(env::var(WEBVIEW2_ARGS_ENV).ok().as_deref());
        env::set_var(WEBVIEW2_ARGS_ENV, args);
    }

    #[cfg(target_os = "linux")]
    env::set_var(WEBKIT_COMPOSITING_ENV, "1");
}

/// Whether the app stays resident once its last window closes.
///
/// macOS apps keep running in the dock; everywhere else the process exits.
pub fn stays_resident_without_windows(os: &str) -> bool {
    os == "macos"
}

/// Resident policy for the platform this binary was built for.
pub fn current_stays_resident_without_windows() -> bool {
    stays_resident_without_windows(env::consts::OS)
}
