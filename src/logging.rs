use crate::config::BuildProfile;
use log::LevelFilter;
use tauri_plugin_log::{Target, TargetKind, TimezoneStrategy};

const LOG_FILE_NAME: &str = "solo-shell";

/// Default level for a profile when the config does not override it.
fn default_level(profile: BuildProfile) -> LevelFilter {
    if profile.is_development() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Builds the log plugin for the given profile.
///
/// Development logs go to stdout and the webview console; production logs go to
/// the platform log directory and stdout.
pub fn get_builder(profile: BuildProfile, level: Option<LevelFilter>) -> tauri_plugin_log::Builder {
    let mut builder = tauri_plugin_log::Builder::new()
        .clear_targets()
        .timezone_strategy(TimezoneStrategy::UseLocal)
        .level(level.unwrap_or_else(|| default_level(profile)))
        .format(|out, message, record| {
            // 2026-01-02 10:30:45.123 INFO [solo_shell_lib::acquire] message
            out.finish(format_args!(
                "{} {} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        });

    if profile.is_development() {
        builder = builder
            .target(Target::new(TargetKind::Stdout))
            .target(Target::new(TargetKind::Webview));
    } else {
        builder = builder
            .target(Target::new(TargetKind::LogDir {
                file_name: Some(LOG_FILE_NAME.to_string()),
            }))
            .target(Target::new(TargetKind::Stdout));
    }

    builder
}
