mod acquire;
mod capabilities;
mod config;
mod error;
mod lifecycle;
mod logging;
mod origin_policy;
mod platform;
mod runtime;
mod updates;
mod window;

use capabilities::CapabilityPlan;
use config::{BuildProfile, ConfigState};
use runtime::RuntimeState;
use std::sync::Mutex;
use tauri::Manager;
use updates::PendingUpdate;

/// Runs the Tauri application entry point.
///
/// The single-instance plugin is registered first: a second launch exits with
/// code 0 before anything else is set up and wakes the running instance instead.
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    platform::disable_hardware_acceleration();

    let profile = BuildProfile::detect();
    let (initial_config, config_source) = config::load_initial_config();
    let plan = CapabilityPlan::for_profile(profile, &initial_config);
    let log_level = initial_config.log_level_filter();

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, args, cwd| {
            lifecycle::on_second_instance(app, args, cwd);
        }))
        .plugin(logging::get_builder(profile, log_level).build())
        .plugin(tauri_plugin_notification::init())
        .manage(ConfigState(Mutex::new(initial_config)))
        .manage(RuntimeState::<tauri::Wry>::default())
        .manage(PendingUpdate::default())
        .setup(move |app| {
            log::info!(
                "Starting {} in {:?} profile with hardware acceleration disabled",
                app.package_info().version,
                profile
            );
            config_source.log();
            log::info!("Startup capabilities: {}", plan.summary());
            lifecycle::on_ready(app.handle(), plan);
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app, event| lifecycle::handle_run_event(app, event));
}
