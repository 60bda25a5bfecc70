use crate::config::{ConfigState, WindowSettings};
use crate::error::{ShellError, ShellResult};
use crate::origin_policy::AppOrigins;
use crate::window::MAIN_WINDOW_LABEL;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tauri::{AppHandle, Manager, Runtime, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Owner of a created view; may or may not reference a window.
#[derive(Debug, Clone)]
pub struct ViewParent<W> {
    pub window: Option<W>,
}

/// A view produced by the runtime.
#[derive(Debug, Clone)]
pub struct View<W> {
    pub label: String,
    pub parent: Option<ViewParent<W>>,
}

impl<W> View<W> {
    /// Creates a view whose parent holds `window`.
    pub fn attached(label: impl Into<String>, window: W) -> Self {
        Self {
            label: label.into(),
            parent: Some(ViewParent {
                window: Some(window),
            }),
        }
    }

    /// Consumes the view and returns the window reachable through its parent.
    pub fn into_window(self) -> Option<W> {
        self.parent.and_then(|parent| parent.window)
    }
}

/// Something that can build a new view.
pub trait ViewFactory {
    type Window;

    fn create_view(&self) -> impl Future<Output = ShellResult<View<Self::Window>>> + Send;
}

/// Creates the shell's views and windows.
pub struct ShellRuntime<R: Runtime> {
    app: AppHandle<R>,
    settings: WindowSettings,
    origins: AppOrigins,
    generation: u64,
}

impl<R: Runtime> ShellRuntime<R> {
    pub fn new(app: AppHandle<R>, settings: WindowSettings) -> Self {
        let origins = AppOrigins::new(app.config().build.dev_url.clone());
        Self {
            app,
            settings,
            origins,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Identifies this instance among all runtimes created by the process.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<R: Runtime> ViewFactory for ShellRuntime<R> {
    type Window = WebviewWindow<R>;

    async fn create_view(&self) -> ShellResult<View<WebviewWindow<R>>> {
        log::info!(
            "Runtime {} creating main window '{}'",
            self.generation,
            self.settings.title
        );
        let origins = self.origins.clone();
        let window =
            WebviewWindowBuilder::new(&self.app, MAIN_WINDOW_LABEL, WebviewUrl::default())
                .title(&self.settings.title)
                .inner_size(self.settings.width, self.settings.height)
                .min_inner_size(self.settings.min_width, self.settings.min_height)
                .on_navigation(move |target| {
                    let allowed = origins.allows(target);
                    if !allowed {
                        log::warn!("Blocked navigation to {}", target);
                    }
                    allowed
                })
                .build()
                .map_err(|e| ShellError::ViewCreation(e.to_string()))?;
        Ok(View::attached(MAIN_WINDOW_LABEL, window))
    }
}

/// Single owned cell holding the current runtime.
///
/// `get_or_init` memoizes; `reset` is the only way to replace the instance.
pub struct RuntimeSlot<T> {
    current: Mutex<Option<Arc<T>>>,
}

impl<T> Default for RuntimeSlot<T> {
    fn default() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }
}

impl<T> RuntimeSlot<T> {
    fn lock(&self) -> MutexGuard<'_, Option<Arc<T>>> {
        match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::error!("Runtime slot lock poisoned, recovering: {}", poisoned);
                poisoned.into_inner()
            }
        }
    }

    /// Returns the cached instance, constructing it on first use.
    pub fn get_or_init(&self, init: impl FnOnce() -> T) -> Arc<T> {
        let mut current = self.lock();
        current.get_or_insert_with(|| Arc::new(init())).clone()
    }

    /// Replaces the cached instance, returning the previous one.
    pub fn reset(&self, fresh: T) -> (Arc<T>, Option<Arc<T>>) {
        let fresh = Arc::new(fresh);
        let previous = self.lock().replace(fresh.clone());
        (fresh, previous)
    }
}

/// Managed state holding the process-wide runtime.
pub type RuntimeState<R> = RuntimeSlot<ShellRuntime<R>>;

fn window_settings<R: Runtime>(app: &AppHandle<R>) -> WindowSettings {
    match app.try_state::<ConfigState>() {
        Some(state) => match state.0.lock() {
            Ok(config) => config.window.clone(),
            Err(e) => {
                log::error!("Failed to access configuration state: {}", e);
                WindowSettings::default()
            }
        },
        None => WindowSettings::default(),
    }
}

/// Fetches the runtime, creating it on first use.
pub fn get_runtime<R: Runtime>(app: &AppHandle<R>) -> Arc<ShellRuntime<R>> {
    let slot = app.state::<RuntimeState<R>>();
    slot.get_or_init(|| ShellRuntime::new(app.clone(), window_settings(app)))
}

/// Discards the current runtime and installs a fresh one.
pub fn reset_runtime<R: Runtime>(app: &AppHandle<R>) -> Arc<ShellRuntime<R>> {
    let slot = app.state::<RuntimeState<R>>();
    let (fresh, previous) = slot.reset(ShellRuntime::new(app.clone(), window_settings(app)));
    match previous {
        Some(previous) => log::info!(
            "Replaced runtime {} with runtime {}",
            previous.generation(),
            fresh.generation()
        ),
        None => log::info!("Initialized runtime {}", fresh.generation()),
    }
    fresh
}
