use crate::error::{ShellError, ShellResult};
use crate::runtime::{self, ViewFactory};
use crate::window::{focus_or_restore, FocusTarget, WindowHost};
use tauri::{AppHandle, Runtime, WebviewWindow};

/// Returns a focused, un-minimized window, reusing a live one when possible.
///
/// Only when the host has no live window is the factory asked for a new view.
/// Failures from the factory are returned unchanged; a view with no reachable
/// window yields [`ShellError::WindowUnavailable`]. Concurrent calls are not
/// deduplicated.
pub async fn acquire_window<H, F>(host: &H, factory: &F) -> ShellResult<H::Window>
where
    H: WindowHost,
    F: ViewFactory<Window = H::Window>,
    H::Window: FocusTarget,
{
    if let Some(window) = host.first_live_window() {
        log::debug!("Reusing live window");
        focus_or_restore(&window);
        return Ok(window);
    }

    let view = factory.create_view().await?;
    let label = view.label.clone();
    match view.into_window() {
        Some(window) => {
            log::debug!("View '{}' provided a window", label);
            focus_or_restore(&window);
            Ok(window)
        }
        None => Err(ShellError::WindowUnavailable),
    }
}

/// Acquires the main window using the app's live windows and current runtime.
pub async fn acquire_main_window<R: Runtime>(app: &AppHandle<R>) -> ShellResult<WebviewWindow<R>> {
    let runtime = runtime::get_runtime(app);
    acquire_window(app, runtime.as_ref()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{RuntimeState, View, ViewParent};
    use crate::window::tests::FakeWindow;
    use crate::window::MAIN_WINDOW_LABEL;
    use tauri::test::{mock_app, MockRuntime};
    use tauri::Manager;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeHost {
        windows: Vec<FakeWindow>,
    }

    impl WindowHost for FakeHost {
        type Window = FakeWindow;

        fn first_live_window(&self) -> Option<FakeWindow> {
            self.windows.first().cloned()
        }
    }

    enum Outcome {
        Attached(FakeWindow),
        NoParent,
        ParentWithoutWindow,
        Fail(&'static str),
    }

    struct FakeFactory {
        outcome: Mutex<Option<Outcome>>,
        calls: AtomicUsize,
    }

    impl FakeFactory {
        fn new(outcome: Outcome) -> Self {
            Self {
                outcome: Mutex::new(Some(outcome)),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ViewFactory for FakeFactory {
        type Window = FakeWindow;

        async fn create_view(&self) -> ShellResult<View<FakeWindow>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let outcome = self
                .outcome
                .lock()
                .expect("factory lock poisoned")
                .take()
                .expect("factory called more than once");
            match outcome {
                Outcome::Attached(window) => Ok(View::attached("main", window)),
                Outcome::NoParent => Ok(View {
                    label: "main".to_string(),
                    parent: None,
                }),
                Outcome::ParentWithoutWindow => Ok(View {
                    label: "main".to_string(),
                    parent: Some(ViewParent { window: None }),
                }),
                Outcome::Fail(reason) => Err(ShellError::ViewCreation(reason.to_string())),
            }
        }
    }

    fn run<T>(future: impl std::future::Future<Output = T>) -> T {
        tauri::async_runtime::block_on(future)
    }

    /// An existing window is reused and no view is requested.
    #[test]
    fn reuses_live_window_without_creating_view() {
        let existing = FakeWindow::new("existing", true, false);
        let host = FakeHost {
            windows: vec![existing.clone()],
        };
        let factory = FakeFactory::new(Outcome::Fail("should not be called"));

        let window = run(acquire_window(&host, &factory)).expect("acquisition should succeed");

        assert_eq!(window.id, "existing");
        assert_eq!(factory.calls(), 0);
        let state = existing.snapshot();
        assert!(state.focused);
        assert!(!state.minimized);
    }

    /// The first of several live windows is the one focused.
    #[test]
    fn picks_first_live_window() {
        let first = FakeWindow::new("first", false, false);
        let second = FakeWindow::new("second", false, false);
        let host = FakeHost {
            windows: vec![first.clone(), second.clone()],
        };
        let factory = FakeFactory::new(Outcome::Fail("should not be called"));

        let window = run(acquire_window(&host, &factory)).expect("acquisition should succeed");

        assert_eq!(window.id, "first");
        assert!(first.snapshot().focused);
        assert!(!second.snapshot().focused);
    }

    /// Without a live window, the window reached through the new view is returned focused.
    #[test]
    fn creates_view_when_no_window_exists() {
        let created = FakeWindow::new("created", true, false);
        let host = FakeHost { windows: vec![] };
        let factory = FakeFactory::new(Outcome::Attached(created.clone()));

        let window = run(acquire_window(&host, &factory)).expect("acquisition should succeed");

        assert_eq!(window.id, "created");
        assert_eq!(factory.calls(), 1);
        let state = created.snapshot();
        assert!(state.focused);
        assert!(!state.minimized);
        assert_eq!(state.calls, vec!["restore", "focus"]);
    }

    #[test]
    fn view_without_parent_is_unavailable() {
        let host = FakeHost { windows: vec![] };
        let factory = FakeFactory::new(Outcome::NoParent);

        let err = run(acquire_window(&host, &factory)).expect_err("acquisition should fail");

        assert!(matches!(err, ShellError::WindowUnavailable));
        assert_eq!(err.to_string(), "Window could not be created or restored");
    }

    #[test]
    fn parent_without_window_is_unavailable() {
        let host = FakeHost { windows: vec![] };
        let factory = FakeFactory::new(Outcome::ParentWithoutWindow);

        let err = run(acquire_window(&host, &factory)).expect_err("acquisition should fail");

        assert!(matches!(err, ShellError::WindowUnavailable));
    }

    /// View creation errors reach the caller unchanged.
    #[test]
    fn view_creation_failure_is_passed_through() {
        let host = FakeHost { windows: vec![] };
        let factory = FakeFactory::new(Outcome::Fail("webview label already exists"));

        let err = run(acquire_window(&host, &factory)).expect_err("acquisition should fail");

        match err {
            ShellError::ViewCreation(reason) => assert_eq!(reason, "webview label already exists"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// Through the app handle, the first call builds the main window and the
    /// second finds it again instead of building a duplicate.
    #[test]
    fn acquire_main_window_creates_then_reuses() {
        let app = mock_app();
        app.manage(RuntimeState::<MockRuntime>::default());

        let first = run(acquire_main_window(app.handle())).expect("first acquisition");
        let second = run(acquire_main_window(app.handle())).expect("second acquisition");

        assert_eq!(first.label(), MAIN_WINDOW_LABEL);
        assert_eq!(second.label(), MAIN_WINDOW_LABEL);
        assert_eq!(app.webview_windows().len(), 1);
    }
}
