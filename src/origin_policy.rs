use url::Url;

/// Origins the shell window may navigate to.
///
/// Covers the bundled frontend on every platform plus the dev server, if one
/// is configured. Anything else is refused by the window's navigation handler.
#[derive(Debug, Clone)]
pub struct AppOrigins {
    allowed: Vec<Url>,
}

/// Bundled-asset origins: `tauri://localhost` on macOS/Linux, `tauri.localhost` on Windows.
const BUNDLED_ORIGINS: [&str; 3] = [
    "tauri://localhost",
    "http://tauri.localhost",
    "https://tauri.localhost",
];

fn same_origin(left: &Url, right: &Url) -> bool {
    left.scheme() == right.scheme()
        && left.host_str() == right.host_str()
        && left.port_or_known_default() == right.port_or_known_default()
}

impl AppOrigins {
    pub fn new(dev_url: Option<Url>) -> Self {
        let mut allowed: Vec<Url> = BUNDLED_ORIGINS
            .iter()
            .filter_map(|origin| Url::parse(origin).ok())
            .collect();
        allowed.extend(dev_url);
        Self { allowed }
    }

    /// Whether a navigation to `target` stays inside the app.
    pub fn allows(&self, target: &Url) -> bool {
        if target.scheme() == "about" && target.path() == "blank" {
            return true;
        }
        self.allowed.iter().any(|origin| same_origin(origin, target))
    }
}
