use fantoccini::{Client, ClientBuilder};
use log::{info, warn};
use serde::Deserialize;
use serde_json::json;

use crate::modules::devices;

/// Errors here cross task boundaries in the web app, hence the bounds.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub const BROWSERS: &[&str] = &["chrome", "edge", "explorer", "firefox"];

/// Browsers the stack can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserKind {
    Chrome,
    Edge,
    Explorer,
    Firefox,
}

impl BrowserKind {
    /// Parse a browser name; unknown names fall back to Chrome.
    pub fn from_name(name: &str) -> Self {
        match name {
            "chrome" => Self::Chrome,
            "edge" => Self::Edge,
            "explorer" => Self::Explorer,
            "firefox" => Self::Firefox,
            other => {
                warn!("Invalid browser '{other}' provided.");
                info!("Should be one of {BROWSERS:?}.");
                info!("Launching browser using Chrome instead...");
                Self::Chrome
            }
        }
    }

    /// WebDriver `browserName` capability value.
    pub fn capability(self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Edge => "MicrosoftEdge",
            Self::Explorer => "internet explorer",
            Self::Firefox => "firefox",
        }
    }
}

/// How the session window is sized after launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    Maximised,
    Sized { width: u32, height: u32 },
}

/// Raw fields of a start-session form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartForm {
    #[serde(default)]
    pub browser: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub breakpoint: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub url: String,
}

/// A start request resolved into concrete launch parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOptions {
    pub kind: BrowserKind,
    pub url: String,
    pub window: WindowMode,
}

impl StartOptions {
    /// Resolve form fields against the breakpoint table.
    ///
    /// A breakpoint wins over explicit sizes and pairs its width with
    /// `panel_height` (capped at 800). Blank height and width mean a
    /// maximised window. An empty url falls back to `fallback_url`, the
    /// application's own address. The device field only ever reaches the
    /// server as an annotation; the panel has already copied its viewport
    /// into height/width.
    pub fn resolve(
        form: &StartForm,
        fallback_url: &str,
        panel_height: u32,
    ) -> Result<Self, BoxError> {
        let kind = BrowserKind::from_name(&form.browser);
        let url = if form.url.is_empty() {
            fallback_url.to_string()
        } else {
            form.url.clone()
        };

        let window = if !form.breakpoint.is_empty() {
            let bp = devices::breakpoint(&form.breakpoint)
                .ok_or_else(|| format!("unknown breakpoint '{}'", form.breakpoint))?;
            WindowMode::Sized {
                width: bp.width,
                height: panel_height.min(800),
            }
        } else if form.height.is_empty() && form.width.is_empty() {
            WindowMode::Maximised
        } else {
            WindowMode::Sized {
                width: form.width.parse()?,
                height: form.height.parse()?,
            }
        };

        Ok(Self { kind, url, window })
    }
}

/// Holds at most one live WebDriver session.
pub struct BrowserStack {
    webdriver_url: String,
    session: Option<Client>,
}

impl BrowserStack {
    pub fn new(webdriver_url: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            session: None,
        }
    }

    /// Launch a session for `options`, replacing any live one.
    pub async fn start(&mut self, options: StartOptions) -> Result<(), BoxError> {
        if self.session.is_some() {
            info!("Replacing live browser session.");
            self.stop().await?;
        }

        let mut caps = serde_json::map::Map::new();
        caps.insert("browserName".to_string(), json!(options.kind.capability()));

        let mut client = ClientBuilder::rustls()
            .capabilities(caps)
            .connect(&self.webdriver_url)
            .await?;

        match options.window {
            WindowMode::Maximised => client.maximize_window().await?,
            WindowMode::Sized { width, height } => client.set_window_size(width, height).await?,
        }
        client.goto(&options.url).await?;

        info!("Browser session started on {}.", options.url);
        self.session = Some(client);
        Ok(())
    }

    /// Close the live session, if any.
    pub async fn stop(&mut self) -> Result<(), BoxError> {
        match self.session.take() {
            Some(client) => {
                client.close().await?;
                info!("Browser session stopped.");
            }
            None => info!("No live browser session to stop."),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(browser: &str, breakpoint: &str, height: &str, width: &str) -> StartForm {
        StartForm {
            browser: browser.to_string(),
            breakpoint: breakpoint.to_string(),
            height: height.to_string(),
            width: width.to_string(),
            ..StartForm::default()
        }
    }

    #[test]
    fn unknown_browser_falls_back_to_chrome() {
        assert_eq!(BrowserKind::from_name("netscape"), BrowserKind::Chrome);
        assert_eq!(BrowserKind::from_name("firefox"), BrowserKind::Firefox);
    }

    #[test]
    fn breakpoint_fixes_width_and_uses_panel_height() {
        let options =
            StartOptions::resolve(&form("chrome", "tablet", "", ""), "http://app", 800).unwrap();
        assert_eq!(
            options.window,
            WindowMode::Sized { width: 768, height: 800 }
        );
    }

    #[test]
    fn breakpoint_height_is_capped() {
        let options =
            StartOptions::resolve(&form("chrome", "mobile", "", ""), "http://app", 2000).unwrap();
        assert_eq!(
            options.window,
            WindowMode::Sized { width: 480, height: 800 }
        );
    }

    #[test]
    fn breakpoint_wins_over_explicit_sizes() {
        let options = StartOptions::resolve(&form("edge", "desktop", "600", "800"), "x", 700)
            .unwrap();
        assert_eq!(
            options.window,
            WindowMode::Sized { width: 1536, height: 700 }
        );
        assert_eq!(options.kind, BrowserKind::Edge);
    }

    #[test]
    fn blank_sizes_mean_maximised() {
        let options = StartOptions::resolve(&form("firefox", "", "", ""), "x", 800).unwrap();
        assert_eq!(options.window, WindowMode::Maximised);
    }

    #[test]
    fn explicit_sizes_are_parsed() {
        let options = StartOptions::resolve(&form("chrome", "", "800", "600"), "x", 800).unwrap();
        assert_eq!(
            options.window,
            WindowMode::Sized { width: 600, height: 800 }
        );
    }

    #[test]
    fn non_numeric_size_is_an_error() {
        assert!(StartOptions::resolve(&form("chrome", "", "tall", "600"), "x", 800).is_err());
        assert!(StartOptions::resolve(&form("chrome", "unknown-bp", "", ""), "x", 800).is_err());
    }

    #[test]
    fn empty_url_falls_back_to_the_app_address() {
        let options =
            StartOptions::resolve(&form("chrome", "", "", ""), "http://127.0.0.1:8080", 800)
                .unwrap();
        assert_eq!(options.url, "http://127.0.0.1:8080");

        let mut with_url = form("chrome", "", "", "");
        with_url.url = "https://example.com".to_string();
        let options = StartOptions::resolve(&with_url, "http://127.0.0.1:8080", 800).unwrap();
        assert_eq!(options.url, "https://example.com");
    }
}
