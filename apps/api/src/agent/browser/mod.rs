//! Browser capability: the only way the acquirer touches the web.
//!
//! Callers never hold the browser itself: `BrowserSession` owns it, launches
//! it lazily under a single-flight guard, and hands out isolated `Page`s.

pub mod http;

#[cfg(test)]
pub mod fixture;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("invalid selector '{0}'")]
    Selector(String),

    #[error("page has no loaded document")]
    NoDocument,

    #[error("page is closed")]
    PageClosed,

    #[error("element is not a link")]
    NotALink,

    #[error("browser session has been shut down")]
    SessionClosed,
}

// ────────────────────────────────────────────────────────────────────────────
// Capability traits
// ────────────────────────────────────────────────────────────────────────────

/// An isolated tab. Never shared between concurrent operations.
#[async_trait]
pub trait Page: Send + Sync {
    async fn goto(&mut self, url: &Url) -> Result<(), BrowserError>;

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>, BrowserError>;

    fn current_url(&self) -> Option<&Url>;

    async fn close(&mut self);

    async fn query(&self, selector: &str) -> Result<Option<ElementHandle>, BrowserError> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    /// Follows the element's `href`, resolved against the current page.
    async fn click(&mut self, element: &ElementHandle) -> Result<(), BrowserError> {
        let href = element.attr("href").ok_or(BrowserError::NotALink)?;
        let target = match self.current_url() {
            Some(base) => base.join(href),
            None => Url::parse(href),
        }
        .map_err(|e| BrowserError::Navigation {
            url: href.to_string(),
            message: e.to_string(),
        })?;
        self.goto(&target).await
    }

    /// Fixed settle delay. Not a readiness signal.
    async fn wait_for_timeout(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
pub trait Browser: Send + Sync {
    async fn new_page(&self) -> Result<Box<dyn Page>, BrowserError>;

    async fn close(&self);
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Arc<dyn Browser>, BrowserError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Element snapshots
// ────────────────────────────────────────────────────────────────────────────

/// Owned snapshot of a matched element. Sub-queries re-parse its outer HTML,
/// so handles stay valid after the page navigates or closes.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementHandle {
    outer_html: String,
    text: String,
    attrs: Vec<(String, String)>,
}

impl ElementHandle {
    fn from_element(element: ElementRef<'_>) -> Self {
        Self {
            outer_html: element.html(),
            text: normalize_text(element.text()),
            attrs: element
                .value()
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Visible text with whitespace runs collapsed.
    pub fn inner_text(&self) -> &str {
        &self.text
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn query(&self, selector: &str) -> Result<Option<ElementHandle>, BrowserError> {
        Ok(select_all(&self.outer_html, selector)?.into_iter().next())
    }
}

/// Runs a CSS selector over an HTML document or fragment.
pub fn select_all(html: &str, selector: &str) -> Result<Vec<ElementHandle>, BrowserError> {
    let sel = Selector::parse(selector).map_err(|e| BrowserError::Selector(format!("{selector}: {e}")))?;
    let document = Html::parse_document(html);
    Ok(document.select(&sel).map(ElementHandle::from_element).collect())
}

fn normalize_text<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

// ────────────────────────────────────────────────────────────────────────────
// Shared session
// ────────────────────────────────────────────────────────────────────────────

enum SessionState {
    Idle,
    Ready(Arc<dyn Browser>),
    Closed,
}

/// Process-wide browser session shared by concurrent turns.
///
/// The launch happens under the state lock, so concurrent first uses wait for
/// one launch instead of starting their own. A failed launch leaves the
/// session idle and the next caller retries.
pub struct BrowserSession {
    launcher: Arc<dyn BrowserLauncher>,
    state: Mutex<SessionState>,
}

impl BrowserSession {
    pub fn new(launcher: Arc<dyn BrowserLauncher>) -> Self {
        Self {
            launcher,
            state: Mutex::new(SessionState::Idle),
        }
    }

    async fn browser(&self) -> Result<Arc<dyn Browser>, BrowserError> {
        let mut state = self.state.lock().await;
        match &*state {
            SessionState::Ready(browser) => return Ok(Arc::clone(browser)),
            SessionState::Closed => return Err(BrowserError::SessionClosed),
            SessionState::Idle => {}
        }

        let browser = self.launcher.launch().await?;
        info!("Agent browser initialized");
        *state = SessionState::Ready(Arc::clone(&browser));
        Ok(browser)
    }

    /// Opens a fresh page, launching the browser on first use.
    pub async fn new_page(&self) -> Result<Box<dyn Page>, BrowserError> {
        self.browser().await?.new_page().await
    }

    /// Tears the browser down. Later calls are no-ops and later pages fail.
    pub async fn shutdown(&self) {
        let previous = std::mem::replace(&mut *self.state.lock().await, SessionState::Closed);
        if let SessionState::Ready(browser) = previous {
            browser.close().await;
            info!("Agent browser closed");
        }
    }
}
