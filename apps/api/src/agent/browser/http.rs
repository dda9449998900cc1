//! HTTP-backed browser: navigation via `reqwest`, element queries via `scraper`.
//!
//! Pages do not execute scripts. Every navigation carries the configured
//! timeout; a timeout surfaces as an ordinary `BrowserError::Navigation`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use super::{select_all, Browser, BrowserError, BrowserLauncher, ElementHandle, Page};

/// Launches `HttpBrowser`s with a fixed user agent and navigation timeout.
#[derive(Debug, Clone)]
pub struct HttpBrowserLauncher {
    user_agent: String,
    timeout: Duration,
}

impl HttpBrowserLauncher {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout,
        }
    }
}

#[async_trait]
impl BrowserLauncher for HttpBrowserLauncher {
    async fn launch(&self) -> Result<Arc<dyn Browser>, BrowserError> {
        let client = Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .build()
            .map_err(|e| BrowserError::Launch(e.to_string()))?;
        Ok(Arc::new(HttpBrowser {
            client,
            open_pages: Arc::new(AtomicUsize::new(0)),
        }))
    }
}

pub struct HttpBrowser {
    client: Client,
    open_pages: Arc<AtomicUsize>,
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn new_page(&self) -> Result<Box<dyn Page>, BrowserError> {
        let open = self.open_pages.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Opened page ({open} open)");
        Ok(Box::new(HttpPage {
            client: self.client.clone(),
            document: None,
            open_pages: Some(Arc::clone(&self.open_pages)),
        }))
    }

    async fn close(&self) {
        let open = self.open_pages.load(Ordering::SeqCst);
        if open > 0 {
            debug!("Closing browser with {open} page(s) still open");
        }
    }
}

struct LoadedDocument {
    url: Url,
    html: String,
}

pub struct HttpPage {
    client: Client,
    document: Option<LoadedDocument>,
    /// `None` once the page is closed.
    open_pages: Option<Arc<AtomicUsize>>,
}

#[async_trait]
impl Page for HttpPage {
    async fn goto(&mut self, url: &Url) -> Result<(), BrowserError> {
        if self.open_pages.is_none() {
            return Err(BrowserError::PageClosed);
        }

        let navigation_error = |message: String| BrowserError::Navigation {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| navigation_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(navigation_error(format!("HTTP {status}")));
        }

        let final_url = response.url().clone();
        let html = response
            .text()
            .await
            .map_err(|e| navigation_error(e.to_string()))?;

        debug!("Loaded {final_url} ({} bytes)", html.len());
        self.document = Some(LoadedDocument {
            url: final_url,
            html,
        });
        Ok(())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>, BrowserError> {
        if self.open_pages.is_none() {
            return Err(BrowserError::PageClosed);
        }
        let document = self.document.as_ref().ok_or(BrowserError::NoDocument)?;
        select_all(&document.html, selector)
    }

    fn current_url(&self) -> Option<&Url> {
        self.document.as_ref().map(|d| &d.url)
    }

    async fn close(&mut self) {
        if let Some(open_pages) = self.open_pages.take() {
            open_pages.fetch_sub(1, Ordering::SeqCst);
        }
        self.document = None;
    }
}

/// A page dropped without `close` (e.g. its request was cancelled) still
/// releases its slot.
impl Drop for HttpPage {
    fn drop(&mut self) {
        if let Some(open_pages) = self.open_pages.take() {
            open_pages.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_browser() -> HttpBrowser {
        HttpBrowser {
            client: Client::new(),
            open_pages: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[tokio::test]
    async fn test_dropped_page_releases_slot() {
        let browser = test_browser();
        let page = browser.new_page().await.unwrap();
        assert_eq!(browser.open_pages.load(Ordering::SeqCst), 1);

        drop(page);
        assert_eq!(browser.open_pages.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_closed_then_dropped_page_releases_slot_once() {
        let browser = test_browser();
        let mut first = browser.new_page().await.unwrap();
        let _second = browser.new_page().await.unwrap();

        first.close().await;
        drop(first);
        assert_eq!(browser.open_pages.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_launch_builds_browser() {
        let launcher = HttpBrowserLauncher::new("test-agent", Duration::from_secs(1));
        assert!(launcher.launch().await.is_ok());
    }

    #[tokio::test]
    async fn test_closed_page_rejects_navigation_and_queries() {
        let browser = HttpBrowserLauncher::new("test-agent", Duration::from_secs(1))
            .launch()
            .await
            .unwrap();
        let mut page = browser.new_page().await.unwrap();
        assert!(matches!(
            page.query_all("div").await.unwrap_err(),
            BrowserError::NoDocument
        ));

        page.close().await;
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        assert!(matches!(
            page.goto(&url).await.unwrap_err(),
            BrowserError::PageClosed
        ));
        assert!(matches!(
            page.query_all("div").await.unwrap_err(),
            BrowserError::PageClosed
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_navigation_error() {
        let browser = HttpBrowserLauncher::new("test-agent", Duration::from_millis(500))
            .launch()
            .await
            .unwrap();
        let mut page = browser.new_page().await.unwrap();
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        assert!(matches!(
            page.goto(&url).await.unwrap_err(),
            BrowserError::Navigation { .. }
        ));
        page.close().await;
    }
}
