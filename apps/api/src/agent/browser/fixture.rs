//! In-memory browser serving canned HTML, for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;

use super::{select_all, Browser, BrowserError, BrowserLauncher, ElementHandle, Page};

#[derive(Default)]
struct Counters {
    opened: AtomicUsize,
    closed_pages: AtomicUsize,
    browser_closes: AtomicUsize,
}

/// Serves the first registered page whose URL prefix matches the navigation.
/// Unregistered URLs fail like an unreachable host.
#[derive(Clone, Default)]
pub struct FixtureBrowser {
    pages: Arc<Vec<(String, String)>>,
    counters: Arc<Counters>,
}

impl FixtureBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url_prefix: &str, html: &str) -> Self {
        let mut pages = (*self.pages).clone();
        pages.push((url_prefix.to_string(), html.to_string()));
        Self {
            pages: Arc::new(pages),
            counters: self.counters,
        }
    }

    pub fn opened_pages(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    pub fn closed_pages(&self) -> usize {
        self.counters.closed_pages.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.counters.browser_closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Browser for FixtureBrowser {
    async fn new_page(&self) -> Result<Box<dyn Page>, BrowserError> {
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FixturePage {
            browser: self.clone(),
            current: None,
            closed: false,
        }))
    }

    async fn close(&self) {
        self.counters.browser_closes.fetch_add(1, Ordering::SeqCst);
    }
}

struct FixturePage {
    browser: FixtureBrowser,
    current: Option<(Url, String)>,
    closed: bool,
}

#[async_trait]
impl Page for FixturePage {
    async fn goto(&mut self, url: &Url) -> Result<(), BrowserError> {
        if self.closed {
            return Err(BrowserError::PageClosed);
        }
        let html = self
            .browser
            .pages
            .iter()
            .find(|(prefix, _)| url.as_str().starts_with(prefix.as_str()))
            .map(|(_, html)| html.clone())
            .ok_or_else(|| BrowserError::Navigation {
                url: url.to_string(),
                message: "connection refused".to_string(),
            })?;
        self.current = Some((url.clone(), html));
        Ok(())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>, BrowserError> {
        if self.closed {
            return Err(BrowserError::PageClosed);
        }
        let (_, html) = self.current.as_ref().ok_or(BrowserError::NoDocument)?;
        select_all(html, selector)
    }

    fn current_url(&self) -> Option<&Url> {
        self.current.as_ref().map(|(url, _)| url)
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.browser
                .counters
                .closed_pages
                .fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Hands out one shared `FixtureBrowser`, or fails every launch.
pub struct FixtureLauncher {
    browser: Option<FixtureBrowser>,
    launches: AtomicUsize,
}

impl FixtureLauncher {
    pub fn new(browser: FixtureBrowser) -> Self {
        Self {
            browser: Some(browser),
            launches: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            browser: None,
            launches: AtomicUsize::new(0),
        }
    }

    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserLauncher for FixtureLauncher {
    async fn launch(&self) -> Result<Arc<dyn Browser>, BrowserError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        // Yield so concurrent callers really overlap with an in-flight launch.
        tokio::task::yield_now().await;
        match &self.browser {
            Some(browser) => Ok(Arc::new(browser.clone())),
            None => Err(BrowserError::Launch("chromium not installed".to_string())),
        }
    }
}
