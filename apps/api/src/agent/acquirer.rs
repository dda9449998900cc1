//! Signal Acquirer: scrapes job postings and company culture for a company.
//!
//! Neither operation returns an error. A failed scrape is an ordinary value:
//! an empty or placeholder result tagged `AcquisitionStatus::Fallback`, plus a
//! trace step saying so. Failure detail goes to the server log only.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::agent::browser::{BrowserError, BrowserSession, ElementHandle, Page};
use crate::agent::company::CompanyId;
use crate::agent::text::truncate_chars;
use crate::agent::trace::ActionTrace;
use crate::config::{ScraperConfig, SearchEndpoint};

/// Result elements inspected per job search.
const MAX_POSTINGS: usize = 3;
/// Scraped overview text is cut to this many characters.
const OVERVIEW_MAX_CHARS: usize = 300;
const JOB_SOURCE_LABEL: &str = "사람인";

mod selectors {
    pub const JOB_ITEM: &str = ".item_recruit";
    pub const JOB_TITLE: &str = ".job_tit a";
    pub const JOB_EMPLOYER: &str = ".corp_name a";
    pub const JOB_CONDITION: &str = ".job_condition";
    pub const COMPANY_LINK: &str = ".company_name a";
    pub const COMPANY_OVERVIEW: &str = ".company_overview";
}

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub condition: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultureInfo {
    pub overview: String,
    /// False when `overview` is one of the fixed placeholder sentences.
    pub scraped: bool,
}

impl CultureInfo {
    fn scraped(overview: &str) -> Self {
        Self {
            overview: truncate_chars(overview, OVERVIEW_MAX_CHARS).to_string(),
            scraped: true,
        }
    }

    fn placeholder(overview: String) -> Self {
        Self {
            overview,
            scraped: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionStatus {
    Scraped,
    Fallback { reason: String },
}

/// What one acquirer operation produced, and the steps it took to get there.
#[derive(Debug, Clone)]
pub struct Acquisition<T> {
    pub value: T,
    pub status: AcquisitionStatus,
    pub trace: ActionTrace,
}

enum ProfileRead {
    Overview(String),
    NoOverview,
    NoProfile,
}

// ────────────────────────────────────────────────────────────────────────────
// Acquirer
// ────────────────────────────────────────────────────────────────────────────

pub struct SignalAcquirer {
    session: BrowserSession,
    config: ScraperConfig,
}

impl SignalAcquirer {
    pub fn new(session: BrowserSession, config: ScraperConfig) -> Self {
        Self { session, config }
    }

    /// Releases the shared browser. Called once on graceful shutdown.
    pub async fn shutdown(&self) {
        self.session.shutdown().await;
    }

    pub async fn fetch_job_postings(&self, company: &CompanyId) -> Acquisition<Vec<JobPosting>> {
        let mut trace = ActionTrace::new();

        let outcome = match self.session.new_page().await {
            Ok(mut page) => {
                trace.push(format!("🔍 {company} 채용정보 검색 시작"));
                let result = self.scrape_job_postings(page.as_mut(), company, &mut trace).await;
                page.close().await;
                result
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(postings) => {
                trace.push(format!("✅ {}개 채용공고 수집 완료", postings.len()));
                Acquisition {
                    value: postings,
                    status: AcquisitionStatus::Scraped,
                    trace,
                }
            }
            Err(e) => {
                error!("Job scraping failed for {company}: {e}");
                trace.push("❌ 채용정보 수집 실패");
                Acquisition {
                    value: Vec::new(),
                    status: AcquisitionStatus::Fallback {
                        reason: e.to_string(),
                    },
                    trace,
                }
            }
        }
    }

    pub async fn fetch_culture_info(&self, company: &CompanyId) -> Acquisition<CultureInfo> {
        let mut trace = ActionTrace::new();

        let outcome = match self.session.new_page().await {
            Ok(mut page) => {
                trace.push(format!("🏢 {company} 기업정보 수집"));
                let result = self.scrape_culture(page.as_mut(), company, &mut trace).await;
                page.close().await;
                result
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok((value, status)) => Acquisition {
                value,
                status,
                trace,
            },
            Err(e) => {
                error!("Company culture scraping failed for {company}: {e}");
                trace.push("❌ 기업정보 수집 실패");
                Acquisition {
                    value: CultureInfo::placeholder(format!("{company}와 함께 성장하고 싶습니다.")),
                    status: AcquisitionStatus::Fallback {
                        reason: e.to_string(),
                    },
                    trace,
                }
            }
        }
    }

    async fn scrape_job_postings(
        &self,
        page: &mut dyn Page,
        company: &CompanyId,
        trace: &mut ActionTrace,
    ) -> Result<Vec<JobPosting>, BrowserError> {
        let url = search_url(&self.config.job_search, company)?;
        page.goto(&url).await?;
        trace.push(format!("📊 {JOB_SOURCE_LABEL} 채용공고 분석"));
        page.wait_for_timeout(self.config.job_settle).await;

        let elements = page.query_all(selectors::JOB_ITEM).await?;
        let needle = company.as_str().to_lowercase();

        let mut postings = Vec::new();
        for (i, element) in elements.iter().take(MAX_POSTINGS).enumerate() {
            match extract_posting(element) {
                Ok(Some(posting)) if posting.company.to_lowercase().contains(&needle) => {
                    postings.push(posting);
                }
                Ok(_) => {}
                Err(e) => warn!("Failed to extract job posting {i}: {e}"),
            }
        }
        Ok(postings)
    }

    /// Errors only when the search page itself cannot be loaded; profile-level
    /// problems degrade to placeholder text.
    async fn scrape_culture(
        &self,
        page: &mut dyn Page,
        company: &CompanyId,
        trace: &mut ActionTrace,
    ) -> Result<(CultureInfo, AcquisitionStatus), BrowserError> {
        let url = search_url(&self.config.culture_search, company)?;
        page.goto(&url).await?;
        page.wait_for_timeout(self.config.culture_settle).await;

        let fallback = |reason: &str| AcquisitionStatus::Fallback {
            reason: reason.to_string(),
        };

        Ok(match self.read_profile(page).await {
            Ok(ProfileRead::Overview(text)) => {
                trace.push("✅ 기업 문화 정보 수집 완료");
                (CultureInfo::scraped(&text), AcquisitionStatus::Scraped)
            }
            Ok(ProfileRead::NoOverview) => {
                trace.push("⚠️ 기업 개요 정보 없음");
                (
                    CultureInfo::placeholder(format!("{company}에서 함께 성장할 기회를 기대합니다.")),
                    fallback("company profile has no overview"),
                )
            }
            Ok(ProfileRead::NoProfile) => {
                trace.push("⚠️ 기본 기업정보 사용");
                (
                    CultureInfo::placeholder(format!("{company}는 혁신적인 기업으로 알려져 있습니다.")),
                    fallback("no matching company profile"),
                )
            }
            Err(e) => {
                warn!("Company profile for {company} unavailable: {e}");
                trace.push("⚠️ 기업정보 수집 제한적");
                (
                    CultureInfo::placeholder(format!("{company}에서 함께 성장할 기회를 기대합니다.")),
                    fallback(&e.to_string()),
                )
            }
        })
    }

    async fn read_profile(&self, page: &mut dyn Page) -> Result<ProfileRead, BrowserError> {
        let Some(link) = page.query(selectors::COMPANY_LINK).await? else {
            return Ok(ProfileRead::NoProfile);
        };
        page.click(&link).await?;
        page.wait_for_timeout(self.config.profile_settle).await;

        Ok(match page.query(selectors::COMPANY_OVERVIEW).await? {
            Some(overview) if !overview.inner_text().is_empty() => {
                ProfileRead::Overview(overview.inner_text().to_string())
            }
            _ => ProfileRead::NoOverview,
        })
    }
}

/// Extracts one posting. `Ok(None)` when the title or employer is missing.
fn extract_posting(element: &ElementHandle) -> Result<Option<JobPosting>, BrowserError> {
    let (Some(title), Some(employer)) = (
        element.query(selectors::JOB_TITLE)?,
        element.query(selectors::JOB_EMPLOYER)?,
    ) else {
        return Ok(None);
    };
    let condition = element
        .query(selectors::JOB_CONDITION)?
        .map(|c| c.inner_text().to_string())
        .unwrap_or_default();

    Ok(Some(JobPosting {
        title: title.inner_text().to_string(),
        company: employer.inner_text().to_string(),
        condition,
        source: JOB_SOURCE_LABEL.to_string(),
    }))
}

fn search_url(endpoint: &SearchEndpoint, company: &CompanyId) -> Result<Url, BrowserError> {
    let mut url = Url::parse(&endpoint.base_url).map_err(|e| BrowserError::Navigation {
        url: endpoint.base_url.clone(),
        message: e.to_string(),
    })?;
    url.query_pairs_mut()
        .append_pair(&endpoint.query_param, company.as_str());
    Ok(url)
}
