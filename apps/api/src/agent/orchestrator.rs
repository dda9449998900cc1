//! Agent Orchestrator: runs one chat turn end to end.
//!
//! Flow: load résumé → resolve company → (job postings ∥ culture info) →
//!       match skills → synthesize reply.
//!
//! Only a résumé load failure escapes as an error; scrape failures arrive here
//! already converted into fallback values.

use tracing::debug;

use crate::agent::acquirer::SignalAcquirer;
use crate::agent::company::{CompanyDetector, CompanyId};
use crate::agent::matcher::rank;
use crate::agent::synthesizer::{synthesize, SynthesisInput};
use crate::agent::trace::ActionTrace;
use crate::resume_store::{ResumeError, ResumeStore};

/// Output of one turn.
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub reply: String,
    pub company: Option<CompanyId>,
    pub trace: ActionTrace,
}

pub struct Agent {
    store: ResumeStore,
    detector: CompanyDetector,
    acquirer: SignalAcquirer,
}

impl Agent {
    pub fn new(store: ResumeStore, detector: CompanyDetector, acquirer: SignalAcquirer) -> Self {
        Self {
            store,
            detector,
            acquirer,
        }
    }

    /// An explicit company wins over detection. A known alias in the override
    /// is canonicalized; anything else is used as given.
    pub fn resolve_company(&self, message: &str, company_override: Option<&str>) -> Option<CompanyId> {
        match company_override.map(str::trim).filter(|c| !c.is_empty()) {
            Some(explicit) => Some(
                self.detector
                    .detect(explicit)
                    .unwrap_or_else(|| CompanyId::new(explicit)),
            ),
            None => self.detector.detect(message),
        }
    }

    pub async fn respond(
        &self,
        message: &str,
        company_override: Option<&str>,
    ) -> Result<AgentReply, ResumeError> {
        let profile = self.store.load().await?;
        let company = self.resolve_company(message, company_override);
        let mut trace = ActionTrace::new();

        let reply = match &company {
            Some(company) => {
                trace.push(format!("🎯 {company} 관련 질문 감지"));

                let (jobs, culture) = tokio::join!(
                    self.acquirer.fetch_job_postings(company),
                    self.acquirer.fetch_culture_info(company),
                );
                trace.extend(jobs.trace);
                trace.extend(culture.trace);

                trace.push("🧠 개인 이력과 기업정보 매칭 분석");
                let matched = rank(&jobs.value, &profile.skill_names());
                debug!(
                    "{company}: {} posting(s) fetched ({:?}), {} matched, culture {:?}",
                    jobs.value.len(),
                    jobs.status,
                    matched.len(),
                    culture.status
                );

                synthesize(
                    SynthesisInput::Company {
                        company,
                        fetched: &jobs.value,
                        matched: &matched,
                        culture: &culture.value,
                    },
                    &profile,
                    &mut trace,
                )
            }
            None => synthesize(SynthesisInput::General { message }, &profile, &mut trace),
        };

        debug!(
            "Agent turn complete: company={}, actions={}",
            company.as_ref().map(CompanyId::as_str).unwrap_or("-"),
            trace.len()
        );

        Ok(AgentReply {
            reply,
            company,
            trace,
        })
    }

    pub async fn shutdown(&self) {
        self.acquirer.shutdown().await;
    }
}
