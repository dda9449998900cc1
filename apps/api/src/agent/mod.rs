//! The chat agent: company detection, live signal acquisition, skill matching
//! and templated reply synthesis, wired together by [`orchestrator::Agent`].

pub mod acquirer;
pub mod browser;
pub mod company;
pub mod matcher;
pub mod orchestrator;
pub mod synthesizer;
pub mod text;
pub mod trace;
