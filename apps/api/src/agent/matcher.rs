//! Matcher: keeps the postings whose requirement text names one of the candidate's skills.
//!
//! A filter, not a scorer: a posting either mentions a skill or it doesn't.

use crate::agent::acquirer::JobPosting;

/// Returns the postings whose `condition` contains at least one skill name,
/// case-insensitively, in their original order.
pub fn rank<S: AsRef<str>>(postings: &[JobPosting], skills: &[S]) -> Vec<JobPosting> {
    let skills: Vec<String> = skills
        .iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    postings
        .iter()
        .filter(|posting| {
            let condition = posting.condition.to_lowercase();
            skills.iter().any(|skill| condition.contains(skill.as_str()))
        })
        .cloned()
        .collect()
}
