use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::chat::ChatLogEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub total_chats_today: usize,
    /// Turns whose action trace is non-empty.
    pub agent_activations: usize,
    pub companies: BTreeMap<String, usize>,
    pub most_active_company: Option<String>,
    pub agent_usage_rate: String,
}

pub fn compute_analytics(entries: &[ChatLogEntry]) -> Analytics {
    let total_chats_today = entries.len();
    let agent_activations = entries
        .iter()
        .filter(|e| !e.agent_actions.is_empty())
        .count();

    let mut companies: BTreeMap<String, usize> = BTreeMap::new();
    for company in entries.iter().filter_map(|e| e.company.as_deref()) {
        *companies.entry(company.to_string()).or_default() += 1;
    }

    // Ties go to the lexicographically smallest name: iteration is in key
    // order and only a strictly higher count replaces the current best.
    let mut most_active: Option<(&String, usize)> = None;
    for (name, &count) in &companies {
        if most_active.map_or(true, |(_, best)| count > best) {
            most_active = Some((name, count));
        }
    }
    let most_active_company = most_active.map(|(name, _)| name.clone());

    Analytics {
        total_chats_today,
        agent_activations,
        most_active_company,
        companies,
        agent_usage_rate: usage_rate(agent_activations, total_chats_today),
    }
}

fn usage_rate(activations: usize, total: usize) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", activations as f64 / total as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use super::*;

    fn entry(company: Option<&str>, actions: &[&str]) -> ChatLogEntry {
        ChatLogEntry {
            timestamp: Local::now(),
            session_id: "s".to_string(),
            company: company.map(str::to_string),
            user_message: "m".to_string(),
            bot_response: "r".to_string(),
            agent_actions: actions.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_no_turns_reports_zero_percent() {
        let analytics = compute_analytics(&[]);
        assert_eq!(analytics.total_chats_today, 0);
        assert_eq!(analytics.agent_activations, 0);
        assert!(analytics.companies.is_empty());
        assert_eq!(analytics.most_active_company, None);
        assert_eq!(analytics.agent_usage_rate, "0%");
    }

    #[test]
    fn test_one_activation_in_three_turns() {
        let entries = vec![
            entry(Some("네이버"), &["🎯 네이버 관련 질문 감지"]),
            entry(None, &[]),
            entry(None, &[]),
        ];
        let analytics = compute_analytics(&entries);
        assert_eq!(analytics.total_chats_today, 3);
        assert_eq!(analytics.agent_activations, 1);
        assert_eq!(analytics.agent_usage_rate, "33.3%");
        assert_eq!(analytics.companies.get("네이버"), Some(&1));
        assert_eq!(analytics.most_active_company.as_deref(), Some("네이버"));
    }

    #[test]
    fn test_most_active_company_highest_count_wins() {
        let entries = vec![
            entry(Some("카카오"), &["a"]),
            entry(Some("토스"), &["a"]),
            entry(Some("토스"), &["a"]),
        ];
        let analytics = compute_analytics(&entries);
        assert_eq!(analytics.most_active_company.as_deref(), Some("토스"));
        assert_eq!(analytics.agent_usage_rate, "100.0%");
    }

    #[test]
    fn test_most_active_company_tie_breaks_by_name() {
        let entries = vec![
            entry(Some("쿠팡"), &["a"]),
            entry(Some("LG"), &["a"]),
            entry(Some("쿠팡"), &["a"]),
            entry(Some("LG"), &["a"]),
        ];
        let analytics = compute_analytics(&entries);
        assert_eq!(analytics.most_active_company.as_deref(), Some("LG"));
    }
}
