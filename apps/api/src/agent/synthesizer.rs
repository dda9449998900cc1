//! Response Synthesizer: picks a canned reply template and fills it in.
//!
//! Selection (`plan`) and interpolation (`render`) are separate steps: `plan`
//! decides which template applies and binds the scraped data it needs,
//! `render` turns that plan plus the résumé into text. Rendering never fails;
//! clauses whose résumé data is missing are left out.

use crate::agent::acquirer::{CultureInfo, JobPosting};
use crate::agent::company::CompanyId;
use crate::agent::text::truncate_chars;
use crate::agent::trace::ActionTrace;
use crate::models::resume::ResumeProfile;

const SKILLS_IN_REPLY: usize = 3;
const REQUIREMENT_EXCERPT_CHARS: usize = 100;
const PROJECT_EXCERPT_CHARS: usize = 50;
const CHALLENGE_EXCERPT_CHARS: usize = 100;
const DEFAULT_CULTURE_CLAUSE: &str = "혁신적인 기업문화";

const EXPERIENCE_KEYWORDS: &[&str] = &["경력", "experience"];
const PROJECT_KEYWORDS: &[&str] = &["프로젝트", "project"];
const TECH_KEYWORDS: &[&str] = &["기술", "tech", "스택", "stack"];

// ────────────────────────────────────────────────────────────────────────────
// Selection
// ────────────────────────────────────────────────────────────────────────────

/// What the synthesizer knows about the turn.
#[derive(Debug, Clone, Copy)]
pub enum SynthesisInput<'a> {
    Company {
        company: &'a CompanyId,
        fetched: &'a [JobPosting],
        matched: &'a [JobPosting],
        culture: &'a CultureInfo,
    },
    General {
        message: &'a str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    DetailedPitch,
    SoftPitch,
    FallbackPitch,
    Experience,
    Projects,
    TechStack,
    Greeting,
}

/// A selected template together with the scraped data it interpolates.
#[derive(Debug, Clone, Copy)]
pub enum ReplyPlan<'a> {
    DetailedPitch {
        company: &'a CompanyId,
        posting: &'a JobPosting,
        culture: &'a CultureInfo,
    },
    SoftPitch {
        company: &'a CompanyId,
    },
    FallbackPitch {
        company: &'a CompanyId,
    },
    Experience,
    Projects,
    TechStack,
    Greeting,
}

impl ReplyPlan<'_> {
    pub fn kind(&self) -> TemplateKind {
        match self {
            ReplyPlan::DetailedPitch { .. } => TemplateKind::DetailedPitch,
            ReplyPlan::SoftPitch { .. } => TemplateKind::SoftPitch,
            ReplyPlan::FallbackPitch { .. } => TemplateKind::FallbackPitch,
            ReplyPlan::Experience => TemplateKind::Experience,
            ReplyPlan::Projects => TemplateKind::Projects,
            ReplyPlan::TechStack => TemplateKind::TechStack,
            ReplyPlan::Greeting => TemplateKind::Greeting,
        }
    }

    /// Trace step recording which path produced the reply.
    pub fn marker(&self) -> &'static str {
        match self.kind() {
            TemplateKind::DetailedPitch => "✅ 맞춤형 답변 생성 완료 (채용공고 매칭)",
            TemplateKind::SoftPitch => "✅ 맞춤형 답변 생성 완료 (매칭 공고 없음)",
            TemplateKind::FallbackPitch => "✅ 맞춤형 답변 생성 완료 (채용정보 없음)",
            TemplateKind::Experience => "💬 일반 질문 응답 완료 (경력)",
            TemplateKind::Projects => "💬 일반 질문 응답 완료 (프로젝트)",
            TemplateKind::TechStack => "💬 일반 질문 응답 완료 (기술 스택)",
            TemplateKind::Greeting => "💬 일반 질문 응답 완료 (소개)",
        }
    }
}

/// Chooses the template for a turn.
pub fn plan<'a>(input: &SynthesisInput<'a>) -> ReplyPlan<'a> {
    match *input {
        SynthesisInput::Company {
            company,
            fetched,
            matched,
            culture,
        } => match matched.first() {
            Some(posting) => ReplyPlan::DetailedPitch {
                company,
                posting,
                culture,
            },
            None if !fetched.is_empty() => ReplyPlan::SoftPitch { company },
            None => ReplyPlan::FallbackPitch { company },
        },
        SynthesisInput::General { message } => {
            let lowered = message.to_lowercase();
            let mentions = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(*k));
            if mentions(EXPERIENCE_KEYWORDS) {
                ReplyPlan::Experience
            } else if mentions(PROJECT_KEYWORDS) {
                ReplyPlan::Projects
            } else if mentions(TECH_KEYWORDS) {
                ReplyPlan::TechStack
            } else {
                ReplyPlan::Greeting
            }
        }
    }
}

/// Selects, records and renders the reply in one step.
pub fn synthesize(input: SynthesisInput<'_>, profile: &ResumeProfile, trace: &mut ActionTrace) -> String {
    let plan = plan(&input);
    trace.push(plan.marker());
    render(&plan, profile)
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

pub fn render(plan: &ReplyPlan<'_>, profile: &ResumeProfile) -> String {
    match plan {
        ReplyPlan::DetailedPitch {
            company,
            posting,
            culture,
        } => render_detailed_pitch(company, posting, culture, profile),
        ReplyPlan::SoftPitch { company } => render_soft_pitch(company, profile),
        ReplyPlan::FallbackPitch { company } => render_fallback_pitch(company, profile),
        ReplyPlan::Experience => render_experience(profile),
        ReplyPlan::Projects => render_projects(profile),
        ReplyPlan::TechStack => render_tech_stack(profile),
        ReplyPlan::Greeting => render_greeting(profile),
    }
}

fn top_skill_names(profile: &ResumeProfile) -> Option<String> {
    let names: Vec<&str> = profile
        .skills
        .iter()
        .take(SKILLS_IN_REPLY)
        .map(|s| s.name.as_str())
        .collect();
    (!names.is_empty()).then(|| names.join(", "))
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let cut = truncate_chars(text, max_chars);
    if cut.len() < text.len() {
        format!("{cut}...")
    } else {
        cut.to_string()
    }
}

fn render_detailed_pitch(
    company: &CompanyId,
    posting: &JobPosting,
    culture: &CultureInfo,
    profile: &ResumeProfile,
) -> String {
    let tagline = &profile.personal_info.tagline;
    let mut lines = vec![
        format!("🎯 {company} 맞춤 분석 결과:"),
        String::new(),
        "📋 **최신 채용정보** (실시간 수집):".to_string(),
        posting.title.clone(),
    ];
    if !posting.condition.is_empty() {
        lines.push(format!(
            "• 요구사항: {}",
            excerpt(&posting.condition, REQUIREMENT_EXCERPT_CHARS)
        ));
    }

    let achievement = profile
        .experience
        .first()
        .and_then(|e| e.achievements.first());
    let skills = top_skill_names(profile);
    if skills.is_some() || achievement.is_some() {
        lines.push(String::new());
        lines.push("🤝 **저와의 매칭도**:".to_string());
        if let Some(skills) = skills {
            lines.push(format!("• 제가 보유한 {skills} 기술이 해당 포지션과 적합합니다"));
        }
        if let Some(achievement) = achievement {
            lines.push(format!("• {achievement} 경험이 도움이 될 것 같습니다"));
        }
    }

    let culture_clause = if culture.overview.trim().is_empty() {
        DEFAULT_CULTURE_CLAUSE
    } else {
        culture.overview.trim()
    };
    lines.extend([
        String::new(),
        "💡 **지원 이유**:".to_string(),
        format!(
            "{tagline}로서 {company}의 사용자들에게 24/7 편리함을 제공하고 싶습니다. \
             특히 {culture_clause}와 제 가치관이 일치한다고 생각합니다."
        ),
        String::new(),
        "더 구체적인 질문이 있으시면 언제든 물어보세요! 🚀".to_string(),
    ]);
    lines.join("\n")
}

fn render_soft_pitch(company: &CompanyId, profile: &ResumeProfile) -> String {
    let tagline = &profile.personal_info.tagline;
    [
        format!("🎯 {company}에 대한 관심 감사합니다!"),
        String::new(),
        "실시간으로 채용정보를 확인했지만, 현재 공개된 포지션과 제 기술스택의 직접적인 매칭은 제한적입니다.".to_string(),
        String::new(),
        format!("하지만 {tagline}로서:"),
        "• **편리함 추구**: 사용자 중심의 서비스 개발".to_string(),
        "• **의로움 실천**: 올바른 가치관으로 개발".to_string(),
        "• **지속 성장**: 새로운 기술 학습에 적극적".to_string(),
        String::new(),
        format!("{company}와 함께 성장하며 기여할 준비가 되어 있습니다! 💪"),
    ]
    .join("\n")
}

fn render_fallback_pitch(company: &CompanyId, profile: &ResumeProfile) -> String {
    let tagline = &profile.personal_info.tagline;
    let mut lines = vec![
        format!("🎯 {company}에 관심 가져주셔서 감사합니다!"),
        String::new(),
        format!(
            "현재 공개된 채용정보 수집에 일시적인 제한이 있지만, {tagline}로서 {company}에 기여할 수 있는 방법들:"
        ),
    ];

    let mut contributions = Vec::new();
    if let Some(skills) = top_skill_names(profile) {
        contributions.push(format!("• {skills} 등의 기술로 안정적인 서비스 구축"));
    }
    if let Some(project) = profile.projects.first() {
        contributions.push(format!(
            "• {} 경험 활용",
            excerpt(&project.description, PROJECT_EXCERPT_CHARS)
        ));
    }
    if !contributions.is_empty() {
        lines.push(String::new());
        lines.push("🛠 **기술적 기여**:".to_string());
        lines.extend(contributions);
    }

    lines.extend([
        String::new(),
        "🤝 **가치 연결**:".to_string(),
        format!(
            "편의점처럼 항상 준비된 개발자로서 {company}의 사용자들에게 편리하고 신뢰할 수 있는 서비스를 제공하겠습니다."
        ),
        String::new(),
        "구체적인 포지션이나 프로젝트에 대해 더 궁금한 점이 있으시면 언제든 물어보세요! 🚀".to_string(),
    ]);
    lines.join("\n")
}

fn render_experience(profile: &ResumeProfile) -> String {
    let tagline = &profile.personal_info.tagline;
    let summary = match profile.experience.first() {
        Some(exp) if exp.achievements.is_empty() => {
            format!("{}로 {} 근무했습니다.", exp.position, exp.duration)
        }
        Some(exp) => format!(
            "{}로 {} 근무하며 {} 등의 성과를 달성했습니다.",
            exp.position,
            exp.duration,
            exp.achievements.join(", ")
        ),
        None => "아직 등록된 경력 정보가 없습니다.".to_string(),
    };
    format!("**경력 소개**:\n{summary} {tagline}로서 항상 사용자에게 편리함을 제공하려 노력합니다.")
}

fn render_projects(profile: &ResumeProfile) -> String {
    let Some(project) = profile.projects.first() else {
        return "**프로젝트 경험**:\n아직 등록된 프로젝트 정보가 없습니다.".to_string();
    };
    let mut summary = format!("{} - {}", project.name, project.description);
    if !project.role.is_empty() && !project.challenges.is_empty() {
        summary.push_str(&format!(
            " 특히 {}로서 {}",
            project.role,
            excerpt(&project.challenges, CHALLENGE_EXCERPT_CHARS)
        ));
    } else if !project.role.is_empty() {
        summary.push_str(&format!(" ({} 담당)", project.role));
    }
    format!("**프로젝트 경험**:\n{summary}")
}

fn render_tech_stack(profile: &ResumeProfile) -> String {
    let tagline = &profile.personal_info.tagline;
    let skills: Vec<String> = profile
        .skills
        .iter()
        .take(SKILLS_IN_REPLY)
        .map(|s| format!("{}({})", s.name, s.level))
        .collect();
    let listing = if skills.is_empty() {
        "아직 등록된 기술 정보가 없습니다.".to_string()
    } else {
        format!("주요 기술은 {} 등입니다.", skills.join(", "))
    };
    format!(
        "**기술 스택**:\n{listing} {tagline}로서 사용자가 필요할 때 언제든 도움이 되는 기술을 보유하고 있습니다."
    )
}

fn render_greeting(profile: &ResumeProfile) -> String {
    let info = &profile.personal_info;
    let headline = if info.name.trim().is_empty() {
        format!("안녕하세요! {}입니다! 🏪", info.tagline)
    } else {
        format!("안녕하세요! {} **{}**입니다! 🏪", info.tagline, info.name)
    };
    let mut lines = vec![headline, String::new()];
    if !info.intro.trim().is_empty() {
        lines.push(info.intro.clone());
        lines.push(String::new());
    }
    lines.extend(
        [
            "💡 **궁금한 점이 있으시면**:",
            "• \"네이버에 지원하는 이유는?\" (실시간 기업 분석)",
            "• \"프로젝트 경험을 알려주세요\"",
            "• \"어떤 기술 스택을 사용하나요?\"",
            "",
            "언제든 편하게 물어보세요! 24/7 준비된 개발자입니다 🚀",
        ]
        .map(String::from),
    );
    lines.join("\n")
}
