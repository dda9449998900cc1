use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Read-only snapshot of the candidate's résumé, loaded fresh for every turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub personal_info: PersonalInfo,
    #[serde(deserialize_with = "deserialize_skills")]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub name: String,
    /// Short self-description used as "{tagline}로서 ..." in replies.
    #[serde(default = "default_tagline")]
    pub tagline: String,
    pub intro: String,
}

fn default_tagline() -> String {
    "편의점같은 개발자".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub level: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub position: String,
    pub duration: String,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub challenges: String,
}

impl ResumeProfile {
    /// Skill names in declaration order.
    pub fn skill_names(&self) -> Vec<&str> {
        self.skills.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Skill entry inside a category group; the category comes from the group key.
#[derive(Deserialize)]
struct GroupedSkill {
    name: String,
    level: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkillsRepr {
    Flat(Vec<Skill>),
    Grouped(BTreeMap<String, Vec<GroupedSkill>>),
}

/// Accepts either a flat skill list or skills grouped by category.
/// Grouped categories are flattened in key order.
fn deserialize_skills<'de, D>(deserializer: D) -> Result<Vec<Skill>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match SkillsRepr::deserialize(deserializer)? {
        SkillsRepr::Flat(skills) => skills,
        SkillsRepr::Grouped(groups) => groups
            .into_iter()
            .flat_map(|(category, skills)| {
                skills.into_iter().map(move |s| Skill {
                    name: s.name,
                    level: s.level,
                    category: Some(category.clone()),
                })
            })
            .collect(),
    })
}
