use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Skills the analysis service extracted from a résumé.
///
/// `all_skills` is the authoritative total. The categorized lists are
/// supplementary and are not reconciled against it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillAnalysis {
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub all_skills: Vec<String>,
    /// Case-sensitive category names; every list is non-empty. Iterates in
    /// name order, not in the order the service listed the categories.
    pub skill_categories: BTreeMap<String, Vec<String>>,
}

/// A ranked job match returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecommendation {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    /// Exactly what the service sent. Its scale (fraction or percentage) is
    /// not known here; see `analysis::view::ScoreScale`.
    pub match_score: f64,
    pub required_skills: Vec<String>,
    pub description: String,
    pub url: Option<String>,
    pub posted_date: Option<String>,
    pub job_type: Option<String>,
}

/// Terminal artifact of a successful analysis. Never mutated after
/// construction; a later success replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub success: bool,
    pub resume_text: String,
    pub skills: SkillAnalysis,
    /// Service rank order.
    pub job_recommendations: Vec<JobRecommendation>,
}
