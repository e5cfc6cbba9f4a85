//! Result View — presentation-ready projection of an `AnalysisResult`.
//!
//! The stored result keeps `match_score` exactly as the service sent it.
//! Whether that number is a 0–1 fraction or a 0–100 percentage is not
//! known from the service contract, so every scaled figure here goes
//! through an explicit `ScoreScale` chosen by configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::analysis::{AnalysisResult, JobRecommendation};

/// Jobs at or above this fraction of full scale are excellent matches.
const EXCELLENT_THRESHOLD: f64 = 0.8;
const GOOD_THRESHOLD: f64 = 0.6;

/// Required-skill chips shown per job before collapsing into "+N more".
const VISIBLE_REQUIRED_SKILLS: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreScale {
    #[default]
    Fraction,
    Percent,
}

impl ScoreScale {
    fn full_scale(self) -> f64 {
        match self {
            ScoreScale::Fraction => 1.0,
            ScoreScale::Percent => 100.0,
        }
    }

    /// Raw score as a fraction of full scale.
    pub fn normalized(self, raw: f64) -> f64 {
        raw / self.full_scale()
    }

    pub fn as_percent(self, raw: f64) -> f64 {
        self.normalized(raw) * 100.0
    }
}

impl FromStr for ScoreScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fraction" => Ok(ScoreScale::Fraction),
            "percent" | "percentage" => Ok(ScoreScale::Percent),
            other => Err(format!(
                "unknown match score scale '{other}', expected 'fraction' or 'percent'"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Excellent,
    Good,
    Partial,
}

impl MatchTier {
    pub fn classify(raw: f64, scale: ScoreScale) -> Self {
        let score = scale.normalized(raw);
        if score >= EXCELLENT_THRESHOLD {
            MatchTier::Excellent
        } else if score >= GOOD_THRESHOLD {
            MatchTier::Good
        } else {
            MatchTier::Partial
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchTier::Excellent => "Excellent Match",
            MatchTier::Good => "Good Match",
            MatchTier::Partial => "Partial Match",
        }
    }
}

/// Broad grouping used to pick an icon for a skill category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategoryKind {
    Technical,
    Interpersonal,
    Creative,
    General,
}

impl SkillCategoryKind {
    pub fn for_category(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "technical" | "programming" | "development" => SkillCategoryKind::Technical,
            "soft" | "communication" | "leadership" => SkillCategoryKind::Interpersonal,
            "creative" | "design" => SkillCategoryKind::Creative,
            _ => SkillCategoryKind::General,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup {
    pub name: String,
    pub kind: SkillCategoryKind,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobCard {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub job_type: Option<String>,
    pub posted_date: Option<String>,
    pub description: String,
    pub url: Option<String>,
    pub raw_match_score: f64,
    pub match_percent: f64,
    pub tier: MatchTier,
    pub tier_label: &'static str,
    pub visible_skills: Vec<String>,
    pub hidden_skill_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchStats {
    pub total_matches: usize,
    pub excellent_matches: usize,
    pub average_raw_score: f64,
    pub average_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub score_scale: ScoreScale,
    /// Counted from `all_skills`, never from the categorized lists.
    pub total_skills: usize,
    pub all_skills: Vec<String>,
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub categories: Vec<CategoryGroup>,
    pub stats: MatchStats,
    /// Same order as the service ranked them.
    pub jobs: Vec<JobCard>,
}

pub fn build_view(result: &AnalysisResult, scale: ScoreScale) -> ResultView {
    let skills = &result.skills;
    let jobs = &result.job_recommendations;

    let categories = skills
        .skill_categories
        .iter()
        .map(|(name, list)| CategoryGroup {
            name: name.clone(),
            kind: SkillCategoryKind::for_category(name),
            skills: list.clone(),
        })
        .collect();

    ResultView {
        score_scale: scale,
        total_skills: skills.all_skills.len(),
        all_skills: skills.all_skills.clone(),
        technical_skills: skills.technical_skills.clone(),
        soft_skills: skills.soft_skills.clone(),
        categories,
        stats: match_stats(jobs, scale),
        jobs: jobs.iter().map(|job| job_card(job, scale)).collect(),
    }
}

fn job_card(job: &JobRecommendation, scale: ScoreScale) -> JobCard {
    let tier = MatchTier::classify(job.match_score, scale);
    let visible_skills: Vec<String> = job
        .required_skills
        .iter()
        .take(VISIBLE_REQUIRED_SKILLS)
        .cloned()
        .collect();

    JobCard {
        title: job.title.clone(),
        company: job.company.clone(),
        location: job.location.clone(),
        salary_range: job.salary_range.clone(),
        job_type: job.job_type.clone(),
        posted_date: job.posted_date.clone(),
        description: job.description.clone(),
        url: job.url.clone(),
        raw_match_score: job.match_score,
        match_percent: scale.as_percent(job.match_score),
        tier,
        tier_label: tier.label(),
        hidden_skill_count: job.required_skills.len() - visible_skills.len(),
        visible_skills,
    }
}

fn match_stats(jobs: &[JobRecommendation], scale: ScoreScale) -> MatchStats {
    let excellent_matches = jobs
        .iter()
        .filter(|job| MatchTier::classify(job.match_score, scale) == MatchTier::Excellent)
        .count();

    let average_raw_score = if jobs.is_empty() {
        0.0
    } else {
        jobs.iter().map(|job| job.match_score).sum::<f64>() / jobs.len() as f64
    };

    MatchStats {
        total_matches: jobs.len(),
        excellent_matches,
        average_raw_score,
        average_percent: scale.as_percent(average_raw_score),
    }
}
