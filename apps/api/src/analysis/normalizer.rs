//! Result Normalizer — turns whatever the analysis service sent into a
//! complete `AnalysisResult`.
//!
//! The service is an independent component whose payload drifts, so every
//! field is read defensively: missing or wrong-typed values become their
//! empty form instead of failing the whole analysis.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::analysis::errors::ServiceError;
use crate::analysis_client::RawServiceResponse;
use crate::models::analysis::{AnalysisResult, JobRecommendation, SkillAnalysis};

/// Normalizes a decoded service body.
///
/// A falsy `success` yields the service's `error` message, or the path's
/// default message when there is none. A body that is not a JSON object
/// is a service error as well.
pub fn normalize(raw: &RawServiceResponse) -> Result<AnalysisResult, ServiceError> {
    let default_message = raw.path.default_failure_message();

    let Some(body) = raw.body.as_object() else {
        warn!("Analysis service returned a non-object body");
        return Err(ServiceError {
            message: default_message.to_string(),
        });
    };

    if !body.get("success").is_some_and(is_truthy) {
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(default_message);
        return Err(ServiceError {
            message: message.to_string(),
        });
    }

    let skills = body
        .get("skills")
        .and_then(Value::as_object)
        .map(normalize_skills)
        .unwrap_or_default();

    let job_recommendations: Vec<JobRecommendation> = body
        .get("job_recommendations")
        .and_then(Value::as_array)
        .map(|jobs| {
            jobs.iter()
                .filter_map(|job| match job.as_object() {
                    Some(job) => Some(normalize_job(job)),
                    None => {
                        warn!("Skipping non-object job recommendation: {}", job);
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    debug!(
        "Normalized analysis: {} skills, {} recommendations",
        skills.all_skills.len(),
        job_recommendations.len()
    );

    Ok(AnalysisResult {
        success: true,
        resume_text: string_field(body, "resume_text"),
        skills,
        job_recommendations,
    })
}

fn normalize_skills(skills: &Map<String, Value>) -> SkillAnalysis {
    let skill_categories: BTreeMap<String, Vec<String>> = skills
        .get("skill_categories")
        .and_then(Value::as_object)
        .map(|categories| {
            categories
                .iter()
                .map(|(name, list)| (name.clone(), string_list(Some(list))))
                .filter(|(_, list)| !list.is_empty())
                .collect()
        })
        .unwrap_or_default();

    SkillAnalysis {
        technical_skills: string_list(skills.get("technical_skills")),
        soft_skills: string_list(skills.get("soft_skills")),
        all_skills: string_list(skills.get("all_skills")),
        skill_categories,
    }
}

fn normalize_job(job: &Map<String, Value>) -> JobRecommendation {
    JobRecommendation {
        title: string_field(job, "title"),
        company: string_field(job, "company"),
        location: optional_string(job, "location"),
        salary_range: optional_string(job, "salary_range"),
        match_score: job.get("match_score").and_then(number).unwrap_or(0.0),
        required_skills: string_list(job.get("required_skills")),
        description: string_field(job, "description"),
        url: optional_string(job, "url"),
        posted_date: optional_string(job, "posted_date"),
        job_type: optional_string(job, "job_type"),
    }
}

/// JavaScript truthiness, which is what the service's consumers relied on.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Blank strings count as absent.
fn optional_string(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(String::from)
}

/// Keeps string items in order, duplicates included; skips everything else.
fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// Reads a score without rescaling it.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::analysis_client::RequestPath;

    fn raw(path: RequestPath, body: Value) -> RawServiceResponse {
        RawServiceResponse { path, body }
    }

    fn text(body: Value) -> RawServiceResponse {
        raw(RequestPath::Text, body)
    }

    #[test]
    fn test_success_without_fields_yields_empty_result() {
        let result = normalize(&text(json!({ "success": true }))).unwrap();
        assert!(result.success);
        assert_eq!(result.resume_text, "");
        assert_eq!(result.skills, SkillAnalysis::default());
        assert!(result.skills.skill_categories.is_empty());
        assert!(result.job_recommendations.is_empty());
    }

    #[test]
    fn test_failure_uses_service_message() {
        let err = normalize(&text(json!({ "success": false, "error": "bad pdf" }))).unwrap_err();
        assert_eq!(err.message, "bad pdf");
    }

    #[test]
    fn test_failure_default_message_depends_on_path() {
        let file_err = normalize(&raw(RequestPath::File, json!({ "success": false }))).unwrap_err();
        let text_err = normalize(&raw(RequestPath::Text, json!({ "success": false }))).unwrap_err();
        assert_eq!(file_err.message, "Failed to analyze resume");
        assert_eq!(text_err.message, "Failed to analyze resume text");
    }

    #[test]
    fn test_blank_error_falls_back_to_default() {
        let err = normalize(&raw(RequestPath::File, json!({ "success": false, "error": "" })))
            .unwrap_err();
        assert_eq!(err.message, "Failed to analyze resume");
    }

    #[test]
    fn test_missing_success_is_failure() {
        let err = normalize(&text(json!({ "resume_text": "hi" }))).unwrap_err();
        assert_eq!(err.message, "Failed to analyze resume text");
    }

    #[test]
    fn test_success_truthiness() {
        assert!(normalize(&text(json!({ "success": 1 }))).is_ok());
        assert!(normalize(&text(json!({ "success": "yes" }))).is_ok());
        assert!(normalize(&text(json!({ "success": 0 }))).is_err());
        assert!(normalize(&text(json!({ "success": "" }))).is_err());
        assert!(normalize(&text(json!({ "success": null }))).is_err());
    }

    #[test]
    fn test_non_object_body_is_service_error() {
        let err = normalize(&raw(RequestPath::File, json!(["success", true]))).unwrap_err();
        assert_eq!(err.message, "Failed to analyze resume");
    }

    #[test]
    fn test_recommendation_order_preserved() {
        let result = normalize(&text(json!({
            "success": true,
            "job_recommendations": [
                { "title": "A", "match_score": 0.4 },
                { "title": "B", "match_score": 0.9 },
                { "title": "C", "match_score": 0.6 }
            ]
        })))
        .unwrap();

        let titles: Vec<_> = result
            .job_recommendations
            .iter()
            .map(|j| j.title.as_str())
            .collect();
        assert_eq!(titles, ["A", "B", "C"]);
    }

    #[test]
    fn test_match_score_not_rescaled() {
        let result = normalize(&text(json!({
            "success": true,
            "job_recommendations": [
                { "title": "Fraction", "match_score": 0.82 },
                { "title": "Percent", "match_score": 82 },
                { "title": "Stringly", "match_score": "67.5" },
                { "title": "Missing" }
            ]
        })))
        .unwrap();

        let scores: Vec<f64> = result
            .job_recommendations
            .iter()
            .map(|j| j.match_score)
            .collect();
        assert_eq!(scores, [0.82, 82.0, 67.5, 0.0]);
    }

    #[test]
    fn test_optional_job_fields() {
        let result = normalize(&text(json!({
            "success": true,
            "job_recommendations": [{
                "title": "Data Analyst",
                "company": "Acme",
                "location": "Remote",
                "salary_range": "  ",
                "url": "",
                "job_type": "Full-time",
                "match_score": 0.7,
                "required_skills": ["SQL", 3, "Excel"],
                "description": "Analyze things"
            }]
        })))
        .unwrap();

        let job = &result.job_recommendations[0];
        assert_eq!(job.location.as_deref(), Some("Remote"));
        assert_eq!(job.salary_range, None);
        assert_eq!(job.url, None);
        assert_eq!(job.posted_date, None);
        assert_eq!(job.job_type.as_deref(), Some("Full-time"));
        assert_eq!(job.required_skills, ["SQL", "Excel"]);
    }

    #[test]
    fn test_non_object_recommendations_skipped() {
        let result = normalize(&text(json!({
            "success": true,
            "job_recommendations": ["junk", { "title": "Real" }, null]
        })))
        .unwrap();
        assert_eq!(result.job_recommendations.len(), 1);
        assert_eq!(result.job_recommendations[0].title, "Real");
        assert_eq!(result.job_recommendations[0].company, "");
    }

    #[test]
    fn test_all_skills_kept_as_sent() {
        let result = normalize(&text(json!({
            "success": true,
            "skills": {
                "technical_skills": ["python"],
                "all_skills": ["sql", "python", "sql", "leadership"],
                "skill_categories": { "programming": ["python"] }
            }
        })))
        .unwrap();

        assert_eq!(result.skills.all_skills, ["sql", "python", "sql", "leadership"]);
        assert_eq!(result.skills.technical_skills, ["python"]);
        assert!(result.skills.soft_skills.is_empty());
    }

    #[test]
    fn test_empty_categories_dropped_and_keys_case_sensitive() {
        let result = normalize(&text(json!({
            "success": true,
            "skills": {
                "skill_categories": {
                    "Tools": ["jira"],
                    "tools": ["git"],
                    "databases": [],
                    "broken": "not a list"
                }
            }
        })))
        .unwrap();

        let categories = &result.skills.skill_categories;
        assert_eq!(categories.len(), 2);
        assert_eq!(categories["Tools"], ["jira"]);
        assert_eq!(categories["tools"], ["git"]);
    }

    #[test]
    fn test_categories_are_ordered_by_name() {
        let result = normalize(&text(json!({
            "success": true,
            "skills": {
                "skill_categories": {
                    "programming": ["rust"],
                    "design": ["figma"],
                    "leadership": ["mentoring"]
                }
            }
        })))
        .unwrap();

        let names: Vec<&str> = result
            .skills
            .skill_categories
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(names, ["design", "leadership", "programming"]);
    }

    #[test]
    fn test_wrong_typed_skills_default() {
        let result = normalize(&text(json!({
            "success": true,
            "resume_text": 42,
            "skills": ["python"],
            "job_recommendations": { "title": "not a list" }
        })))
        .unwrap();

        assert_eq!(result.resume_text, "");
        assert_eq!(result.skills, SkillAnalysis::default());
        assert!(result.job_recommendations.is_empty());
    }
}
