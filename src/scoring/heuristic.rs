// src/scoring/heuristic.rs
//! Deterministic weighted-sum scorer. No I/O, no clock, no logging.

use super::{Provenance, ScoreResult, ScoringInput};

const SKILL_CAP: f64 = 80.0;
const EXPERIENCE_CAP: f64 = 90.0;
const PROJECT_CAP: f64 = 90.0;
const COMMUNICATION_CAP: f64 = 90.0;
const COMMUNICATION_BASE: f64 = 50.0;
const COMMUNICATION_WITHOUT_RESUME: u8 = 40;

const SKILL_WEIGHT: f64 = 0.40;
const EXPERIENCE_WEIGHT: f64 = 0.25;
const PROJECT_WEIGHT: f64 = 0.20;
const COMMUNICATION_WEIGHT: f64 = 0.15;

/// Round half away from zero and saturate into `[0, 100]`. NaN maps to 0.
pub fn clamp_score(n: f64) -> u8 {
    if n.is_nan() {
        return 0;
    }
    n.round().clamp(0.0, 100.0) as u8
}

pub struct HeuristicScorer;

impl HeuristicScorer {
    pub fn score(input: &ScoringInput) -> ScoreResult {
        let skills = input.skills.len() as f64;
        let links = input.portfolio_links.len() as f64;

        let skill_score = clamp_score(SKILL_CAP.min(skills * 10.0 + links * 5.0));
        let experience_score =
            clamp_score(EXPERIENCE_CAP.min(input.experience_years * 8.0 + links * 3.0));
        let project_score = clamp_score(PROJECT_CAP.min(links * 25.0 + skills * 5.0));
        let communication_score = Self::communication_score(&input.resume_text);

        let overall_score = clamp_score(
            SKILL_WEIGHT * f64::from(skill_score)
                + EXPERIENCE_WEIGHT * f64::from(experience_score)
                + PROJECT_WEIGHT * f64::from(project_score)
                + COMMUNICATION_WEIGHT * f64::from(communication_score),
        );

        let (strengths, weaknesses) = Self::rationale(input);

        ScoreResult {
            overall_score,
            skill_score,
            experience_score,
            project_score,
            communication_score,
            strengths,
            weaknesses,
            note: Provenance::MockGenerated,
        }
    }

    fn communication_score(resume_text: &str) -> u8 {
        if resume_text.is_empty() {
            return COMMUNICATION_WITHOUT_RESUME;
        }
        let thousands = (resume_text.chars().count() / 1000) as f64;
        clamp_score(COMMUNICATION_CAP.min(COMMUNICATION_BASE + thousands * 5.0))
    }

    fn rationale(input: &ScoringInput) -> (Vec<String>, Vec<String>) {
        let mut strengths = Vec::new();
        let mut weaknesses = Vec::new();

        let skills = input.skills.len();
        if skills >= 5 {
            strengths.push("Wide skill coverage".to_string());
        }
        if skills < 3 {
            weaknesses.push("Few listed skills".to_string());
        }

        if input.experience_years >= 3.0 {
            strengths.push("Solid experience".to_string());
        }
        if input.experience_years < 1.0 {
            weaknesses.push("Limited professional experience".to_string());
        }

        let links = input.portfolio_links.len();
        if links >= 2 {
            strengths.push("Strong portfolio presence".to_string());
        }
        if links == 0 {
            weaknesses.push("No portfolio links provided".to_string());
        }

        (strengths, weaknesses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize, prefix: &str) -> Vec<String> {
        (0..n).map(|i| format!("{}-{}", prefix, i)).collect()
    }

    fn profile(skills: usize, years: f64, links: usize, resume_len: usize) -> ScoringInput {
        ScoringInput {
            resume_text: "x".repeat(resume_len),
            skills: items(skills, "skill"),
            experience_years: years,
            portfolio_links: items(links, "https://example.com/p"),
            job_description: None,
        }
    }

    fn all_scores(result: &ScoreResult) -> [u8; 5] {
        [
            result.overall_score,
            result.skill_score,
            result.experience_score,
            result.project_score,
            result.communication_score,
        ]
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-12.0), 0);
        assert_eq!(clamp_score(0.4), 0);
        assert_eq!(clamp_score(83.75), 84);
        assert_eq!(clamp_score(22.5), 23);
        assert_eq!(clamp_score(250.0), 100);
        assert_eq!(clamp_score(f64::NAN), 0);
        assert_eq!(clamp_score(f64::INFINITY), 100);
        assert_eq!(clamp_score(f64::NEG_INFINITY), 0);
    }

    #[test]
    fn test_empty_input_floor() {
        let result = HeuristicScorer::score(&ScoringInput::default());
        assert_eq!(result.skill_score, 0);
        assert_eq!(result.experience_score, 0);
        assert_eq!(result.project_score, 0);
        assert_eq!(result.communication_score, 40);
        assert_eq!(result.overall_score, 6);
        assert!(result.strengths.is_empty());
        assert_eq!(
            result.weaknesses,
            vec![
                "Few listed skills".to_string(),
                "Limited professional experience".to_string(),
                "No portfolio links provided".to_string(),
            ]
        );
        assert_eq!(result.note, Provenance::MockGenerated);
    }

    #[test]
    fn test_saturated_profile() {
        let result = HeuristicScorer::score(&profile(10, 20.0, 10, 5000));
        assert_eq!(result.skill_score, 80);
        assert_eq!(result.experience_score, 90);
        assert_eq!(result.project_score, 90);
        assert_eq!(result.communication_score, 75);
        assert_eq!(result.overall_score, 84);
        assert_eq!(
            result.strengths,
            vec![
                "Wide skill coverage".to_string(),
                "Solid experience".to_string(),
                "Strong portfolio presence".to_string(),
            ]
        );
        assert!(result.weaknesses.is_empty());
    }

    #[test]
    fn test_mid_range_profile() {
        // skills 3*10 + 1*5 = 35, exp 2*8 + 3 = 19, projects 25 + 15 = 40, comm 50 + 5 = 55
        let result = HeuristicScorer::score(&profile(3, 2.0, 1, 1500));
        assert_eq!(result.skill_score, 35);
        assert_eq!(result.experience_score, 19);
        assert_eq!(result.project_score, 40);
        assert_eq!(result.communication_score, 55);
        // 14 + 4.75 + 8 + 8.25 = 35
        assert_eq!(result.overall_score, 35);
        assert!(result.strengths.is_empty());
        assert!(result.weaknesses.is_empty());
    }

    #[test]
    fn test_communication_caps_at_ninety() {
        let result = HeuristicScorer::score(&profile(0, 0.0, 0, 20_000));
        assert_eq!(result.communication_score, 90);
    }

    #[test]
    fn test_communication_counts_characters() {
        let resume = "é".repeat(1000);
        let input = ScoringInput {
            resume_text: resume,
            ..Default::default()
        };
        assert_eq!(HeuristicScorer::score(&input).communication_score, 55);
    }

    #[test]
    fn test_whitespace_resume_counts_as_present() {
        let input = ScoringInput {
            resume_text: " ".to_string(),
            ..Default::default()
        };
        assert_eq!(HeuristicScorer::score(&input).communication_score, 50);
    }

    #[test]
    fn test_four_skills_trigger_neither_bullet() {
        let result = HeuristicScorer::score(&profile(4, 1.5, 1, 0));
        assert!(!result.strengths.contains(&"Wide skill coverage".to_string()));
        assert!(!result.weaknesses.contains(&"Few listed skills".to_string()));
    }

    #[test]
    fn test_negative_experience_saturates_at_zero() {
        let result = HeuristicScorer::score(&profile(0, -5.0, 0, 0));
        assert_eq!(result.experience_score, 0);
        assert!(result
            .weaknesses
            .contains(&"Limited professional experience".to_string()));
    }

    #[test]
    fn test_job_description_does_not_affect_score() {
        let base = profile(4, 2.0, 1, 800);
        let mut with_job = base.clone();
        with_job.job_description = Some("Senior Rust engineer".to_string());
        assert_eq!(HeuristicScorer::score(&base), HeuristicScorer::score(&with_job));
    }

    #[test]
    fn test_deterministic() {
        let input = profile(6, 4.0, 2, 2300);
        assert_eq!(HeuristicScorer::score(&input), HeuristicScorer::score(&input));
    }

    #[test]
    fn test_scores_stay_in_range() {
        for skills in [0, 1, 4, 9, 40] {
            for years in [-3.0, 0.0, 0.5, 7.0, 1e9] {
                for links in [0, 1, 3, 25] {
                    for resume in [0, 999, 4000, 50_000] {
                        let result = HeuristicScorer::score(&profile(skills, years, links, resume));
                        for score in all_scores(&result) {
                            assert!(score <= 100, "{:?}", result);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_skill_score_monotonic_in_skill_count() {
        let mut previous = 0;
        for skills in 0..20 {
            let score = HeuristicScorer::score(&profile(skills, 1.0, 1, 0)).skill_score;
            assert!(score >= previous);
            assert!(score <= 80);
            previous = score;
        }
        assert_eq!(previous, 80);
    }

    #[test]
    fn test_experience_score_monotonic_in_years() {
        let mut previous = 0;
        for tenths in 0..200 {
            let years = tenths as f64 / 10.0;
            let score = HeuristicScorer::score(&profile(2, years, 1, 0)).experience_score;
            assert!(score >= previous);
            assert!(score <= 90);
            previous = score;
        }
        assert_eq!(previous, 90);
    }
}
