//! Recommendation summary synthesis.
//!
//! Pure and deterministic: the same analysis and match list always produce
//! the identical summary string. This function never fails; empty inputs
//! degrade to the no-match message.

use workmatch_common::{ComplexityAnalysis, MatchResult};

/// Similarity score below which the top match is not considered strong.
/// Calibrated against all-MiniLM-L6-v2 cosine score distributions; a
/// different embedding model needs this recalibrated, not copied.
pub const STRONG_MATCH_THRESHOLD: f32 = 0.60;

const HIGH_COMPLEXITY_ABOVE: u8 = 7;
const LOW_COMPLEXITY_BELOW: u8 = 4;

pub fn synthesize(analysis: &ComplexityAnalysis, matches: &[MatchResult]) -> String {
    let top = match matches.first() {
        Some(top) => top,
        // With no candidates the complexity sentence adds nothing a planner
        // can act on, so the no-match message stands alone.
        None => {
            return "No matching employees found. Consider expanding skill requirements \
                    or hiring additional staff."
                .to_string()
        }
    };

    let mut parts = Vec::new();

    let class = if analysis.complexity_score > HIGH_COMPLEXITY_ABOVE {
        "high"
    } else if analysis.complexity_score < LOW_COMPLEXITY_BELOW {
        "low"
    } else {
        "moderate"
    };
    parts.push(format!(
        "This is a {}-complexity task (score: {}/10).",
        class, analysis.complexity_score
    ));

    if top.score < STRONG_MATCH_THRESHOLD {
        parts.push("No strong employee matches found (top match score < 0.60).".to_string());
        parts.push("Consider training existing staff or adjusting task requirements.".to_string());
    } else if matches.len() >= 2 {
        let second = &matches[1];
        parts.push(format!(
            "Top recommendation: {} (match score: {:.2}). Alternative: {} (match score: {:.2}).",
            top.employee_name, top.score, second.employee_name, second.score
        ));
    } else {
        parts.push(format!(
            "Top recommendation: {} (match score: {:.2}).",
            top.employee_name, top.score
        ));
    }

    parts.join(" ")
}
