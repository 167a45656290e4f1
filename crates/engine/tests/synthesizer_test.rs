use workmatch_common::{ComplexityAnalysis, DurationEstimate, MatchResult};
use workmatch_engine::synthesizer::{synthesize, STRONG_MATCH_THRESHOLD};

fn analysis(score: u8) -> ComplexityAnalysis {
    ComplexityAnalysis {
        complexity_score: score,
        recommended_skills: [("communication", 7)].into_iter().collect(),
        challenges: vec![],
        duration_estimate: DurationEstimate {
            optimistic: 20,
            likely: 30,
            pessimistic: 60,
            confidence: 0.8,
        },
    }
}

fn candidate(name: &str, score: f32) -> MatchResult {
    MatchResult {
        employee_id: 1,
        employee_name: name.to_string(),
        score,
    }
}

#[test]
fn empty_matches_returns_only_the_no_match_message() {
    let summary = synthesize(&analysis(8), &[]);
    assert_eq!(
        summary,
        "No matching employees found. Consider expanding skill requirements \
         or hiring additional staff."
    );
}

#[test]
fn weak_top_match_advises_training() {
    let summary = synthesize(&analysis(5), &[candidate("A", 0.55)]);
    assert_eq!(
        summary,
        "This is a moderate-complexity task (score: 5/10). \
         No strong employee matches found (top match score < 0.60). \
         Consider training existing staff or adjusting task requirements."
    );
}

#[test]
fn two_candidates_yield_recommendation_and_alternative() {
    let summary = synthesize(
        &analysis(3),
        &[candidate("A", 0.81), candidate("B", 0.70)],
    );
    assert_eq!(
        summary,
        "This is a low-complexity task (score: 3/10). \
         Top recommendation: A (match score: 0.81). \
         Alternative: B (match score: 0.70)."
    );
}

#[test]
fn single_strong_candidate_has_no_alternative() {
    let summary = synthesize(&analysis(8), &[candidate("A", 0.90)]);
    assert_eq!(
        summary,
        "This is a high-complexity task (score: 8/10). \
         Top recommendation: A (match score: 0.90)."
    );
}

#[test]
fn complexity_class_boundaries() {
    // 7 and 4 are both moderate; the class only changes strictly beyond them.
    assert!(synthesize(&analysis(7), &[candidate("A", 0.9)])
        .starts_with("This is a moderate-complexity task (score: 7/10)."));
    assert!(synthesize(&analysis(4), &[candidate("A", 0.9)])
        .starts_with("This is a moderate-complexity task (score: 4/10)."));
    assert!(synthesize(&analysis(8), &[candidate("A", 0.9)])
        .starts_with("This is a high-complexity task"));
    assert!(synthesize(&analysis(3), &[candidate("A", 0.9)])
        .starts_with("This is a low-complexity task"));
}

#[test]
fn threshold_is_not_weak_at_exactly_060() {
    let summary = synthesize(&analysis(5), &[candidate("A", STRONG_MATCH_THRESHOLD)]);
    assert!(summary.contains("Top recommendation: A (match score: 0.60)."));
    assert!(!summary.contains("No strong employee matches"));
}

#[test]
fn scores_are_formatted_to_two_decimals() {
    let summary = synthesize(&analysis(5), &[candidate("A", 0.8156)]);
    assert!(summary.contains("(match score: 0.82)."));
}

#[test]
fn same_inputs_same_summary() {
    let matches = [candidate("A", 0.75), candidate("B", 0.61)];
    assert_eq!(
        synthesize(&analysis(6), &matches),
        synthesize(&analysis(6), &matches)
    );
}
