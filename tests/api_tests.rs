mod common;

use common::{sequence_json, shaky_sequence, steady_sequence};
use poseforge::api::{self, AnalysisRequest};
use poseforge::config::Config;
use poseforge::phrasing::{PhraseError, Phraser};
use poseforge::pose::PoseSequence;
use poseforge::scorer::feedback::Suggestion;

#[test]
fn test_request_json_round_trip_into_sequence() {
    let seq = steady_sequence(6);
    let request = AnalysisRequest::from_json(&sequence_json(&seq)).unwrap();
    assert_eq!(request.poses.len(), 6);
    assert_eq!(request.timestamp, seq.timestamp_ms);

    let back: PoseSequence = request.into();
    assert_eq!(back, seq);
}

#[test]
fn test_request_tolerates_missing_optional_fields() {
    let json = r#"{ "poses": [ { "score": 0.8 } ] }"#;
    let request = AnalysisRequest::from_json(json).unwrap();
    assert_eq!(request.timestamp, 0);
    assert!(request.poses[0].keypoints.is_empty());
}

#[test]
fn test_report_payload_shape() {
    let report = api::analyze(&steady_sequence(10), &Config::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    for key in ["overall", "accuracy", "coordination", "stability"] {
        let v = json[key].as_u64().expect("integer score");
        assert!(v <= 100);
    }
    let item = &json["feedback"][0];
    assert!(["good", "improvement", "warning"].contains(&item["type"].as_str().unwrap()));
    assert!(item["text"].is_string());
    assert!(item["icon"].is_string());
    assert!(json["suggestions"].is_array());
}

#[test]
fn test_batch_keeps_per_sequence_results() {
    let seqs = vec![steady_sequence(10), PoseSequence::default(), shaky_sequence(10)];
    let results = api::analyze_batch(&seqs, &Config::default()).unwrap();

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].as_ref().unwrap_err().is_insufficient_data());
    let shaky = results[2].as_ref().unwrap();
    assert!(shaky.stability < results[0].as_ref().unwrap().stability);
}

#[test]
fn test_batch_rejects_bad_config_up_front() {
    let mut config = Config::default();
    config.weights.stability_window = 0;
    assert!(api::analyze_batch(&[steady_sequence(4)], &config).is_err());
}

struct Unreachable;

impl Phraser for Unreachable {
    fn phrase(&self, _: Suggestion) -> Result<String, PhraseError> {
        Err(PhraseError::Request("connection refused".to_string()))
    }
}

struct Friendly;

impl Phraser for Friendly {
    fn phrase(&self, s: Suggestion) -> Result<String, PhraseError> {
        Ok(format!("Coach says: {}", s.text()))
    }
}

#[test]
fn test_phraser_failure_leaves_scores_untouched() {
    let seq = shaky_sequence(10);
    let config = Config::default();

    let plain = api::analyze(&seq, &config).unwrap();
    let offline = api::analyze_with_phraser(&seq, &config, &Unreachable).unwrap();
    assert_eq!(plain, offline);

    let friendly = api::analyze_with_phraser(&seq, &config, &Friendly).unwrap();
    assert_eq!(friendly.overall, plain.overall);
    assert_eq!(friendly.feedback, plain.feedback);
    assert!(friendly.suggestions.iter().all(|s| s.starts_with("Coach says: ")));
}

#[test]
fn test_detailed_traces_align_with_usable_frames() {
    let mut seq = steady_sequence(8);
    seq.frames[3].score = 0.05;
    let details = api::analyze_detailed(&seq, &Config::default()).unwrap();

    assert_eq!(details.total, 8);
    assert_eq!(details.usable, 7);
    assert_eq!(details.frames.len(), 7);
    assert!(details.frames.iter().all(|t| t.index != 3));
    assert_eq!(details.drops[0].index, 3);
}
