use clap::{Args, Command, FromArgMatches};
use poseforge::config::{AngleRange, Config, MovementProfile, ScoringWeights};
use poseforge::skeleton::JointAngle;
use poseforge::PoseForgeError;
use std::fs::File;
use std::io::Write;

fn parse_cli(args: &[&str]) -> (Config, clap::ArgMatches) {
    let cmd = Config::augment_args(Command::new("poseforge-test"));
    let matches = cmd
        .try_get_matches_from(std::iter::once("poseforge-test").chain(args.iter().copied()))
        .expect("arguments should parse");
    let config = Config::from_arg_matches(&matches).expect("config from matches");
    (config, matches)
}

#[test]
fn test_defaults_are_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.weights.overall_weights(), (0.5, 0.25, 0.25));
    assert_eq!(config.profile.name, "general");
    assert_eq!(config.profile.angles.len(), 8);
}

#[test]
fn test_cli_defaults_match_struct_defaults() {
    let (cli, _) = parse_cli(&[]);
    let def = Config::default();
    assert_eq!(cli.validation.min_frame_confidence, def.validation.min_frame_confidence);
    assert_eq!(cli.weights.neutral_score, def.weights.neutral_score);
    assert_eq!(cli.feedback.max_suggestions, def.feedback.max_suggestions);
    assert_eq!(cli.profile, def.profile);
}

#[test]
fn test_blend_weights_are_normalized() {
    let weights = ScoringWeights {
        weight_accuracy: 2.0,
        weight_coordination: 1.0,
        weight_stability: 1.0,
        ..Default::default()
    };
    let (a, c, s) = weights.overall_weights();
    assert!((a - 0.5).abs() < 1e-6);
    assert!((c - 0.25).abs() < 1e-6);
    assert!((s - 0.25).abs() < 1e-6);
}

#[test]
fn test_validate_rejects_bad_values() {
    let cases: Vec<Box<dyn Fn(&mut Config)>> = vec![
        Box::new(|c| c.validation.min_frame_confidence = 1.5),
        Box::new(|c| c.feedback.good_threshold = 120.0),
        Box::new(|c| c.feedback.warning_threshold = 95.0),
        Box::new(|c| {
            c.weights.weight_accuracy = 0.0;
            c.weights.weight_coordination = 0.0;
            c.weights.weight_stability = 0.0;
        }),
        Box::new(|c| c.weights.weight_stability = -1.0),
        Box::new(|c| c.weights.min_frames_for_coordination = 1),
        Box::new(|c| c.weights.stability_window = 0),
        Box::new(|c| c.weights.stability_window = 2),
        Box::new(|c| c.weights.stability_variance_scale = 0.0),
        Box::new(|c| c.weights.accuracy_penalty_per_degree = -2.0),
    ];

    for (i, mutate) in cases.iter().enumerate() {
        let mut config = Config::default();
        mutate(&mut config);
        match config.validate() {
            Err(PoseForgeError::Config(_)) => {}
            other => panic!("case {} should be rejected, got {:?}", i, other),
        }
    }
}

#[test]
fn test_profile_validation() {
    let dup = MovementProfile {
        name: "dup".to_string(),
        angles: vec![
            AngleRange::new(JointAngle::LeftKnee, 90.0, 180.0, 1.0),
            AngleRange::new(JointAngle::LeftKnee, 80.0, 170.0, 1.0),
        ],
    };
    assert!(dup.validate().is_err());

    let inverted = MovementProfile {
        name: "inverted".to_string(),
        angles: vec![AngleRange::new(JointAngle::RightHip, 170.0, 90.0, 1.0)],
    };
    assert!(inverted.validate().is_err());

    let range = AngleRange::new(JointAngle::LeftElbow, 60.0, 180.0, 1.0);
    assert_eq!(range.deviation(45.0), 15.0);
    assert_eq!(range.deviation(120.0), 0.0);
}

#[test]
fn test_load_partial_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut f = File::create(&path).unwrap();
    writeln!(
        f,
        r#"{{ "feedback": {{ "good_threshold": 90.0 }}, "weights": {{ "stability_window": 7 }} }}"#
    )
    .unwrap();

    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(config.feedback.good_threshold, 90.0);
    assert_eq!(config.feedback.warning_threshold, 60.0);
    assert_eq!(config.weights.stability_window, 7);
    assert_eq!(config.weights.weight_accuracy, 0.5);
    assert_eq!(config.profile.name, "general");
}

#[test]
fn test_load_profile_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("squat.json");
    let mut f = File::create(&path).unwrap();
    writeln!(
        f,
        r#"{{ "name": "squat", "angles": [
            {{ "joint": "left_knee", "min_deg": 70.0, "max_deg": 110.0 }},
            {{ "joint": "right_knee", "min_deg": 70.0, "max_deg": 110.0, "weight": 2.0 }}
        ] }}"#
    )
    .unwrap();

    let profile = MovementProfile::load_from_file(&path).unwrap();
    assert_eq!(profile.name, "squat");
    assert_eq!(profile.angles[0].weight, 1.0);
    assert_eq!(profile.angles[1].weight, 2.0);
}

#[test]
fn test_load_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(PoseForgeError::Json(_))
    ));
    assert!(matches!(
        Config::load_from_file(dir.path().join("absent.json")),
        Err(PoseForgeError::Io(_))
    ));
}

#[test]
fn test_merge_only_overrides_typed_flags() {
    let mut file_config = Config::default();
    file_config.feedback.good_threshold = 92.0;
    file_config.weights.stability_window = 9;

    let (cli, matches) = parse_cli(&["--stability-window", "3", "--max-suggestions", "2"]);
    file_config.merge_from_cli(&cli, &matches);

    assert_eq!(file_config.weights.stability_window, 3);
    assert_eq!(file_config.feedback.max_suggestions, 2);
    // Untyped flags keep the file's value, not the clap default.
    assert_eq!(file_config.feedback.good_threshold, 92.0);
}
