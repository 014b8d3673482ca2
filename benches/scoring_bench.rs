use criterion::{criterion_group, criterion_main, Criterion};
use poseforge::config::Config;
use poseforge::pose::{Keypoint, PoseFrame, PoseSequence};
use poseforge::scorer::Scorer;
use poseforge::skeleton::Landmark;
use std::hint::black_box;
use strum::IntoEnumIterator;

/// A jittery standing pose, long enough to exercise the full lag search.
fn setup_sequence(n: usize) -> PoseSequence {
    let mut rng = fastrand::Rng::with_seed(42);
    let frames = (0..n)
        .map(|i| {
            let t = i as f32 * 0.2;
            let keypoints = Landmark::iter()
                .enumerate()
                .map(|(j, lm)| {
                    let side = if lm.to_string().starts_with("left") { -1.0 } else { 1.0 };
                    let x = 0.5 + side * (0.1 + 0.02 * t.sin()) + 0.01 * (rng.f32() - 0.5);
                    let y = 0.05 * j as f32 + 0.01 * (rng.f32() - 0.5);
                    Keypoint::new(lm.to_string(), x, y, 0.6 + 0.4 * rng.f32())
                })
                .collect();
            PoseFrame::new(keypoints, 0.85)
        })
        .collect();
    PoseSequence::new(frames, 0)
}

fn bench_analyze(c: &mut Criterion) {
    let scorer = Scorer::new(Config::default()).expect("default config");
    let short = setup_sequence(30);
    let long = setup_sequence(300);

    c.bench_function("analyze_30_frames", |b| {
        b.iter(|| scorer.analyze(black_box(&short)))
    });
    c.bench_function("analyze_300_frames", |b| {
        b.iter(|| scorer.analyze(black_box(&long)))
    });
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
