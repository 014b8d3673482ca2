use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use poseforge::config::FeedbackRules;
use poseforge::error::PfResult;
use poseforge::scorer::{AnalysisDetails, FeedbackKind};
use poseforge::validator::ValidatedSequence;
use serde::Serialize;
use std::path::Path;

fn score_cell(score: u8, rules: &FeedbackRules) -> Cell {
    let s = score as f32;
    let cell = Cell::new(score).set_alignment(CellAlignment::Right);
    if s >= rules.good_threshold {
        cell.fg(Color::Green)
    } else if s >= rules.warning_threshold {
        cell.fg(Color::Yellow)
    } else {
        cell.fg(Color::Red)
    }
}

pub fn print_score_report(name: &str, d: &AnalysisDetails, rules: &FeedbackRules) {
    println!("\n🏋️  === MOVEMENT REPORT: {} === ", name);

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Overall").add_attribute(Attribute::Bold),
        Cell::new("Accuracy"),
        Cell::new("Coord"),
        Cell::new("Stability"),
        Cell::new("Frames"),
        Cell::new("Usable"),
        Cell::new("Dropped").fg(Color::Red),
    ]);

    let r = &d.report;
    table.add_row(vec![
        score_cell(r.overall, rules).add_attribute(Attribute::Bold),
        score_cell(r.accuracy, rules),
        score_cell(r.coordination, rules),
        score_cell(r.stability, rules),
        Cell::new(d.total).set_alignment(CellAlignment::Right),
        Cell::new(d.usable).set_alignment(CellAlignment::Right),
        Cell::new(format!("{} ({:.0}%)", d.dropped, d.dropped_ratio() * 100.0))
            .set_alignment(CellAlignment::Right),
    ]);
    println!("{}", table);

    if !d.pairs.is_empty() {
        print_pair_table(d);
    }

    let mut fb = Table::new();
    fb.load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    fb.add_row(vec![
        Cell::new("").add_attribute(Attribute::Bold),
        Cell::new("Feedback").add_attribute(Attribute::Bold),
    ]);
    for item in &r.feedback {
        let color = match item.kind {
            FeedbackKind::Good => Color::Green,
            FeedbackKind::Improvement => Color::Yellow,
            FeedbackKind::Warning => Color::Red,
        };
        fb.add_row(vec![
            Cell::new(&item.icon).set_alignment(CellAlignment::Center),
            Cell::new(&item.text).fg(color),
        ]);
    }
    println!("{}", fb);

    if !r.suggestions.is_empty() {
        println!("Suggestions:");
        for (i, s) in r.suggestions.iter().enumerate() {
            println!("  {}. {}", i + 1, s);
        }
    }
}

fn print_pair_table(d: &AnalysisDetails) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Pair").add_attribute(Attribute::Bold),
        Cell::new("Samples"),
        Cell::new("Lag"),
        Cell::new("Corr"),
        Cell::new("ΔAngle"),
        Cell::new("Score").fg(Color::Cyan),
    ]);

    for i in 1..=5 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for p in &d.pairs {
        table.add_row(vec![
            Cell::new(p.limb).add_attribute(Attribute::Bold),
            Cell::new(p.samples),
            Cell::new(p.lag),
            Cell::new(
                p.correlation
                    .map(|c| format!("{:.2}", c))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(format!("{:.1}°", p.mean_diff_deg)),
            Cell::new(format!("{:.0}", p.score)).fg(Color::Cyan),
        ]);
    }
    println!("{}", table);
}

pub fn print_validation_report(name: &str, v: &ValidatedSequence) {
    println!("\n🔎 === FRAME AUDIT: {} === 🔎", name);
    println!(
        "Total: {} | Usable: {} | Dropped: {} ({:.0}%)",
        v.total,
        v.usable(),
        v.dropped,
        v.dropped_ratio() * 100.0
    );

    if v.drops.is_empty() {
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec![
        Cell::new("Frame").add_attribute(Attribute::Bold),
        Cell::new("Reason").add_attribute(Attribute::Bold),
    ]);
    for drop in &v.drops {
        table.add_row(vec![
            Cell::new(drop.index).set_alignment(CellAlignment::Right),
            Cell::new(drop.reason.to_string()).fg(Color::Red),
        ]);
    }
    println!("{}", table);
}

#[derive(Serialize)]
struct TraceRow<'a> {
    source: &'a str,
    frame: usize,
    frame_score: f32,
    accuracy: Option<f32>,
    residual: Option<f32>,
    unreliable_keypoints: usize,
}

/// Writes one CSV row per usable frame across all analyzed inputs.
pub fn write_frame_trace<P: AsRef<Path>>(path: P, runs: &[(String, &AnalysisDetails)]) -> PfResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for (source, details) in runs {
        for t in &details.frames {
            wtr.serialize(TraceRow {
                source,
                frame: t.index,
                frame_score: t.frame_score,
                accuracy: t.accuracy,
                residual: t.residual,
                unreliable_keypoints: t.unreliable_keypoints,
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}
