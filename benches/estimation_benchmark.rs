use criterion::{criterion_group, criterion_main, Criterion};
use fittrack::models::{Exercise, WorkoutType};
use fittrack::services::ai::extract_json;
use fittrack::services::{calories, nutrition};
use std::hint::black_box;

fn exercise(name: &str, sets: u32, reps: u32, weight: f64) -> Exercise {
    Exercise {
        name: name.to_string(),
        sets: Some(sets),
        reps: Some(reps),
        weight: Some(weight),
        duration_minutes: None,
        intensity: None,
    }
}

fn benchmark_nutrition_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("nutrition_lookup");

    // Compound key near the end of the table
    group.bench_function("compound_key", |b| {
        b.iter(|| nutrition::estimate(black_box("Dal Rice"), black_box("1 cup")))
    });

    // Misses every key and falls through to the generic default
    group.bench_function("unknown_food", |b| {
        b.iter(|| nutrition::estimate(black_box("grandma's mystery casserole"), black_box("")))
    });

    group.finish();
}

fn benchmark_burn_estimate(c: &mut Criterion) {
    let exercises: Vec<Exercise> = (0..12)
        .map(|i| exercise(&format!("Lift {i}"), 4, 10, 40.0 + f64::from(i)))
        .collect();

    c.bench_function("estimate_burn_strength", |b| {
        b.iter(|| {
            calories::estimate_burn(
                black_box(WorkoutType::Strength),
                black_box(&exercises),
                black_box(55.0),
                black_box(70.0),
            )
        })
    });
}

fn benchmark_extract_json(c: &mut Criterion) {
    let fenced = format!(
        "Here are some ideas:\n```json\n{}\n```\nEnjoy!",
        serde_json::json!([
            {"name": "Grilled chicken salad", "calories": 420, "protein": 38},
            {"name": "Lentil soup", "calories": 350, "protein": 18},
            {"name": "Greek yogurt bowl", "calories": 280, "protein": 20}
        ])
    );
    let bare = format!("Sure! {} Let me know.", r#"{"calories": 250, "protein": 12}"#);

    let mut group = c.benchmark_group("extract_json");

    group.bench_function("fenced_array", |b| b.iter(|| extract_json(black_box(&fenced))));

    group.bench_function("bare_object_in_prose", |b| {
        b.iter(|| extract_json(black_box(&bare)))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_nutrition_lookup,
    benchmark_burn_estimate,
    benchmark_extract_json
);
criterion_main!(benches);
