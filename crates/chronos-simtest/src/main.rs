//! Chronos Atlas Headless Time Harness
//!
//! Validates the pure chrono engine and the bundled spacetime catalogue
//! without any UI or storage. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p chronos-simtest
//!   cargo run -p chronos-simtest -- --verbose
//!   RUST_LOG=debug cargo run -p chronos-simtest

use chronos_engine::calendar::{preset_configs, CalendarType};
use chronos_engine::config::{get_full_config, try_full_config, PartialTimeConfig, TimeConfig};
use chronos_engine::convert::{calendar_to_ticks, ticks_to_calendar};
use chronos_engine::cursor::TimeCursor;
use chronos_engine::format::{format_local_date, format_universal_tick, DateFormat};
use chronos_engine::lifespan::{EntityStatus, Lifespan};
use chronos_engine::spacetime::{SpacetimeCatalog, CANON_ID};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

// ── Spacetime catalogue (same JSON a project export carries) ────────────
const SPACETIMES_JSON: &str = include_str!("../../../data/spacetimes.json");

/// Stored record shape, read without the engine's validation.
#[derive(Debug, Deserialize)]
struct SpacetimeRecord {
    id: String,
    is_canon: bool,
    #[serde(default)]
    time_config: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    divergence: Option<serde_json::Value>,
}

const TIME_CONFIG_KEYS: [&str; 5] = [
    "tick_multiplier",
    "calendar",
    "epoch_name",
    "year_length",
    "day_length",
];

const TICKS_PER_DAY: i64 = 24 * 60;
const SWEEP_SEED: u64 = 0xC4_2025;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Chronos Atlas Time Harness ===\n");

    let mut results = Vec::new();

    // 1. Spacetime catalogue
    results.extend(validate_spacetime_catalogue(verbose));

    // 2. Preset table
    results.extend(validate_presets(verbose));

    // 3. Conversion landmarks
    results.extend(validate_landmarks(verbose));

    // 4. Round-trip sweeps
    results.extend(validate_round_trips(verbose));

    // 5. Formatting
    results.extend(validate_formatting(verbose));

    // 6. Config resolution
    results.extend(validate_config_resolution(verbose));

    // 7. Timeline navigation
    results.extend(validate_navigation(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        log::error!("{} checks failed", failed);
        std::process::exit(1);
    }
}

// ── 1. Spacetime Catalogue ──────────────────────────────────────────────

fn validate_spacetime_catalogue(verbose: bool) -> Vec<TestResult> {
    println!("--- Spacetime Catalogue ---");
    let mut results = Vec::new();

    let records: Vec<SpacetimeRecord> = match serde_json::from_str(SPACETIMES_JSON) {
        Ok(r) => r,
        Err(e) => {
            results.push(TestResult {
                name: "catalogue_json".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    let canons: Vec<_> = records.iter().filter(|r| r.is_canon).collect();
    results.push(TestResult {
        name: "catalogue_single_canon".into(),
        passed: canons.len() == 1 && canons.iter().all(|r| r.divergence.is_none()),
        detail: format!("{} canon record(s)", canons.len()),
    });

    // Unknown keys are dropped silently by the engine, so catch typos here
    let stray_keys: Vec<_> = records
        .iter()
        .flat_map(|r| {
            r.time_config
                .keys()
                .filter(|k| !TIME_CONFIG_KEYS.contains(&k.as_str()))
                .map(move |k| format!("{}.{}", r.id, k))
        })
        .collect();
    results.push(TestResult {
        name: "catalogue_known_config_keys".into(),
        passed: stray_keys.is_empty(),
        detail: if stray_keys.is_empty() {
            "every time_config key is recognised".into()
        } else {
            format!("unknown keys: {}", stray_keys.join(", "))
        },
    });

    let catalog = match SpacetimeCatalog::from_json(SPACETIMES_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "catalogue_parse".into(),
                passed: false,
                detail: format!("catalogue error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "catalogue_not_empty".into(),
        passed: catalog.spacetimes().len() > 1,
        detail: format!("{} spacetimes loaded", catalog.spacetimes().len()),
    });

    let canon_selected = catalog.current().map(|s| s.id.as_str()) == Some(CANON_ID);
    results.push(TestResult {
        name: "catalogue_canon_selected".into(),
        passed: canon_selected,
        detail: "canon spacetime is the initial selection".into(),
    });

    // Every stored calendar must pass strict validation
    let invalid: Vec<_> = catalog
        .spacetimes()
        .iter()
        .filter(|s| try_full_config(&s.time_config).is_err())
        .map(|s| s.id.as_str())
        .collect();
    results.push(TestResult {
        name: "catalogue_valid_calendars".into(),
        passed: invalid.is_empty(),
        detail: if invalid.is_empty() {
            "all spacetime calendars are valid".into()
        } else {
            format!("invalid calendars: {}", invalid.join(", "))
        },
    });

    // Before each divergence tick a branch must resolve to its parent
    let mut bad_inheritance = Vec::new();
    for spacetime in catalog.spacetimes() {
        let Some(div) = &spacetime.divergence else {
            continue;
        };
        let before = catalog.source_for_tick(&spacetime.id, div.tick - 1);
        let at = catalog.source_for_tick(&spacetime.id, div.tick);
        let inherits = matches!(before, Ok(s) if s.id != spacetime.id);
        let owns = matches!(at, Ok(s) if s.id == spacetime.id);
        if !inherits || !owns {
            bad_inheritance.push(spacetime.id.clone());
        }
    }
    results.push(TestResult {
        name: "catalogue_divergence_inheritance".into(),
        passed: bad_inheritance.is_empty(),
        detail: if bad_inheritance.is_empty() {
            "branches inherit from their parents before divergence".into()
        } else {
            format!("bad inheritance: {}", bad_inheritance.join(", "))
        },
    });

    if verbose {
        for spacetime in catalog.spacetimes() {
            let config = spacetime.resolved_config();
            println!(
                "    {:<14} {:<15} year={} day={}h x{}",
                spacetime.id,
                config.calendar,
                config.year_length,
                config.day_length,
                config.tick_multiplier
            );
            for t in [0, 1_000_000, 52_560_000] {
                let date = ticks_to_calendar(t, &config);
                println!(
                    "      tick {:>8} → {}",
                    format_universal_tick(t),
                    format_local_date(&date, DateFormat::Full)
                );
            }
        }
    }

    results
}

// ── 2. Presets ──────────────────────────────────────────────────────────

fn validate_presets(_verbose: bool) -> Vec<TestResult> {
    println!("--- Calendar Presets ---");
    let mut results = Vec::new();

    let presets = preset_configs();
    results.push(TestResult {
        name: "preset_count".into(),
        passed: presets.len() == 4,
        detail: format!("{} presets", presets.len()),
    });

    let incomplete: Vec<_> = presets
        .iter()
        .filter(|(_, p)| {
            p.tick_multiplier.is_none()
                || p.year_length.is_none()
                || p.day_length.is_none()
                || p.epoch_name.is_none()
                || !p.validate().is_empty()
        })
        .map(|(c, _)| c.key())
        .collect();
    results.push(TestResult {
        name: "preset_complete".into(),
        passed: incomplete.is_empty(),
        detail: if incomplete.is_empty() {
            "every preset supplies every field".into()
        } else {
            format!("incomplete presets: {}", incomplete.join(", "))
        },
    });

    let resolved_calendars_match = presets
        .iter()
        .all(|(c, p)| get_full_config(p).calendar == *c);
    results.push(TestResult {
        name: "preset_resolves_to_itself".into(),
        passed: resolved_calendars_match,
        detail: "resolving a preset keeps its calendar".into(),
    });

    results
}

// ── 3. Landmarks ────────────────────────────────────────────────────────

fn simple_calendar() -> TimeConfig {
    get_full_config(&PartialTimeConfig::for_calendar(CalendarType::EarthSimple))
}

fn validate_landmarks(_verbose: bool) -> Vec<TestResult> {
    println!("--- Conversion Landmarks ---");
    let mut results = Vec::new();

    let origin = ticks_to_calendar(0, &TimeConfig::default());
    results.push(TestResult {
        name: "landmark_origin".into(),
        passed: (origin.year, origin.month, origin.day, origin.hour, origin.minute)
            == (1, 1, 1, 0, 0)
            && origin.epoch_name == "Year",
        detail: format!("tick 0 → {}", origin),
    });

    let simple = simple_calendar();
    let day = ticks_to_calendar(TICKS_PER_DAY, &simple);
    results.push(TestResult {
        name: "landmark_one_day".into(),
        passed: (day.year, day.month, day.day) == (1, 1, 2),
        detail: format!("tick 1440 → {}", day),
    });

    let year = ticks_to_calendar(360 * TICKS_PER_DAY, &simple);
    results.push(TestResult {
        name: "landmark_one_year".into(),
        passed: (year.year, year.month, year.day) == (2, 1, 1),
        detail: format!("tick 518400 → {}", year),
    });

    let earth = get_full_config(&PartialTimeConfig::default());
    let clamped = (361..=365i64).all(|d| {
        let date = ticks_to_calendar((d - 1) * TICKS_PER_DAY, &earth);
        (date.month, date.day) == (12, 30)
    });
    results.push(TestResult {
        name: "landmark_trailing_days_clamp".into(),
        passed: clamped,
        detail: "days 361..=365 of a 365-day year render as Dec 30".into(),
    });

    let before_epoch = ticks_to_calendar(-1, &simple);
    results.push(TestResult {
        name: "landmark_before_epoch".into(),
        passed: (
            before_epoch.year,
            before_epoch.month,
            before_epoch.day,
            before_epoch.hour,
            before_epoch.minute,
        ) == (0, 12, 30, 23, 59),
        detail: format!("tick -1 → {}", before_epoch),
    });

    results
}

// ── 4. Round Trips ──────────────────────────────────────────────────────

fn validate_round_trips(verbose: bool) -> Vec<TestResult> {
    println!("--- Round-Trip Sweeps ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(SWEEP_SEED);

    let simple = simple_calendar();
    let span = 360 * TICKS_PER_DAY * 100;
    let samples = 20_000;
    let mut mismatches = 0;
    for _ in 0..samples {
        let t = rng.gen_range(0..span);
        if calendar_to_ticks(&ticks_to_calendar(t, &simple), &simple) != t {
            mismatches += 1;
        }
    }
    results.push(TestResult {
        name: "round_trip_exact".into(),
        passed: mismatches == 0,
        detail: format!("{} samples, {} mismatches", samples, mismatches),
    });

    let mars = get_full_config(&PartialTimeConfig {
        calendar: Some(CalendarType::MarsStandard),
        year_length: Some(672),
        ..PartialTimeConfig::default()
    });
    let mut worst = 0i64;
    for _ in 0..samples {
        let t = rng.gen_range(0..span);
        let back = calendar_to_ticks(&ticks_to_calendar(t, &mars), &mars);
        worst = worst.max((back - t).abs());
    }
    results.push(TestResult {
        name: "round_trip_scaled".into(),
        passed: worst <= 1,
        detail: format!("x{} multiplier, worst drift {} ticks", mars.tick_multiplier, worst),
    });

    let huge = (1i64 << 60) + 7;
    let back = calendar_to_ticks(&ticks_to_calendar(huge, &simple), &simple);
    results.push(TestResult {
        name: "round_trip_beyond_f64_precision".into(),
        passed: back == huge,
        detail: format!("2^60 + 7 → {}", back),
    });

    if verbose {
        println!("    sweep seed {:#x}", SWEEP_SEED);
    }

    results
}

// ── 5. Formatting ───────────────────────────────────────────────────────

fn validate_formatting(_verbose: bool) -> Vec<TestResult> {
    println!("--- Formatting ---");
    let mut results = Vec::new();

    let cases = [
        (1_500_000i64, "1.50M"),
        (500, "500"),
        (1_234, "1.2K"),
        (2_750_000_000, "2.75B"),
        (1_250, "1.3K"),
    ];
    let bad: Vec<_> = cases
        .iter()
        .filter(|(t, expected)| format_universal_tick(*t) != *expected)
        .map(|(t, expected)| format!("{} → {} (want {})", t, format_universal_tick(*t), expected))
        .collect();
    results.push(TestResult {
        name: "format_universal_tick".into(),
        passed: bad.is_empty(),
        detail: if bad.is_empty() {
            format!("{} suffix cases", cases.len())
        } else {
            bad.join("; ")
        },
    });

    let morning = ticks_to_calendar(9 * 60 + 5, &get_full_config(&PartialTimeConfig::default()));
    let time = format_local_date(&morning, DateFormat::Time);
    let full = format_local_date(&morning, DateFormat::Full);
    results.push(TestResult {
        name: "format_local_date".into(),
        passed: time == "09:05" && full == "CE 1, Jan 1, 09:05",
        detail: format!("{} | {}", full, time),
    });

    let modes_parse = ["full", "short", "date", "time", "epoch"]
        .iter()
        .all(|m| m.parse::<DateFormat>().is_ok());
    results.push(TestResult {
        name: "format_modes_parse".into(),
        passed: modes_parse,
        detail: "all display modes parse by name".into(),
    });

    results
}

// ── 6. Config Resolution ────────────────────────────────────────────────

fn validate_config_resolution(_verbose: bool) -> Vec<TestResult> {
    println!("--- Config Resolution ---");
    let mut results = Vec::new();

    let mars = get_full_config(&PartialTimeConfig {
        calendar: Some(CalendarType::MarsStandard),
        year_length: Some(700),
        ..PartialTimeConfig::default()
    });
    results.push(TestResult {
        name: "config_explicit_over_preset".into(),
        passed: mars.tick_multiplier == 1.027
            && mars.year_length.get() == 700
            && mars.day_length.get() == 24
            && mars.epoch_name == "Mars Year",
        detail: format!(
            "mars + year 700 → x{} {}d {}h '{}'",
            mars.tick_multiplier, mars.year_length, mars.day_length, mars.epoch_name
        ),
    });

    let bad = PartialTimeConfig {
        year_length: Some(0),
        tick_multiplier: Some(-1.0),
        ..PartialTimeConfig::default()
    };
    let lenient = get_full_config(&bad);
    results.push(TestResult {
        name: "config_lenient_fallback".into(),
        passed: lenient.year_length.get() == 365 && lenient.tick_multiplier == 1.0,
        detail: "invalid fields fall back to the preset".into(),
    });
    results.push(TestResult {
        name: "config_strict_rejects".into(),
        passed: try_full_config(&bad).is_err() && bad.validate().len() == 2,
        detail: format!("{} errors reported", bad.validate().len()),
    });

    let unknown = TimeConfig::from_json(r#"{"calendar":"gregorian"}"#);
    results.push(TestResult {
        name: "config_unknown_calendar".into(),
        passed: unknown.is_err(),
        detail: match unknown {
            Ok(_) => "unknown calendar was accepted".into(),
            Err(e) => e.to_string(),
        },
    });

    results
}

// ── 7. Navigation ───────────────────────────────────────────────────────

fn validate_navigation(_verbose: bool) -> Vec<TestResult> {
    println!("--- Timeline Navigation ---");
    let mut results = Vec::new();

    let mut cursor = TimeCursor::new(1_000);
    cursor.step_forward(5_000);
    let clamped_high = cursor.current_tick() == 1_000;
    cursor.step_backward(5_000);
    let clamped_low = cursor.current_tick() == 0;
    results.push(TestResult {
        name: "cursor_clamps".into(),
        passed: clamped_high && clamped_low,
        detail: "stepping saturates at both ends".into(),
    });

    let life = Lifespan::new(Some(100), Some(200));
    let statuses = [
        life.status_at(50),
        life.status_at(100),
        life.status_at(200),
    ];
    results.push(TestResult {
        name: "lifespan_status".into(),
        passed: statuses == [EntityStatus::Unborn, EntityStatus::Alive, EntityStatus::Dead],
        detail: format!("{:?}", statuses),
    });

    let mut catalog = SpacetimeCatalog::default();
    let branch = catalog
        .create_what_if("Harness Branch", CANON_ID, 500)
        .map(|s| s.id.clone());
    let inherits = match &branch {
        Ok(id) => catalog
            .source_for_tick(id, 499)
            .map(|s| s.id == CANON_ID)
            .unwrap_or(false),
        Err(_) => false,
    };
    results.push(TestResult {
        name: "what_if_branch".into(),
        passed: inherits && catalog.is_divergent(),
        detail: match &branch {
            Ok(id) => format!("created {} diverging at tick 500", id),
            Err(e) => format!("branch creation failed: {}", e),
        },
    });

    results
}
