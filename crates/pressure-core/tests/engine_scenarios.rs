//! End-to-end engine scenarios.
//!
//! These drive a full coordinator through scripted population curves and
//! verify the phase sequencing, subsystem responses, and cross-region
//! attraction that the engine exists to produce.

use pressure_core::{EngineConfig, PressureCoordinator, PressureError};
use pressure_events::{BoostCategory, PressurePhase, WildlifeState, WildlifeTier};

const DT: f64 = 0.5;

fn tick_for(coordinator: &mut PressureCoordinator, seconds: f64) {
    let steps = (seconds / DT).round() as usize;
    for _ in 0..steps {
        coordinator.tick(DT).unwrap();
    }
}

/// Runs the town through a long crowded stretch and a sudden dispersal,
/// checking the canonical phase sequence on the way.
#[test]
fn test_town_crowding_and_dispersal() {
    let mut coordinator = PressureCoordinator::new(EngineConfig::default());
    coordinator.register_region("town", (0.0, 0.0)).unwrap();

    coordinator.set_population("town", 0.85).unwrap();
    let mut phases = Vec::new();
    for _ in 0..480 {
        coordinator.tick(DT).unwrap();
        let phase = coordinator.get_snapshot("town").unwrap().phase;
        if phases.last() != Some(&phase) {
            phases.push(phase);
        }
    }

    // 240 seconds of crowding: audio leads, then both indices saturate
    assert!(phases.contains(&PressurePhase::AudioLeading), "{:?}", phases);
    let snap = coordinator.get_snapshot("town").unwrap();
    assert_eq!(snap.phase, PressurePhase::FullyPressured);
    assert!(snap.fast_index > 0.5);
    assert!(snap.lagged_index > 0.5);

    // Everything skittish through bold has long since gone
    for tier in WildlifeTier::all() {
        assert_eq!(snap.wildlife_tier(*tier).unwrap().state, WildlifeState::Absent);
    }
    // Wear layers ordered by time constant; the two fast layers have had
    // time to saturate, damage has not
    let grass = snap.surface("grass").unwrap();
    assert!(grass.displacement >= grass.discoloration);
    assert!(grass.discoloration > grass.damage);
    assert!(grass.displacement > 0.9);
    assert!(grass.damage < 1.0);

    // The crowd scatters
    coordinator.set_population("town", 0.10).unwrap();
    tick_for(&mut coordinator, 4.0);
    let snap = coordinator.get_snapshot("town").unwrap();

    // Within seconds the fast index has collapsed, the lagged one has not
    assert!(snap.fast_index < 0.0, "fast index {}", snap.fast_index);
    assert!(snap.lagged_index > 0.5, "lagged index {}", snap.lagged_index);
    assert_eq!(snap.phase, PressurePhase::VisualTrailing);
    assert!(snap.pressure_differential < -0.5);

    // Ten seconds after the dispersal the lagged index still reads crowded
    tick_for(&mut coordinator, 10.0);
    let snap = coordinator.get_snapshot("town").unwrap();
    assert!(snap.lagged_index > 0.2, "lagged index {}", snap.lagged_index);

    // Bold wildlife returns first; skittish is still holding out
    tick_for(&mut coordinator, 31.0);
    let snap = coordinator.get_snapshot("town").unwrap();
    assert_ne!(snap.wildlife_tier(WildlifeTier::Bold).unwrap().state, WildlifeState::Absent);
    assert_eq!(
        snap.wildlife_tier(WildlifeTier::Skittish).unwrap().state,
        WildlifeState::Absent
    );

    // Minutes later the region reads calm again and the most sensitive
    // tier has at least begun its staged return
    tick_for(&mut coordinator, 180.0);
    let snap = coordinator.get_snapshot("town").unwrap();
    assert_eq!(snap.phase, PressurePhase::Pristine);
    assert_ne!(
        snap.wildlife_tier(WildlifeTier::Skittish).unwrap().state,
        WildlifeState::Absent
    );
    // Displacement heals well ahead of damage
    let grass = snap.surface("grass").unwrap();
    assert!(grass.displacement < grass.damage);
}

/// A crowded festival ground lifts a quiet meadow 400 units away, but not
/// a field outside the broadcast radius, and the lift winds down after
/// the festival empties.
#[test]
fn test_attraction_overflow_between_regions() {
    let mut coordinator = PressureCoordinator::new(EngineConfig::default());
    coordinator.register_region("festival_ground", (0.0, 0.0)).unwrap();
    coordinator.register_region("near_meadow", (400.0, 0.0)).unwrap();
    coordinator.register_region("far_field", (3000.0, 0.0)).unwrap();

    coordinator.set_population("festival_ground", 0.95).unwrap();
    coordinator.set_population("near_meadow", 0.05).unwrap();
    coordinator.set_population("far_field", 0.05).unwrap();
    tick_for(&mut coordinator, 60.0);

    let meadow = coordinator.get_snapshot("near_meadow").unwrap();
    assert!(!meadow.attraction.is_empty(), "meadow received no boosts");
    assert!(meadow.boost(BoostCategory::WildlifeSpawn) > 0.0);
    assert_eq!(meadow.attraction[0].source_region, "festival_ground");

    // The boost shows up in the meadow's own outputs
    let bold = meadow.wildlife_tier(WildlifeTier::Bold).unwrap();
    assert!(bold.spawn_multiplier > 1.0, "spawn {}", bold.spawn_multiplier);

    let far = coordinator.get_snapshot("far_field").unwrap();
    assert!(far.attraction.is_empty(), "far field is out of radius");

    // The source itself is never boosted
    let festival = coordinator.get_snapshot("festival_ground").unwrap();
    assert!(festival.attraction.is_empty());

    // Festival empties; lagged pressure, grace, and decay all run out
    coordinator.set_population("festival_ground", 0.05).unwrap();
    tick_for(&mut coordinator, 150.0);
    let meadow = coordinator.get_snapshot("near_meadow").unwrap();
    assert!(meadow.attraction.is_empty(), "boosts never decayed");
}

/// A zero timestep publishes byte-identical snapshots and advances nothing.
#[test]
fn test_zero_timestep_preserves_published_output() {
    let mut coordinator = PressureCoordinator::new(EngineConfig::default());
    coordinator.register_region("town", (0.0, 0.0)).unwrap();
    coordinator.register_region("meadow", (300.0, 0.0)).unwrap();
    coordinator.set_population("town", 0.7).unwrap();
    tick_for(&mut coordinator, 30.0);

    let before: Vec<String> = coordinator.snapshots().map(|s| s.to_json().unwrap()).collect();
    coordinator.tick(0.0).unwrap();
    let after: Vec<String> = coordinator.snapshots().map(|s| s.to_json().unwrap()).collect();

    assert_eq!(before, after);
    assert_eq!(coordinator.current_tick(), 60);
    assert_eq!(coordinator.time_seconds(), 30.0);
}

/// Two coordinators fed the same inputs stay byte-identical for the whole
/// run, jitter included.
#[test]
fn test_full_run_determinism() {
    let script = |coordinator: &mut PressureCoordinator| -> Vec<String> {
        coordinator.register_region("town", (0.0, 0.0)).unwrap();
        coordinator.register_region("meadow", (350.0, 0.0)).unwrap();
        let mut outputs = Vec::new();
        for i in 0..400u32 {
            let population = if i < 200 { 0.8 } else { 0.1 };
            coordinator.set_population("town", population).unwrap();
            coordinator.tick(DT).unwrap();
            if i % 50 == 0 {
                for snap in coordinator.snapshots() {
                    outputs.push(snap.to_json().unwrap());
                }
            }
        }
        outputs
    };

    let a = script(&mut PressureCoordinator::new(EngineConfig::default()));
    let b = script(&mut PressureCoordinator::new(EngineConfig::default()));
    assert_eq!(a, b);
}

/// Config overrides from TOML reach the running engine.
#[test]
fn test_toml_tuning_changes_behavior() {
    let toml = r#"
        [attraction]
        radius = 5000.0
    "#;
    let config = EngineConfig::from_toml_str(toml).unwrap();
    let mut coordinator = PressureCoordinator::new(config);
    coordinator.register_region("festival_ground", (0.0, 0.0)).unwrap();
    coordinator.register_region("far_field", (3000.0, 0.0)).unwrap();
    coordinator.set_population("festival_ground", 0.95).unwrap();
    tick_for(&mut coordinator, 60.0);

    // With the widened radius the far field now hears the festival
    let far = coordinator.get_snapshot("far_field").unwrap();
    assert!(!far.attraction.is_empty());
}

/// Validation failures surface as errors and leave the engine untouched.
#[test]
fn test_validation_errors_do_not_corrupt_state() {
    let mut coordinator = PressureCoordinator::new(EngineConfig::default());
    coordinator.register_region("town", (0.0, 0.0)).unwrap();
    coordinator.set_population("town", 0.6).unwrap();
    tick_for(&mut coordinator, 10.0);
    let before = coordinator.get_snapshot("town").unwrap().to_json().unwrap();

    assert_eq!(
        coordinator.tick(-0.5),
        Err(PressureError::InvalidTimestep(-0.5))
    );
    assert!(matches!(
        coordinator.set_population("ghost_town", 0.5),
        Err(PressureError::UnknownRegion(_))
    ));
    assert_eq!(
        coordinator.register_region("town", (1.0, 1.0)),
        Err(PressureError::DuplicateRegion("town".to_string()))
    );

    let after = coordinator.get_snapshot("town").unwrap().to_json().unwrap();
    assert_eq!(before, after);
    assert_eq!(coordinator.current_tick(), 20);
}
