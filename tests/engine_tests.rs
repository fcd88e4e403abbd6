//! Integration tests driving the engine through its public API.

use std::time::{Duration, Instant};

use energy_orb::prelude::*;
use energy_orb::Presentation;

fn engine(width: u32, height: u32, seed: u64) -> Engine<DiscBatch> {
    Engine::create(DiscBatch::new(width, height), EngineConfig::default().with_seed(seed))
        .expect("default engine")
}

// ============================================================================
// Population
// ============================================================================

#[test]
fn test_thousand_ticks_reach_steady_population() {
    let mut engine = engine(400, 400, 2024);
    for _ in 0..1000 {
        assert!(engine.tick());
    }

    let stats = engine.stats();
    assert_eq!(stats.tick, 1000);
    assert!(
        (3000..=4500).contains(&stats.active),
        "active population {} outside the expected band",
        stats.active
    );
    assert_eq!(stats.active + stats.free, stats.allocated);
    assert_eq!(stats.rendered, stats.active);

    for p in engine.scene().particles() {
        assert!(p.projected.is_finite());
        assert!(p.projected.x >= 0.0 && p.projected.x <= 400.0);
        assert!(p.projected.y >= 0.0 && p.projected.y <= 400.0);
        assert!(p.rotated_z <= engine.config().z_max);
        assert!((0.0..=1.0).contains(&p.alpha));
    }
}

#[test]
fn test_population_stays_bounded() {
    let mut engine = engine(400, 400, 7);
    let mut peak = 0;
    for _ in 0..3000 {
        engine.tick();
        peak = peak.max(engine.stats().active);
    }
    assert!(peak <= 4500, "peak population {} kept growing", peak);
    // Free slots are reused, so allocation tracks the peak rather than the
    // total number of spawns (24 000).
    assert!(engine.stats().allocated <= peak + 8);
}

#[test]
fn test_pool_partition_holds_every_tick() {
    let mut engine = engine(300, 200, 11);
    for _ in 0..800 {
        engine.tick();
        let pool = engine.scene().pool();
        assert!(pool.is_partitioned());
        assert_eq!(pool.active_len() + pool.free_len(), pool.allocated());
    }
}

#[test]
fn test_particles_are_recycled() {
    let mut engine = engine(400, 400, 3);
    for _ in 0..600 {
        engine.tick();
    }
    let stats = engine.stats();
    assert!(stats.free > 0 || stats.active < 600 * 8);
    assert!(stats.allocated < 600 * 8);
}

#[test]
fn test_small_surface_holds_fewer_particles() {
    let mut small = engine(200, 200, 5);
    let mut large = engine(400, 400, 5);
    for _ in 0..1000 {
        small.tick();
        large.tick();
    }
    assert!(small.stats().active < large.stats().active);
}

// ============================================================================
// Control port
// ============================================================================

#[test]
fn test_highlight_switches_palette_on_next_tick() {
    let mut engine = engine(400, 400, 9);
    for _ in 0..50 {
        engine.tick();
    }

    engine.set_highlighted(true);
    engine.tick();
    let orange = Palette::RECORDING_ORANGE.with_alpha(1.0);
    assert!(!engine.surface().is_blank());
    assert!(engine
        .surface()
        .instances()
        .iter()
        .all(|d| d.color[..3] == orange[..3]));

    engine.set_highlighted(false);
    engine.tick();
    let blue = Palette::IDLE_BLUE.with_alpha(1.0);
    assert!(engine
        .surface()
        .instances()
        .iter()
        .all(|d| d.color[..3] == blue[..3]));
}

#[test]
fn test_custom_palette_from_config() {
    let palette = Palette {
        normal: Rgb::new(10, 200, 180),
        highlighted: Rgb::new(255, 0, 0),
    };
    let mut engine = Engine::create(
        DiscBatch::new(400, 400),
        EngineConfig::default().with_seed(1).with_palette(palette),
    )
    .expect("engine");
    for _ in 0..20 {
        engine.tick();
    }
    let expected = palette.normal.with_alpha(1.0);
    assert!(engine
        .surface()
        .instances()
        .iter()
        .all(|d| d.color[..3] == expected[..3]));
}

#[test]
fn test_anchor_transition_settles_on_docked_presentation() {
    let mut engine = engine(400, 400, 13);
    let rect = AnchorRect::new(600.0, 80.0, 480.0, 270.0);
    engine.set_anchor(Some(rect));
    assert_eq!(engine.anchor(), Some(rect));

    let duration = engine.config().anchor.transition_ticks;
    engine.tick();
    let mid = engine.presentation();
    assert!(mid.scale < 1.0 && mid.scale > 0.25);

    for _ in 0..duration {
        engine.tick();
    }
    let docked = engine.presentation();
    assert_eq!(docked.scale, 0.25);
    assert_eq!(docked.origin, Vec2::new(470.0, 80.0));

    engine.set_anchor(None);
    for _ in 0..=duration {
        engine.tick();
    }
    assert_eq!(engine.presentation(), Presentation::CENTERED);
}

#[test]
fn test_resize_to_zero_pauses_simulation() {
    let mut engine = engine(400, 400, 17);
    for _ in 0..10 {
        engine.tick();
    }
    let before = engine.stats();

    engine.resize(0, 0);
    for _ in 0..10 {
        assert!(!engine.tick());
    }
    assert_eq!(engine.stats().tick, before.tick);
    assert_eq!(engine.stats().active, before.active);

    engine.resize(640, 480);
    assert!(engine.tick());
    assert_eq!(engine.scene().viewport(), (640, 480));
}

#[test]
fn test_destroy_stops_everything() {
    let mut engine = engine(400, 400, 19);
    for _ in 0..100 {
        engine.tick();
    }

    engine.destroy();
    assert!(!engine.is_running());
    assert_eq!(engine.next_deadline(), None);
    assert_eq!(engine.advance(Instant::now() + Duration::from_secs(60)), 0);
    assert_eq!(engine.stats().active, 0);

    // Controls are ignored after destroy
    engine.set_highlighted(true);
    assert!(!engine.is_highlighted());
    engine.destroy();
}

#[test]
fn test_clock_driven_ticks() {
    let config = EngineConfig::default()
        .with_seed(23)
        .with_tick_interval(Duration::from_millis(10));
    let mut engine = Engine::create(DiscBatch::new(400, 400), config).expect("engine");

    let start = Instant::now();
    let first = engine.advance(start);
    assert!(first >= 1);

    let deadline = engine.next_deadline().expect("running");
    let ran = engine.advance(deadline);
    assert!(ran >= 1);
    assert_eq!(engine.stats().tick, u64::from(first + ran));
}

// ============================================================================
// Canvas output
// ============================================================================

#[test]
fn test_canvas_snapshot_has_blue_pixels() {
    let mut engine = Engine::create(Canvas::new(200, 200), EngineConfig::default().with_seed(29))
        .expect("engine");
    for _ in 0..120 {
        engine.tick();
    }

    let canvas = engine.surface();
    assert!(canvas.covered_pixels() > 0);
    let covered: Vec<_> = canvas.image().pixels().filter(|p| p[3] > 0).collect();
    assert!(covered.iter().all(|p| p[0] == 0 && p[1] == 72 && p[2] == 255));
}
