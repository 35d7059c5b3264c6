//! End-to-end scenarios: catalog → composition → clock → kinematics →
//! rendering, through the public crate APIs.

use std::f64::consts::PI;

use glam::DVec3;
use orrery_app::{FrameScheduler, SimulationClock};
use orrery_catalog::{
    CelestialBodyDescriptor, CelestialCatalog, CoronaDescriptor, OrbitDescriptor, RingDescriptor,
    RingDivision, StarProperties,
};
use orrery_orbit::{CircularLaw, OrbitalKinematics, keplerian_radius};
use orrery_render::{Camera, FrameCapture, PipelineSettings, ShadingPipeline};
use orrery_rings::RingFieldGenerator;
use orrery_scene::{MemoryAssetResolver, SceneComposer, SceneRoot};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn sun() -> CelestialBodyDescriptor {
    CelestialBodyDescriptor::star(
        "sun",
        20.0,
        StarProperties {
            temperature: 5800.0,
            luminosity: 1.0,
            corona: CoronaDescriptor {
                intensity: 1.0,
                pulse_speed: 1.0,
                flare_frequency: 8.0,
                size: 1.5,
            },
        },
    )
}

fn compose(bodies: Vec<CelestialBodyDescriptor>) -> SceneRoot {
    let catalog = CelestialCatalog::new(bodies);
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let composition = SceneComposer::new()
        .compose(&catalog, &mut MemoryAssetResolver::new(), &mut rng)
        .unwrap();
    assert!(composition.rejected.is_empty(), "{:?}", composition.rejected);
    composition.scene
}

fn tiny_scheduler(scene: SceneRoot, frame_time: f64) -> FrameScheduler {
    let settings = PipelineSettings {
        width: 16,
        height: 12,
        star_count: 20,
        milky_way: 0.0,
        ..PipelineSettings::default()
    };
    FrameScheduler::new(
        scene,
        Camera::looking_at(DVec3::new(0.0, 200.0, 400.0), DVec3::ZERO, 0.9, 16.0 / 12.0),
        SimulationClock::new(),
        OrbitalKinematics::new(),
        ShadingPipeline::with_default_passes(&settings),
    )
    .with_fixed_frame_time(frame_time)
}

#[test]
fn test_circular_planet_half_period() {
    let mut scene = compose(vec![
        sun(),
        CelestialBodyDescriptor::planet("planet", 5.0, 100.0),
    ]);
    let period = CircularLaw::PLANETARY.period(100.0);

    OrbitalKinematics::new().advance_scene(&mut scene, period / 2.0);
    let planet = scene.find("planet").unwrap();
    let position = planet.state.world_position;
    assert!((position - DVec3::new(-100.0, 0.0, 0.0)).length() < 1e-6, "{position}");
    assert!((position.length() - 100.0).abs() < 1e-9);
    assert_eq!(scene.star().state.world_position, DVec3::ZERO);
}

#[test]
fn test_circular_half_period_through_the_clock() {
    let scene = compose(vec![
        sun(),
        CelestialBodyDescriptor::planet("planet", 5.0, 100.0),
    ]);
    let half_period = CircularLaw::PLANETARY.period(100.0) / 2.0;
    let ticks = 40;
    let mut scheduler = tiny_scheduler(scene, half_period / (100.0 * ticks as f64));
    assert_eq!(scheduler.set_time_scale(100.0), 100.0);

    let mut capture = FrameCapture::with_limit(1);
    for _ in 0..ticks {
        scheduler.run_frame(&mut capture).unwrap();
    }
    assert!((scheduler.clock().elapsed() - half_period).abs() < 1e-6);
    let position = scheduler.scene().find("planet").unwrap().state.world_position;
    assert!((position - DVec3::new(-100.0, 0.0, 0.0)).length() < 1e-4, "{position}");
}

#[test]
fn test_comet_perihelion_and_aphelion() {
    let (a, e) = (3500.0, 0.967);
    assert!((keplerian_radius(a, e, 0.0) - 115.5).abs() < 1e-6);
    assert!((keplerian_radius(a, e, PI) - 6884.5).abs() < 1e-6);

    let period = 76.0;
    let mut comet = CelestialBodyDescriptor::planet("comet", 2.0, 1.0);
    comet.orbit = Some(OrbitDescriptor::Keplerian {
        semi_major_axis: a,
        eccentricity: e,
        inclination: 0.0,
        period: Some(period),
    });
    let mut scene = compose(vec![sun(), comet]);
    let kinematics = OrbitalKinematics::new();

    kinematics.advance_scene(&mut scene, 0.0);
    let perihelion = scene.find("comet").unwrap().state.world_position.length();
    kinematics.advance_scene(&mut scene, period / 2.0);
    let aphelion = scene.find("comet").unwrap().state.world_position.length();
    assert!((perihelion - 115.5).abs() < 1e-6, "{perihelion}");
    assert!((aphelion - 6884.5).abs() < 1e-6, "{aphelion}");

    for i in 0..64 {
        kinematics.advance_scene(&mut scene, period * i as f64 / 64.0);
        let r = scene.find("comet").unwrap().state.world_position.length();
        assert!(r >= a * (1.0 - e) - 1e-6 && r <= a * (1.0 + e) + 1e-6);
    }
}

#[test]
fn test_single_division_ring_count() {
    let ring = RingDescriptor {
        inner_radius: 8.0,
        outer_radius: 20.0,
        divisions: vec![RingDivision {
            inner_radius: 10.0,
            outer_radius: 15.0,
            density: 0.5,
            particle_size: 0.1,
            color: [0.8, 0.7, 0.6],
        }],
        particle_count: 1000,
        randomness: 0.2,
        drift_speed: 0.0,
    };
    let planet = CelestialBodyDescriptor::planet("ringed", 5.0, 300.0).with_rings(ring.clone());
    let scene = compose(vec![sun(), planet]);

    let field = scene.find("ringed").unwrap().ring_field().unwrap();
    assert_eq!(field.len(), 500);
    assert!(
        field
            .particles()
            .iter()
            .all(|p| p.radius >= 10.0 && p.radius < 15.0)
    );

    let mut rng = ChaCha8Rng::seed_from_u64(99);
    assert_eq!(RingFieldGenerator::new().generate(&ring, &mut rng).len(), 500);
}

#[test]
fn test_pause_resume_has_no_phase_jump() {
    let scene = compose(vec![
        sun(),
        CelestialBodyDescriptor::planet("planet", 5.0, 100.0).with_spin(30.0, 10.0),
    ]);
    let mut clock = SimulationClock::new();
    let kinematics = OrbitalKinematics::new();
    let mut scene = scene;

    for _ in 0..10 {
        clock.tick_with(0.1);
        kinematics.advance_scene(&mut scene, clock.elapsed());
    }
    let before = scene.find("planet").unwrap().state.clone();

    clock.pause();
    for _ in 0..5 {
        assert_eq!(clock.tick_with(0.1), 0.0);
        kinematics.advance_scene(&mut scene, clock.elapsed());
    }
    clock.resume();
    assert_eq!(clock.tick_with(0.0), 0.0);
    kinematics.advance_scene(&mut scene, clock.elapsed());

    let after = scene.find("planet").unwrap().state.clone();
    assert_eq!(after.position, before.position);
    assert_eq!(after.rotation_angle, before.rotation_angle);

    clock.tick_with(0.1);
    kinematics.advance_scene(&mut scene, clock.elapsed());
    let moved = scene.find("planet").unwrap().state.rotation_angle;
    assert!(moved > before.rotation_angle);
}

#[test]
fn test_pause_resume_through_the_scheduler() {
    let scene = compose(vec![
        sun(),
        CelestialBodyDescriptor::planet("planet", 5.0, 100.0).with_spin(30.0, 10.0),
    ]);
    let mut scheduler = tiny_scheduler(scene, 0.05);
    let mut capture = FrameCapture::with_limit(2);

    for _ in 0..4 {
        scheduler.run_frame(&mut capture).unwrap();
    }
    let before = scheduler.scene().find("planet").unwrap().state.clone();

    scheduler.set_paused(true);
    for _ in 0..4 {
        scheduler.run_frame(&mut capture).unwrap();
    }
    assert_eq!(scheduler.scene().find("planet").unwrap().state, before);

    scheduler.set_paused(false);
    let report = scheduler.run_frame(&mut capture).unwrap();
    assert!((report.elapsed - (before.last_elapsed + 0.05)).abs() < 1e-12);
    let after = scheduler.scene().find("planet").unwrap().state.clone();
    let expected = before.rotation_angle + 2.0 * PI / 30.0 * 0.05;
    assert!((after.rotation_angle - expected).abs() < 1e-9);
}

#[test]
fn test_rotation_monotonic_across_time_scale_changes() {
    let mut scene = compose(vec![
        sun(),
        CelestialBodyDescriptor::planet("retro", 5.0, 100.0).with_spin(-12.0, 0.0),
    ]);
    let mut clock = SimulationClock::new();
    let kinematics = OrbitalKinematics::new();
    let mut previous = 0.0f64;

    for (i, scale) in [1.0, 50.0, 0.1, 100.0, 3.0].into_iter().enumerate() {
        clock.set_time_scale(scale);
        for _ in 0..5 {
            clock.tick_with(0.02 * (i + 1) as f64);
            kinematics.advance_scene(&mut scene, clock.elapsed());
            let angle = scene.find("retro").unwrap().state.rotation_angle;
            assert!(angle.abs() > previous.abs());
            assert!(angle < 0.0);
            previous = angle;
        }
    }
}
