//! Integration tests over the public API: particle generation, the flow
//! displacement, the color ramp, configuration, camera, and clock behavior.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use windglobe::wind::{displace, generate_particles, latitude_mix, particle_color, point_size};
use windglobe::{AppConfig, CameraConfig, Clock, OrbitCamera, WindConfig, WIND_AXIS};

// ============================================================================
// Particle Generation
// ============================================================================

#[test]
fn test_generation_count_and_shell() {
    let config = WindConfig::default();
    let mut rng = SmallRng::seed_from_u64(1);
    let particles = generate_particles(&config, &mut rng);

    assert_eq!(particles.len(), 18_000);
    for p in &particles {
        let r = p.position().length();
        assert!((r - config.shell_radius).abs() <= config.shell_radius * 1e-5);
    }
}

#[test]
fn test_generation_respects_custom_speed_range() {
    let config = WindConfig::new()
        .with_particle_count(2_000)
        .with_speed_range(2.0, 3.5);
    let mut rng = SmallRng::seed_from_u64(2);
    for p in generate_particles(&config, &mut rng) {
        assert!(p.speed >= 2.0 && p.speed < 3.5);
    }
}

#[test]
fn test_generation_is_seeded() {
    let config = WindConfig::new().with_particle_count(100);
    let a = generate_particles(&config, &mut SmallRng::seed_from_u64(7));
    let b = generate_particles(&config, &mut SmallRng::seed_from_u64(7));
    let c = generate_particles(&config, &mut SmallRng::seed_from_u64(8));

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_generation_covers_both_hemispheres() {
    let config = WindConfig::new().with_particle_count(4_000);
    let mut rng = SmallRng::seed_from_u64(11);
    let particles = generate_particles(&config, &mut rng);

    let north = particles.iter().filter(|p| p.position[1] > 0.0).count();
    let south = particles.len() - north;
    let ratio = north as f32 / south as f32;
    assert!(ratio > 0.85 && ratio < 1.18, "hemisphere ratio {ratio}");
}

// ============================================================================
// Flow Displacement
// ============================================================================

#[test]
fn test_displacement_never_leaves_shell() {
    let config = WindConfig::default();
    let mut rng = SmallRng::seed_from_u64(3);
    let particles = generate_particles(&WindConfig::new().with_particle_count(200), &mut rng);

    let mut t = 0.0f32;
    while t < 120.0 {
        for p in &particles {
            let moved = displace(p.position(), p.speed, t, &config);
            assert!((moved.length() - config.shell_radius).abs() <= config.shell_radius * 1e-5);
        }
        t += 7.3;
    }
}

#[test]
fn test_displacement_is_pure() {
    let config = WindConfig::default();
    let p = Vec3::new(1.0, 0.4, -0.2).normalize() * config.shell_radius;

    // Calls at other times in between must not affect the result.
    let first = displace(p, 0.9, 3.0, &config);
    let _ = displace(p, 0.9, 50.0, &config);
    let second = displace(p, 0.9, 3.0, &config);
    assert_eq!(first, second);
}

#[test]
fn test_displacement_oscillates_rather_than_drifts() {
    // sin(0.8 t) has period 2*pi/0.8; a particle must return near its rest
    // position once per period instead of wandering off.
    let config = WindConfig::default();
    let p = Vec3::new(0.3, -0.5, 0.9).normalize() * config.shell_radius;
    let period = std::f32::consts::TAU / 0.8;

    let at_zero = displace(p, 1.0, 0.0, &config);
    let at_period = displace(p, 1.0, period, &config);
    assert!(at_zero.distance(at_period) < 1e-3);
}

#[test]
fn test_zero_displacement_config_freezes_layer() {
    let config = WindConfig::new().with_displacement(0.0);
    let mut rng = SmallRng::seed_from_u64(4);
    for p in generate_particles(&WindConfig::new().with_particle_count(50), &mut rng) {
        let moved = displace(p.position(), p.speed, 42.0, &config);
        assert!(moved.distance(p.position()) < 1e-4);
    }
}

#[test]
fn test_axis_particles_have_no_tangent() {
    let config = WindConfig::default();
    for sign in [1.0f32, -1.0] {
        let p = WIND_AXIS.normalize() * config.shell_radius * sign;
        let moved = displace(p, 1.6, 13.7, &config);
        assert!(moved.distance(p) < 1e-4);
    }
}

// ============================================================================
// Color Ramp and Point Size
// ============================================================================

#[test]
fn test_latitude_mix_range() {
    let config = WindConfig::default();
    let mut rng = SmallRng::seed_from_u64(5);
    for p in generate_particles(&WindConfig::new().with_particle_count(500), &mut rng) {
        let mix = latitude_mix(p.position());
        assert!((0.0..=1.0).contains(&mix));
        let _ = particle_color(p.position(), &config);
    }
}

#[test]
fn test_color_ramp_is_latitude_symmetric() {
    let config = WindConfig::default();
    let north = Vec3::new(0.5, 0.8, 0.0).normalize() * config.shell_radius;
    let south = Vec3::new(0.5, -0.8, 0.0).normalize() * config.shell_radius;
    let cn = particle_color(north, &config);
    let cs = particle_color(south, &config);
    assert!(cn.distance(cs) < 1e-6);
}

#[test]
fn test_point_size_bounds_for_default_speeds() {
    let config = WindConfig::default();
    let lo = point_size(config.speed_min);
    let hi = point_size(config.speed_max);
    assert!((lo - 2.04).abs() < 1e-3);
    assert!((hi - 3.96).abs() < 1e-3);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_app_config_builders_chain() {
    let config = AppConfig::new()
        .with_title("test")
        .with_window_size(640, 480)
        .with_auto_rotate(false)
        .with_start_longitude(-120.0)
        .with_wind(WindConfig::new().with_particle_count(1))
        .with_camera(CameraConfig::new().with_distance_range(4.0, 9.0));

    assert_eq!(config.window_title, "test");
    assert_eq!(config.window_width, 640);
    assert!(!config.auto_rotate);
    assert_eq!(config.wind.particle_count, 1);
    assert_eq!(config.camera.min_distance, 4.0);
}

#[test]
fn test_start_yaw_wraps_longitude() {
    let config = AppConfig::new().with_start_longitude(0.0);
    assert!((config.start_yaw() - std::f32::consts::PI).abs() < 1e-6);
}

// ============================================================================
// Camera
// ============================================================================

#[test]
fn test_camera_auto_rotate_moves_eye() {
    let mut cam = OrbitCamera::new(CameraConfig::default(), true);
    let before = cam.position();
    for _ in 0..60 {
        cam.update(0.016);
    }
    assert!(cam.position().distance(before) > 1e-3);
    assert!((cam.position().length() - 7.0).abs() < 1e-4);
}

#[test]
fn test_camera_drag_glides_after_release() {
    let mut cam = OrbitCamera::new(CameraConfig::default(), false);
    cam.begin_drag();
    cam.orbit(80.0, 0.0);
    cam.end_drag();

    cam.update(0.016);
    let early = cam.position();
    for _ in 0..300 {
        cam.update(0.016);
    }
    // Still easing after the first frame, settled by the 300th.
    assert!(cam.position().distance(early) > 1e-4);
    let settled = cam.position();
    cam.update(0.016);
    assert!(cam.position().distance(settled) < 1e-5);
}

#[test]
fn test_camera_zoom_stays_in_bounds() {
    let mut cam = OrbitCamera::new(CameraConfig::default(), false);
    cam.zoom(100.0);
    assert!(cam.distance() >= 3.2);
    cam.zoom(-100.0);
    assert!(cam.distance() <= 12.0);
}

// ============================================================================
// Clock
// ============================================================================

#[test]
fn test_clock_matches_flow_time_step() {
    let mut clock = Clock::default();
    for _ in 0..100 {
        clock.tick();
    }
    assert!((clock.time() - 1.6).abs() < 1e-4);
}

#[test]
fn test_clock_pause_toggle() {
    let mut clock = Clock::default();
    clock.tick();
    clock.toggle_pause();
    assert!(clock.is_paused());
    let t = clock.time();
    clock.tick();
    assert_eq!(clock.time(), t);
    clock.toggle_pause();
    clock.tick();
    assert!(clock.time() > t);
}
