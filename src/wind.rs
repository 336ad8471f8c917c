//! Wind particle layer: seed generation and flow math.
//!
//! The layer is an immutable set of particles on a thin shell above the
//! globe. Each particle carries a unit-free speed attribute; everything
//! that moves is derived per frame in the vertex shader from the seed
//! position, the speed, and the animation time. The functions in this
//! module are the same arithmetic on the CPU so behavior can be tested
//! and predicted without a GPU.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

use crate::config::WindConfig;

/// Swirl axis the tangential flow winds around. Not a unit vector: the
/// phase term uses the raw dot product, and the tilt off the poles makes
/// the flow cross latitude lines instead of tracing them.
pub const WIND_AXIS: Vec3 = Vec3::new(0.3, 1.0, 0.6);

/// Edges of the accent-color blend over the latitude mix factor.
const ACCENT_EDGE_LO: f32 = 0.3;
const ACCENT_EDGE_HI: f32 = 0.9;

/// Point size in pixels for a particle of speed zero.
const SIZE_BASE: f32 = 1.4;
/// Additional pixels of point size per unit of speed.
const SIZE_PER_SPEED: f32 = 1.6;

/// Per-particle seed data, uploaded once as an instance buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct WindParticle {
    /// Rest position on the shell.
    pub position: [f32; 3],
    /// Speed attribute scaling displacement and point size.
    pub speed: f32,
}

impl WindParticle {
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<WindParticle>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}

/// Generate the particle set for a session.
///
/// Directions are drawn uniformly over the sphere: `theta = 2*pi*u` and
/// `phi = acos(2*v - 1)` with `u`, `v` uniform in `[0, 1)`, which keeps
/// density even instead of clustering at the poles. Speeds are uniform in
/// `[speed_min, speed_max)`.
pub fn generate_particles<R: Rng + ?Sized>(config: &WindConfig, rng: &mut R) -> Vec<WindParticle> {
    let mut particles = Vec::with_capacity(config.particle_count as usize);
    for _ in 0..config.particle_count {
        let theta = rng.gen_range(0.0..std::f32::consts::TAU);
        let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let dir = Vec3::new(sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin());
        particles.push(WindParticle {
            position: (dir * config.shell_radius).to_array(),
            speed: rng.gen_range(config.speed_min..config.speed_max),
        });
    }
    particles
}

/// Position of a particle at animation time `time`.
///
/// Mirrors the vertex shader exactly:
///
/// 1. `n = normalize(position)`
/// 2. `tdir = cross(n, WIND_AXIS) / tlen`, zero when `tlen <= 1e-6`
/// 3. latitude swirl `k = swirl_base + swirl_amp * cos(2 * asin(n.y))`
/// 4. oscillation `sin(osc_frequency * time + phase_stagger * dot(n, WIND_AXIS))`
/// 5. offset along `tdir` by `displacement * speed * k * osc`
/// 6. re-project onto the shell
///
/// The result always has length `shell_radius`. A particle sitting exactly
/// on the swirl axis has no defined tangent and stays put. The same inputs
/// always produce the same output; there is no hidden state.
pub fn displace(position: Vec3, speed: f32, time: f32, config: &WindConfig) -> Vec3 {
    let n = position.normalize();
    // Same cutoff as the vertex shader: this close to the axis the cross
    // product is rounding noise, not a direction.
    let tangent = n.cross(WIND_AXIS);
    let tlen = tangent.length();
    let tdir = if tlen > 1e-6 {
        tangent / tlen
    } else {
        Vec3::ZERO
    };
    let lat = n.y.clamp(-1.0, 1.0).asin();
    let swirl = config.swirl_base + config.swirl_amp * (2.0 * lat).cos();
    let osc = (config.osc_frequency * time + config.phase_stagger * n.dot(WIND_AXIS)).sin();
    let moved = position + tdir * (config.displacement * speed * swirl * osc);
    moved.normalize() * config.shell_radius
}

/// Latitude mix factor: 0 at the equator, 1 at either pole.
///
/// Computed from the rest position, so a particle's color never shifts as
/// it oscillates.
pub fn latitude_mix(position: Vec3) -> f32 {
    position.normalize().y.abs()
}

/// Color of a particle at its rest position.
///
/// Blends the low-latitude base toward the polar base by the latitude mix,
/// then folds in the accent color across mid latitudes.
pub fn particle_color(position: Vec3, config: &WindConfig) -> Vec3 {
    let mix = latitude_mix(position);
    let base = config.color_a.lerp(config.color_b, mix);
    base.lerp(config.color_c, smoothstep(ACCENT_EDGE_LO, ACCENT_EDGE_HI, mix))
}

/// Point size in pixels for a given speed attribute.
pub fn point_size(speed: f32) -> f32 {
    SIZE_BASE + SIZE_PER_SPEED * speed
}

/// Hermite step, same semantics as the WGSL builtin.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn test_config() -> WindConfig {
        WindConfig::default()
    }

    #[test]
    fn test_particle_layout() {
        assert_eq!(std::mem::size_of::<WindParticle>(), 16);
        let desc = WindParticle::desc();
        assert_eq!(desc.array_stride, 16);
        assert_eq!(desc.step_mode, wgpu::VertexStepMode::Instance);
        assert_eq!(desc.attributes.len(), 2);
        assert_eq!(desc.attributes[1].offset, 12);
    }

    #[test]
    fn test_particles_on_shell() {
        let config = test_config();
        let mut rng = SmallRng::seed_from_u64(42);
        for p in generate_particles(&config, &mut rng) {
            let r = p.position().length();
            assert!(
                (r - config.shell_radius).abs() <= config.shell_radius * 1e-5,
                "particle off shell: {r}"
            );
        }
    }

    #[test]
    fn test_speed_range() {
        let config = test_config();
        let mut rng = SmallRng::seed_from_u64(7);
        for p in generate_particles(&config, &mut rng) {
            assert!(p.speed >= config.speed_min && p.speed < config.speed_max);
        }
    }

    #[test]
    fn test_latitude_bands_roughly_uniform() {
        // Equal-width y bands have equal area on a sphere, so each of the
        // 8 bands should hold close to 1/8 of the particles.
        let config = test_config().with_particle_count(20_000);
        let mut rng = SmallRng::seed_from_u64(99);
        let particles = generate_particles(&config, &mut rng);

        let mut bands = [0usize; 8];
        for p in &particles {
            let y = p.position().y / config.shell_radius;
            let band = (((y + 1.0) / 2.0 * 8.0) as usize).min(7);
            bands[band] += 1;
        }

        let expected = particles.len() as f32 / 8.0;
        for (i, &count) in bands.iter().enumerate() {
            let deviation = (count as f32 - expected).abs() / expected;
            assert!(deviation < 0.1, "band {i} holds {count}, expected ~{expected}");
        }
    }

    #[test]
    fn test_displaced_stays_on_shell() {
        let config = test_config();
        let mut rng = SmallRng::seed_from_u64(3);
        let particles = generate_particles(&config.clone().with_particle_count(500), &mut rng);
        for time in [0.0, 0.37, 1.0, 12.3, 1_000.0] {
            for p in &particles {
                let moved = displace(p.position(), p.speed, time, &config);
                let err = (moved.length() - config.shell_radius).abs();
                assert!(
                    err <= config.shell_radius * 1e-5,
                    "off shell by {err} at t={time}"
                );
            }
        }
    }

    #[test]
    fn test_displacement_deterministic() {
        let config = test_config();
        let p = Vec3::new(1.2, -0.8, 2.0).normalize() * config.shell_radius;
        let a = displace(p, 1.3, 5.5, &config);
        let b = displace(p, 1.3, 5.5, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn test_displacement_continuous_in_time() {
        let config = test_config();
        let p = Vec3::new(0.5, 0.5, -0.7).normalize() * config.shell_radius;
        let mut t = 0.0f32;
        while t < 10.0 {
            let here = displace(p, 1.6, t, &config);
            let next = displace(p, 1.6, t + 1e-3, &config);
            assert!(here.distance(next) < 1e-3, "jump at t={t}");
            t += 0.25;
        }
    }

    #[test]
    fn test_zero_displacement_is_static() {
        let config = test_config().with_displacement(0.0);
        let p = Vec3::new(-1.0, 2.0, 0.5).normalize() * config.shell_radius;
        for time in [0.0, 1.0, 99.0] {
            assert!(displace(p, 1.5, time, &config).distance(p) < 1e-5);
        }
    }

    #[test]
    fn test_axis_aligned_particle_stays_put() {
        // Exactly on the swirl axis the f32 cross product is nonzero noise;
        // the cutoff must swallow it at either end of the axis.
        let config = test_config();
        for dir in [WIND_AXIS.normalize(), -WIND_AXIS.normalize()] {
            let p = dir * config.shell_radius;
            for time in [0.0, 2.0, 77.0] {
                let moved = displace(p, 1.0, time, &config);
                assert!(moved.distance(p) < 1e-5, "axis particle drifted at t={time}");
            }
        }

        // A particle tilted well past the cutoff still flows.
        let tilted = (WIND_AXIS + Vec3::new(-0.6, 0.0, 0.3) * 1e-3).normalize();
        let p = tilted * config.shell_radius;
        assert!(displace(p, 1.0, 0.0, &config).distance(p) > 1e-4);
    }

    #[test]
    fn test_three_particles_on_axes() {
        // Hand-checked scenario: radius 2.5, one particle per world axis,
        // all with speed 1.0, evaluated at t = 0.
        let config = test_config().with_shell_radius(2.5);
        let px = Vec3::new(2.5, 0.0, 0.0);
        let py = Vec3::new(0.0, 2.5, 0.0);
        let pz = Vec3::new(0.0, 0.0, 2.5);

        // +X: equator, so swirl k = 0.6 + 0.8 = 1.4; phase = 4 * 0.3.
        // tdir = normalize((1,0,0) x (0.3,1,0.6)) = normalize((0,-0.6,1)).
        let tdir = Vec3::new(0.0, -0.6, 1.0).normalize();
        let offset = 0.01 * 1.0 * 1.4 * (4.0f32 * 0.3).sin();
        let expected = (px + tdir * offset).normalize() * 2.5;
        let moved = displace(px, 1.0, 0.0, &config);
        assert!(moved.distance(expected) < 1e-6);
        assert!(moved.y < 0.0 && moved.z > 0.0);

        // +Y: the pole. lat = pi/2 flips the swirl negative (0.6 - 0.8),
        // and the mix factor saturates at 1.
        let moved = displace(py, 1.0, 0.0, &config);
        assert!((moved.length() - 2.5).abs() < 2.5 * 1e-5);
        assert!(moved.distance(py) > 1e-4, "pole particle should drift");
        assert_eq!(latitude_mix(py), 1.0);

        // +Z: equator again, phase = 4 * 0.6.
        let moved = displace(pz, 1.0, 0.0, &config);
        assert!((moved.length() - 2.5).abs() < 2.5 * 1e-5);
        assert_eq!(latitude_mix(pz), 0.0);
        assert_eq!(latitude_mix(px), 0.0);
    }

    #[test]
    fn test_color_ramp_endpoints() {
        let config = test_config();
        let equator = Vec3::new(config.shell_radius, 0.0, 0.0);
        let pole = Vec3::new(0.0, config.shell_radius, 0.0);
        assert!(particle_color(equator, &config).distance(config.color_a) < 1e-6);
        // The accent fold saturates at the poles, so color_b never shows there.
        assert!(particle_color(pole, &config).distance(config.color_c) < 1e-6);
        assert!(particle_color(pole, &config).distance(config.color_b) > 1e-3);

        let mid = Vec3::new(1.0, 1.0, 0.0).normalize() * config.shell_radius;
        let c = particle_color(mid, &config);
        assert!(c.distance(config.color_a) > 1e-3);
        assert!(c.distance(config.color_c) > 1e-3);
    }

    #[test]
    fn test_point_size_scales_with_speed() {
        assert!((point_size(0.0) - 1.4).abs() < 1e-6);
        assert!((point_size(1.0) - 3.0).abs() < 1e-6);
        assert!(point_size(1.6) > point_size(0.4));
    }

    #[test]
    fn test_smoothstep_edges() {
        assert_eq!(smoothstep(0.3, 0.9, 0.0), 0.0);
        assert_eq!(smoothstep(0.3, 0.9, 0.3), 0.0);
        assert_eq!(smoothstep(0.3, 0.9, 0.9), 1.0);
        assert_eq!(smoothstep(0.3, 0.9, 1.0), 1.0);
        assert!((smoothstep(0.3, 0.9, 0.6) - 0.5).abs() < 1e-6);
    }
}
