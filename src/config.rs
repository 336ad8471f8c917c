//! Configuration for the visualization.
//!
//! Everything here is a session constant: values are read once during
//! startup, folded into GPU buffers, and never change afterwards. Defaults
//! reproduce the reference look, an 18,000-particle wind layer streaming
//! over a 2.5-radius globe.

use std::path::PathBuf;

use glam::Vec3;

fn rgb8(r: u8, g: u8, b: u8) -> Vec3 {
    Vec3::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

/// Parameters of the wind particle layer.
///
/// The layer is a fixed set of points on a shell just above the globe
/// surface, displaced each frame along a tangential flow direction. Setting
/// [`displacement`](Self::displacement) to zero degrades the layer to
/// static points; everything else keeps working.
#[derive(Debug, Clone)]
pub struct WindConfig {
    /// Number of particles. The set is generated once and never resized.
    pub particle_count: u32,
    /// Radius of the shell the particles are constrained to.
    pub shell_radius: f32,
    /// Lower bound of the per-particle speed attribute.
    pub speed_min: f32,
    /// Upper bound (exclusive) of the per-particle speed attribute.
    pub speed_max: f32,
    /// Magnitude of the tangential displacement before re-projection.
    pub displacement: f32,
    /// Angular frequency of the oscillation over time.
    pub osc_frequency: f32,
    /// Phase offset coefficient. Staggers the oscillation across the
    /// sphere so the whole cloud does not pulse in unison.
    pub phase_stagger: f32,
    /// Constant term of the latitude swirl factor.
    pub swirl_base: f32,
    /// Amplitude of the latitude swirl factor.
    pub swirl_amp: f32,
    /// Base color at low latitudes.
    pub color_a: Vec3,
    /// High-latitude end of the base blend. The accent fold covers it at
    /// the poles.
    pub color_b: Vec3,
    /// Accent color folded in from mid latitudes, saturating at the poles.
    pub color_c: Vec3,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            particle_count: 18_000,
            shell_radius: 2.5 * 1.002,
            speed_min: 0.4,
            speed_max: 1.6,
            displacement: 0.01,
            osc_frequency: 0.8,
            phase_stagger: 4.0,
            swirl_base: 0.6,
            swirl_amp: 0.8,
            color_a: rgb8(0x7f, 0xb3, 0xff),
            color_b: rgb8(0x5c, 0xc8, 0xff),
            color_c: rgb8(0x48, 0xe5, 0xc2),
        }
    }
}

impl WindConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the particle count.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the shell radius the particles live on.
    pub fn with_shell_radius(mut self, radius: f32) -> Self {
        self.shell_radius = radius;
        self
    }

    /// Set the speed attribute range `[min, max)`.
    pub fn with_speed_range(mut self, min: f32, max: f32) -> Self {
        self.speed_min = min;
        self.speed_max = max;
        self
    }

    /// Set the displacement magnitude. Zero gives static points.
    pub fn with_displacement(mut self, displacement: f32) -> Self {
        self.displacement = displacement;
        self
    }

    /// Set the oscillation frequency and phase stagger.
    pub fn with_oscillation(mut self, frequency: f32, stagger: f32) -> Self {
        self.osc_frequency = frequency;
        self.phase_stagger = stagger;
        self
    }

    /// Set the latitude swirl coefficients.
    pub fn with_swirl(mut self, base: f32, amp: f32) -> Self {
        self.swirl_base = base;
        self.swirl_amp = amp;
        self
    }

    /// Set the three blend colors (low-latitude base, high-latitude base,
    /// accent).
    pub fn with_colors(mut self, a: Vec3, b: Vec3, c: Vec3) -> Self {
        self.color_a = a;
        self.color_b = b;
        self.color_c = c;
        self
    }
}

/// Parameters of the globe and its atmosphere shell.
#[derive(Debug, Clone)]
pub struct GlobeConfig {
    /// Globe radius in world units.
    pub radius: f32,
    /// Longitudinal segments of the sphere mesh.
    pub segments: u32,
    /// Latitudinal rings of the sphere mesh.
    pub rings: u32,
    /// Path to the diffuse surface texture (PNG or JPEG).
    pub texture_path: PathBuf,
    /// Path to the bump height texture.
    pub bump_path: PathBuf,
    /// Strength of the bump-driven normal perturbation.
    pub bump_scale: f32,
    /// Specular tint.
    pub specular: Vec3,
    /// Specular exponent.
    pub shininess: f32,
    /// Ambient light color.
    pub ambient_color: Vec3,
    /// Ambient light intensity.
    pub ambient_intensity: f32,
    /// Directional light color.
    pub light_color: Vec3,
    /// Directional light intensity.
    pub light_intensity: f32,
    /// Direction the light comes from (normalized on upload).
    pub light_direction: Vec3,
    /// Atmosphere shell radius as a multiple of the globe radius.
    pub atmosphere_scale: f32,
    /// Longitudinal segments of the atmosphere mesh.
    pub atmosphere_segments: u32,
    /// Latitudinal rings of the atmosphere mesh.
    pub atmosphere_rings: u32,
    /// Atmosphere tint.
    pub atmosphere_color: Vec3,
    /// Atmosphere opacity.
    pub atmosphere_alpha: f32,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            radius: 2.5,
            segments: 96,
            rings: 96,
            texture_path: PathBuf::from("assets/earth.jpg"),
            bump_path: PathBuf::from("assets/earth_topology.png"),
            bump_scale: 0.05,
            specular: rgb8(0x22, 0x33, 0x44),
            shininess: 6.0,
            ambient_color: rgb8(0x88, 0xaa, 0xff),
            ambient_intensity: 0.6,
            light_color: Vec3::ONE,
            light_intensity: 0.9,
            light_direction: Vec3::new(5.0, 3.0, 5.0),
            atmosphere_scale: 1.02,
            atmosphere_segments: 64,
            atmosphere_rings: 64,
            atmosphere_color: rgb8(0x3a, 0xa6, 0xff),
            atmosphere_alpha: 0.12,
        }
    }
}

impl GlobeConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the globe radius.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Set the texture file paths.
    ///
    /// Missing files are not fatal; the globe falls back to a procedural
    /// placeholder so the binary runs without assets.
    pub fn with_textures(
        mut self,
        texture: impl Into<PathBuf>,
        bump: impl Into<PathBuf>,
    ) -> Self {
        self.texture_path = texture.into();
        self.bump_path = bump.into();
        self
    }

    /// Set the sphere mesh resolution.
    pub fn with_detail(mut self, segments: u32, rings: u32) -> Self {
        self.segments = segments;
        self.rings = rings;
        self
    }

    /// Set the atmosphere tint and opacity.
    pub fn with_atmosphere(mut self, color: Vec3, alpha: f32) -> Self {
        self.atmosphere_color = color;
        self.atmosphere_alpha = alpha;
        self
    }
}

/// Parameters of the orbit camera.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
    /// Initial distance from the target.
    pub distance: f32,
    /// Closest the camera may dolly in.
    pub min_distance: f32,
    /// Farthest the camera may dolly out.
    pub max_distance: f32,
    /// Radians of orbit per pixel of drag.
    pub drag_sensitivity: f32,
    /// Fraction of the outstanding drag applied per frame. Smaller values
    /// give a softer glide after the mouse is released.
    pub damping: f32,
    /// Idle orbit speed in radians per second.
    pub auto_rotate_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 2000.0,
            distance: 7.0,
            min_distance: 3.2,
            max_distance: 12.0,
            drag_sensitivity: 0.005,
            damping: 0.05,
            auto_rotate_speed: 0.084,
        }
    }
}

impl CameraConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial camera distance.
    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    /// Set the dolly range.
    pub fn with_distance_range(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    /// Set the idle orbit speed in radians per second.
    pub fn with_auto_rotate_speed(mut self, speed: f32) -> Self {
        self.auto_rotate_speed = speed;
        self
    }
}

/// Top-level configuration: window, scene motion, and the per-layer configs.
///
/// # Example
///
/// ```ignore
/// use windglobe::{AppConfig, WindConfig};
///
/// let config = AppConfig::default()
///     .with_title("Monsoon study")
///     .with_start_longitude(72.0)
///     .with_wind(WindConfig::new().with_particle_count(8_000));
/// windglobe::app::run(config)?;
/// ```
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Window title.
    pub window_title: String,
    /// Initial window width in logical pixels.
    pub window_width: u32,
    /// Initial window height in logical pixels.
    pub window_height: u32,
    /// Whether the scene spins on its own while the user is not dragging.
    pub auto_rotate: bool,
    /// Base spin increment in radians per rendered frame.
    pub rotation_speed: f32,
    /// Longitude (degrees east) facing the camera at startup.
    pub start_longitude: f32,
    /// Wind layer parameters.
    pub wind: WindConfig,
    /// Globe and atmosphere parameters.
    pub globe: GlobeConfig,
    /// Camera parameters.
    pub camera: CameraConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: String::from("Wind over Earth"),
            window_width: 1280,
            window_height: 720,
            auto_rotate: true,
            rotation_speed: 0.0006,
            start_longitude: 60.0,
            wind: WindConfig::default(),
            globe: GlobeConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    /// Set the initial window size.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Enable or disable idle rotation.
    pub fn with_auto_rotate(mut self, enabled: bool) -> Self {
        self.auto_rotate = enabled;
        self
    }

    /// Set the longitude facing the camera at startup.
    pub fn with_start_longitude(mut self, degrees: f32) -> Self {
        self.start_longitude = degrees;
        self
    }

    /// Replace the wind layer config.
    pub fn with_wind(mut self, wind: WindConfig) -> Self {
        self.wind = wind;
        self
    }

    /// Replace the globe config.
    pub fn with_globe(mut self, globe: GlobeConfig) -> Self {
        self.globe = globe;
        self
    }

    /// Replace the camera config.
    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    /// Initial globe yaw that puts [`start_longitude`](Self::start_longitude)
    /// in front of the camera.
    pub fn start_yaw(&self) -> f32 {
        (self.start_longitude + 180.0).to_radians()
    }
}
