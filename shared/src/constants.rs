/*!
Controller tuning constants and tolerances.

These centralize the parameters used by the climbing controller, surface
probes, curve baking and the boost sequencer. Keeping them together makes
tuning easier and helps ensure deterministic behavior across platforms.

Notes
- Distances are in meters, time in seconds, speeds in meters per second.
- Favor practical world-space tolerances over machine epsilon for robust behavior.
- These are sensible defaults for the config structs; override from your
  game data where needed.
*/

/// Practical small distance for comparisons (meters).
/// Use for dot-product guards, equality checks in world space, etc.
pub const DIST_EPS: f32 = 1.0e-6;

/// Gravity magnitude in meters per second squared (positive value).
/// The swing-arc rest direction is derived from this (straight down).
pub const GRAVITY_MPS2: f32 = 9.81;

/// Radius of the spherical hand probe used for VR grab tests (meters).
pub const DEFAULT_HAND_RADIUS: f32 = 0.1;

/// Maximum reach of the head ray used for desktop grab tests (meters).
pub const DEFAULT_HAND_REACH: f32 = 2.0;

/// Offset applied along the hit normal when attaching from a desktop ray
/// hit (meters). Keeps the logical hand just off the surface.
pub const DEFAULT_SURFACE_CLEARANCE: f32 = 0.05;

/// Default wall-jump impulse magnitude (m/s added to the release velocity).
pub const DEFAULT_WALLJUMP_STRENGTH: f32 = 5.0;

/// Planar speed above which desktop lateral smoothing kicks in (m/s).
pub const DEFAULT_LATERAL_SPEED_THRESHOLD: f32 = 4.0;

/// Divisor turning excess planar speed into a damping blend factor.
/// The resulting factor is always clamped to [0, 1].
pub const DEFAULT_LATERAL_SMOOTHING: f32 = 8.0;

/// Default number of samples baked per non-linear curve.
pub const DEFAULT_BAKE_PRECISION: usize = 20;

/// Default speed along a booster line while boosting (m/s).
pub const DEFAULT_BOOST_SPEED: f32 = 10.0;

/// Default speed along a booster line while rewinding (m/s).
pub const DEFAULT_REWIND_SPEED: f32 = 5.0;

/// Delay between the start trigger and the boost phase (seconds).
pub const DEFAULT_START_DELAY: f32 = 1.0;

/// Delay between the end of the boost phase and the rewind (seconds).
pub const DEFAULT_STOP_DELAY: f32 = 1.0;
