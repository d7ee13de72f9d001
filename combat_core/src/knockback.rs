//! Knockback kinematics
//!
//! Given where a target should land, solve for the vertical launch velocity
//! and flight time under the host's per-tick gravity and drag, then scale the
//! horizontal push by how quickly the target gets there.

use weapon_core::Vec3;

use crate::config::constants;
use crate::host::{EntityId, EntitySnapshot, Host, HostError};
use crate::math::{lambert_w0, lambert_wm1};

/// Downward acceleration per tick
pub const GRAVITY: f64 = 0.08;
/// Fraction of velocity lost to drag per tick
pub const DRAG: f64 = 0.02;

const MULTIPLIER_PEAK: f64 = 1.5;
const MULTIPLIER_HORIZON_TICKS: f64 = 66.0;
const HORIZONTAL_SCALE: f64 = 0.33;

/// Launch parameters for a knockback arc
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchSolution {
    /// Initial vertical velocity
    pub vy: f64,
    /// Ticks until the target is back at the destination height
    pub time: f64,
    /// Both root evaluations converged
    pub accurate: bool,
}

/// Solve the vertical launch for an arc peaking `max_height` above the
/// higher of start and destination
pub fn solve_launch(delta_y: f64, max_height: f64) -> LaunchSolution {
    let a = GRAVITY;
    let d = DRAG;
    let ln = (-d).ln_1p();
    let y_max = max_height.max(delta_y + max_height);
    let k = a * (d - 1.0);

    let secondary = lambert_wm1(-(-(y_max * d * ln + a * d - a) / k).exp());
    let vy = k * (secondary.value + 1.0) / d;

    let e = ((delta_y * d * ln + a + d * (vy - a)) / k).exp();
    let principal = lambert_w0((-(k - vy * d) * e) / k);
    let time = (-k * principal.value + delta_y * d * ln + a * (1.0 - d) + vy * d) / (k * ln);

    LaunchSolution {
        vy,
        time,
        accurate: secondary.success && principal.success,
    }
}

/// Horizontal multiplier: 1.5 at zero flight time easing to 1.0 at 66 ticks
pub fn horizontal_multiplier(time: f64) -> f64 {
    let remaining = (MULTIPLIER_HORIZON_TICKS - time.clamp(0.0, MULTIPLIER_HORIZON_TICKS))
        / MULTIPLIER_HORIZON_TICKS;
    (MULTIPLIER_PEAK - 1.0) * remaining.powi(2) + 1.0
}

/// Velocity that carries a target by `delta` with the given apex height
pub fn launch_velocity(delta: Vec3, max_height: f64) -> Vec3 {
    let solution = solve_launch(delta.y, max_height);
    let multiplier = horizontal_multiplier(solution.time);
    Vec3::new(
        delta.x * HORIZONTAL_SCALE * multiplier,
        solution.vy,
        delta.z * HORIZONTAL_SCALE * multiplier,
    )
}

/// Knockback distances in effect for one attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnockbackDistances {
    pub regular: f64,
    pub enchanted: f64,
}

impl Default for KnockbackDistances {
    fn default() -> Self {
        let kb = &constants().knockback;
        KnockbackDistances {
            regular: kb.regular_distance,
            enchanted: kb.enchanted_distance,
        }
    }
}

/// Where a hit sends the target, and how high the arc goes
///
/// With a knockback level the push follows the attacker's facing, otherwise
/// it points away from the attacker.
pub fn attack_destination(
    level: u32,
    distances: KnockbackDistances,
    attacker_location: Vec3,
    attacker_yaw: f64,
    target_location: Vec3,
    target_on_ground: bool,
) -> (Vec3, f64) {
    let kb = &constants().knockback;
    let enchanted = level > 0;

    let distance = if enchanted {
        (kb.enchanted_base + distances.enchanted * level as f64).max(0.0)
    } else {
        distances.regular.max(0.0)
    };
    let (dir_x, dir_z) = if enchanted {
        let yaw = attacker_yaw.to_radians();
        (-yaw.sin(), yaw.cos())
    } else {
        (
            target_location.x - attacker_location.x,
            target_location.z - attacker_location.z,
        )
    };
    let length = match dir_x.hypot(dir_z) {
        l if l == 0.0 || l.is_nan() => 1.0,
        l => l,
    };

    let height = match (target_on_ground, enchanted) {
        (false, _) => 0.0,
        (true, true) => kb.enchanted_height,
        (true, false) => kb.regular_height,
    };

    let destination = Vec3::new(
        target_location.x + dir_x / length * distance,
        target_location.y,
        target_location.z + dir_z / length * distance,
    );
    (destination, height)
}

/// Launch the target toward `destination`
pub fn apply_attack_knockback(
    host: &mut dyn Host,
    target: &EntitySnapshot,
    destination: Vec3,
    max_height: f64,
) -> Result<(), HostError> {
    let velocity = launch_velocity(destination - target.location, max_height);
    apply_impulse_as_knockback(host, target.id, velocity)
}

/// Replace the target's motion with `impulse` through the knockback API
///
/// Airborne targets keep their current vertical velocity on top.
pub fn apply_impulse_as_knockback(
    host: &mut dyn Host,
    target: EntityId,
    impulse: Vec3,
) -> Result<(), HostError> {
    let strength = impulse.horizontal_length();
    let (dir_x, dir_z) = if strength != 0.0 {
        (impulse.x / strength, impulse.z / strength)
    } else {
        (0.0, 0.0)
    };

    host.apply_knockback(target, 0.0, 0.0, 0.0)?;
    let snapshot = host
        .entity(target)
        .ok_or(HostError::EntityInvalid(target))?;
    let velocity = snapshot.velocity;
    let vertical = impulse.y + if snapshot.on_ground { 0.0 } else { velocity.y };

    host.apply_knockback(
        target,
        velocity.x + dir_x * strength,
        velocity.z + dir_z * strength,
        vertical,
    )
}
