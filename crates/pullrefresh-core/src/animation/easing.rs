//! Pure easing functions for inset animations
//!
//! Maps input [0, 1] to output curves that start at 0 and end at 1. The spring
//! curve may overshoot 1 before settling.

use crate::config::{EasingType, RefreshConfig};

/// Stiffness of the normalized spring, in radians per animation duration
const SPRING_OMEGA: f64 = 12.0;

/// Extension trait for EasingType with calculation methods
pub trait EasingTypeExt {
    /// Resolve the easing into a curve, taking spring parameters from `config`
    fn curve(&self, config: &RefreshConfig) -> Curve;
}

impl EasingTypeExt for EasingType {
    fn curve(&self, config: &RefreshConfig) -> Curve {
        match self {
            EasingType::Spring => Curve::Spring {
                damping: config.spring_damping,
                velocity: config.initial_spring_velocity,
            },
            other => Curve::Eased(*other),
        }
    }
}

/// Resolved animation curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Eased(EasingType),
    Spring { damping: f64, velocity: f64 },
}

impl Curve {
    pub const LINEAR: Curve = Curve::Eased(EasingType::Linear);

    /// Apply the curve to a progress value
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Curve::Eased(EasingType::None) => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
            Curve::Eased(EasingType::Linear) => t,
            Curve::Eased(EasingType::Cubic) => cubic_ease_out(t),
            Curve::Eased(EasingType::Quintic) => quintic_ease_out(t),
            Curve::Eased(EasingType::EaseOut) => exponential_ease_out(t),
            // Spring without parameters falls back to a critically damped one
            Curve::Eased(EasingType::Spring) => spring(t, 1.0, 0.0),
            Curve::Spring { damping, velocity } => spring(t, *damping, *velocity),
        }
    }
}

/// Cubic ease-out: f(t) = 1 - (1-t)³
#[inline]
fn cubic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Quintic ease-out: f(t) = 1 - (1-t)⁵
#[inline]
fn quintic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

/// Exponential ease-out: f(t) = 1 - 2^(-10t)
#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

/// Damped spring from 0 toward 1
///
/// `damping` is the damping ratio (1.0 = critically damped), `velocity` the
/// initial velocity in distances per duration. Snaps to 1 at t = 1.
fn spring(t: f64, damping: f64, velocity: f64) -> f64 {
    if t >= 1.0 {
        return 1.0;
    }
    if t <= 0.0 {
        return 0.0;
    }

    let zeta = damping.clamp(0.01, 1.0);
    let omega = SPRING_OMEGA;

    // Displacement from the target starts at -1 with the given velocity
    let displacement = if zeta < 1.0 {
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let b = (velocity - zeta * omega) / omega_d;
        (-zeta * omega * t).exp() * (-(omega_d * t).cos() + b * (omega_d * t).sin())
    } else {
        let b = velocity - omega;
        (-omega * t).exp() * (-1.0 + b * t)
    };

    1.0 + displacement
}
