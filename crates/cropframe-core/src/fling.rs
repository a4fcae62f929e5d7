//! Decelerating scroll physics for fling gestures.
//!
//! Resting distance follows the spline model used by platform scrollers: the
//! release velocity decays under a friction force scaled to the physical size
//! of a display pixel.
//!
//! ```text
//! l        = ln(INFLEXION * |v| / (FRICTION * coeff))
//! distance = FRICTION * coeff * exp(DECELERATION_RATE / (DECELERATION_RATE - 1) * l)
//! ```

/// Standard gravity in m/s^2.
const GRAVITY_EARTH: f64 = 9.80665;
const INCHES_PER_METER: f64 = 39.37;
/// Base pixel density for `screen_density == 1.0`.
const BASE_PPI: f64 = 160.0;
/// Fudge factor matching the platform tuning.
const TUNING: f64 = 0.84;
const SCROLL_FRICTION: f64 = 0.015;
const INFLEXION: f64 = 0.35;

/// `ln(0.78) / ln(0.9)`
fn deceleration_rate() -> f64 {
    0.78f64.ln() / 0.9f64.ln()
}

/// Zero out a velocity component whose magnitude is below `min`.
#[inline]
pub fn filter_velocity(velocity: f64, min: f64) -> f64 {
    if velocity.abs() < min {
        0.0
    } else {
        velocity
    }
}

/// Friction model for one display density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlingPhysics {
    physical_coeff: f64,
}

impl Default for FlingPhysics {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl FlingPhysics {
    pub fn new(screen_density: f64) -> Self {
        let ppi = screen_density * BASE_PPI;
        Self {
            physical_coeff: GRAVITY_EARTH * INCHES_PER_METER * ppi * TUNING,
        }
    }

    fn spline_deceleration(&self, velocity: f64) -> f64 {
        (INFLEXION * velocity.abs() / (SCROLL_FRICTION * self.physical_coeff)).ln()
    }

    /// Signed distance travelled before coming to rest.
    pub fn distance(&self, velocity: f64) -> f64 {
        if velocity == 0.0 || !velocity.is_finite() {
            return 0.0;
        }
        let rate = deceleration_rate();
        let l = self.spline_deceleration(velocity);
        let magnitude = SCROLL_FRICTION * self.physical_coeff * (rate / (rate - 1.0) * l).exp();
        magnitude.copysign(velocity)
    }
}
