//! Scan configuration shared by the event searches.

use natal_ephem::Body;

/// Coarse-scan and refinement parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanConfig {
    /// Coarse scan step size in days.
    pub step_days: f64,
    /// Refinement convergence threshold in days (default 1e-5, ~0.86 s).
    pub precision_days: f64,
    /// Maximum bisection iterations (default 60).
    pub max_iterations: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            step_days: 1.0,
            precision_days: 1e-5,
            max_iterations: 60,
        }
    }
}

impl ScanConfig {
    /// Step size tuned to the body's typical motion: half-day steps for
    /// the Moon, sub-day for the inner bodies, two days for the slow
    /// outer bodies.
    pub fn for_body(body: Body) -> Self {
        let step_days = match body {
            Body::Moon => 0.25,
            Body::Sun | Body::Mercury | Body::Venus => 0.5,
            Body::Mars | Body::NorthNode => 1.0,
            _ => 2.0,
        };
        Self {
            step_days,
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return Err("step_days must be positive");
        }
        if !self.precision_days.is_finite() || self.precision_days <= 0.0 {
            return Err("precision_days must be positive");
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be > 0");
        }
        Ok(())
    }
}
