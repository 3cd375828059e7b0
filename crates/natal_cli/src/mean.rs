//! Low-precision mean-motion ephemeris for demonstration.
//!
//! Positions are linear mean elements referred to J2000; good enough
//! to exercise chart and search output formats, not for real work.
//! Houses are unsupported, so charts come out sign-only.

use natal_ephem::{
    Body, BodyState, EphemerisError, EphemerisProvider, HouseCusps, HouseSystem,
};

const J2000: f64 = 2_451_545.0;

/// (mean longitude at J2000, mean daily motion) per body, degrees.
fn mean_elements(body: Body) -> (f64, f64) {
    match body {
        Body::Sun => (280.460, 0.985_647_4),
        Body::Moon => (218.316, 13.176_396),
        Body::Mercury => (252.251, 4.092_339),
        Body::Venus => (181.980, 1.602_131),
        Body::Mars => (355.433, 0.524_071),
        Body::Jupiter => (34.351, 0.083_129),
        Body::Saturn => (50.077, 0.033_498),
        Body::Uranus => (314.055, 0.011_731),
        Body::Neptune => (304.349, 0.005_982),
        Body::Pluto => (238.929, 0.003_973),
        Body::NorthNode => (125.045, -0.052_954),
        Body::Chiron => (207.224, 0.019_637),
    }
}

/// Mean-motion demonstration provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct MeanMotionEphemeris;

impl EphemerisProvider for MeanMotionEphemeris {
    fn body_position(&self, jd_ut: f64, body: Body) -> Result<BodyState, EphemerisError> {
        if !jd_ut.is_finite() {
            return Err(EphemerisError::EpochOutOfRange { jd_ut });
        }
        let (base, rate) = mean_elements(body);
        Ok(BodyState {
            longitude_deg: (base + rate * (jd_ut - J2000)).rem_euclid(360.0),
            speed_deg_per_day: rate,
        })
    }

    fn houses(
        &self,
        _jd_ut: f64,
        _latitude_deg: f64,
        _longitude_deg: f64,
        _system: HouseSystem,
    ) -> Result<HouseCusps, EphemerisError> {
        Err(EphemerisError::Unsupported(
            "house cusps (mean-motion ephemeris has no observer model)",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sun_near_mean_longitude_at_j2000() {
        let state = MeanMotionEphemeris.body_position(J2000, Body::Sun).unwrap();
        assert!((state.longitude_deg - 280.460).abs() < 1e-9);
        assert!(state.speed_deg_per_day > 0.98);
    }

    #[test]
    fn node_regresses() {
        let state = MeanMotionEphemeris
            .body_position(J2000, Body::NorthNode)
            .unwrap();
        assert!(state.speed_deg_per_day < 0.0);
    }

    #[test]
    fn houses_unsupported() {
        assert!(
            MeanMotionEphemeris
                .houses(J2000, 48.85, 2.35, HouseSystem::Placidus)
                .is_err()
        );
    }

    #[test]
    fn rejects_non_finite_epoch() {
        assert!(MeanMotionEphemeris.body_position(f64::NAN, Body::Sun).is_err());
    }
}
