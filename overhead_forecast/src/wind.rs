use std::ops::RangeInclusive;

/// Below this the wind is calm and Heathrow stays on westerly operations.
pub const CALM_WIND_KNOTS: f64 = 5.0;

/// Wind from this sector puts arrivals on the 27s.
pub const WESTERLY_SECTOR: RangeInclusive<f64> = 200.0..=360.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindObservation {
    pub speed_knots: f64,
    pub direction_degrees: f64,
}

impl WindObservation {
    pub fn new(speed_knots: f64, direction_degrees: f64) -> Self {
        Self {
            speed_knots,
            direction_degrees,
        }
    }

    pub fn is_westerly(&self) -> bool {
        is_westerly(self.speed_knots, self.direction_degrees)
    }
}

/// Directions are taken as given, values outside 0..360 are not wrapped.
pub fn is_westerly(speed_knots: f64, direction_degrees: f64) -> bool {
    if speed_knots < CALM_WIND_KNOTS {
        return true;
    }
    WESTERLY_SECTOR.contains(&direction_degrees)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calm_wind_is_westerly_from_any_direction() {
        for direction in [0.0, 40.0, 90.0, 199.9, 200.0, 310.0, 360.0, -20.0, 720.0] {
            assert!(is_westerly(0.0, direction));
            assert!(is_westerly(4.9, direction));
        }
    }

    #[test]
    fn test_westerly_sector_is_inclusive() {
        assert!(is_westerly(5.0, 200.0));
        assert!(is_westerly(5.0, 270.0));
        assert!(is_westerly(12.0, 360.0));
        assert!(!is_westerly(5.0, 199.0));
        assert!(!is_westerly(12.0, 0.0));
        assert!(!is_westerly(12.0, 40.0));
    }

    #[test]
    fn test_out_of_range_directions_are_not_wrapped() {
        // 380 would be 020 after wrapping, and -90 would be 270
        assert!(!is_westerly(10.0, 380.0));
        assert!(!is_westerly(10.0, -90.0));
    }

    #[test]
    fn test_nan_is_handled() {
        // NaN is never calm, so the direction decides
        assert!(is_westerly(f64::NAN, 270.0));
        assert!(!is_westerly(f64::NAN, 90.0));
        assert!(!is_westerly(10.0, f64::NAN));
        assert!(is_westerly(3.0, f64::NAN));
    }

    #[test]
    fn test_observation_delegates() {
        assert!(WindObservation::new(8.0, 270.0).is_westerly());
        assert!(!WindObservation::new(8.0, 90.0).is_westerly());
    }
}
