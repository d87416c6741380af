use crate::error::MetricError;
use crate::models::location::Location;

const EARTH_RADIUS_KM: f64 = 6_371.0;

pub const DEFAULT_AVG_SPEED_KMPH: f64 = 40.0;

/// Fixed allowance for stops, added to every travel estimate.
pub const ETA_OVERHEAD_MINUTES: u64 = 5;

pub fn haversine_km(a: &Location, b: &Location) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let delta_lat = lat2 - lat1;
    let delta_lon = b.lon().to_radians() - a.lon().to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lon = (delta_lon / 2.0).sin();

    // Clamped so rounding near antipodes cannot push sqrt(1 - h) into NaN.
    let haversine = (sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lon * sin_lon).clamp(0.0, 1.0);
    let central_angle = 2.0 * haversine.sqrt().atan2((1.0 - haversine).sqrt());

    EARTH_RADIUS_KM * central_angle
}

/// Whole travel minutes (truncated) plus the stop overhead, never below one.
pub fn eta_minutes(distance_km: f64, avg_speed_kmph: f64) -> Result<u64, MetricError> {
    if !(avg_speed_kmph > 0.0) {
        return Err(MetricError::InvalidArgument {
            name: "avg_speed_kmph",
            value: avg_speed_kmph,
            reason: "must be positive",
        });
    }

    let hours = distance_km / avg_speed_kmph;
    let minutes = (hours * 60.0).trunc() as u64;

    Ok(minutes.saturating_add(ETA_OVERHEAD_MINUTES).max(1))
}

/// `steps` evenly spaced (lat, lon) points from `a` to `b`, endpoints included.
pub fn interpolate(a: &Location, b: &Location, steps: usize) -> Vec<(f64, f64)> {
    match steps {
        0 => Vec::new(),
        1 => vec![(a.lat(), a.lon())],
        _ => {
            let last = (steps - 1) as f64;
            (0..steps)
                .map(|i| {
                    let t = i as f64 / last;
                    (
                        a.lat() + (b.lat() - a.lat()) * t,
                        a.lon() + (b.lon() - a.lon()) * t,
                    )
                })
                .collect()
        }
    }
}

pub fn midpoint(a: &Location, b: &Location) -> (f64, f64) {
    ((a.lat() + b.lat()) / 2.0, (a.lon() + b.lon()) / 2.0)
}


#[cfg(test)]
mod prop_tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_distance_is_zero_iff_rounded_points_match(
            lat1 in -90.0..=90.0f64,
            lon1 in -180.0..=180.0f64,
            lat2 in -90.0..=90.0f64,
            lon2 in -180.0..=180.0f64,
        ) {
            let a = Location::new(lat1, lon1, None).unwrap();
            let b = Location::new(lat2, lon2, None).unwrap();
            let distance = haversine_km(&a, &b);

            prop_assert!(distance >= 0.0);
            prop_assert_eq!(distance == 0.0, a == b);
            prop_assert_eq!(haversine_km(&a, &a), 0.0);
        }

        #[test]
        fn prop_one_step_apart_is_not_zero(
            lat in -89.0..=89.0f64,
            lon in -179.0..=179.0f64,
            move_lat in any::<bool>(),
        ) {
            let a = Location::new(lat, lon, None).unwrap();
            let b = if move_lat {
                Location::new(a.lat() + 1e-6, a.lon(), None).unwrap()
            } else {
                Location::new(a.lat(), a.lon() + 1e-6, None).unwrap()
            };

            prop_assert_ne!(&a, &b);
            prop_assert!(haversine_km(&a, &b) > 0.0);
        }

        #[test]
        fn prop_eta_is_at_least_one_minute(
            distance in 0.0..=20_100.0f64,
            speed in prop_oneof![f64::MIN_POSITIVE..1.0f64, 1.0..1e9f64],
        ) {
            let minutes = eta_minutes(distance, speed).unwrap();
            prop_assert!(minutes >= 1);
            prop_assert!(minutes >= ETA_OVERHEAD_MINUTES);
        }

        #[test]
        fn prop_eta_rejects_non_positive_speed(
            distance in 0.0..=20_100.0f64,
            speed in -1e9..=0.0f64,
        ) {
            let is_invalid_argument = matches!(
                eta_minutes(distance, speed),
                Err(MetricError::InvalidArgument { .. })
            );
            prop_assert!(is_invalid_argument);
        }
    }
}
