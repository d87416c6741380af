pub mod agent;
pub mod location;
pub mod task;
pub mod vehicle;

pub use agent::Agent;
pub use location::Location;
pub use task::{DeliveryTask, JobStatus};
pub use vehicle::Vehicle;

#[cfg(test)]
mod prop_tests {
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    use super::*;
    use crate::validation::FixedClock;

    fn arb_location() -> impl Strategy<Value = Location> {
        (
            -90.0..=90.0f64,
            -180.0..=180.0f64,
            proptest::option::of("[A-Za-z0-9 ,.'-]{0,24}"),
        )
            .prop_map(|(lat, lon, address)| Location::new(lat, lon, address).unwrap())
    }

    fn arb_vehicle() -> impl Strategy<Value = Vehicle> {
        (
            "[a-z0-9_]{1,12}",
            prop_oneof![Just("bike"), Just("car"), Just("van"), Just("cargo bike")],
            1e-3..1e5f64,
            proptest::option::of("[A-Z0-9-]{4,10}"),
        )
            .prop_map(|(id, kind, capacity_kg, plate)| Vehicle::new(id, kind, capacity_kg, plate).unwrap())
    }

    fn arb_agent() -> impl Strategy<Value = Agent> {
        (
            "[a-z0-9_]{1,12}",
            "[A-Za-z ]{1,20}",
            "[0-9 ()+-]{1,18}",
            proptest::option::of("[a-z]{1,8}@[a-z]{1,8}\\.com"),
            proptest::option::of(arb_vehicle()),
            arb_location(),
            any::<bool>(),
        )
            .prop_map(|(id, name, phone, email, vehicle, location, active)| {
                let mut agent = Agent::new(id, name, &phone, location);
                agent.set_email(email);
                agent.set_vehicle(vehicle);
                agent.set_active(active);
                agent
            })
    }

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2030, 6, 1, 9, 30, 0).unwrap())
    }

    fn arb_task() -> impl Strategy<Value = DeliveryTask> {
        (
            "[a-z0-9_]{1,12}",
            arb_location(),
            arb_location(),
            1e-3..1e4f64,
            proptest::option::of("[a-z0-9_]{1,12}"),
            proptest::sample::select(JobStatus::ALL.to_vec()),
            proptest::option::of(1i64..100_000),
        )
            .prop_map(|(id, pickup, dropoff, weight_kg, assigned_to, status, delay_ms)| {
                let clock = clock();
                let mut task = DeliveryTask::new(id, pickup, dropoff, weight_kg, &clock).unwrap();
                if let Some(agent_id) = assigned_to {
                    task.assign_to(agent_id);
                }
                task.set_status(status);
                if let Some(delay_ms) = delay_ms {
                    task.schedule_for(clock.0 + Duration::milliseconds(delay_ms), &clock)
                        .unwrap();
                }
                task
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_location_survives_the_wire(location in arb_location()) {
            let wire = serde_json::to_value(&location).unwrap();
            prop_assert_eq!(Location::validate(&wire).unwrap(), location);
        }

        #[test]
        fn prop_vehicle_survives_the_wire(vehicle in arb_vehicle()) {
            let wire = serde_json::to_value(&vehicle).unwrap();
            prop_assert_eq!(Vehicle::validate(&wire).unwrap(), vehicle);
        }

        #[test]
        fn prop_agent_survives_the_wire(agent in arb_agent()) {
            let wire = serde_json::to_value(&agent).unwrap();
            prop_assert_eq!(Agent::validate(&wire).unwrap(), agent);
        }

        #[test]
        fn prop_task_survives_the_wire(task in arb_task()) {
            let wire = serde_json::to_value(&task).unwrap();
            prop_assert_eq!(DeliveryTask::validate_with_clock(&wire, &clock()).unwrap(), task);
        }

        #[test]
        fn prop_phone_never_keeps_separators(phone in "[0-9 ()+\t-]{0,24}", location in arb_location()) {
            let mut agent = Agent::new("a", "n", "0", location);
            agent.set_phone(&phone);
            prop_assert!(!agent.phone().chars().any(|c| c.is_whitespace() || "-()".contains(c)));
        }
    }
}
