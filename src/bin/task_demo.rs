use std::process::ExitCode;

use chrono::{Duration, Utc};
use serde_json::json;

use delivery_tasks::config::{self, Config};
use delivery_tasks::models::DeliveryTask;

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    config::init_tracing(&config.log_level);

    let payload = json!({
        "id": "task_001",
        "pickup": { "lat": 48.8566, "lon": 2.3522, "address": "Paris center" },
        "dropoff": { "lat": 48.864716, "lon": 2.349014, "address": "Near Louvre" },
        "weight_kg": 2.5,
        "scheduled_for": (Utc::now() + Duration::hours(1)).to_rfc3339()
    });

    let task = match DeliveryTask::validate(&payload) {
        Ok(task) => task,
        Err(err) => {
            println!("Validation failed:");
            for violation in &err.violations {
                println!("  {violation}");
            }
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&task) {
        Ok(body) => println!("Task created: {body}"),
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize task");
            return ExitCode::FAILURE;
        }
    }
    println!("Distance (km): {:.2}", task.distance_km());

    match task.estimated_time_minutes(config.eta_speed_kmph) {
        Ok(minutes) => println!("ETA minutes: {minutes}"),
        Err(err) => {
            tracing::error!(error = %err, "failed to estimate travel time");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
