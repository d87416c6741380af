use chrono::{Duration, Utc};
use serde_json::json;

use delivery_tasks::config::{self, Config};
use delivery_tasks::error::AppError;
use delivery_tasks::map::RouteMap;
use delivery_tasks::models::DeliveryTask;

fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;
    config::init_tracing(&config.log_level);

    let payload = json!({
        "id": "task_001",
        "pickup": { "lat": 48.8566, "lon": 2.3522, "address": "Paris center" },
        "dropoff": { "lat": 48.864716, "lon": 2.349014, "address": "Near Louvre" },
        "weight_kg": 2.5,
        "scheduled_for": (Utc::now() + Duration::hours(1)).to_rfc3339()
    });

    let task = DeliveryTask::validate(&payload)?;
    let map = RouteMap::from_task(&task, config.map_steps, config.eta_speed_kmph)?;
    map.write_to(&config.map_output)?;

    println!("Saved map to {}", config.map_output);
    println!("Distance (km): {:.2}", map.distance_km);
    println!("ETA minutes: {}", map.eta_minutes);

    Ok(())
}
