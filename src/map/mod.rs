//! Straight-line route maps for a single delivery task, rendered as a
//! self-contained Leaflet page.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::{AppError, MetricError};
use crate::geo::{interpolate, midpoint};
use crate::models::task::DeliveryTask;

const DEFAULT_ZOOM: u8 = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteMap {
    pub center: (f64, f64),
    pub zoom: u8,
    pub pickup: Marker,
    pub dropoff: Marker,
    pub steps: Vec<Marker>,
    pub distance_km: f64,
    pub eta_minutes: u64,
}

impl RouteMap {
    pub fn from_task(task: &DeliveryTask, steps: usize, avg_speed_kmph: f64) -> Result<Self, MetricError> {
        let pickup = task.pickup();
        let dropoff = task.dropoff();

        let steps = interpolate(pickup, dropoff, steps)
            .into_iter()
            .enumerate()
            .map(|(i, (lat, lon))| Marker {
                lat,
                lon,
                label: format!("Step {}", i + 1),
            })
            .collect();

        Ok(Self {
            center: midpoint(pickup, dropoff),
            zoom: DEFAULT_ZOOM,
            pickup: Marker {
                lat: pickup.lat(),
                lon: pickup.lon(),
                label: "Pickup".to_string(),
            },
            dropoff: Marker {
                lat: dropoff.lat(),
                lon: dropoff.lon(),
                label: "Dropoff".to_string(),
            },
            steps,
            distance_km: task.distance_km(),
            eta_minutes: task.estimated_time_minutes(avg_speed_kmph)?,
        })
    }

    pub fn render_html(&self) -> String {
        let mut lines = vec![
            format!(
                "const map = L.map('map').setView([{}, {}], {});",
                self.center.0, self.center.1, self.zoom
            ),
            "L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', { maxZoom: 19, attribution: '&copy; OpenStreetMap contributors' }).addTo(map);".to_string(),
        ];
        lines.extend([&self.pickup, &self.dropoff].into_iter().map(|marker| {
            let label = escape_js(&marker.label);
            format!(
                "L.marker([{}, {}]).bindPopup('{label}').bindTooltip('{label}').addTo(map);",
                marker.lat, marker.lon
            )
        }));
        lines.push(format!(
            "L.polyline([[{}, {}], [{}, {}]], {{ color: 'blue', weight: 3, opacity: 0.8 }}).addTo(map);",
            self.pickup.lat, self.pickup.lon, self.dropoff.lat, self.dropoff.lon
        ));
        lines.extend(self.steps.iter().map(|step| {
            let label = escape_js(&step.label);
            format!(
                "L.circleMarker([{}, {}], {{ radius: 4 }}).bindPopup('{label}').bindTooltip('{label}').addTo(map);",
                step.lat, step.lon
            )
        }));
        let script = lines.join("\n");

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Route: {distance:.2} km, ~{eta} min</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
{script}
</script>
</body>
</html>
"#,
            distance = self.distance_km,
            eta = self.eta_minutes,
        )
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), AppError> {
        let path = path.as_ref();
        fs::write(path, self.render_html())
            .map_err(|err| AppError::Internal(format!("failed to write {}: {err}", path.display())))?;

        info!(path = %path.display(), steps = self.steps.len(), "route map saved");
        Ok(())
    }
}

fn escape_js(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'").replace('<', "\\x3c")
}
