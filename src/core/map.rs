//! Leaflet HTML rendering of the analyzed track.
//!
//! The output is a single self-contained page: route polyline, one marker
//! plus a scaled circle per qualifying stop, viewport fitted to the route
//! bounds. Leaflet assets come from the public CDN.

use crate::domain::model::{AnalysisResult, AnalysisSettings, LatLng, StopPoint};
use crate::utils::error::{Result, TrackError};
use chrono::{Duration, FixedOffset};

const ROUTE_COLOR: &str = "#e4007f";
const STOP_CIRCLE_COLOR: &str = "#00aa00";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1.0"/>
<title>rest-with-gps</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"/>
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map { margin: 0; height: 100%; }</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map('map');
map.fitBounds(__BOUNDS__);
L.tileLayer('https://tile.openstreetmap.org/{z}/{x}/{y}.png', {
    maxZoom: 19,
    attribution: '&copy; OpenStreetMap contributors'
}).addTo(map);
L.polyline(__ROUTE__, {color: '__ROUTE_COLOR__'}).addTo(map);
__MARKERS__
</script>
</body>
</html>
"#;

pub struct MapRenderer {
    settings: AnalysisSettings,
    map_link_base: String,
}

impl MapRenderer {
    pub fn new(settings: AnalysisSettings, map_link_base: &str) -> Self {
        Self {
            settings,
            map_link_base: map_link_base.to_string(),
        }
    }

    /// Southwest and northeast corners of the route's bounding box.
    pub fn bounds(route: &[LatLng]) -> Option<(LatLng, LatLng)> {
        if route.is_empty() {
            return None;
        }
        let mut min = route[0];
        let mut max = route[0];
        for p in route {
            min.lat = min.lat.min(p.lat);
            min.lng = min.lng.min(p.lng);
            max.lat = max.lat.max(p.lat);
            max.lng = max.lng.max(p.lng);
        }
        Some((min, max))
    }

    /// Midpoint of the bounding box.
    pub fn center(route: &[LatLng]) -> Option<LatLng> {
        Self::bounds(route).map(|(min, max)| LatLng {
            lat: (min.lat + max.lat) / 2.0,
            lng: (min.lng + max.lng) / 2.0,
        })
    }

    pub fn render(&self, result: &AnalysisResult) -> Result<String> {
        let (min, max) = Self::bounds(&result.route).ok_or_else(|| TrackError::ProcessingError {
            message: "cannot render a map for an empty route".to_string(),
        })?;

        let bounds = format!(
            "[[{}, {}], [{}, {}]]",
            min.lat, min.lng, max.lat, max.lng
        );

        let route: Vec<[f64; 2]> = result.route.iter().map(|p| [p.lat, p.lng]).collect();
        let route_json = serde_json::to_string(&route)?;

        let markers = result
            .stops
            .iter()
            .filter(|s| s.duration() >= Duration::minutes(self.settings.min_stop_minutes))
            .map(|s| self.stop_marker(s))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(PAGE_TEMPLATE
            .replace("__BOUNDS__", &bounds)
            .replace("__ROUTE__", &route_json)
            .replace("__ROUTE_COLOR__", ROUTE_COLOR)
            .replace("__MARKERS__", &markers))
    }

    fn stop_marker(&self, stop: &StopPoint) -> String {
        let offset = FixedOffset::east_opt((self.settings.utc_offset_hours * 3600) as i32)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
        let start = stop.start_time.with_timezone(&offset).format("%d/%H:%M");
        let end = stop.end_time.with_timezone(&offset).format("%d/%H:%M");
        let link = format!("{}?q={},{}", self.map_link_base, stop.latitude, stop.longitude);
        let popup = format!(
            "{}-{}<br>{} <a href=\\\"{}\\\" target=\\\"_blank\\\" rel=\\\"noopener noreferrer\\\">googlemap</a>",
            start,
            end,
            stop.elapsed_label(),
            link
        );
        let radius = stop.elapsed_minutes() as f64 / 4.0;

        format!(
            "L.marker([{lat}, {lng}]).addTo(map).bindPopup(\"{popup}\");\n\
             L.circleMarker([{lat}, {lng}], {{color: '{color}', radius: {radius}}}).addTo(map);",
            lat = stop.latitude,
            lng = stop.longitude,
            popup = popup,
            color = STOP_CIRCLE_COLOR,
            radius = radius
        )
    }
}
