//! Map rendering.
//!
//! Builds the capped marker set from the stop snapshot and injects it, along
//! with the configured center and zoom, into the embedded Leaflet page.

use serde::Serialize;
use tracing::warn;

use crate::config::MapConfig;
use crate::providers::datasets::Stop;

// Embedded at compile time; the binary serves everything itself.
const MAP_TEMPLATE: &str = include_str!("../static/map.html");

/// One stop marker on the map.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

/// The first `min(stops.len(), cap)` stops as markers, in snapshot order.
pub fn markers(stops: &[Stop], cap: usize) -> Vec<Marker> {
    stops
        .iter()
        .take(cap)
        .map(|stop| Marker {
            latitude: stop.latitude,
            longitude: stop.longitude,
            label: stop.stop_name.clone(),
        })
        .collect()
}

/// Render the map page with the marker set baked in.
pub fn render_page(stops: &[Stop], config: &MapConfig) -> String {
    let markers = markers(stops, config.marker_cap);
    let marker_json = match serde_json::to_string(&markers) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "Failed to serialize markers");
            "[]".to_string()
        }
    };

    MAP_TEMPLATE
        .replace("__MARKERS__", &marker_json)
        .replace("__CENTER_LAT__", &config.center_latitude.to_string())
        .replace("__CENTER_LON__", &config.center_longitude.to_string())
        .replace("__ZOOM__", &config.zoom.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops(count: usize) -> Vec<Stop> {
        (0..count)
            .map(|i| Stop {
                stop_id: i.to_string(),
                stop_name: format!("Stop {i}"),
                latitude: 39.0 + i as f64 * 0.001,
                longitude: -76.0 - i as f64 * 0.001,
            })
            .collect()
    }

    #[test]
    fn marker_count_is_capped() {
        assert_eq!(markers(&stops(150), 100).len(), 100);
        assert_eq!(markers(&stops(30), 100).len(), 30);
        assert_eq!(markers(&stops(0), 100).len(), 0);
    }

    #[test]
    fn markers_keep_snapshot_order_and_labels() {
        let set = markers(&stops(5), 3);
        assert_eq!(set.len(), 3);
        assert_eq!(set[0].label, "Stop 0");
        assert_eq!(set[2].label, "Stop 2");
    }

    #[test]
    fn render_substitutes_all_placeholders() {
        let config = MapConfig::default();
        let page = render_page(&stops(3), &config);
        assert!(!page.contains("__MARKERS__"));
        assert!(!page.contains("__CENTER_LAT__"));
        assert!(!page.contains("__CENTER_LON__"));
        assert!(!page.contains("__ZOOM__"));
        assert!(page.contains("Stop 1"));
        assert!(page.contains("39.2904"));
        assert!(page.contains("-76.6122"));
    }

    #[test]
    fn render_embeds_only_the_capped_set() {
        let config = MapConfig {
            marker_cap: 2,
            ..MapConfig::default()
        };
        let page = render_page(&stops(5), &config);
        assert!(page.contains("Stop 0"));
        assert!(page.contains("Stop 1"));
        assert!(!page.contains("Stop 2"));
    }
}
