//! Human-friendly output: the info panel, the map link and notifications.

use std::{
    fmt::Write as _,
    sync::atomic::{AtomicU8, Ordering},
};

use geoweather_core::{
    Coordinates, LookupError, LookupObserver, MapSurface, RecentHistory, ResolvedLocation,
};

/// Prints failures to stderr, like a toast.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalObserver;

impl LookupObserver for TerminalObserver {
    fn on_loading(&self, loading: bool) {
        tracing::trace!(loading, "loading state changed");
    }

    fn on_error(&self, error: &LookupError) {
        tracing::debug!("lookup failed: {error}");
        eprintln!("✗ {}", error.user_message());
    }
}

/// Stands in for the tile map: the marker becomes an OpenStreetMap link.
#[derive(Debug)]
pub struct LinkMap {
    zoom: AtomicU8,
}

impl Default for LinkMap {
    fn default() -> Self {
        Self { zoom: AtomicU8::new(geoweather_core::session::POINT_ZOOM) }
    }
}

impl MapSurface for LinkMap {
    fn set_view(&self, _coords: Coordinates, zoom: u8) {
        self.zoom.store(zoom, Ordering::Relaxed);
    }

    fn place_marker(&self, coords: Coordinates, popup: Option<String>) {
        if let Some(popup) = popup {
            println!("📍 {popup}");
        }
        println!("   {}", osm_link(coords, self.zoom.load(Ordering::Relaxed)));
    }
}

pub fn osm_link(coords: Coordinates, zoom: u8) -> String {
    format!(
        "https://www.openstreetmap.org/?mlat={lat:.5}&mlon={lon:.5}#map={zoom}/{lat:.5}/{lon:.5}",
        lat = coords.latitude(),
        lon = coords.longitude(),
    )
}

/// The info panel for one location.
pub fn location(loc: &ResolvedLocation) -> String {
    let mut out = String::new();
    let c = &loc.current;

    let title = if loc.country_name.is_empty() {
        loc.display_name.clone()
    } else {
        format!("{}, {}", loc.display_name, loc.country_name)
    };

    let _ = writeln!(out);
    let _ = writeln!(out, "{title}  ({})", loc.coordinates);
    let _ = writeln!(
        out,
        "  {}°C  {}  (feels like {}°C)",
        c.temperature_c, c.condition, c.feels_like_c
    );
    let _ = writeln!(
        out,
        "  Humidity {}%   Wind {} km/h   Pressure {} hPa",
        c.humidity_pct, c.wind_speed_kmh, c.pressure_hpa
    );
    let _ = writeln!(
        out,
        "  Visibility {} km   UV {}   Sunrise {}   Sunset {}",
        c.visibility_km,
        c.uv_index,
        c.sunrise.as_deref().unwrap_or("--:--"),
        c.sunset.as_deref().unwrap_or("--:--"),
    );

    if !loc.forecast.is_empty() {
        let _ = writeln!(out);
        for (i, day) in loc.forecast.iter().enumerate() {
            let label = if i == 0 {
                "Today".to_string()
            } else {
                day.date.format("%a").to_string()
            };
            let _ = writeln!(
                out,
                "  {label:<6} {:>4}° / {:>3}°  {}",
                day.max_temp_c, day.min_temp_c, day.condition
            );
        }
    }

    out
}

/// One line per recent entry, newest first.
pub fn recent(history: &RecentHistory) -> Vec<String> {
    history
        .entries()
        .iter()
        .map(|e| {
            format!(
                "{} ({})  {}°C {}",
                e.display_name, e.coordinates, e.current.temperature_c, e.current.condition
            )
        })
        .collect()
}
