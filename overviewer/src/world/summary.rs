//! Human-readable summary of discovered saves.

use chrono::{Local, TimeZone};

use super::discovery::legacy_index;
use super::registry::{WorldDescriptor, WorldKey, WorldRegistry};

/// Game ticks per real-time second.
const TICKS_PER_SECOND: i64 = 20;

/// Format the "Detected saves" listing shown when no world was given.
///
/// Legacy `World<digit>` names are listed once, under their numeric index.
pub fn format_listing(registry: &WorldRegistry) -> String {
    if registry.is_empty() {
        return "No world saves found in the usual place".to_string();
    }

    let mut lines = vec!["Detected saves:".to_string()];
    let mut entries: Vec<(&WorldKey, &WorldDescriptor)> = registry
        .iter()
        .filter(|(key, _)| match key {
            WorldKey::Name(name) => legacy_index(name)
                .map(|i| registry.by_index(i).is_none())
                .unwrap_or(true),
            WorldKey::Index(_) => true,
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (key, world) in entries {
        lines.push(format_entry(key, world));
    }

    lines.join("\n")
}

/// Format one listing line.
pub fn format_entry(key: &WorldKey, world: &WorldDescriptor) -> String {
    format!(
        "World {}: {} Playtime: {} Modified: {}",
        key,
        format_size_mb(world.size_on_disk_bytes),
        format_playtime(world.total_play_ticks),
        format_timestamp(world.last_played_ms)
    )
}

/// Format a byte count as megabytes with two decimals.
pub fn format_size_mb(bytes: i64) -> String {
    format!("{:.2}MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Format game ticks as `H:MM`.
pub fn format_playtime(ticks: i64) -> String {
    let seconds = ticks / TICKS_PER_SECOND;
    format!("{}:{:02}", seconds / 3600, seconds / 60 % 60)
}

/// Format epoch milliseconds in local time as `YYYY-MM-DD HH:MM`.
pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => "unknown".to_string(),
    }
}
