//! Table rendering for setting views.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use settings_registry::SettingEntry;

const HEADER: [&str; 3] = ["Setting", "Value", "Description"];

/// Builds a table of `entries` sorted by key.
#[must_use]
pub fn settings_table(entries: &[SettingEntry]) -> Table {
    let mut sorted: Vec<&SettingEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.key.cmp(&b.key));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(HEADER.iter().map(Cell::new));
    for entry in sorted {
        table.add_row(vec![
            Cell::new(&entry.key),
            Cell::new(&entry.value),
            Cell::new(&entry.description),
        ]);
    }
    table
}

/// Renders `entries` as a table string.
#[must_use]
pub fn render_settings(entries: &[SettingEntry]) -> String {
    settings_table(entries).to_string()
}
