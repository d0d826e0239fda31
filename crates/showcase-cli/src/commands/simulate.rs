use std::path::Path;

use anyhow::Result;

use showcase_core::{AppConfig, Scenario};

pub fn run(config: &AppConfig, file: &Path, json: bool) -> Result<()> {
    let scenario = Scenario::load(file)?;
    let report = scenario.run(config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Timeline ({} events):\n", report.timeline.len());
    for entry in &report.timeline {
        println!("  {:>6}ms  {}", entry.at_ms, report.describe(&entry.event));
    }

    if !report.page_events.is_empty() {
        println!("\nPage ({} events):\n", report.page_events.len());
        for entry in &report.page_events {
            println!("  {:>6}ms  {}", entry.at_ms, entry.event.describe());
        }
    }

    let state = &report.final_state;
    println!();
    println!("Elements:");
    for element in &report.elements {
        let mark = if element.revealed { "x" } else { " " };
        println!("  [{}] {} (delay {}ms)", mark, element.name, element.delay_ms);
    }
    println!();
    println!("Revealed: {}/{}", state.revealed, state.total);
    if let Some(section) = &state.active_section {
        println!("Active section: {}", section);
    }
    if let Some(index) = state.rotation_index {
        let item = report.rotation.get(index).map(String::as_str).unwrap_or("-");
        println!("Now: {}", item);
    }
    println!("Scroll: {:.0}px (ended at {}ms)", state.scroll_y, state.at_ms);
    if state.menu_open {
        println!("Menu: open");
    }
    if let Some(id) = &state.open_modal {
        println!("Modal: {}", id);
    }
    if !state.expanded.is_empty() {
        println!("Expanded: {}", state.expanded.join(", "));
    }

    Ok(())
}
