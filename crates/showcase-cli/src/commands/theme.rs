use anyhow::Result;

use showcase_core::site::{FileThemeStore, Theme, ThemeController};
use showcase_core::AppConfig;

fn controller(config: &AppConfig, system_dark: bool) -> ThemeController<FileThemeStore> {
    ThemeController::new(FileThemeStore::new(config.theme_path()), system_dark)
}

pub fn show(config: &AppConfig, system_dark: bool) -> Result<()> {
    let controller = controller(config, system_dark);
    let source = if controller.has_stored_preference() {
        "stored"
    } else {
        "system"
    };
    println!("Theme: {} ({})", controller.theme(), source);
    println!("File: {}", controller.store().path().display());
    Ok(())
}

pub fn toggle(config: &AppConfig, system_dark: bool) -> Result<()> {
    let mut controller = controller(config, system_dark);
    let theme = controller.toggle();
    println!("Theme: {}", theme);
    Ok(())
}

pub fn set(config: &AppConfig, system_dark: bool, theme: &str) -> Result<()> {
    let theme: Theme = theme.parse()?;
    let mut controller = controller(config, system_dark);
    controller.set(theme);
    println!("Theme: {}", controller.theme());
    Ok(())
}
