use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;
use tracing::info;

use showcase_core::motion::runtime::{TimerEvent, TokioTimers};
use showcase_core::motion::Rotator;
use showcase_core::AppConfig;

pub async fn run(
    config: &AppConfig,
    items: Vec<String>,
    ticks: Option<u32>,
    motion_allowed: bool,
) -> Result<()> {
    let items = if items.is_empty() {
        config.rotation.items.clone()
    } else {
        items
    };
    if items.len() < 2 {
        println!("Nothing to rotate: give at least two items.");
        println!("\n  showcase rotate -i reading -i building");
        return Ok(());
    }

    let (mut timers, mut rx) = TokioTimers::new(config.scroll.animation_tick_duration());
    let mut rotator = Rotator::new(items, Duration::from_millis(config.rotation.interval_ms));

    println!("Now: {}", rotator.current().unwrap_or_default());
    if !rotator.start(&mut timers, motion_allowed) {
        println!("Reduced motion: rotation paused.");
        return Ok(());
    }

    // Create shutdown channel
    let (shutdown_tx, mut shutdown) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    println!(
        "Rotating every {}ms. Press Ctrl+C to stop.",
        config.rotation.interval_ms
    );

    let mut rotations = 0u32;
    loop {
        tokio::select! {
            result = shutdown.changed() => {
                if result.is_err() || *shutdown.borrow() {
                    break;
                }
            }

            event = rx.recv() => {
                let Some(event) = event else {
                    break;
                };
                if let TimerEvent::Interval(handle) = event {
                    if rotator.on_tick(handle, &mut timers, motion_allowed).is_some() {
                        println!("Now: {}", rotator.current().unwrap_or_default());
                        rotations += 1;
                        if ticks.is_some_and(|limit| rotations >= limit) {
                            break;
                        }
                    }
                }
            }
        }
    }

    rotator.stop(&mut timers);
    println!("Rotation stopped after {} changes.", rotations);
    Ok(())
}
