use anyhow::{bail, Result};
use chrono::Local;

use showcase_core::site::{footer_year, greeting_for_hour, greeting_now};

pub fn run(hour: Option<u32>) -> Result<()> {
    let greeting = match hour {
        Some(hour) if hour > 23 => bail!("Hour must be between 0 and 23, got {}", hour),
        Some(hour) => greeting_for_hour(hour),
        None => greeting_now(),
    };

    println!("{}", greeting);
    println!("© {}", footer_year(&Local::now()));
    Ok(())
}
