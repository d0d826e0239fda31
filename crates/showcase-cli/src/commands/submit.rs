use anyhow::{anyhow, bail, Result};

use showcase_core::site::{ContactForm, HttpTransport};
use showcase_core::AppConfig;

pub async fn run(config: &AppConfig, action: Option<&str>, fields: &[String]) -> Result<()> {
    let Some(action) = action.or(config.contact.action.as_deref()) else {
        bail!("No form action: pass --action or set contact.action in the config");
    };

    let transport = HttpTransport::new(&config.contact)?;
    let mut form = ContactForm::new(transport, action)?;
    for field in fields {
        let (name, value) = field
            .split_once('=')
            .ok_or_else(|| anyhow!("Field must look like name=value: {}", field))?;
        form.set_field(name.trim(), value);
    }

    println!("Sending to {}...", form.action());
    let status = form.submit().await;
    println!("{}", status.message());

    if !status.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
