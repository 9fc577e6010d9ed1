use anyhow::Result;

use marquee_core::AppConfig;

pub fn run(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path();

    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            AppConfig::default().save()?;
            println!("Wrote default config to {}", path.display());
        }
        return Ok(());
    }

    println!("Config file: {}", path.display());
    if !path.exists() {
        println!("(not found, using defaults; run `marquee config --init` to create it)");
    }
    println!("Log file:    {}\n", config.log_path().display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
