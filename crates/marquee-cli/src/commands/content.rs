use anyhow::Result;

use marquee_core::backend::{load_section_copy, Filter, HttpContentSource};
use marquee_core::AppConfig;
use marquee_tui::content::default_hero;

pub async fn run(config: &AppConfig, collection: &str, filter: Option<&str>) -> Result<()> {
    let filter: Option<Filter> = filter.map(str::parse::<Filter>).transpose()?;
    let defaults = default_hero();

    let copy = if config.backend.content_base_url.is_some() {
        let source = HttpContentSource::new(config)?;
        load_section_copy(&source, collection, filter.as_ref(), defaults).await
    } else {
        println!("backend.content_base_url is not set, showing built-in copy\n");
        defaults
    };

    println!("{}", serde_json::to_string_pretty(&copy)?);
    Ok(())
}
