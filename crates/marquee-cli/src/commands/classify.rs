use anyhow::Result;

use marquee_core::breakpoint::Thresholds;
use marquee_core::{classify, AppConfig};

pub fn run(config: &AppConfig, width: u32) -> Result<()> {
    let thresholds = Thresholds::from(&config.tokens.breakpoints);
    let class = classify(width, &thresholds);
    println!(
        "{}px: {} (mobile <= {}, tablet <= {})",
        width, class, thresholds.mobile_max, thresholds.tablet_max
    );
    Ok(())
}
