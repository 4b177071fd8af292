//! Check command implementation.

use super::SinkArgs;
use crate::output;

pub fn run(sink: SinkArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = sink.to_config()?;
    let adjustments = config.reconcile();
    println!(
        "{}",
        output::format_json(&output::check_report(&config, &adjustments))
    );
    Ok(())
}
