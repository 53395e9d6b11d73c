//! Seed command

use crate::app::App;
use crate::output;
use crate::Format;
use agrimap_core::config::Config;
use agrimap_core::{Result, ResultExt};
use owo_colors::OwoColorize;

pub async fn run(config: Config, format: Format) -> Result<()> {
    let app = App::connect(config).await?;
    let store = app.store.as_ref();
    let summary = agrimap_farms::seed(store, store)
        .await
        .context("While seeding sample data")?;

    if format == Format::Json {
        return output::print_json(&summary);
    }

    if summary.skipped {
        println!("  {} Users already exist, nothing seeded", "!".yellow());
    } else {
        output::success(&format!(
            "Seeded {} users and {} farms",
            summary.users, summary.farms
        ));
    }
    Ok(())
}
