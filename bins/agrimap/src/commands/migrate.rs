//! Migrate command

use crate::app::App;
use crate::output;
use crate::Format;
use agrimap_core::config::Config;
use agrimap_core::Result;
use serde_json::json;

pub async fn run(config: Config, format: Format) -> Result<()> {
    let app = App::connect(config).await?;
    app.store.migrate().await?;

    match format {
        Format::Json => output::print_json(&json!({ "migrated": true })),
        Format::Text => {
            output::success("Migrations applied");
            Ok(())
        }
    }
}
