//! Users commands

use crate::app::App;
use crate::output;
use crate::Format;
use agrimap_core::config::Config;
use agrimap_core::{Result, ResultExt};
use agrimap_farms::User;
use uuid::Uuid;

pub async fn create(config: Config, email: &str, format: Format) -> Result<()> {
    let app = App::connect(config).await?;
    let user = app.users()?.create_user(email).await?;
    show(&user, "User created", format)
}

pub async fn locate(config: Config, user_id: Uuid, address: &str, format: Format) -> Result<()> {
    let app = App::connect(config).await?;
    let user = app
        .users()?
        .update_location(user_id, address)
        .await
        .context(format!("While locating user {user_id}"))?;
    show(&user, "User located", format)
}

fn show(user: &User, title: &str, format: Format) -> Result<()> {
    if format == Format::Json {
        return output::print_json(user);
    }

    output::success(title);
    output::field("id", user.id);
    output::field("email", &user.email);
    if let Some(address) = &user.address {
        output::field("address", address);
    }
    if let Some(coordinates) = user.coordinates {
        output::field("coordinates", coordinates);
    }
    Ok(())
}
