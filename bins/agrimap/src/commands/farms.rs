//! Farms commands

use crate::app::App;
use crate::output;
use crate::Format;
use agrimap_core::config::Config;
use agrimap_core::Result;
use agrimap_farms::{CreateFarm, FarmListing, FarmListingRequest, ListingParams};
use clap::Args;
use owo_colors::OwoColorize;
use uuid::Uuid;

/// Listing parameters, passed through unparsed so they are validated
/// together.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Requesting user id
    #[arg(long)]
    pub user_id: String,

    /// Row filter (OUTLIERS)
    #[arg(long)]
    pub filter_by: Option<String>,

    /// "true" keeps outliers, anything else keeps the rest
    #[arg(long)]
    pub filter_value: Option<String>,

    /// 1-based page
    #[arg(long)]
    pub page: Option<String>,

    /// Page size
    #[arg(long)]
    pub size: Option<String>,

    /// name, date or distance
    #[arg(long)]
    pub sort_by: Option<String>,

    /// ASC or DESC
    #[arg(long)]
    pub sort_order: Option<String>,
}

impl From<ListArgs> for ListingParams {
    fn from(args: ListArgs) -> Self {
        Self {
            user_id: Some(args.user_id),
            filter_by: args.filter_by,
            filter_value: args.filter_value,
            page: args.page,
            size: args.size,
            sort_by: args.sort_by,
            sort_order: args.sort_order,
        }
    }
}

pub async fn list(config: Config, args: ListArgs, format: Format) -> Result<()> {
    let request = FarmListingRequest::from_params(&args.into(), &config.schema.listing)?;

    let app = App::connect(config).await?;
    let listings = app.farms()?.list_farms(&request).await?;

    if format == Format::Json {
        return output::print_json(&listings);
    }

    output::header(&format!(
        "Farms by {} {} (page {}, size {})",
        request.sort_by, request.sort_order, request.page, request.size
    ));
    print_table(&listings);
    Ok(())
}

pub async fn create(config: Config, user_id: Uuid, input: CreateFarm, format: Format) -> Result<()> {
    let app = App::connect(config).await?;
    let farm = app.farms()?.create_farm(user_id, input).await?;

    if format == Format::Json {
        return output::print_json(&farm);
    }

    output::success("Farm created");
    output::field("id", farm.id);
    output::field("name", &farm.name);
    output::field("address", &farm.address);
    output::field("coordinates", farm.coordinates);
    output::field("size", format!("{} ha", farm.size));
    output::field("yield", format!("{} t", farm.crop_yield));
    Ok(())
}

fn print_table(listings: &[FarmListing]) {
    if listings.is_empty() {
        println!("  {}", "No farms found".dimmed());
        return;
    }

    println!(
        "  {:<24} {:<28} {:>9} {:>9} {:>10}",
        "Name".dimmed(),
        "Owner".dimmed(),
        "Size".dimmed(),
        "Yield".dimmed(),
        "Drive km".dimmed()
    );
    println!("  {}", "─".repeat(84).dimmed());

    for farm in listings {
        println!(
            "  {:<24} {:<28} {:>9.2} {:>9.2} {:>10.1}",
            farm.name, farm.owner, farm.size, farm.crop_yield, farm.driving_distance
        );
    }
    println!();
    println!("  {} farms", listings.len());
}
