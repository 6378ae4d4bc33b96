use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use trip_core::{
    Config, Coordinates, PlacePrediction, PlacesClient, ProviderId, TripPlanner,
    parse_date_filter,
    provider::{default_provider_from_config, provider_from_config},
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "trip", version, about = "Weather-aware trip planner")]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials: "openmeteo", "openweather" or "places".
    Configure {
        service: String,
    },

    /// Search destinations by name.
    Search {
        query: String,
    },

    /// Show weather and activity suggestions for a destination.
    Plan(PlanArgs),
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Destination to search for (requires a places API key).
    #[arg(required_unless_present_all = ["lat", "lon"])]
    pub query: Option<String>,

    /// Latitude, used together with --lon instead of a search query.
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude, used together with --lat.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Display name when planning by coordinates.
    #[arg(long)]
    pub name: Option<String>,

    /// Restrict the forecast to one day (YYYY-MM-DD or RFC 3339).
    #[arg(long)]
    pub date: Option<String>,

    /// Weather provider to use instead of the configured default.
    #[arg(long)]
    pub provider: Option<String>,

    /// Take the first search match without prompting.
    #[arg(long)]
    pub first: bool,

    /// Print the plan as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { service } => configure(&service),
            Command::Search { query } => search(&query).await,
            Command::Plan(args) => plan(args).await,
        }
    }
}

fn configure(service: &str) -> Result<()> {
    let mut config = Config::load()?;

    if service.eq_ignore_ascii_case("places") || service.eq_ignore_ascii_case("google") {
        let key = prompt_api_key("Google Places")?;
        config.set_places_api_key(key);
    } else {
        let id = ProviderId::try_from(service)?;
        if id.requires_api_key() {
            let key = prompt_api_key(id.as_str())?;
            config.upsert_provider_api_key(id, key);
        } else {
            println!("{id} needs no API key.");
        }
        config.set_default_provider(id);
    }

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

fn prompt_api_key(service: &str) -> Result<String> {
    let key = Password::new(&format!("API key for {service}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let key = key.trim().to_string();
    if key.is_empty() {
        bail!("API key must not be empty");
    }
    Ok(key)
}

fn planner(config: &Config, provider: Option<&str>) -> Result<TripPlanner> {
    let weather = match provider {
        Some(id) => provider_from_config(ProviderId::try_from(id)?, config)?,
        None => default_provider_from_config(config)?,
    };
    let places = config.places_api_key().map(PlacesClient::new);

    Ok(TripPlanner::new(places, weather))
}

async fn search(query: &str) -> Result<()> {
    let config = Config::load()?;
    let planner = planner(&config, None)?;

    let predictions = planner.search(query).await?;
    render::predictions(&predictions);
    Ok(())
}

async fn plan(args: PlanArgs) -> Result<()> {
    let config = Config::load()?;
    let planner = planner(&config, args.provider.as_deref())?;
    let date = args.date.as_deref().map(parse_date_filter).transpose()?;

    let plan = match (args.lat, args.lon, args.query.as_deref()) {
        (Some(lat), Some(lon), _) => {
            let coords = Coordinates::new(lat, lon)?;
            let name = args.name.clone().unwrap_or_else(|| coords.to_string());
            planner.plan_for_coordinates(&name, coords, date).await?
        }
        (_, _, Some(query)) => {
            let predictions = planner.search(query).await?;
            let chosen = choose(predictions, args.first)?;
            planner.plan_for_place(&chosen.place_id, date).await?
        }
        _ => bail!("Provide a destination or both --lat and --lon"),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        render::plan(&plan);
    }
    Ok(())
}

fn choose(mut predictions: Vec<PlacePrediction>, first: bool) -> Result<PlacePrediction> {
    if predictions.is_empty() {
        return Err(anyhow!("No destinations matched your search"));
    }
    if first || predictions.len() == 1 {
        return Ok(predictions.swap_remove(0));
    }

    let options: Vec<String> = predictions.iter().map(|p| p.description.clone()).collect();
    let picked = Select::new("Pick a destination:", options)
        .raw_prompt()
        .context("Failed to read selection")?;

    Ok(predictions.swap_remove(picked.index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trip_core::model::StructuredFormatting;

    fn prediction(id: &str) -> PlacePrediction {
        PlacePrediction {
            place_id: id.to_string(),
            description: format!("{id} description"),
            structured_formatting: StructuredFormatting {
                main_text: id.to_string(),
                secondary_text: String::new(),
            },
        }
    }

    #[test]
    fn parses_plan_by_query() {
        let cli = Cli::try_parse_from(["trip", "plan", "paris", "--date", "2026-10-20", "--first"])
            .unwrap();
        let Command::Plan(args) = cli.command else {
            panic!("expected plan command");
        };
        assert_eq!(args.query.as_deref(), Some("paris"));
        assert_eq!(args.date.as_deref(), Some("2026-10-20"));
        assert!(args.first);
    }

    #[test]
    fn parses_plan_by_coordinates() {
        let cli =
            Cli::try_parse_from(["trip", "-v", "plan", "--lat", "59.9", "--lon", "-10.7"]).unwrap();
        assert!(cli.verbose);
        let Command::Plan(args) = cli.command else {
            panic!("expected plan command");
        };
        assert_eq!(args.lat, Some(59.9));
        assert_eq!(args.lon, Some(-10.7));
        assert!(args.query.is_none());
    }

    #[test]
    fn plan_requires_destination() {
        assert!(Cli::try_parse_from(["trip", "plan"]).is_err());
        assert!(Cli::try_parse_from(["trip", "plan", "--lat", "1.0"]).is_err());
    }

    #[test]
    fn choose_takes_first_without_prompt() {
        let picked = choose(vec![prediction("a"), prediction("b")], true).unwrap();
        assert_eq!(picked.place_id, "a");

        let only = choose(vec![prediction("solo")], false).unwrap();
        assert_eq!(only.place_id, "solo");
    }

    #[test]
    fn choose_errors_on_no_matches() {
        let err = choose(Vec::new(), true).unwrap_err();
        assert!(err.to_string().contains("No destinations matched"));
    }
}
