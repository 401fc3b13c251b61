use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use pf_boundary::{NewPlace, Pagination, PlaceId, UpdatePlace};
use pf_core::SearchDispatcher;
use pf_frontend_api::PlacesApi;
use tokio::io::{self, AsyncBufReadExt as _, BufReader};

use crate::{config::Config, render};

const RESET_COMMAND: &str = ":reset";
const QUIT_COMMANDS: [&str; 2] = [":quit", ":q"];

/// Find places by name, city, or coordinates.
#[derive(Debug, Parser)]
#[command(name = "placefinder", version, about)]
pub struct Args {
    /// Configuration file (default: placefinder.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base URL of the places catalog API
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search by text or by "lat, lng" coordinates
    Search {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },
    /// Show all places
    Reset,
    /// List places page by page
    List {
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long)]
        size: Option<u32>,
    },
    /// Show a single place
    Get { id: String },
    /// Add a new place
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long = "photo")]
        photos: Vec<String>,
    },
    /// Change some fields of a place
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long = "photo")]
        photos: Option<Vec<String>>,
        #[arg(long)]
        rating: Option<f64>,
    },
    /// Remove a place
    Delete { id: String },
    /// Attach a photo to a place
    UploadPhoto { id: String, file: PathBuf },
    /// Read search queries from stdin (default)
    #[command(alias = "repl")]
    Interactive,
}

pub async fn run(args: Args) -> Result<()> {
    let Args {
        config,
        api_url,
        command,
    } = args;
    let mut cfg = Config::try_load_from_file_or_default(config)?;
    cfg.override_api_url(api_url);
    log::info!("Using places catalog at {}", cfg.catalog.base_url);

    let api = PlacesApi::new(cfg.catalog.base_url);
    match command.unwrap_or(Command::Interactive) {
        Command::Search { query } => {
            let dispatcher = SearchDispatcher::with_settings(api, cfg.search);
            let query = query.join(" ");
            match dispatcher.dispatch(&query).await? {
                Some(page) => println!("{}", render::places(&page)),
                None => bail!("Empty search query"),
            }
        }
        Command::Reset => {
            let dispatcher = SearchDispatcher::with_settings(api, cfg.search);
            let page = dispatcher.reset().await?;
            println!("{}", render::places(&page));
        }
        Command::List { page, size } => {
            let size = size.unwrap_or(cfg.search.page_size);
            let places = api.places(Pagination::new(page, size)).await?;
            println!("{}", render::places(&places));
        }
        Command::Get { id } => {
            let place = api.place(&PlaceId::from(id)).await?;
            print!("{}", render::place(&place));
        }
        Command::Create {
            name,
            description,
            address,
            photos,
        } => {
            let new_place = NewPlace {
                name,
                description,
                address,
                photos,
            };
            let place = api.create_place(&new_place).await?;
            print!("{}", render::place(&place));
        }
        Command::Update {
            id,
            name,
            description,
            address,
            photos,
            rating,
        } => {
            let update = UpdatePlace {
                name,
                description,
                address,
                photos,
                rating,
            };
            if update.is_empty() {
                bail!("Nothing to update");
            }
            let place = api.update_place(&PlaceId::from(id), &update).await?;
            print!("{}", render::place(&place));
        }
        Command::Delete { id } => {
            let id = PlaceId::from(id);
            api.delete_place(&id).await?;
            println!("Deleted place {id}");
        }
        Command::UploadPhoto { id, file } => {
            let file_name = file
                .file_name()
                .and_then(|name| name.to_str())
                .context("Invalid photo file name")?
                .to_string();
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Unable to read {}", file.display()))?;
            let upload = api
                .upload_photo(&PlaceId::from(id), &file_name, data)
                .await?;
            println!("{}", render::photo_upload(&upload));
        }
        Command::Interactive => {
            let dispatcher = SearchDispatcher::with_settings(api, cfg.search);
            interactive(&dispatcher).await?;
        }
    }
    Ok(())
}

async fn interactive(dispatcher: &SearchDispatcher<PlacesApi>) -> Result<()> {
    println!(
        "Search by name or city, or enter coordinates like \"40.7128, -74.0060\". \
         {RESET_COMMAND} shows all places, {} quits.",
        QUIT_COMMANDS[0]
    );
    if let Err(err) = dispatcher.reset().await {
        log::debug!("Initial listing failed: {err}");
    }
    println!("{}", render::request_state(&dispatcher.active_state()));

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if QUIT_COMMANDS.contains(&line) {
            break;
        }
        let outcome = if line == RESET_COMMAND {
            dispatcher.reset().await.map(Some)
        } else {
            dispatcher.dispatch(line).await
        };
        match outcome {
            Ok(None) => continue,
            Ok(Some(_)) => {}
            // the failure is part of the active state
            Err(err) => log::debug!("Search failed: {err}"),
        }
        println!("== {} ==", render::mode(dispatcher.active_mode()));
        println!("{}", render::request_state(&dispatcher.active_state()));
    }
    Ok(())
}
