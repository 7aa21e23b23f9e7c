use artic_gal::config::{self, AppConfig};
use artic_gal::favorites::Favorites;
use artic_gal::feed::{FeedState, PagedFeed};
use artic_gal::gallery::Gallery;
use artic_gal::layout::{BoxContainer, FrameQueue, MasonryGrid};
use artic_gal::output;
use artic_gal::rest::{HttpTransport, RestQueryClient};
use artic_gal::types::ArtworkCard;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Height used for cards whose thumbnail size is unknown.
const FALLBACK_CARD_HEIGHT: f64 = 300.0;

#[derive(Parser)]
#[command(name = "artic-gal")]
#[command(about = "Browse the Art Institute of Chicago collection from the terminal")]
#[command(long_about = "\
Browse the Art Institute of Chicago collection from the terminal

Lists and searches artworks page by page, shows artwork details, keeps a
local favorites list and previews the masonry grid layout for a given width.

Listing and details responses are cached for the configured TTL within a run;
search results are always fetched fresh.

Run 'artic-gal gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml and the favorites file
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Override the API base URL from config
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log cache and feed activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a stock config.toml with all options documented
    GenConfig,
    #[command(flatten)]
    App(AppCommand),
}

/// Commands that need a resolved configuration.
#[derive(Subcommand)]
enum AppCommand {
    /// List or search artworks
    Browse {
        /// Search text; lists the whole collection when empty
        #[arg(short, long, default_value = "")]
        query: String,
        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Show one artwork
    Details {
        /// Artwork id
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    /// Compute the masonry layout of a page of results
    Layout {
        /// Container width in pixels
        #[arg(short, long, default_value_t = 1280.0)]
        width: f64,
        /// Search text; lists the whole collection when empty
        #[arg(short, long, default_value = "")]
        query: String,
        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Add an artwork to favorites, or remove it if already there
    Favorite {
        /// Artwork id
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    /// List favorites
    Favorites,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::GenConfig => print!("{}", config::stock_config_toml()),
        Command::App(command) => {
            let app = App::load(cli.config_dir, cli.base_url, cli.verbose)?;
            app.run(command).await?;
        }
    }

    Ok(())
}

/// Everything a command needs once configuration is resolved.
struct App {
    config: AppConfig,
    favorites_path: PathBuf,
    gallery: Arc<Gallery<HttpTransport>>,
    verbose: bool,
}

impl App {
    fn load(
        config_dir: PathBuf,
        base_url: Option<String>,
        verbose: bool,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = config::load_config(&config_dir)?;
        if let Some(base_url) = base_url {
            config.api.base_url = base_url;
            config.validate()?;
        }
        let favorites_path = config.favorites_path(&config_dir);
        let gallery = Arc::new(build_gallery(&config)?);
        Ok(Self {
            config,
            favorites_path,
            gallery,
            verbose,
        })
    }

    async fn run(&self, command: AppCommand) -> Result<(), Box<dyn std::error::Error>> {
        match command {
            AppCommand::Browse { query, pages } => {
                let favorites = Favorites::load(&self.favorites_path);
                let state = load_pages(&self.gallery, query, pages).await?;
                output::print_feed_state(&state, &favorites);
                if self.verbose {
                    let stats = self.gallery.client().cache_stats();
                    println!("{}", output::format_cache_stats(&stats));
                }
            }
            AppCommand::Details { id } => {
                let favorites = Favorites::load(&self.favorites_path);
                let details = self
                    .gallery
                    .details(Some(id))
                    .await?
                    .ok_or("artwork lookup returned nothing")?;
                output::print_details(&details, favorites.is_favorite(id));
            }
            AppCommand::Layout {
                width,
                query,
                pages,
            } => {
                let state = load_pages(&self.gallery, query, pages).await?;
                let container =
                    BoxContainer::from_cards(width, &state.items, FALLBACK_CARD_HEIGHT);
                let mut grid =
                    MasonryGrid::new(container, FrameQueue::new(), self.config.masonry_config());
                grid.attach();
                grid.run_frames();
                if let Some(layout) = grid.layout() {
                    output::print_layout(width, layout, &state.items);
                }
                grid.dispose();
            }
            AppCommand::Favorite { id } => {
                let mut favorites = Favorites::load(&self.favorites_path);
                let existing = favorites.items().iter().find(|c| c.id == id).cloned();
                let card = match existing {
                    Some(card) => card,
                    None => {
                        let details = self
                            .gallery
                            .details(Some(id))
                            .await?
                            .ok_or("artwork lookup returned nothing")?;
                        ArtworkCard::from(&details)
                    }
                };
                let added = favorites.toggle(card.clone());
                favorites.save(&self.favorites_path)?;
                println!("{}", output::format_favorite_toggle(&card, added));
            }
            AppCommand::Favorites => {
                output::print_favorites(&Favorites::load(&self.favorites_path));
            }
        }
        Ok(())
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("artic_gal={default_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_gallery(
    app_config: &AppConfig,
) -> Result<Gallery<HttpTransport>, Box<dyn std::error::Error>> {
    let transport = match app_config.request_timeout() {
        Some(timeout) => HttpTransport::with_timeout(timeout)?,
        None => HttpTransport::new(),
    };
    let client = RestQueryClient::new(app_config.api.base_url.clone(), transport)
        .with_default_ttl(app_config.cache_ttl());
    Ok(Gallery::new(Arc::new(client), app_config.gallery_settings()))
}

/// Run a feed for `query` until `pages` pages are in, the results run out or a fetch fails.
async fn load_pages(
    gallery: &Arc<Gallery<HttpTransport>>,
    query: String,
    pages: u32,
) -> Result<FeedState<ArtworkCard>, Box<dyn std::error::Error>> {
    let (_query, query_rx) = watch::channel(query);
    let mut feed = PagedFeed::spawn(Arc::clone(gallery), query_rx);

    let mut state = feed
        .wait_for(|s| !s.initial_loading)
        .await
        .ok_or("feed stopped")?;
    while state.current_page < pages && state.has_more && state.error.is_none() {
        let target = state.current_page + 1;
        feed.request_next_page();
        state = feed
            .wait_for(|s| s.current_page >= target || (!s.loading_more && s.error.is_some()))
            .await
            .ok_or("feed stopped")?;
    }

    feed.shutdown().await;
    Ok(state)
}
