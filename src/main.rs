use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tunefind_playlist::{cli, config, error, types::MediaType};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Print diagnostic output
    #[clap(long, short, global = true)]
    verbose: bool,

    /// Path of the cache database (defaults to T2S_DATABASE or the data directory)
    #[clap(long, global = true, value_name = "PATH")]
    database: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Scrape songs of a media from Tunefind into the cache
    Fetch(FetchOptions),

    /// Create or update the Spotify playlist of a cached media
    Export(ExportOptions),

    /// Fetch a media and export it in one go
    #[clap(alias = "create_playlist")]
    CreatePlaylist(CreatePlaylistOptions),

    /// List cached media
    List,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct FetchOptions {
    /// Media name as in the Tunefind URL, e.g. "assassins-creed-valhalla-2020"
    media_name: String,

    /// One of show, movie or game; probed when omitted
    #[clap(long, alias = "media_type")]
    media_type: Option<MediaType>,
}

#[derive(Parser, Debug, Clone)]
pub struct ExportOptions {
    media_name: String,

    /// Inline "ID|SECRET|URI" or path to a credentials file
    #[clap(long)]
    credentials: Option<String>,

    /// Only export one season of a show
    #[clap(long)]
    season: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct CreatePlaylistOptions {
    media_name: String,

    /// Inline "ID|SECRET|URI" or path to a credentials file
    #[clap(long)]
    credentials: Option<String>,

    /// One of show, movie or game; probed when omitted
    #[clap(long, alias = "media_type")]
    media_type: Option<MediaType>,

    /// Only export one season of a show
    #[clap(long)]
    season: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();
    tunefind_playlist::set_verbose(cli.verbose || config::verbose());

    let database = cli.database.unwrap_or_else(config::database_path);

    match cli.command {
        Command::Fetch(opt) => cli::fetch(&database, &opt.media_name, opt.media_type).await,
        Command::Export(opt) => {
            cli::export(
                &database,
                &opt.media_name,
                opt.credentials.as_deref(),
                opt.season,
            )
            .await
        }
        Command::CreatePlaylist(opt) => {
            cli::create_playlist(
                &database,
                &opt.media_name,
                opt.credentials.as_deref(),
                opt.media_type,
                opt.season,
            )
            .await
        }
        Command::List => cli::list(&database).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
