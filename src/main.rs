use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

use kodi_cutter_utils::config::AppConfig;
use kodi_cutter_utils::jsonrpc::{self, HttpJsonRpcTransport};
use kodi_cutter_utils::locator::DatabaseLocator;
use kodi_cutter_utils::logging::init_logging;
use kodi_cutter_utils::models::OutputFormat;
use kodi_cutter_utils::output::write_bookmarks;
use kodi_cutter_utils::paths::{self, SpecialPaths};
use kodi_cutter_utils::platform::{self, NativeProbe, PlatformProbe, RpcPlatformProbe};
use kodi_cutter_utils::repository::{BookmarkRepository, DeleteOutcome, KodiBookmarkRepository};
use kodi_cutter_utils::tvheadend::{self, TvheadendClient};
use kodi_cutter_utils::{is_recording_url, parse_recording_url};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List bookmarks saved for a video file
    Bookmarks {
        /// Full path of the video, as the host stores it
        file: String,

        /// Output format (txt, csv or json)
        #[arg(short, long, default_value = "txt")]
        format: String,
    },
    /// Delete bookmarks of a video file together with their thumbnails
    DeleteBookmarks {
        /// Full path of the video, as the host stores it
        file: String,

        /// Bookmark ids to delete (all bookmarks of the file if omitted)
        #[arg(long = "id")]
        ids: Vec<i64>,
    },
    /// Parse a pvr:// recording URL
    ParseRecording {
        /// Percent-encoded recording URL
        url: String,
    },
    /// Check whether a URL addresses a recording
    IsRecording {
        /// URL to check
        url: String,
    },
    /// Fetch finished recordings from the Tvheadend server
    Recordings {
        /// Override the configured backend host
        #[arg(long)]
        host: Option<String>,

        /// Override the configured backend HTTP port
        #[arg(long)]
        port: Option<u16>,

        /// Only print the entry matching this pvr:// recording URL
        #[arg(long)]
        matching: Option<String>,
    },
    /// Show the detected platform and preferred encoding
    Platform {
        /// Ask the running host over JSON-RPC instead of using the build target
        #[arg(long)]
        rpc: bool,
    },
    /// Show how a media path is classified and rewritten
    SharePath {
        /// Media path or URL
        path: String,
    },
    /// Send a JSON-RPC request to the host
    Rpc {
        /// Method name, e.g. JSONRPC.Version
        method: String,

        /// Parameters as a JSON object
        #[arg(long)]
        params: Option<String>,
    },
}

fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    let log_file = config.logging.file_path.as_ref().map(PathBuf::from);
    let log_level = config.get_log_level();
    let _guard = init_logging(Some(log_level.as_str()), log_file.as_deref(), &config.logging.format)?;

    // Parse command line arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Bookmarks { file, format } => list_bookmarks(&config, &file, &format)?,
        Commands::DeleteBookmarks { file, ids } => delete_bookmarks(&config, &file, &ids)?,
        Commands::ParseRecording { url } => {
            let recording = parse_recording_url(&url)?;
            println!("{}", serde_json::to_string_pretty(&recording)?);
        }
        Commands::IsRecording { url } => println!("{}", is_recording_url(&url)),
        Commands::Recordings { host, port, matching } => list_recordings(&config, host, port, matching.as_deref())?,
        Commands::Platform { rpc } => show_platform(&config, rpc)?,
        Commands::SharePath { path } => show_share_path(&path),
        Commands::Rpc { method, params } => {
            let params: Option<serde_json::Value> = params
                .as_deref()
                .map(serde_json::from_str)
                .transpose()
                .context("Invalid --params, expected JSON")?;
            let transport = HttpJsonRpcTransport::new(&config.host.jsonrpc_url)?;
            let result = jsonrpc::call(&transport, &method, params)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

fn repository(config: &AppConfig) -> KodiBookmarkRepository {
    let locator = DatabaseLocator::from_config(config.database_dir(), &config.database);
    KodiBookmarkRepository::new(locator, SpecialPaths::from_config(&config.host))
}

/// Print the bookmarks of a video file
fn list_bookmarks(config: &AppConfig, file: &str, format: &str) -> Result<()> {
    let output_format = format.parse::<OutputFormat>().unwrap_or_else(|e| {
        warn!("{}. Using txt as default.", e);
        OutputFormat::Txt
    });

    let bookmarks = repository(config).select_bookmarks(file);
    info!("Found {} bookmarks", bookmarks.len());

    let mut stdout = std::io::stdout().lock();
    write_bookmarks(&mut stdout, &bookmarks, output_format)?;
    stdout.flush()?;
    Ok(())
}

/// Delete selected bookmarks of a video file
fn delete_bookmarks(config: &AppConfig, file: &str, ids: &[i64]) -> Result<()> {
    let repo = repository(config);
    let selected: Vec<_> = repo
        .select_bookmarks(file)
        .into_iter()
        .filter(|bookmark| ids.is_empty() || ids.contains(&bookmark.id))
        .collect();

    if selected.is_empty() {
        info!("No matching bookmarks for {}", file);
        return Ok(());
    }

    match repo.delete_bookmarks(selected) {
        DeleteOutcome::Committed(report) => {
            println!(
                "Deleted {} bookmarks, removed {} thumbnails",
                report.rows_deleted,
                report.thumbnails_removed.len()
            );
            for failed in report.thumbnails_failed {
                println!("Could not remove thumbnail {}", failed.display());
            }
        }
        DeleteOutcome::Unavailable(bookmarks) => {
            println!("Video database unavailable, {} bookmarks left untouched", bookmarks.len());
        }
        DeleteOutcome::RolledBack { report, error, .. } => {
            return Err(anyhow::anyhow!(
                "Deletion rolled back after removing {} thumbnails: {}",
                report.thumbnails_removed.len(),
                error
            ));
        }
    }
    Ok(())
}

/// Print finished recordings from the backend
fn list_recordings(config: &AppConfig, host: Option<String>, port: Option<u16>, matching: Option<&str>) -> Result<()> {
    let mut backend = config.backend.clone();
    if let Some(host) = host {
        backend.host = host;
    }
    if let Some(port) = port {
        backend.http_port = port;
    }

    let client = TvheadendClient::from_config(&backend)?;
    let grid = client.query_finished_recordings()?;

    if let Some(url) = matching {
        let reference = parse_recording_url(url)?;
        let recordings = tvheadend::finished_recordings(&grid);
        match tvheadend::find_recording(&recordings, &reference) {
            Some(recording) => println!("{}", recording.filename),
            None => return Err(anyhow::anyhow!("No finished recording matches {}", reference.title)),
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&grid)?);
    }
    Ok(())
}

fn show_platform(config: &AppConfig, rpc: bool) -> Result<()> {
    let os = if rpc {
        let transport = HttpJsonRpcTransport::new(&config.host.jsonrpc_url)?;
        platform::detect_os(&RpcPlatformProbe::new(transport))
    } else {
        let probe = NativeProbe;
        info!(platform = ?probe.platform_string(), "Using build target platform");
        platform::detect_os(&probe)
    };

    println!("os: {}", os.map_or("unknown", |os| os.as_str()));
    println!("encoding: {}", config.host.encoding);
    Ok(())
}

fn show_share_path(path: &str) {
    let os = platform::detect_os(&NativeProbe);
    println!("remote share: {}", paths::is_remote_share(path));
    println!("native path: {}", paths::smb_path_for_os(path, os));
    println!("legal name: {}", paths::make_legal_filename(path, os));
}
