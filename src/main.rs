mod album_identity;
mod config;
mod config_persistence;
mod cover_image;
mod lastfm_client;
mod library_scanner;
mod log_style;
mod media_file_discovery;
mod metadata_tags;
#[cfg(test)]
mod test_fixtures;

use std::path::Path;
use std::process::ExitCode;

use log::{error, warn};

use config_persistence::{default_config_path, load_config};
use lastfm_client::LastFmClient;
use library_scanner::LibraryScanner;
use metadata_tags::LoftyTagBackend;

fn main() -> ExitCode {
    log_style::init_logging();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: covergrabber <Path>");
        return ExitCode::from(1);
    }

    let config = load_config(default_config_path().as_deref());
    if config.lastfm.has_placeholder_api_key() {
        warn!("No Last.fm API key configured; set LASTFM_API_KEY or edit the config file");
    }

    let client = LastFmClient::new(config.lastfm.clone());
    let scanner = LibraryScanner::new(
        &LoftyTagBackend,
        &client,
        &config.library.audio_extensions,
    );

    match scanner.scan(Path::new(&args[1])) {
        Ok(stats) => {
            println!("{stats}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::from(1)
        }
    }
}
