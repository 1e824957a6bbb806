mod catalog;
mod cli;
mod config;
mod journal;
mod model;
mod prompt;
mod setup;
mod storage;
mod tutor;

use std::process;

use tracing_subscriber::EnvFilter;

use catalog::Catalog;
use config::Config;
use setup::{RepodataClient, Workspace};
use storage::Storage;

fn main() {
    let filter = EnvFilter::try_from_env("DOJO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let root = Config::default_root().unwrap_or_else(|| {
        eprintln!("Could not determine home directory. Set DOJO_HOME.");
        process::exit(1);
    });

    let config = match Config::load(&root) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let storage = match Storage::new(config.root(), config.lessons_dir()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to initialize storage: {e}");
            process::exit(1);
        }
    };

    let index = match RepodataClient::new(config.channel_url()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let catalog = Catalog::new(config.lessons_dir(), config.curriculum_path());
    let workspace = Workspace::new(
        config.lessons_dir(),
        config.feedstocks_dir(),
        config.channels_dir(),
        index,
    );

    if let Err(e) = cli::run(&storage, &catalog, &workspace) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
