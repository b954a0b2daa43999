use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use marquee_config::{ConfigLoad, ConfigLoader};
use marquee_core::MoviesScreen;
use marquee_player::cli::Args;
use marquee_player::{RenderOptions, TmdbClient, logging, render};
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new().with_overrides(args.overrides());
    if let Some(path) = &args.config {
        loader = loader.with_config_path(path);
    }
    let ConfigLoad { config, warnings } =
        loader.load().context("failed to load configuration")?;

    logging::init(&config.logging.filter);

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration loaded from file");
    }
    warnings.log();

    let catalog = TmdbClient::new(&config.tmdb, config.feed.trending_window)
        .context("failed to build TMDB client")?;
    let screen = MoviesScreen::new(Arc::new(catalog));

    let mut options = RenderOptions::from_feed(&config.feed);
    if args.images {
        options = options.with_images(config.tmdb.image_base_url.as_str());
    }

    print!("{}", render(&screen.view(), &options));
    screen.mount().await;
    print!("{}", render(&screen.view(), &options));

    for cycle in 1..=args.refreshes {
        tokio::time::sleep(args.refresh_every).await;

        let refresh = screen.refresh();
        print!("{}", render(&screen.view(), &options));
        let report = refresh.await;
        for (key, err) in report.failures() {
            warn!(key = %key, error = %err, "section refresh failed");
        }
        info!(cycle, succeeded = report.succeeded(), total = report.len(), "refresh finished");
        print!("{}", render(&screen.view(), &options));
    }

    screen.unmount();
    Ok(())
}
