use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use marquee_config::ConfigOverrides;

#[derive(Debug, Parser)]
#[command(
    name = "marquee",
    version,
    about = "Browse now playing, trending and upcoming movies from TMDB"
)]
pub struct Args {
    /// Config file (TOML or JSON). Defaults to $MARQUEE_CONFIG_PATH, then
    /// ./marquee.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Delay between pull-to-refresh cycles.
    #[arg(
        long,
        value_name = "DURATION",
        value_parser = humantime::parse_duration,
        default_value = "30s"
    )]
    pub refresh_every: Duration,

    /// Number of refresh cycles to run before exiting.
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub refreshes: u32,

    /// Override the TMDB response language (e.g. ko-KR).
    #[arg(long)]
    pub language: Option<String>,

    /// Override the TMDB release region (ISO 3166-1, e.g. KR).
    #[arg(long)]
    pub region: Option<String>,

    /// Print poster and backdrop URLs.
    #[arg(long)]
    pub images: bool,
}

impl Args {
    /// Command-line values that take precedence over file and environment.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            language: self.language.clone(),
            region: self.region.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_refresh_schedule() {
        let args = Args::parse_from([
            "marquee",
            "--refresh-every",
            "1m 30s",
            "--refreshes",
            "2",
            "--region",
            "KR",
        ]);
        assert_eq!(args.refresh_every, Duration::from_secs(90));
        assert_eq!(args.refreshes, 2);
        assert_eq!(args.overrides().region.as_deref(), Some("KR"));
        assert!(args.overrides().language.is_none());
        assert!(!args.images);
    }

    #[test]
    fn defaults_to_a_single_pass() {
        let args = Args::parse_from(["marquee"]);
        assert_eq!(args.refreshes, 0);
        assert_eq!(args.refresh_every, Duration::from_secs(30));
        assert!(args.config.is_none());
    }
}
