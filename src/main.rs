use clap::Parser;
use socialstats::{Platform, Scraper, ScraperConfig};
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "socialstats",
    about = "Fetch view counts for social video posts",
    long_about = "Best-effort view-count scraper for YouTube, TikTok and Facebook.\n\
    Intended as a debugging surface for the scraping pipeline.\n\n\
    Examples:\n\
      socialstats https://www.youtube.com/watch?v=abc -p YOUTUBE\n\
      socialstats https://www.facebook.com/watch/?v=123          # FACEBOOK is the default\n\
      socialstats https://www.tiktok.com/@u/video/1 -p TIKTOK --json"
)]
struct Args {
    /// URL of the post to scrape
    url: String,

    /// Platform tag (YOUTUBE, TIKTOK, FACEBOOK)
    #[arg(short = 'p', long = "platform", default_value = "FACEBOOK")]
    platform: String,

    /// Print the raw result as JSON
    #[arg(long = "json")]
    json: bool,

    /// Path to the yt-dlp binary (overrides YTDLP_PATH)
    #[arg(long = "ytdlp")]
    ytdlp: Option<String>,

    /// External extractor timeout in seconds
    #[arg(long = "timeout", default_value_t = 30)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = ScraperConfig::from_env()
        .with_extractor_timeout(Duration::from_secs(args.timeout));
    if let Some(path) = args.ytdlp {
        config = config.with_ytdlp_path(path);
    }

    let platform = Platform::from_tag(&args.platform);
    let scraper = Scraper::new(config);
    let result = scraper.fetch_social_stats(&args.url, platform).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        match (&result.views, &result.error) {
            (Some(views), _) => println!("{} views", views),
            (None, Some(error)) => eprintln!("✗ {}", error),
            (None, None) => eprintln!("✗ views unknown"),
        }
    }

    if result.views.is_none() {
        std::process::exit(1);
    }

    Ok(())
}
