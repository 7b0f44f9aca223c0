use std::error::Error;
use std::fs::OpenOptions;
use std::time::Duration;

use clap::Parser;
use log::{error, info};
use simplelog::*;

use webstack::modules::agents::AgentPool;
use webstack::modules::serialize::{AppConfig, load_config_or_default, save_config};
use webstack::modules::spider::{HrefSpider, Spider};

#[derive(Parser)]
#[command(
    name = "webstack",
    version,
    about = "Single-page link crawler",
    long_about = None
)]
struct Cli {
    #[arg(short = 'l', long = "log-file", default_value = "webstack.log")]
    log_file: String,

    #[arg(short = 'c', long = "config", default_value = "./webstack.toml")]
    config: String,

    /// Write a default webstack.toml and exit.
    #[arg(long = "init-config")]
    init_config: bool,

    /// URLs to crawl.
    urls: Vec<String>,
}

fn init_logger(log_path: &str) -> Result<(), Box<dyn Error>> {
    WriteLogger::init(
        LevelFilter::Info,
        ConfigBuilder::new()
            .set_time_format_rfc3339()
            .build(),
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?,
    )?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logger(&cli.log_file)?;

    if cli.init_config {
        save_config(&cli.config, &AppConfig::default())?;
        info!("Wrote default configuration to {}", cli.config);
        return Ok(());
    }

    let config = load_config_or_default(&cli.config)?;
    let agents = AgentPool::new(config.spider.user_agents.clone());
    let timeout = Duration::from_secs(config.spider.timeout_secs);

    for url in &cli.urls {
        info!("Crawling: {url}");

        let spider = HrefSpider::new(agents.pick(), timeout);
        let report = match spider.crawl(url) {
            Ok(r) => r,
            Err(e) => {
                error!("Crawl failed: {e}");
                continue;
            }
        };

        info!("Done: {report}");
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
