use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ytscript::cli::{Cli, Commands, OutputFormat};
use ytscript::{Config, TranscriptPipeline};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "ytscript=debug"
    } else {
        "ytscript=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Fetch {
            url,
            cursor,
            limit,
            format,
            output,
        } => {
            let pipeline = TranscriptPipeline::new(config).await?;

            let page = pipeline.fetch(&url, cursor.as_deref(), limit).await?;

            if page.skipped_cues > 0 {
                eprintln!(
                    "Note: {} caption cues could not be parsed and were skipped",
                    page.skipped_cues
                );
            }

            let content = match format {
                OutputFormat::Markdown => page.markdown.clone(),
                OutputFormat::Json => serde_json::to_string_pretty(&page)?,
            };

            match output {
                Some(path) => {
                    fs_err::write(&path, content)?;
                    println!("Transcript page saved to: {}", path.display());
                }
                None => {
                    println!("{}", content);
                }
            }

            if page.has_more {
                if let Some(next) = &page.next_cursor {
                    eprintln!("More content available; continue with --cursor {}", next);
                }
            }
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                println!("Config file location: {}", Config::config_path()?.display());
            }
        }
        Commands::Doctor => {
            let missing = ytscript::utils::check_dependencies(&config.app.ytdlp_path).await;
            if missing.is_empty() {
                println!("✅ {} available", config.app.ytdlp_path);
            } else {
                for dep in missing {
                    println!("❌ {}", dep);
                }
            }

            let client = reqwest::Client::new();
            let probe_timeout =
                std::time::Duration::from_millis(config.providers.pot_probe_timeout_ms);
            match ytscript::providers::pot::resolve_provider_url(
                &client,
                config.providers.pot_provider_url.as_deref(),
                probe_timeout,
            )
            .await
            {
                Some(url) => println!("✅ token provider reachable at {}", url),
                None => println!("ℹ️  no token provider detected (bypass tokens disabled)"),
            }
        }
    }

    Ok(())
}
