use clap::{Parser, Subcommand};
use log::{info, warn};
use seedpress::images::{ImageBackend, OpenRouterImages};
use seedpress::llm::{OpenRouterText, TextBackend};
use seedpress::pipeline::{self, Context, RunOptions};
use seedpress::{config, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "seedpress")]
#[command(version)]
#[command(about = "Static content-site generator: keyword seeds in, article site out")]
#[command(long_about = "\
Static content-site generator: keyword seeds in, article site out

Every line of the seeds file becomes an article page with a title, description,
body, affiliate links, and a cover image. Text and images come from an
OpenRouter-compatible service when OPENROUTER_API_KEY is set, and from local
fallbacks otherwise. Generated bodies are cached per slug under the cache dir.

Output:

  public/
  ├── index.html
  ├── posts/<slug>/index.html
  ├── sobre/ privacidade/ afiliados/
  ├── assets/<slug>.png|svg
  ├── sitemap.xml
  ├── robots.txt
  └── styles.css

Configuration: stock defaults ← seedpress.toml ← environment (.env is read).
Run 'seedpress gen-config' to print a documented config file.")]
struct Cli {
    /// Config file (default: seedpress.toml, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory (overrides paths.output_dir)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Stop after rendering this many articles (0: no limit)
    #[arg(long, global = true)]
    max_posts: Option<usize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the site (default)
    Build,
    /// Print a stock seedpress.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Build) {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Build => {
            dotenv::dotenv().ok();
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .init();

            if let Some(path) = &cli.config
                && !path.is_file()
            {
                return Err(format!("config file not found: {}", path.display()).into());
            }
            let mut site_config =
                config::load_config(cli.config.as_deref(), |key| std::env::var(key).ok())?;
            if let Some(dir) = cli.output {
                site_config.paths.output_dir = dir;
            }
            info!("Loaded configuration for {}", site_config.site_url());

            let text = OpenRouterText::from_config(&site_config).unwrap_or_else(|e| {
                warn!("Text service unavailable: {e}; using local fallbacks");
                None
            });
            let images = OpenRouterImages::from_config(&site_config).unwrap_or_else(|e| {
                warn!("Image service unavailable: {e}; using placeholders");
                None
            });
            if text.is_none() {
                info!("No text service configured, articles use fallback content");
            }

            let ctx = Context::new(
                &site_config,
                text.as_ref().map(|t| t as &dyn TextBackend),
                images.as_ref().map(|i| i as &dyn ImageBackend),
            );
            let options = RunOptions {
                max_renders: cli.max_posts,
                ..RunOptions::default()
            };
            let report = pipeline::run(&ctx, &options)?;
            output::print_run_report(&report);
        }
    }

    Ok(())
}
