use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{AppContext, InitArgs, OutputFormat};

pub const CONFIG_FILE_NAME: &str = "learnrec.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Catalog document used as candidate and interest source
    pub catalog: PathBuf,

    /// Default recommendation thresholds
    pub recommend: RecommendConfig,

    /// Default output settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig
{
    /// Average rating needed to rank above new or poorly rated resources
    pub min_rating: f64,

    /// Ratings needed (strictly more) before the average is trusted
    pub min_rating_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig
{
    pub format: OutputFormat,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            catalog: PathBuf::from("catalog.json"),
            recommend: RecommendConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for RecommendConfig
{
    fn default() -> Self
    {
        // "neutral" completion rating, any number of ratings
        Self { min_rating: 2.0, min_rating_count: 0 }
    }
}

impl Default for OutputConfig
{
    fn default() -> Self
    {
        Self { format: OutputFormat::Text }
    }
}

/// Load configuration from the working directory and `LEARNREC_*` variables.
pub fn load_config() -> Result<Config>
{
    load_config_from(None)
}

/// Like [`load_config`], but an explicit file takes the place of the search.
pub fn load_config_from(explicit: Option<&Path>) -> Result<Config>
{
    let mut builder = config::Config::builder();

    match explicit
    {
        Some(path) =>
        {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        None =>
        {
            // Load from config files in priority order
            let config_paths =
                ["learnrec.toml", "learnrec.yaml", "learnrec.json", ".learnrec.toml"];

            for path in &config_paths
            {
                if Path::new(path).exists()
                {
                    builder = builder.add_source(config::File::with_name(path));
                    break;
                }
            }
        }
    }

    // LEARNREC_RECOMMEND__MIN_RATING=3.5 overrides recommend.min_rating
    builder = builder.add_source(
        config::Environment::with_prefix("LEARNREC")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join(CONFIG_FILE_NAME);

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}
