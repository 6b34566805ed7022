use anyhow::{Context, Result, bail};
use clap::Parser;
use std::env;

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 80;
const DEFAULT_PUBLIC_DIR: &str = "public";

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bucket: String,
    pub region: String,
    pub host: String,
    pub port: u16,
    pub endpoint_url: Option<String>,
    pub public_dir: String,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Pet listing and photo upload service")]
pub struct Args {
    /// Bucket holding the pet document and photos (overrides S3_BUCKET)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Storage region (overrides AWS_REGION)
    #[arg(long)]
    pub region: Option<String>,

    /// Host to bind to (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Custom S3-compatible endpoint, addressed path-style (overrides S3_ENDPOINT_URL)
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Directory of static assets served as fallback (overrides PUBLIC_DIR)
    #[arg(long)]
    pub public_dir: Option<String>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        let args = Args::parse();
        Self::resolve(args, |name| env::var(name).ok())
    }

    /// Merge parsed args over values found through `lookup`, then defaults.
    ///
    /// Fails when no bucket is configured or the port is not a valid `u16`.
    pub fn resolve(args: Args, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let Some(bucket) = args
            .bucket
            .or_else(|| lookup("S3_BUCKET"))
            .filter(|b| !b.is_empty())
        else {
            bail!("missing bucket: set S3_BUCKET or pass --bucket");
        };

        let port = match args.port {
            Some(port) => port,
            None => match lookup("PORT") {
                Some(value) => value
                    .parse::<u16>()
                    .with_context(|| format!("parsing PORT value `{}`", value))?,
                None => DEFAULT_PORT,
            },
        };

        Ok(Self {
            bucket,
            region: args
                .region
                .or_else(|| lookup("AWS_REGION"))
                .unwrap_or_else(|| DEFAULT_REGION.into()),
            host: args
                .host
                .or_else(|| lookup("HOST"))
                .unwrap_or_else(|| DEFAULT_HOST.into()),
            port,
            endpoint_url: args
                .endpoint_url
                .or_else(|| lookup("S3_ENDPOINT_URL"))
                .filter(|url| !url.is_empty()),
            public_dir: args
                .public_dir
                .or_else(|| lookup("PUBLIC_DIR"))
                .unwrap_or_else(|| DEFAULT_PUBLIC_DIR.into()),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
