//! Secret command-line client.
//!
//! # Usage
//!
//! ```bash
//! # Share two files and a note, valid for a day, openable twice
//! secret create report.pdf notes.md --text "wifi=hunter2" --expires 1d --views 2
//!
//! # Open a share link and save the items into ./received
//! secret open http://localhost:8081/3f2a... --out received
//!
//! # Try both flows against the in-process mock service
//! secret --mock create notes.md --password pw --open-after
//! ```

use std::{num::NonZeroU32, path::PathBuf, pin::Pin};

use clap::{Parser, Subcommand};
use secret_app::Runtime;
use secret_cli::{
    CliError, CreateOptions, TerminalDriver, command::parse_entry, create_secret, open_secret,
};
use secret_client::AnyService;
use secret_core::{
    Appearance, ColorSlot, DEFAULT_API_BASE_URL, DEFAULT_MAX_BUNDLE_BYTES, DEFAULT_SHARE_BASE_URL,
    Expiration, SecretConfig, ServiceKind, SystemEnv, ThemeColor,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Secret sharing client
#[derive(Parser, Debug)]
#[command(name = "secret")]
#[command(about = "Encrypt files, links and notes into a shareable, expiring secret")]
#[command(version)]
struct Args {
    /// Use the in-process mock service instead of the HTTP API
    #[arg(long, global = true)]
    mock: bool,

    /// Base URL of the service API
    #[arg(long, global = true, default_value = DEFAULT_API_BASE_URL)]
    api_url: String,

    /// Base URL share links are built from
    #[arg(long, global = true, default_value = DEFAULT_SHARE_BASE_URL)]
    share_url: String,

    /// Maximum total size of a bundle in bytes
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_BUNDLE_BYTES)]
    max_bytes: u64,

    /// Appearance whose default theme new secrets start from (light or dark)
    #[arg(long, global = true, default_value_t = Appearance::Dark)]
    appearance: Appearance,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a secret and print its share link
    Create {
        /// Files to include
        files: Vec<PathBuf>,

        /// Text entry as TITLE=CONTENT (repeatable)
        #[arg(long = "text", value_name = "TITLE=CONTENT")]
        texts: Vec<String>,

        /// Link entry as TITLE=URL (repeatable)
        #[arg(long = "link", value_name = "TITLE=URL")]
        links: Vec<String>,

        /// Password (prompted if omitted)
        #[arg(long)]
        password: Option<String>,

        /// Lifetime: 1h, 1d or 1w
        #[arg(long, default_value = "1h")]
        expires: Expiration,

        /// Maximum number of opens
        #[arg(long)]
        views: Option<NonZeroU32>,

        /// Title shown to the recipient
        #[arg(long)]
        title: Option<String>,

        /// Description shown to the recipient
        #[arg(long)]
        description: Option<String>,

        /// Background color (#RRGGBB)
        #[arg(long)]
        background: Option<ThemeColor>,

        /// Foreground color (#RRGGBB)
        #[arg(long)]
        foreground: Option<ThemeColor>,

        /// Accent color (#RRGGBB)
        #[arg(long)]
        accent: Option<ThemeColor>,

        /// Open the secret right after creating it (useful with --mock)
        #[arg(long)]
        open_after: bool,

        /// Directory for items saved by --open-after
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Open a share link and save its items
    Open {
        /// Share link or secret ID
        link: String,

        /// Password (prompted if omitted)
        #[arg(long)]
        password: Option<String>,

        /// Directory to save files and notes into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

type PromptFuture = Pin<Box<dyn Future<Output = Result<Option<String>, CliError>> + Send>>;

/// Read a password from the terminal on the blocking pool.
async fn read_password() -> Result<String, CliError> {
    tokio::task::spawn_blocking(|| rpassword::prompt_password("Password: "))
        .await
        .map_err(|e| CliError::Prompt(std::io::Error::other(e)))?
        .map_err(CliError::Prompt)
}

/// Password source for `open`: the flag once, or the terminal until it works.
fn password_prompt(given: Option<String>) -> impl FnMut(u32) -> PromptFuture {
    let mut given = given.map(Some);
    move |_failed_attempts| match given.as_mut() {
        Some(flag) => {
            let password = flag.take();
            Box::pin(async move { Ok(password) })
        },
        None => Box::pin(async { read_password().await.map(Some) }),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let service = if args.mock {
        ServiceKind::Mock
    } else {
        ServiceKind::Http { api_base_url: args.api_url.clone() }
    };
    let config = SecretConfig {
        max_bundle_bytes: args.max_bytes,
        share_base_url: args.share_url.clone(),
        appearance: args.appearance,
        service,
        ..SecretConfig::default()
    };
    tracing::debug!(?config, "configuration loaded");

    let env = SystemEnv;
    let service = AnyService::from_kind(&config.service, env)?;

    match args.command {
        Command::Create {
            files,
            texts,
            links,
            password,
            expires,
            views,
            title,
            description,
            background,
            foreground,
            accent,
            open_after,
            out,
        } => {
            let password = match password {
                Some(password) => password,
                None => read_password().await?,
            };
            let colors = [
                (ColorSlot::Background, background),
                (ColorSlot::Foreground, foreground),
                (ColorSlot::Accent, accent),
            ]
            .into_iter()
            .filter_map(|(slot, color)| color.map(|c| (slot, c)))
            .collect();

            let options = CreateOptions {
                files,
                texts: texts.iter().map(|t| parse_entry(t)).collect::<Result<_, _>>()?,
                links: links.iter().map(|l| parse_entry(l)).collect::<Result<_, _>>()?,
                password: password.clone(),
                expiration: expires,
                view_limit: views,
                title,
                description,
                colors,
            };

            let driver = TerminalDriver::stdout(out);
            let mut runtime = Runtime::new(driver, service, env, &config);
            let link = create_secret(&mut runtime, options).await?;
            tracing::info!(%link, "secret created");

            if open_after {
                open_secret(&mut runtime, &link, password_prompt(Some(password))).await?;
            }
        },
        Command::Open { link, password, out } => {
            let driver = TerminalDriver::stdout(out);
            let mut runtime = Runtime::new(driver, service, env, &config);
            let delivered = open_secret(&mut runtime, &link, password_prompt(password)).await?;
            tracing::info!(delivered, "secret opened");
        },
    }

    Ok(())
}
