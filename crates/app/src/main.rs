use std::fmt;
use std::sync::Arc;

use deck_core::model::{CardId, UserId, UserRef};
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, Clock};
use storage::memory::InMemoryRepository;
use storage::remote::{API_TIMEOUT_ENV, API_TOKEN_ENV, API_URL_ENV, RemoteConfig};
use storage::seed::{demo_collaborator, seed_demo};
use ui::{App, UiApp, build_app_context};

const USER_ENV: &str = "DECKS_USER";
const CARD_ENV: &str = "DECKS_CARD";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidUser { raw: String },
    InvalidCardId { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidUser { raw } => {
                write!(f, "invalid --user value: {raw} (expected id:name[:handle])")
            }
            ArgsError::InvalidCardId { raw } => write!(f, "invalid --card value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api-url <url>] [--token <token>] [--user <id:name[:handle]>] [--card <id>]");
    eprintln!("  cargo run -p app -- --demo [--user <id:name[:handle]>]");
    eprintln!();
    eprintln!("--demo serves a seeded card from memory instead of the collaboration API.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {API_URL_ENV}, {API_TOKEN_ENV}, {API_TIMEOUT_ENV}, {USER_ENV}, {CARD_ENV}");
    eprintln!("  RUST_LOG (defaults to info)");
}

#[derive(Debug, Default)]
struct Args {
    api_url: Option<String>,
    token: Option<String>,
    user: Option<UserRef>,
    card: Option<CardId>,
    demo: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            user: std::env::var(USER_ENV)
                .ok()
                .map(|raw| parse_user(&raw))
                .transpose()?,
            card: std::env::var(CARD_ENV)
                .ok()
                .map(|raw| parse_card(&raw))
                .transpose()?,
            ..Self::default()
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => parsed.api_url = Some(require_value(args, "--api-url")?),
                "--token" => parsed.token = Some(require_value(args, "--token")?),
                "--user" => parsed.user = Some(parse_user(&require_value(args, "--user")?)?),
                "--card" => parsed.card = Some(parse_card(&require_value(args, "--card")?)?),
                "--demo" => parsed.demo = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(parsed)
    }
}

/// `id:name` or `id:name:handle`.
fn parse_user(raw: &str) -> Result<UserRef, ArgsError> {
    let invalid = || ArgsError::InvalidUser {
        raw: raw.to_string(),
    };
    let mut parts = raw.splitn(3, ':').map(str::trim);
    let id = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
    let name = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
    let user = UserRef::new(UserId::new(id), name);
    Ok(match parts.next().filter(|s| !s.is_empty()) {
        Some(handle) => user.with_handle(handle),
        None => user,
    })
}

fn parse_card(raw: &str) -> Result<CardId, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidCardId {
        raw: raw.to_string(),
    })
}

fn demo_services(args: Args, clock: Clock) -> AppServices {
    let owner = args
        .user
        .unwrap_or_else(|| UserRef::new(UserId::new("u-demo"), "Demo owner"));
    let repo = InMemoryRepository::new().with_clock(clock);
    let card_id = seed_demo(&repo, &owner, clock.now());
    log::info!(
        "demo mode: card {card_id} owned by {}, proposals from {}",
        owner.display_name(),
        demo_collaborator().display_name()
    );
    AppServices::in_memory(&repo, clock, Some(owner)).with_initial_card(Some(card_id))
}

fn remote_services(args: Args, clock: Clock) -> Result<AppServices, Box<dyn std::error::Error>> {
    let mut config = RemoteConfig::from_env()?;
    if let Some(url) = args.api_url.as_deref() {
        config = RemoteConfig::new(url)?
            .with_token(config.token.clone())
            .with_timeout(config.timeout);
    }
    if args.token.is_some() {
        config = config.with_token(args.token);
    }
    if args.user.is_none() {
        log::warn!("no user given; browsing anonymously, review actions are disabled");
    }
    let services = AppServices::new_remote(config, clock, args.user)?;
    Ok(services.with_initial_card(args.card))
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let clock = Clock::default();
    let services = if args.demo {
        demo_services(args, clock)
    } else {
        remote_services(args, clock)?
    };

    let app: Arc<dyn UiApp> = Arc::new(services);
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Decks")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(2);
    }
}
