use std::fmt;
use std::sync::Arc;

use api::{ApiConfig, ApiConfigError, HttpApi};
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AuthService, Clock, DeckService, StudyController};
use study_core::model::DeckId;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ui::{App, AppContext, UiApp};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDeckId { raw: String },
    InvalidApiUrl(ApiConfigError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDeckId { raw } => write!(f, "invalid --deck-id value: {raw}"),
            ArgsError::InvalidApiUrl(err) => write!(f, "invalid --api value: {err}"),
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

struct DesktopApp {
    initial_deck_id: Option<DeckId>,
    study: Arc<StudyController>,
    decks: Arc<DeckService>,
    auth: Arc<AuthService>,
}

impl UiApp for DesktopApp {
    fn initial_deck_id(&self) -> Option<DeckId> {
        self.initial_deck_id
    }

    fn study(&self) -> Arc<StudyController> {
        Arc::clone(&self.study)
    }

    fn decks(&self) -> Arc<DeckService> {
        Arc::clone(&self.decks)
    }

    fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }
}

#[derive(Debug)]
struct Args {
    api: ApiConfig,
    deck_id: Option<DeckId>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  neuroflash [--api <url>] [--deck-id <id>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api {}", api::http::DEFAULT_API_URL);
    eprintln!("  no deck preselected");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  NEUROFLASH_API_URL, NEUROFLASH_DECK_ID, RUST_LOG");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut api = ApiConfig::from_env().map_err(ArgsError::InvalidApiUrl)?;
        let mut deck_id = std::env::var("NEUROFLASH_DECK_ID")
            .ok()
            .and_then(|value| value.trim().parse::<DeckId>().ok());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => {
                    let value = require_value(args, "--api")?;
                    api = ApiConfig::new(&value).map_err(ArgsError::InvalidApiUrl)?;
                }
                "--deck-id" => {
                    let value = require_value(args, "--deck-id")?;
                    let parsed = value
                        .trim()
                        .parse::<DeckId>()
                        .map_err(|_| ArgsError::InvalidDeckId { raw: value.clone() })?;
                    deck_id = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { api, deck_id })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    info!(api = %parsed.api.base_url(), deck_id = ?parsed.deck_id, "starting NeuroFlash");

    let api = HttpApi::new(parsed.api)?.into_api();
    let auth = Arc::new(AuthService::new(Arc::clone(&api.auth)));
    match auth.check_auth().await {
        Ok(status) if status.authenticated => info!("existing session is valid"),
        Ok(_) => info!("not signed in"),
        Err(err) => warn!(%err, "could not check session"),
    }

    let app = DesktopApp {
        initial_deck_id: parsed.deck_id,
        study: Arc::new(StudyController::new(Clock::default(), &api)),
        decks: Arc::new(DeckService::new(Arc::clone(&api.decks))),
        auth,
    };
    let app: Arc<dyn UiApp> = Arc::new(app);
    let context = AppContext::new(&app);

    // Some window managers keep new windows above everything else otherwise.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("NeuroFlash")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
