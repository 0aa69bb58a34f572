//! RescueLink CLI - talk to the Smart Emergency Response backend
//!
//! Environment:
//!   RESCUE_API_BASE              - backend base URL (default: http://localhost:3000/api)
//!   RESCUE_REQUEST_TIMEOUT_SECS  - per-request timeout (default: none)
//!   RESCUE_LOCATION_TIMEOUT_SECS - position fix timeout (default: 10)
//!   RESCUE_DEMO_OTP              - show the OTP echoed by demo backends
//!   RESCUE_SESSION_FILE          - session file (default: ./.rescue_session.json)
//!   RUST_LOG                     - log level (default: info)

use clap::{Parser, Subcommand};
use eyre::{eyre, Result};
use rescue_link::models::{parse_latitude, parse_longitude};
use rescue_link::providers::{DevicePosition, PositionError, PositionOptions};
use rescue_link::utils::constants::{DEFAULT_NEARBY_LIMIT, DEFAULT_SESSION_FILE};
use rescue_link::{
    ApiClient, AuthFlow, ClientConfig, ConsolePresenter, Coordinate, EmergencyApi, EmergencyFlow,
    EmergencyMap, EmergencyOutcome, EmergencyType, FileSessionStore, LocationProvider,
    NoFixSource, OrFallback, PositionSource, StaticPositionSource,
};
use std::io::Stdout;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rescue-link")]
#[command(about = "Smart Emergency Response client", version)]
struct Cli {
    /// Device latitude (omit to simulate a device without a fix)
    #[arg(long, global = true, allow_hyphen_values = true, value_parser = parse_latitude)]
    lat: Option<f64>,
    /// Device longitude
    #[arg(long, global = true, allow_hyphen_values = true, value_parser = parse_longitude)]
    lng: Option<f64>,
    /// Reported accuracy of the device fix in meters
    #[arg(long, global = true, default_value_t = 25.0)]
    accuracy: f64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all hospitals
    Hospitals,
    /// Hospitals near the current location
    Nearby {
        #[arg(long, default_value_t = DEFAULT_NEARBY_LIMIT)]
        limit: u32,
    },
    /// Emergency contacts
    Contacts,
    /// Optimized route from the current location to a destination
    Route {
        #[arg(allow_hyphen_values = true, value_parser = parse_latitude)]
        dest_lat: f64,
        #[arg(allow_hyphen_values = true, value_parser = parse_longitude)]
        dest_lng: f64,
    },
    /// Trigger an SOS: find the best hospital and dispatch an ambulance
    Sos {
        /// Emergency type (medical, fire, accident, ...)
        emergency_type: String,
        /// Number of people involved
        #[arg(default_value_t = 1)]
        people: u32,
    },
    /// Request an OTP for a 10-digit phone number
    Login { phone: String },
    /// Verify the OTP and store the session
    Verify { phone: String, otp: String },
    /// Clear the stored session
    Logout,
    /// Show the stored session
    Whoami,
}

/// Device fix from the command line, or a capability that never gets a fix
enum DeviceSource {
    Fixed(StaticPositionSource),
    NoFix(NoFixSource),
}

impl PositionSource for DeviceSource {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> std::result::Result<DevicePosition, PositionError> {
        match self {
            DeviceSource::Fixed(source) => source.current_position(options).await,
            DeviceSource::NoFix(source) => source.current_position(options).await,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;

    let source = match (cli.lat, cli.lng) {
        (Some(lat), Some(lng)) => {
            DeviceSource::Fixed(StaticPositionSource::new(lat, lng, cli.accuracy))
        }
        _ => DeviceSource::NoFix(NoFixSource),
    };
    let location = LocationProvider::new(source, &config);

    let session_path = config
        .session_file
        .clone()
        .unwrap_or_else(|| DEFAULT_SESSION_FILE.into());
    let api = ApiClient::new(config)?;

    match cli.command {
        Commands::Hospitals => {
            print_json(&api.list_hospitals().await.or_fallback())?;
        }
        Commands::Nearby { limit } => {
            let here = location.get_location().await?;
            print_json(&api.find_nearby_hospitals(&here, limit).await.or_fallback())?;
        }
        Commands::Contacts => {
            print_json(&api.list_contacts().await.or_fallback())?;
        }
        Commands::Route { dest_lat, dest_lng } => {
            let here = location.get_location().await?;
            let destination = Coordinate::point(dest_lat, dest_lng);
            match api.optimize_route(&here, &destination).await.or_fallback() {
                Some(route) => print_json(&route)?,
                None => return Err(eyre!("No route available")),
            }
        }
        Commands::Sos {
            emergency_type,
            people,
        } => {
            let user_id = session_flow(&api, session_path).session_user_id();

            let mut flow = EmergencyFlow::new(
                &api,
                location,
                ConsolePresenter::stdout(),
                EmergencyMap::new(),
            );
            if let Some(user_id) = user_id {
                flow = flow.with_user_id(user_id);
            }

            let outcome = flow
                .handle_emergency(&EmergencyType::new(emergency_type), people)
                .await;
            if let Some(view) = flow.map().view() {
                print_json(view)?;
            }
            if let EmergencyOutcome::Aborted { error } = outcome {
                return Err(error.into());
            }
        }
        Commands::Login { phone } => {
            let mut auth = session_flow(&api, session_path);
            auth.request_login(&phone).await?;
        }
        Commands::Verify { phone, otp } => {
            let mut auth = session_flow(&api, session_path);
            auth.confirm_login(&phone, &otp).await?;
        }
        Commands::Logout => {
            let mut auth = session_flow(&api, session_path);
            auth.logout()?;
        }
        Commands::Whoami => {
            let auth = session_flow(&api, session_path);
            match auth.current_session()? {
                Some(session) => println!("Logged in as {}", session.phone().display_form()),
                None => println!("Not logged in"),
            }
        }
    }

    Ok(())
}

fn session_flow(
    api: &ApiClient,
    session_path: PathBuf,
) -> AuthFlow<&ApiClient, FileSessionStore, ConsolePresenter<Stdout>> {
    AuthFlow::new(api, FileSessionStore::new(session_path), ConsolePresenter::stdout())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
