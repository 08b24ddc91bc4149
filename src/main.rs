//! Station Panel - Main Entry Point

use clap::Parser;
use station_panel::{
    backend::{WifiCtrlBackend, WlanBackend},
    config::{CliArgs, Settings, StationSettings, Task},
    core::station::StationController,
    peripheral::{LedController, SysfsLed},
    transport::http::{HttpResponder, PageTemplate, RequestHandler, inherited_listener},
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,station_panel=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();
    let settings = Settings::from(args);
    info!(interface = %settings.interface, "Starting station panel");

    if let Err(e) = run(settings).await {
        error!("{}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let backend = WifiCtrlBackend::new(settings.interface.clone()).await?;
    let mut station = StationController::new(backend);

    if let Some(mode) = settings.power_mode {
        // Best effort; the controller logs the failure
        let _ = station.set_power_mode(mode).await;
    }

    match settings.task {
        Task::Scan {
            sort_by_signal,
            json,
        } => {
            let access_points = station.scan(sort_by_signal).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&access_points)?);
            } else {
                for ap in &access_points {
                    println!("{}", ap);
                }
            }
        }
        Task::Connect(credentials) => {
            connect(&mut station, &credentials).await?;
            println!("Connected SSID: {}", station.ssid().unwrap_or_default());
            println!("IP: {}", station.ip().unwrap_or_default());
        }
        Task::Serve {
            station: credentials,
            listen,
            template,
            led,
        } => {
            let net_info = connect(&mut station, &credentials).await?;
            info!("Connected IP: {}", net_info.address);

            let template = match template {
                Some(path) => PageTemplate::load(path).await?,
                None => PageTemplate::builtin(),
            };
            let led = LedController::new(SysfsLed::new(&led))?;
            let handler = RequestHandler::new(led, template, net_info.address);

            let mut responder = match inherited_listener()? {
                Some(listener) => {
                    info!("Using listener from socket activation");
                    HttpResponder::from_listener(listener, handler)
                }
                None => HttpResponder::bind(listen, handler)?,
            };
            info!("Control panel listening on {}", responder.local_addr()?);

            #[cfg(feature = "systemd")]
            if let Err(e) = sd_notify::notify(false, &[sd_notify::NotifyState::Ready]) {
                warn!("Failed to notify systemd: {}", e);
            }

            responder.run().await;
        }
    }

    Ok(())
}

async fn connect<B: WlanBackend>(
    station: &mut StationController<B>,
    credentials: &StationSettings,
) -> Result<station_panel::NetInfo, station_panel::WifiError> {
    station
        .connect(&credentials.ssid, &credentials.password, credentials.connect)
        .await
        .inspect_err(|e| {
            warn!(ssid = %credentials.ssid, "Wi-Fi connection failed: {}", e);
        })
}
