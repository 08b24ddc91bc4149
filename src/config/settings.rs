//! Runtime settings

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use crate::{
    config::cli::{CliArgs, Command, StationArgs},
    core::{station::ConnectOptions, types::PowerMode},
};

/// Credentials and association options for one network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationSettings {
    pub ssid: String,
    pub password: String,
    pub connect: ConnectOptions,
}

impl From<StationArgs> for StationSettings {
    fn from(args: StationArgs) -> Self {
        StationSettings {
            ssid: args.ssid,
            password: args.password,
            connect: ConnectOptions {
                timeout: Duration::from_secs(args.timeout_secs),
                precheck: args.precheck,
                auto_scan: true,
            },
        }
    }
}

/// What the binary has been asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Scan {
        sort_by_signal: bool,
        json: bool,
    },
    Connect(StationSettings),
    Serve {
        station: StationSettings,
        listen: SocketAddr,
        template: Option<PathBuf>,
        led: String,
    },
}

/// Runtime configuration settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub interface: String,
    pub power_mode: Option<PowerMode>,
    pub task: Task,
}

impl From<CliArgs> for Settings {
    fn from(args: CliArgs) -> Self {
        let task = match args.command {
            Command::Scan { unsorted, json } => Task::Scan {
                sort_by_signal: !unsorted,
                json,
            },
            Command::Connect(station) => Task::Connect(station.into()),
            Command::Serve {
                station,
                port,
                bind,
                template,
                led,
            } => Task::Serve {
                station: station.into(),
                listen: SocketAddr::new(bind, port),
                template,
                led,
            },
        };

        Settings {
            interface: args.interface,
            power_mode: args.power_mode,
            task,
        }
    }
}
