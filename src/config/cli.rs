//! Command-line argument parsing

use std::{net::IpAddr, path::PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::core::types::PowerMode;

#[derive(Parser, Debug, Clone)]
#[clap(name = "station-panel", version, author)]
#[clap(about = "Wi-Fi station with a single-page LED control panel")]
pub struct CliArgs {
    /// Wireless network interface name
    #[clap(short, long, default_value = "wlan0", global = true)]
    pub interface: String,

    /// Radio power management mode to apply at start-up
    #[clap(long, value_enum, global = true)]
    pub power_mode: Option<PowerMode>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Scan for networks and print them
    Scan {
        /// Keep driver order instead of sorting by signal strength
        #[clap(long)]
        unsorted: bool,

        /// Print JSON instead of one line per network
        #[clap(long)]
        json: bool,
    },

    /// Join a network and print the assigned address
    Connect(StationArgs),

    /// Join a network and serve the LED control panel
    Serve {
        #[clap(flatten)]
        station: StationArgs,

        /// TCP port for the control panel
        #[clap(short, long, default_value = "80")]
        port: u16,

        /// Address to bind the listener to
        #[clap(long, default_value = "0.0.0.0")]
        bind: IpAddr,

        /// Page template containing __IP__ and __LED__ (built-in page if omitted)
        #[clap(long)]
        template: Option<PathBuf>,

        /// LED name under /sys/class/leds
        #[clap(long, default_value = "led0")]
        led: String,
    },
}

/// Credentials and association options
#[derive(Args, Debug, Clone)]
pub struct StationArgs {
    /// Network SSID
    #[clap(long)]
    pub ssid: String,

    /// Network passphrase (empty for open networks)
    #[clap(long, default_value = "")]
    pub password: String,

    /// Require the SSID to be visible in a scan before associating
    #[clap(long)]
    pub precheck: bool,

    /// Seconds to wait for the link to come up
    #[clap(long, default_value = "15")]
    pub timeout_secs: u64,
}
