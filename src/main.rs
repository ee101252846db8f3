//! Gadget entry point: wire hardware, credentials, and the broker transport
//! into the control loop.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{error, info, warn};
use vrgadget::actuator::ActuatorStateMachine;
use vrgadget::command::CommandDispatcher;
use vrgadget::config::{ConfigError, GadgetConfig};
use vrgadget::credentials::Credentials;
use vrgadget::hardware::{Button, MotorDriver, StatusLed};
use vrgadget::manual::ModeCycler;
use vrgadget::net::SystemNetwork;
use vrgadget::observability::init_default_logging;
use vrgadget::runtime::Context;
use vrgadget::transport::{MqttTransport, RumqttcLink};

/// Splash-and-thermal gadget controller
#[derive(Parser)]
#[command(name = "vrgadget")]
#[command(about = "MQTT-driven splash and thermal gadget controller")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the gadget control loop
    Run,
    /// Validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    info!("Starting vrgadget v{}", env!("CARGO_PKG_VERSION"));

    let config = match GadgetConfig::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Run => run_gadget(config).await,
        Commands::Config { show } => handle_config_command(config, show),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }

    info!("Shutdown complete");
}

/// Open the GPIO peripherals, or simulated ones on hosts without them.
#[cfg(feature = "rpi")]
fn open_hardware(
) -> Result<(Box<dyn MotorDriver>, Box<dyn StatusLed>, Box<dyn Button>), vrgadget::GadgetError> {
    let (motor, led, button) = vrgadget::hardware::rpi::open()
        .map_err(|e| vrgadget::GadgetError::Hardware(e.to_string()))?;
    Ok((Box::new(motor), Box::new(led), Box::new(button)))
}

#[cfg(not(feature = "rpi"))]
fn open_hardware(
) -> Result<(Box<dyn MotorDriver>, Box<dyn StatusLed>, Box<dyn Button>), vrgadget::GadgetError> {
    use vrgadget::hardware::{IdleButton, SimulatedLed, SimulatedMotor};
    info!("No GPIO support compiled in, using simulated hardware");
    Ok((
        Box::new(SimulatedMotor::default()),
        Box::new(SimulatedLed::default()),
        Box::new(IdleButton),
    ))
}

async fn run_gadget(config: GadgetConfig) -> Result<(), vrgadget::GadgetError> {
    let credentials = Credentials::load(&config.gadget.credentials_path);
    credentials.validate()?;

    let (motor, led, button) = open_hardware()?;
    let actuator = Arc::new(Mutex::new(ActuatorStateMachine::new(motor, led)));
    let dispatcher = CommandDispatcher::with_actuator(actuator.clone());

    let link = RumqttcLink::new(
        &config.mqtt.broker_host,
        config.mqtt.broker_port,
        &credentials.mqtt_token,
        Duration::from_secs(config.mqtt.connect_timeout_secs),
    );
    let mut transport = MqttTransport::new(link, &config.mqtt.command_topic, Arc::new(SystemNetwork));
    transport.register_handler(Box::new(dispatcher));

    if let Err(e) = transport.start().await {
        warn!(
            error = %e,
            "remote link unavailable, continuing in manual-only mode"
        );
    }

    let cycler = ModeCycler::new(actuator);
    let context = Context::new(
        transport,
        cycler,
        button,
        Duration::from_millis(config.gadget.loop_delay_ms),
    );
    context.run().await;
    Ok(())
}

fn handle_config_command(config: GadgetConfig, show: bool) -> Result<(), vrgadget::GadgetError> {
    if show {
        let rendered = toml::to_string_pretty(&config).map_err(ConfigError::from)?;
        println!("{rendered}");
    }
    info!("Configuration validation complete");
    Ok(())
}
