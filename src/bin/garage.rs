use clap::{command, Parser};
use garage::{car::types::CarType, config, config::SystemConfig, system::System, GarageError};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Car types to drive, in order
    #[arg(default_values_t = [CarType::Suv, CarType::Racing])]
    cars: Vec<CarType>,

    /// Enable debug mode
    #[arg(short, long)]
    verbose: bool,
}

async fn run(cli: &Cli) -> Result<(), GarageError> {
    // Load config
    let config_path = cli.config.clone();
    let config: SystemConfig = if config_path.exists() {
        config::from_file(&config_path)?
    } else {
        // Default config
        SystemConfig::default()
    };

    info!("config loaded.");

    debug!("config: {:?}", config);

    // Initialize system
    let system = System::new(config);
    system.initialize().await?;

    // Message to user as UI.
    println!(
        "Garage initialized. {} cars ready.",
        system.car_registry().len()
    );

    for (i, car_type) in cli.cars.iter().enumerate() {
        if i > 0 {
            println!();
        }
        match system.drive_car(car_type).await {
            Ok(report) => println!("{}", report.description),
            Err(e) => eprintln!("Failed to drive {}: {}", car_type, e),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
