use clap::Parser;
use depscripter::app::{self, Outcome};
use depscripter::utils::{logger, validation::Validate};
use depscripter::CliConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    match app::run(&config) {
        Ok(Outcome::Printed(source)) => print!("{}", source),
        Ok(Outcome::Updated(path)) => println!("Updated {}", path.display()),
        Ok(Outcome::Saved(path)) => println!("Saved to {}", path.display()),
        Err(e) => {
            tracing::error!("depscripter failed: {} (Severity: {:?})", e, e.severity());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
