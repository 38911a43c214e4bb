use std::sync::Arc;

use clap::Parser;
use colored::Colorize;

use adslot::cli::{Cli, Commands, ConfigCommands};
use adslot::config::StaticConfig;
use adslot::runtime::modes;
use adslot::system::logging::init_logging;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Some(Commands::Config {
        action: ConfigCommands::Generate { output_path, force },
    }) = &cli.command
    {
        let path = output_path.as_deref().unwrap_or("config.example.toml");
        if std::path::Path::new(path).exists() && !force {
            eprintln!(
                "{} {} already exists, use --force to overwrite",
                "[ERROR]".red().bold(),
                path
            );
            std::process::exit(1);
        }
        if let Err(e) = StaticConfig::default().save_to_file(path) {
            eprintln!("{} Failed to write {}: {}", "[ERROR]".red().bold(), path, e);
            std::process::exit(1);
        }
        println!("{} {}", "Generated:".green().bold(), path);
        return;
    }

    let config = Arc::new(StaticConfig::load_from(&cli.config));

    // guard 必须活到进程结束，否则缓冲中的日志会丢失
    let _log_guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{} Failed to initialize logging: {}", "[ERROR]".red().bold(), e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Seed) => modes::run_seed(config).await,
        _ => modes::run_server(config).await,
    };

    if let Err(e) = result {
        match e.downcast_ref::<adslot::errors::AdslotError>() {
            Some(err) => eprintln!("{}", err.format_colored()),
            None => eprintln!("{} {:#}", "[ERROR]".red().bold(), e),
        }
        std::process::exit(1);
    }
}
