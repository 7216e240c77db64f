use std::path::PathBuf;

use voice_relay_server::{RelayConfig, Storage, TcpServer};

const DEFAULT_CONFIG_FILE: &str = "server_config.json";

fn main() {
    println!("Voice Relay Server - Starting...");

    // Load configuration
    let config = load_config();

    // Initialize logger
    let logger = initialize_logger(&config);

    logger.info("Voice Relay Server starting...");

    run_tcp_server(config, Storage::new(), logger);
}

/// Initializes the main logger from configuration
fn initialize_logger(config: &RelayConfig) -> logging::Logger {
    let log_level = config.logging.log_level.parse().unwrap_or_else(|e| {
        eprintln!("{}; falling back to INFO", e);
        logging::LogLevel::Info
    });

    let mut builder = logging::Logger::builder(log_level)
        .component("Main")
        .console(config.logging.enable_console);
    if config.logging.enable_file {
        builder = builder.file(PathBuf::from(&config.logging.log_file_path));
    }

    match builder.build() {
        Ok(logger) => {
            println!(
                "Logging initialized: {} (level: {})",
                config.logging.log_file_path, log_level
            );
            logger
        }
        Err(e) => {
            eprintln!("Failed to create logger: {}", e);
            eprintln!("Cannot continue without logging system.");
            std::process::exit(1);
        }
    }
}

/// Loads configuration from the environment, a file, or default values
fn load_config() -> RelayConfig {
    // Determine the configuration source in this order:
    // 1. CONFIG environment variable holding inline JSON
    // 2. First command-line argument
    // 3. server_config.json in ./config or the working directory
    if let Ok(json_str) = std::env::var("CONFIG") {
        match RelayConfig::from_json_str(&json_str) {
            Ok(cfg) => {
                println!("Configuration loaded from CONFIG env as JSON string");
                return cfg;
            }
            Err(e) => {
                eprintln!("CONFIG env is not a valid configuration: {}", e);
            }
        }
    }

    let config_path = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => match config_loader::find_config_file(DEFAULT_CONFIG_FILE, "CONFIG_PATH") {
            Ok(path) => path,
            Err(e) => {
                eprintln!("{}", e);
                eprintln!("Using default values...");
                return RelayConfig::default();
            }
        },
    };

    let config_path = config_path.to_string_lossy().into_owned();
    match RelayConfig::load_from_file(&config_path) {
        Ok(c) => {
            println!("Configuration loaded from: {}", config_path);
            c
        }
        Err(e) => {
            eprintln!("Failed to load configuration from {}: {}", config_path, e);
            eprintln!("Using default values...");
            RelayConfig::default()
        }
    }
}

/// Runs the TCP server (blocking)
fn run_tcp_server(config: RelayConfig, storage: Storage, main_logger: logging::Logger) {
    let bind_addr = config.server.bind_addr();
    let tcp_logger = main_logger.for_component("TCP");

    tcp_logger.info(&format!(
        "Relaying {}-byte voice chunks; duplicate registrations: {:?}",
        config.server.chunk_size, config.server.duplicate_registration
    ));

    let tcp_server = TcpServer::new(storage, config.server, tcp_logger.clone());

    println!("TCP Server starting on {}", bind_addr);
    tcp_logger.info(&format!("TCP Server starting on {}", bind_addr));

    if let Err(e) = tcp_server.start() {
        tcp_logger.error(&format!("TCP server error: {}", e));
        std::process::exit(1);
    }
}
