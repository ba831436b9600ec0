//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod analyze;


use std::error::Error;
use std::path::PathBuf;
use std::sync::LazyLock;

use clap::{Parser, Subcommand};

use crate::cli::analyze::run_analyze;
use crate::core::config::data::path_display;
use crate::core::config::{Config, ResolvedSettings};
use crate::core::constants::BACKEND_URL_ENV;
use crate::core::selection::{ImageType, OrganType};
use crate::ui::chat_loop::run_app;
use crate::utils::logging::{init_tracing, LogTarget};

static LONG_VERSION: LazyLock<String> = LazyLock::new(|| {
    format!(
        "{} ({} {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_DESCRIBE").unwrap_or("unknown"),
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
    )
});

#[derive(Parser)]
#[command(name = "medai")]
#[command(version, long_version = LONG_VERSION.as_str())]
#[command(about = "Terminal client for the MedAI Vision scan analysis service")]
#[command(
    long_about = "MedAI Vision uploads a brain or lung scan (MRI or CT) to an analysis \
backend, shows the predicted condition together with the enhanced and translated images \
it produced, and lets you ask follow-up questions about the result.\n\n\
Environment Variables:\n\
  MEDAI_BACKEND_URL  Backend base URL (overrides the config file)\n\
  RUST_LOG           Log filter (default: info)\n\n\
Controls:\n\
  Tab / Shift+Tab    Move between fields\n\
  ←/→, Space         Change organ or image type\n\
  Enter              Select the typed file path, or send a chat message\n\
  Ctrl+P / F5        Process the selected image\n\
  PageUp/PageDown    Scroll the consultation\n\
  Esc / Ctrl+C       Quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL
    #[arg(short = 'b', long, global = true, value_name = "URL")]
    pub backend: Option<String>,

    /// Organ shown in the scan (brain or lungs)
    #[arg(short = 'o', long, global = true, value_name = "ORGAN")]
    pub organ: Option<OrganType>,

    /// Imaging modality of the scan (mri or ct)
    #[arg(short = 'i', long, global = true, value_name = "TYPE")]
    pub image_type: Option<ImageType>,

    /// Write diagnostic logs to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the interactive interface (default)
    Tui {
        /// Scan to pre-select
        file: Option<String>,
    },
    /// Analyze a scan without the interface and print the result
    Analyze {
        /// Scan to upload (.png, .jpg or .jpeg)
        file: PathBuf,
        /// Question to ask about the result; repeat to ask several
        #[arg(short = 'a', long = "ask", value_name = "QUESTION")]
        questions: Vec<String>,
        /// Download the original, enhanced and translated images here
        #[arg(short = 's', long, value_name = "DIR")]
        save_dir: Option<PathBuf>,
    },
    /// Set configuration values
    Set {
        /// Configuration key to set (backend-url, default-organ, default-image-type)
        key: String,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Print the current configuration
    Config,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let Args {
        command,
        backend,
        organ,
        image_type,
        log_file,
        debug,
    } = Args::parse();

    match command.unwrap_or(Commands::Tui { file: None }) {
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            if value.is_empty() {
                config.print_all();
                return Ok(());
            }
            match config.set_key(&key, &value.join(" ")) {
                Ok(stored) => {
                    config.save()?;
                    println!("✅ Set {key} to: {stored}");
                }
                Err(err) => {
                    eprintln!("❌ {err}");
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            if let Err(err) = config.unset_key(&key) {
                eprintln!("❌ {err}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Unset {key}");
            Ok(())
        }
        Commands::Config => {
            let path = Config::get_config_path()?;
            Config::load_from_path(&path)?.print_all();
            println!();
            println!("Config file: {}", path_display(&path));
            Ok(())
        }
        Commands::Analyze {
            file,
            questions,
            save_dir,
        } => {
            init_tracing(&LogTarget::for_headless(log_file), debug)?;
            let settings = resolve_settings(backend.as_deref(), organ, image_type)?;
            run_analyze(settings, file, questions, save_dir).await
        }
        Commands::Tui { file } => {
            init_tracing(&LogTarget::for_tui(log_file), debug)?;
            let settings = resolve_settings(backend.as_deref(), organ, image_type)?;
            run_app(settings, file).await
        }
    }
}

fn resolve_settings(
    backend: Option<&str>,
    organ: Option<OrganType>,
    image_type: Option<ImageType>,
) -> Result<ResolvedSettings, Box<dyn Error>> {
    let config = Config::load()?;
    let env_backend = std::env::var(BACKEND_URL_ENV).ok();
    Ok(config.resolve(backend, env_backend.as_deref(), organ, image_type))
}
