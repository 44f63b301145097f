mod cmd;
mod data;
mod logging;
mod planner;
mod ui;

use clap::{Parser, Subcommand};
use planner::AutosavePolicy;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "agenda", about = "annual planner with one note per day")]
struct Cli {
    /// Directory holding notes, settings and logs (default: ~/AgendaApp)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level written to <data-dir>/logs (trace, debug, info, warn, error, off)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Idle time before edits are saved in the planner view; 0 saves on every edit
    #[arg(long, default_value_t = 500)]
    autosave_ms: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and an editable holidays.yaml
    Init,
    /// List the holiday table
    Holidays,
    /// Print one day (key like 3_15)
    Show { key: String },
    /// Replace the note of one day (key like 3_15); empty text clears it
    Set { key: String, text: String },
    /// List every day that has a note
    Notes,
    /// Show settings, or update the given fields
    Settings {
        #[arg(long)]
        font_family: Option<String>,
        #[arg(long)]
        font_size: Option<i64>,
        /// Text color as #RRGGBB
        #[arg(long)]
        text_color: Option<String>,
        /// Holiday background color as #RRGGBB
        #[arg(long)]
        holiday_color: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = match &cli.data_dir {
        Some(dir) => absolute(dir)?,
        None => data::PersistenceGateway::default_dir()?,
    };

    // Logging is best effort; the planner works without it.
    let _logger = match logging::init_logging(&cli.log_level, &data_dir) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("warning: logging disabled: {e:#}");
            None
        }
    };

    match cli.command {
        None => cmd::root::run(&data_dir, AutosavePolicy::from_millis(cli.autosave_ms)),
        Some(Commands::Init) => cmd::init::run(&data_dir),
        Some(Commands::Holidays) => cmd::holidays::run(&data_dir),
        Some(Commands::Show { key }) => cmd::notes::show(&data_dir, &key),
        Some(Commands::Set { key, text }) => cmd::notes::set(&data_dir, &key, &text),
        Some(Commands::Notes) => cmd::notes::list(&data_dir),
        Some(Commands::Settings {
            font_family,
            font_size,
            text_color,
            holiday_color,
        }) => cmd::settings::run(
            &data_dir,
            cmd::settings::SettingsUpdate {
                font_family,
                font_size,
                text_color,
                holiday_color,
            },
        ),
    }
}

/// Resolves `dir` against the current directory so later file I/O does not
/// depend on where the process was started.
fn absolute(dir: &Path) -> anyhow::Result<PathBuf> {
    if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_absolute_keeps_absolute_paths() {
        let p = PathBuf::from("/tmp/agenda");
        assert_eq!(absolute(&p).unwrap(), p);
    }

    #[test]
    fn test_absolute_joins_relative_paths() {
        let p = absolute(Path::new("planner")).unwrap();
        assert!(p.is_absolute());
        assert!(p.ends_with("planner"));
    }

    #[test]
    fn test_parse_settings_flags() {
        let cli = Cli::parse_from(["agenda", "settings", "--font-size", "14", "--text-color", "#112233"]);
        match cli.command {
            Some(Commands::Settings { font_size, text_color, .. }) => {
                assert_eq!(font_size, Some(14));
                assert_eq!(text_color.as_deref(), Some("#112233"));
            }
            _ => panic!("expected settings command"),
        }
        assert_eq!(cli.autosave_ms, 500);
    }
}
