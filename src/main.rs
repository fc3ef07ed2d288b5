//! Palace - a command-line tool for memory palaces.
//!
//! # Usage
//!
//! ```bash
//! palace explain
//! palace explain --wrap-width 60 --theme light
//! palace explain --file notes/loci.md --save
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use palace::app::App;
use palace::config::{
    ConfigFlags, LayoutConfig, ThemeMode, clear_config_flags, global_config_path,
    load_config_flags, local_override_path, parse_scale, parse_wrap_width, save_config_flags,
};

/// A command-line tool for memory palaces
#[derive(Parser, Debug)]
#[command(name = "palace", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Learn about the Method of Loci and how Palace works
    Explain(ExplainArgs),
}

#[derive(Args, Debug)]
struct ExplainArgs {
    /// Markdown document to show instead of the bundled explanation
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Column at which the text is wrapped
    #[arg(long, value_name = "COLS")]
    wrap_width: Option<String>,

    /// Share of the terminal the box occupies, in percent (10-100)
    #[arg(long, value_name = "PERCENT")]
    scale: Option<String>,

    /// Force the palette for a light or dark terminal background
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Leave the mouse alone (disables wheel scrolling)
    #[arg(long)]
    no_mouse: bool,

    /// Write log events to a file (filtered by RUST_LOG, default warn).
    /// Without it nothing is logged, since the viewer owns the screen
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

impl ExplainArgs {
    /// Flags given on the command line. A numeric value that does not parse
    /// is dropped so the saved or default value applies.
    fn flags(&self) -> ConfigFlags {
        ConfigFlags {
            file: self.file.clone(),
            wrap_width: self.wrap_width.as_deref().and_then(parse_wrap_width),
            scale: self.scale.as_deref().and_then(parse_scale),
            theme: self.theme,
            no_mouse: self.no_mouse,
            log_file: self.log_file.clone(),
        }
    }
}

/// Install the tracing subscriber when a log file is given. Stderr is never
/// used: the alternate screen is up while events fire.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file =
        File::create(path).with_context(|| format!("Failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn explain(args: &ExplainArgs) -> Result<()> {
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = args.flags();

    if args.clear {
        clear_config_flags(&global_path)?;
    }
    if args.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if args.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_tracing(effective.log_file.as_deref())?;

    let colorfgbg = std::env::var("COLORFGBG").ok();
    let config = LayoutConfig::from_flags(&effective, colorfgbg.as_deref());
    tracing::debug!(?config, "effective layout");

    App::new(effective.document_path())
        .with_config(config)
        .with_mouse(!effective.no_mouse)
        .run()
        .context("palace explain failed")?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Explain(args)) => explain(&args),
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_log_file_installs_no_subscriber() {
        init_tracing(None).unwrap();
        assert!(!tracing::dispatcher::has_been_set());
    }

    #[test]
    fn test_explain_flags_drop_bad_numbers() {
        let cli = Cli::parse_from([
            "palace",
            "explain",
            "--wrap-width",
            "wide",
            "--scale",
            "60",
            "--no-mouse",
        ]);
        let Some(Command::Explain(args)) = cli.command else {
            panic!("expected explain");
        };
        let flags = args.flags();
        assert_eq!(flags.wrap_width, None);
        assert_eq!(flags.scale, Some(60));
        assert!(flags.no_mouse);
    }
}
