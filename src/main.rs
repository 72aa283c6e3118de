use clap::{Parser, Subcommand};
use gallery_catalog::config::{self, SyncConfig};
use gallery_catalog::output;
use gallery_catalog::sync::{self, Mode, SyncError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gallery-catalog")]
#[command(about = "Sync a gallery's metadata.json with its image directory")]
#[command(long_about = "\
Sync a gallery's metadata.json with its image directory

Every image under the root gets exactly one catalog entry. New files get an
entry with a title generated from the filename and the date of their last git
commit (or their mtime); entries for deleted files are dropped. Existing
entries are never modified.

Layout:

  src/data/
  ├── metadata.json                # Catalog (rewritten, newest first)
  └── images/                      # Scan root
      ├── collectionA/             # Collection \"collectionA\"
      │   └── sunset-beach.jpg     # Title \"Sunset Beach\"
      └── travel/japan/            # Collection \"travel/japan\"
          └── tokyo.png

Run 'gallery-catalog gen-config' to generate a documented catalog.toml.")]
#[command(version)]
struct Cli {
    /// Config file (defaults apply if it doesn't exist)
    #[arg(long, default_value = "catalog.toml", global = true)]
    config: PathBuf,

    /// Image directory to scan (overrides the config file)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Catalog file to update (overrides the config file)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile the catalog with the image tree and rewrite it (default)
    Sync,
    /// Reconcile and report without writing the catalog
    Check,
    /// Print a stock catalog.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "gallery_catalog=debug"
        } else {
            "gallery_catalog=warn"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), SyncError> {
    let mode = match cli.command.unwrap_or(Command::Sync) {
        Command::Sync => Mode::Write,
        Command::Check => Mode::DryRun,
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
    };

    let config = resolve_config(&cli.config, cli.root, cli.catalog)?;
    output::print_start(&config.images_root);

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_sync_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = sync::run(&config, mode, Some(tx));
    // The sender is dropped with `run`, so the printer drains and exits on
    // both the success and the error path.
    printer.join().ok();

    output::print_summary(&result?);
    Ok(())
}

/// Load the config file and apply command-line overrides.
fn resolve_config(
    path: &std::path::Path,
    root: Option<PathBuf>,
    catalog: Option<PathBuf>,
) -> Result<SyncConfig, SyncError> {
    let mut config = config::load_config(path)?;
    if let Some(root) = root {
        config.images_root = root;
    }
    if let Some(catalog) = catalog {
        config.catalog = catalog;
    }
    Ok(config)
}
