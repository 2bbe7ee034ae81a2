use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::debug;
use std::path::PathBuf;

use domdb::model::IonMode;
use domdb::search::SearchConfig;
use domdb::store::Database;

mod add;
mod config;
mod diagnostics;
mod list;
mod remove;
mod search;
mod settings;
mod table;

pub use config::{Config, DEFAULT_CONFIG_FILE};
pub use table::AsciiTable;

/// domdb - Metabolomics peak database with cross-experiment matching
#[derive(Parser)]
#[command(name = "domdb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (defaults to domdb.toml in the working directory)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Ionization mode partition, overriding the config file
    #[arg(short, long, value_enum, global = true)]
    mode: Option<ModeArg>,

    #[command(subcommand)]
    command: Commands,
}

/// Ionization mode on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    /// Positive mode
    Pos,
    /// Negative mode
    Neg,
}

impl From<ModeArg> for IonMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Pos => IonMode::Positive,
            ModeArg::Neg => IonMode::Negative,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Load one experiment from its peak table and sample metadata
    Add {
        /// Experiment name
        #[arg(value_name = "NAME")]
        name: String,

        /// Peak table CSV
        #[arg(value_name = "DATA")]
        data: PathBuf,

        /// Sample metadata CSV
        #[arg(value_name = "METADATA")]
        metadata: PathBuf,
    },

    /// Load every experiment found in a directory
    AddDir {
        /// Directory with <name>_*.csv file pairs
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// Show the experiments a directory would load
    Dir {
        /// Directory with <name>_*.csv file pairs
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// List experiments
    List,

    /// List the samples of an experiment
    Samples {
        /// Experiment name
        #[arg(value_name = "EXPERIMENT")]
        experiment: String,
    },

    /// Count peaks, overall or for one experiment
    Count {
        /// Experiment name
        #[arg(value_name = "EXPERIMENT")]
        experiment: Option<String>,
    },

    /// Remove an experiment and everything it owns
    Remove {
        /// Experiment name
        #[arg(value_name = "EXPERIMENT")]
        experiment: String,
    },

    /// Find stored peaks matching an m/z and retention time
    Search {
        /// Query m/z
        #[arg(value_name = "MZ")]
        mz: f64,

        /// Query retention time in seconds
        #[arg(value_name = "RT", allow_negative_numbers = true)]
        rt: f64,

        /// Output CSV
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Give up after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<f64>,
    },

    /// Match every peak of an experiment against all other experiments
    Match {
        /// Experiment name
        #[arg(value_name = "EXPERIMENT")]
        experiment: String,

        /// Output CSV
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Give up after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<f64>,
    },

    /// Show search settings, or change one
    Set {
        /// Setting name
        #[arg(value_name = "KEY", requires = "value")]
        key: Option<String>,

        /// New value
        #[arg(value_name = "VALUE")]
        value: Option<String>,
    },

    /// Restore one search setting, or all of them, to the default
    Reset {
        /// Setting name
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },

    /// Print a random peak
    Random,

    /// Draw random peaks until one has matches and print them
    Test {
        /// Maximum number of peaks to try
        #[arg(long, default_value_t = 100)]
        attempts: usize,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

/// Resolved configuration shared by all commands
pub struct Session {
    /// Config file location
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: Config,
    /// Active partition
    pub mode: IonMode,
}

impl Session {
    fn load(config: Option<PathBuf>, mode: Option<ModeArg>) -> Result<Self> {
        let config_path = config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let config = Config::load_or_default(&config_path)?;
        let mode = mode.map(IonMode::from).unwrap_or(config.database.mode);
        debug!(
            "Config {} (database {}, {} mode)",
            config_path.display(),
            config.database.path.display(),
            mode
        );
        Ok(Self {
            config_path,
            config,
            mode,
        })
    }

    /// Open the snapshot, or an empty database if there is none yet
    pub fn open_database(&self) -> Result<Database> {
        let path = &self.config.database.path;
        Database::open_or_create(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))
    }

    /// Persist the snapshot
    pub fn save_database(&self, db: &Database) -> Result<()> {
        let path = &self.config.database.path;
        db.save(path)
            .with_context(|| format!("Failed to save database: {}", path.display()))
    }

    /// Validated search settings
    pub fn search_config(&self) -> Result<SearchConfig> {
        self.config
            .search
            .validate()
            .context("Invalid search settings (see `domdb set`)")
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let mut session = Session::load(cli.config, cli.mode)?;
    match cli.command {
        Commands::Add {
            name,
            data,
            metadata,
        } => add::run(&session, &name, data, metadata),
        Commands::AddDir { dir } => add::run_dir(&session, dir),
        Commands::Dir { dir } => add::preview_dir(dir),
        Commands::List => list::run(&session),
        Commands::Samples { experiment } => list::run_samples(&session, &experiment),
        Commands::Count { experiment } => list::run_count(&session, experiment.as_deref()),
        Commands::Remove { experiment } => remove::run(&session, &experiment),
        Commands::Search {
            mz,
            rt,
            output,
            timeout,
        } => search::run_search(&session, mz, rt, output, timeout),
        Commands::Match {
            experiment,
            output,
            timeout,
        } => search::run_match(&session, &experiment, output, timeout),
        Commands::Set { key, value } => settings::run_set(&mut session, key, value),
        Commands::Reset { key } => settings::run_reset(&mut session, key),
        Commands::Random => diagnostics::run_random(&session),
        Commands::Test { attempts } => diagnostics::run_test(&session, attempts),
    }
}
