//! Soccer outcome prediction CLI
//!
//! Leakage-safe feature engineering, model comparison and result-pattern
//! mining over the European Soccer database.

use clap::{Parser, Subcommand};
use soccer::{Config, Result};

#[derive(Parser)]
#[command(name = "soccer")]
#[command(about = "Soccer match outcome prediction and pattern mining", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load matches, train every model and report test metrics
    Run {
        /// Prompt for matches to predict after training
        #[arg(long)]
        interactive: bool,
        /// Skip win/draw/loss pattern mining
        #[arg(long)]
        no_mining: bool,
    },
    /// Mine frequent win/draw/loss patterns
    Patterns {
        /// Pattern length (overrides config)
        #[arg(long)]
        length: Option<usize>,
        /// Number of patterns to show (overrides config)
        #[arg(long)]
        top: Option<usize>,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Export a feature set of all loaded matches as ARFF
    ExportArff {
        /// Output path (overrides config)
        #[arg(long)]
        output: Option<String>,
        /// Feature set name
        #[arg(long, default_value = "Combined")]
        feature_set: String,
    },
    /// Show database status
    Status,
    /// Write a default config file
    Init,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table or json.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Run {
            interactive,
            no_mining,
        } => commands::run(&config, interactive, !no_mining),
        Commands::Patterns { length, top, format } => commands::patterns(&config, length, top, format),
        Commands::ExportArff { output, feature_set } => commands::export_arff(&config, output, &feature_set),
        Commands::Status => commands::status(&config),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use soccer::data::{Database, MatchDataset};
    use soccer::export::export_feature_set;
    use soccer::features::FeatureSet;
    use soccer::mining::{mine_top_patterns, PatternCount};
    use soccer::model::ModelParams;
    use soccer::predict::{InteractiveSession, Predictor};
    use soccer::training::{comparison_table, default_plan, PreparedFeatures, Trainer};
    use soccer::{Outcome, SoccerError};

    fn open_database(config: &Config) -> Result<Database> {
        let path = &config.data.database_path;
        if !std::path::Path::new(path).exists() {
            return Err(SoccerError::Config(format!(
                "database not found at {}. Set data.database_path in the config.",
                path
            )));
        }
        Database::open(path)
    }

    fn load_dataset(config: &Config, db: &Database) -> Result<MatchDataset> {
        MatchDataset::load(
            db,
            config.data.row_limit,
            config.data.min_rows,
            config.features.form_window,
        )
    }

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        println!("\nNext steps:");
        println!("  1. Download the European Soccer database to {}", config.data.database_path);
        println!("  2. Run 'soccer status' to check it loads");
        println!("  3. Run 'soccer run --interactive' to train models and predict");

        Ok(())
    }

    pub fn status(config: &Config) -> Result<()> {
        let db = open_database(config)?;
        let stats = db.get_stats()?;

        println!("Database Status");
        println!("───────────────────────────────");
        println!("  Path:       {}", config.data.database_path);
        println!("  Teams:      {}", stats.team_count);
        println!("  Matches:    {}", stats.match_count);
        println!("  With odds:  {}", stats.matches_with_odds);
        if let (Some(earliest), Some(latest)) = (stats.earliest_match, stats.latest_match) {
            println!("  Range:      {} to {}", earliest, latest);
        }

        Ok(())
    }

    pub fn run(config: &Config, interactive: bool, mining: bool) -> Result<()> {
        let db = open_database(config)?;
        let dataset = load_dataset(config, &db)?;

        let counts = dataset.class_counts();
        println!("Loaded {} matches", dataset.len());
        for outcome in Outcome::ALL {
            let n = counts[outcome.label()];
            println!(
                "  {:<10} {:>6} ({:.1}%)",
                outcome.to_string(),
                n,
                100.0 * n as f64 / dataset.len().max(1) as f64
            );
        }

        if let Err(e) = export_feature_set(&config.export.arff_path, FeatureSet::Combined, &dataset.records) {
            log::error!("Failed to export ARFF to {}: {}", config.export.arff_path, e);
        }

        let (train, test) = dataset.split(config.training.train_fraction, config.training.seed);
        let prepared = PreparedFeatures::build(&train, &test);

        println!("\n========================================");
        println!("TRAINING MODELS");
        println!("========================================");
        let trainer =
            Trainer::new(ModelParams::from(&config.training)).with_metrics_csv(&config.export.metrics_csv);
        let models = trainer.run(&default_plan(), &prepared);

        for m in &models {
            println!("\n--- {} ---", m.label());
            print!("{}", m.metrics.report());
        }

        println!("\n========================================");
        println!("MODEL COMPARISON");
        println!("========================================");
        print!("{}", comparison_table(&models));

        if mining {
            match db.load_result_rows() {
                Ok(rows) => {
                    let top = mine_top_patterns(&rows, config.mining.pattern_length, config.mining.top_k);
                    println!();
                    print_patterns(config.mining.pattern_length, &top);
                }
                Err(e) => log::error!("Sequence mining failed: {}", e),
            }
        }

        if interactive {
            if models.is_empty() {
                println!("\nNo trained models available for prediction.");
                return Ok(());
            }
            println!("\n========================================");
            println!("INTERACTIVE PREDICTION MODE");
            println!("========================================");
            let predictor = Predictor::new(models, prepared.normalizers());
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let mut session = InteractiveSession::new(stdin.lock(), stdout.lock(), &predictor);
            session.run()?;
        }

        Ok(())
    }

    pub fn patterns(config: &Config, length: Option<usize>, top: Option<usize>, format: OutputFormat) -> Result<()> {
        let n = length.unwrap_or(config.mining.pattern_length);
        let k = top.unwrap_or(config.mining.top_k);

        let db = open_database(config)?;
        let rows = db.load_result_rows()?;
        let patterns = mine_top_patterns(&rows, n, k);

        match format {
            OutputFormat::Table => print_patterns(n, &patterns),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&patterns).map_err(|e| SoccerError::Parse(e.to_string()))?;
                println!("{}", json);
            }
        }
        Ok(())
    }

    pub fn export_arff(config: &Config, output: Option<String>, feature_set: &str) -> Result<()> {
        let set: FeatureSet = feature_set.parse()?;
        let path = output.unwrap_or_else(|| config.export.arff_path.clone());

        let db = open_database(config)?;
        let dataset = load_dataset(config, &db)?;
        export_feature_set(&path, set, &dataset.records)?;
        println!("Exported {} features for {} matches to {}", set, dataset.len(), path);
        Ok(())
    }

    fn print_patterns(n: usize, patterns: &[PatternCount]) {
        println!("Top {} patterns of length {}:", patterns.len(), n);
        println!("{:<12} {:>8}", "Pattern", "Count");
        println!("─────────────────────");
        for p in patterns {
            println!("{:<12} {:>8}", p.pattern, p.count);
        }
    }
}
