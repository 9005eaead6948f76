use anyhow::Context;
use clap::{Parser, Subcommand};
use deploycast::{
    analyze_project, AnalysisCache, ChunkedOracle, DeploycastConfig, DeploymentPredictor,
    FeatureVectorBuilder, KeywordClassifier, Prediction,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Predict a cloud deployment target from repository architecture features
#[derive(Parser, Debug)]
#[command(name = "deploycast")]
#[command(about = "k-NN deployment prediction over repository features", long_about = None)]
struct Args {
    /// TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Reference dataset CSV
    #[arg(short, long, global = true)]
    dataset: Option<PathBuf>,

    /// Number of neighbors that vote
    #[arg(short, global = true)]
    k: Option<usize>,

    /// Repository identifier column
    #[arg(long, global = true)]
    id_column: Option<String>,

    /// Deployment label column
    #[arg(long, global = true)]
    label_column: Option<String>,

    /// Print the explained prediction as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predict for a repository already in the dataset
    Repository {
        /// Repository identifier
        id: String,
    },
    /// Predict for a comma-separated feature vector in schema order
    Vector {
        #[arg(value_delimiter = ',', allow_hyphen_values = true, required = true)]
        values: Vec<f64>,
    },
    /// Detect features from a directory listing and code digest, then predict
    Analyze {
        /// Rendered directory tree
        #[arg(long)]
        directory: PathBuf,

        /// Rendered code digest
        #[arg(long)]
        code: PathBuf,

        /// Chunk budget in characters
        #[arg(long)]
        chunk_size: Option<usize>,
    },
}

impl Args {
    fn resolve_config(&self) -> anyhow::Result<DeploycastConfig> {
        let mut config = DeploycastConfig::load_or_default(self.config.as_deref())?;

        if let Some(dataset) = &self.dataset {
            config.dataset = dataset.clone();
        }
        if let Some(k) = self.k {
            config.k = k;
        }
        if let Some(id_column) = &self.id_column {
            config.columns.id_column = id_column.clone();
        }
        if let Some(label_column) = &self.label_column {
            config.columns.label_column = label_column.clone();
        }
        if let Some(log_level) = &self.log_level {
            config.log_level = log_level.clone();
        }
        if let Command::Analyze {
            chunk_size: Some(chunk_size),
            ..
        } = self.command
        {
            config.chunk_size = chunk_size;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(level: &str, explicit: bool) -> anyhow::Result<()> {
    // RUST_LOG wins unless a level was passed on the command line
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) if !explicit => filter,
        _ => EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"))?,
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn print_prediction(prediction: &Prediction) {
    println!("Predicted deployment: {}", prediction.label);
    println!();
    println!("Nearest repositories (k = {}):", prediction.k);
    for (rank, neighbor) in prediction.neighbors.iter().enumerate() {
        println!(
            "  {:>2}. {:<40} {:<16} {:>7.4}",
            rank + 1,
            neighbor.repository,
            neighbor.label,
            neighbor.score
        );
    }
    println!();
    for vote in &prediction.votes {
        println!("  {:<16} {} vote(s)", vote.label, vote.count);
    }
    println!("  agreement: {:.0}%", prediction.stats.agreement * 100.0);
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.resolve_config()?;
    init_logging(&config.log_level, args.log_level.is_some())?;

    info!("Starting deploycast v{}", env!("CARGO_PKG_VERSION"));
    info!("Dataset: {:?}", config.dataset);

    let predictor = DeploymentPredictor::from_path(&config.dataset, &config.columns)
        .with_context(|| format!("failed to load dataset {}", config.dataset.display()))?;

    match &args.command {
        Command::Repository { id } => {
            let prediction = predictor
                .explain_by_repository(id, config.k)
                .with_context(|| format!("prediction for repository '{id}' failed"))?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&prediction)?);
            } else {
                print_prediction(&prediction);
            }
        }
        Command::Vector { values } => {
            let prediction = predictor
                .explain_by_vector(values, config.k)
                .context("prediction for feature vector failed")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&prediction)?);
            } else {
                print_prediction(&prediction);
            }
        }
        Command::Analyze { directory, code, .. } => {
            let listing = fs::read_to_string(directory)
                .with_context(|| format!("failed to read {}", directory.display()))?;
            let digest = fs::read_to_string(code)
                .with_context(|| format!("failed to read {}", code.display()))?;

            let cache = Arc::new(AnalysisCache::new());
            let oracle = ChunkedOracle::new(KeywordClassifier::new(), Arc::clone(&cache));
            let analysis = analyze_project(&listing, &digest, &oracle, &config.analyzer_options())?;
            let stats = cache.stats();
            info!(
                "Cache: {} entries, {} hits, {} misses",
                stats.entries, stats.hits, stats.misses
            );

            let vector = FeatureVectorBuilder::new(predictor.schema().clone())
                .build(&analysis.combined)
                .context("detected features do not cover the dataset schema")?;
            let prediction = predictor.explain_by_vector(vector.as_slice(), config.k)?;

            if args.json {
                let report = serde_json::json!({
                    "features": analysis.combined,
                    "vector": vector.as_slice(),
                    "prediction": prediction,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Detected features:");
                for name in analysis.combined.present() {
                    println!("  - {name}");
                }
                println!();
                print_prediction(&prediction);
            }
        }
    }

    Ok(())
}
