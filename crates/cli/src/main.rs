use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use workmatch_common::{BacklogEntry, Employee, HistoricalTask, SkillLevels, SystemConfig};
use workmatch_embedding::FastEmbedder;
use workmatch_engine::{ComplexityClient, GeminiBackend, Matcher, RecommendationEngine, TaskQuery};
use workmatch_storage::QdrantIndex;

#[derive(Parser)]
#[command(name = "workmatch")]
#[command(about = "Task-employee matching over a vector index")]
struct Cli {
    /// TOML config file; falls back to QDRANT_URL / QDRANT_API_KEY /
    /// GEMINI_API_KEY environment variables when omitted
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the vector collections
    Setup {
        /// Drop and recreate existing collections
        #[arg(long)]
        recreate: bool,
    },
    /// Embed and upsert employees from a JSON file
    IngestEmployees { file: String },
    /// Embed and upsert completed tasks from a JSON file
    IngestHistory { file: String },
    /// Recommend employees for a task
    Search {
        /// Skills as name=level pairs, e.g. --skills communication=7,sales=5
        #[arg(long, required = true, value_delimiter = ',')]
        skills: Vec<String>,
        #[arg(long, default_value = "general")]
        task_type: String,
        #[arg(long, default_value_t = 3)]
        priority: u8,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Order a backlog file by priority and deadline
    Schedule { file: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SystemConfig::from_file(path)?,
        None => SystemConfig::from_env()?,
    };
    tracing::debug!(qdrant_url = %config.storage.qdrant_url, "configuration loaded");

    match cli.command {
        Commands::Setup { recreate } => {
            let index = QdrantIndex::new(&config.storage)?;
            if recreate {
                index.recreate_collections(config.embedding.dimension).await?;
            } else {
                index.ensure_collections(config.embedding.dimension).await?;
            }
            println!("Setup complete!");
        }
        Commands::IngestEmployees { file } => {
            let employees: Vec<Employee> = read_json(&file)?;
            let written = matcher(&config)?.upsert_employees(&employees).await?;
            println!("Upserted {} employees", written);
        }
        Commands::IngestHistory { file } => {
            let tasks: Vec<HistoricalTask> = read_json(&file)?;
            let written = matcher(&config)?.upsert_history(&tasks).await?;
            println!("Upserted {} historical tasks", written);
        }
        Commands::Search {
            skills,
            task_type,
            priority,
            description,
        } => {
            let required_skills = parse_skills(&skills)?;
            let backend = Arc::new(GeminiBackend::new(&config.estimator)?);
            let complexity = ComplexityClient::new(backend).with_retry(
                config.estimator.max_retries,
                std::time::Duration::from_millis(config.estimator.retry_backoff_ms),
            );
            let engine = RecommendationEngine::new(matcher(&config)?, complexity)
                .with_result_limit(config.matching.result_limit);

            let recommendation = engine
                .recommend(&TaskQuery {
                    task_type,
                    required_skills,
                    priority,
                    description,
                    avg_duration: None,
                })
                .await?;

            for (rank, candidate) in recommendation.top_employees.iter().enumerate() {
                println!(
                    "{}. {} - Score: {:.4}",
                    rank + 1,
                    candidate.employee_name,
                    candidate.score
                );
            }
            println!();
            println!("{}", recommendation.recommendation_summary);
        }
        Commands::Schedule { file } => {
            let backlog: Vec<BacklogEntry> = read_json(&file)?;
            let ordered = workmatch_engine::scheduler::order(&backlog)?;
            println!("{}", serde_json::to_string_pretty(&ordered)?);
        }
    }

    Ok(())
}

fn matcher(config: &SystemConfig) -> anyhow::Result<Matcher> {
    let embedder = Arc::new(FastEmbedder::new(&config.embedding)?);
    let index = Arc::new(QdrantIndex::new(&config.storage)?);
    Ok(Matcher::new(embedder, index).with_chunk_size(config.matching.upsert_chunk_size))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path))?;
    serde_json::from_str(&content).with_context(|| format!("cannot parse {}", path))
}

fn parse_skills(pairs: &[String]) -> anyhow::Result<SkillLevels> {
    let mut map = serde_json::Map::new();
    for pair in pairs {
        let (name, level) = pair
            .split_once('=')
            .with_context(|| format!("skill '{}' is not a name=level pair", pair))?;
        let level: u8 = level
            .trim()
            .parse()
            .with_context(|| format!("skill '{}' has a non-integer level", pair))?;
        map.insert(name.trim().to_string(), level.into());
    }
    Ok(SkillLevels::from_value(&serde_json::Value::Object(map))?)
}
