//! Scout command-line entrypoint.
//!
//! ```bash
//! # Run the query in a YAML config and print the ranked candidates
//! scout search queries/tax_lawyer.yml
//!
//! # Ad-hoc query with criteria
//! scout query "Corporate tax lawyer" --hard "JD degree" --soft "M&A experience"
//!
//! # Grade every config in a directory with the evaluation API
//! scout evaluate queries/
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;

use scout::config::Config;
use scout::constants::DEFAULT_EMBEDDING_DIM;
use scout::embedding::{
    Embedder, Reranker, StubEmbedder, VoyageConfig, VoyageEmbedder,
};
use scout::evaluation::{EvaluationClient, EvaluationConfig};
use scout::pipeline::{DEFAULT_BATCH_CONCURRENCY, PipelineOptions, SearchPipeline, SearchResult};
use scout::query::{QueryConfig, discover_configs};
use scout::scoring::RerankStrategy;
use scout::vectordb::{CandidateStore, QdrantStore, TurbopufferConfig, TurbopufferStore, VectorBackend};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Candidate search with criteria-aware re-ranking")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    pipeline: PipelineArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PipelineArgs {
    /// Vector store: "qdrant" or "turbopuffer" (overrides SCOUT_VECTOR_BACKEND)
    #[arg(long, global = true)]
    backend: Option<VectorBackend>,

    /// Re-ranking strategy: "basic" or "enhanced"
    #[arg(long, global = true)]
    strategy: Option<RerankStrategy>,

    /// Return candidates in retrieval order
    #[arg(long, global = true)]
    no_rerank: bool,

    /// Re-rank without the cross-encoder
    #[arg(long, global = true)]
    no_cross_encoder: bool,

    /// Turn hard criteria into a vector-store filter
    #[arg(long, global = true)]
    prefilter: bool,

    /// Candidates retrieved before re-ranking
    #[arg(long, global = true)]
    initial_k: Option<usize>,

    /// Candidates returned
    #[arg(long, global = true)]
    final_k: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the query defined in a YAML config
    Search {
        /// Query config file
        config: PathBuf,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run an ad-hoc query
    Query {
        /// Natural-language query
        text: String,

        /// Hard criterion (repeatable)
        #[arg(long = "hard")]
        hard: Vec<String>,

        /// Soft criterion (repeatable)
        #[arg(long = "soft")]
        soft: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search and grade query configs with the evaluation API
    Evaluate {
        /// Config files or directories of configs
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Configs evaluated at once
        #[arg(long, default_value_t = DEFAULT_BATCH_CONCURRENCY)]
        concurrency: usize,
    },
}

impl PipelineArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(backend) = self.backend {
            config.vector_backend = backend;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(initial_k) = self.initial_k {
            config.initial_k = initial_k;
        }
        if let Some(final_k) = self.final_k {
            config.final_k = final_k;
        }
    }

    fn options(&self, config: &Config) -> PipelineOptions {
        PipelineOptions {
            use_reranking: !self.no_rerank,
            use_cross_encoder: !self.no_cross_encoder,
            prefilter: self.prefilter,
            ..config.pipeline_options()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    cli.pipeline.apply(&mut config);
    config.validate()?;

    let options = cli.pipeline.options(&config);
    tracing::info!(
        backend = %config.vector_backend,
        strategy = %options.strategy,
        initial_k = options.initial_k,
        final_k = options.final_k,
        "Scout starting"
    );

    let evaluate = matches!(cli.command, Commands::Evaluate { .. });
    let pipeline = build_pipeline(&config, options, evaluate)?;

    match cli.command {
        Commands::Search { config: path, json } => {
            let query = QueryConfig::load(&path)?;
            let results = pipeline.search_config(&query).await?;
            print_results(&results, json)?;
        }
        Commands::Query {
            text,
            hard,
            soft,
            json,
        } => {
            let results = pipeline.search(&text, &hard, &soft, None).await?;
            print_results(&results, json)?;
        }
        Commands::Evaluate { paths, concurrency } => {
            let configs = expand_config_paths(&paths)?;
            let outcomes = pipeline.evaluate_batch(&configs, concurrency).await;

            let mut failures = 0;
            for (path, outcome) in outcomes {
                match outcome {
                    Ok(report) => println!("{}: {}", report.config_name, report.evaluation),
                    Err(e) => {
                        failures += 1;
                        eprintln!("{}: {}", path.display(), e);
                    }
                }
            }
            if failures > 0 {
                anyhow::bail!("{failures} of {} configs failed", configs.len());
            }
        }
    }

    Ok(())
}

fn build_pipeline(
    config: &Config,
    options: PipelineOptions,
    evaluate: bool,
) -> Result<SearchPipeline> {
    let embedder: Arc<dyn Embedder> = match VoyageConfig::from_env() {
        Ok(voyage) => Arc::new(VoyageEmbedder::new(voyage)?),
        Err(_) => {
            tracing::warn!("No VOYAGE_API_KEY configured, using stub embedder");
            Arc::new(StubEmbedder::new(DEFAULT_EMBEDDING_DIM))
        }
    };

    let store: Arc<dyn CandidateStore> = match config.vector_backend {
        VectorBackend::Qdrant => Arc::new(QdrantStore::new(
            &config.qdrant_url,
            config.collection.clone(),
        )?),
        VectorBackend::Turbopuffer => {
            let tpuf = TurbopufferConfig::from_env()
                .context("turbopuffer backend selected")?
                .with_base_url(config.turbopuffer_url.clone())
                .with_namespace(config.namespace.clone());
            Arc::new(TurbopufferStore::new(tpuf)?)
        }
    };

    let cross_encoder = Arc::new(Reranker::load(config.reranker_config())?);
    if !cross_encoder.is_model_loaded() && options.use_cross_encoder {
        tracing::warn!("No SCOUT_RERANKER_PATH configured, cross-encoder running in stub mode");
    }

    let mut pipeline = SearchPipeline::new(embedder, store, cross_encoder, options);
    if evaluate {
        let eval_config = EvaluationConfig::from_env()?.with_base_url(config.eval_url.clone());
        let client = EvaluationClient::new(eval_config)?;
        pipeline = pipeline.with_evaluator(Arc::new(client));
    }
    Ok(pipeline)
}

fn expand_config_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut configs = Vec::new();
    for path in paths {
        if path.is_dir() {
            configs.extend(discover_configs(path)?);
        } else {
            configs.push(path.clone());
        }
    }
    if configs.is_empty() {
        anyhow::bail!("no query configs found");
    }
    Ok(configs)
}

fn print_results(results: &[SearchResult], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No candidates found");
        return Ok(());
    }

    for (rank, result) in results.iter().enumerate() {
        let candidate = result.candidate();
        let name = candidate.attributes.name.as_deref().unwrap_or("-");
        match result.rerank_score() {
            Some(score) => println!(
                "{:>2}. {} {} (score {:.4})",
                rank + 1,
                candidate.id,
                name,
                score
            ),
            None => println!(
                "{:>2}. {} {} (distance {:.4})",
                rank + 1,
                candidate.id,
                name,
                candidate.distance_or_zero()
            ),
        }
        if !candidate.attributes.rerank_summary.is_empty() {
            let summary: String = candidate.attributes.rerank_summary.chars().take(200).collect();
            println!("    {summary}");
        }
    }
    Ok(())
}
