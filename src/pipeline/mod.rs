//! End-to-end candidate search.
//!
//! embed query -> retrieve `initial_k` -> re-rank -> keep `final_k`,
//! optionally followed by submission to the evaluation API.

mod error;
mod types;


use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

pub use error::PipelineError;
pub use types::{PipelineOptions, QueryEvaluation, SearchResult};

use crate::candidate::{Candidate, DEFAULT_ATTRIBUTES};
use crate::embedding::{Embedder, RelevanceScorer};
use crate::evaluation::Evaluator;
use crate::filter::{FilterExpr, filter_from_hard_criteria};
use crate::query::{QueryConfig, config_file_name};
use crate::scoring::{CandidateReranker, ScoredCandidate};
use crate::vectordb::CandidateStore;

/// Query configs evaluated concurrently by [`SearchPipeline::evaluate_batch`].
pub const DEFAULT_BATCH_CONCURRENCY: usize = 4;

pub struct SearchPipeline {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn CandidateStore>,
    reranker: CandidateReranker,
    evaluator: Option<Arc<dyn Evaluator>>,
    options: PipelineOptions,
}

impl std::fmt::Debug for SearchPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchPipeline")
            .field("store", &self.store.backend_name())
            .field("reranker", &self.reranker)
            .field("has_evaluator", &self.evaluator.is_some())
            .field("options", &self.options)
            .finish()
    }
}

impl SearchPipeline {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn CandidateStore>,
        cross_encoder: Arc<dyn RelevanceScorer>,
        options: PipelineOptions,
    ) -> Self {
        let reranker = CandidateReranker::new(cross_encoder, options.strategy)
            .with_cross_encoder(options.use_cross_encoder);

        Self {
            embedder,
            store,
            reranker,
            evaluator: None,
            options,
        }
    }

    pub fn with_evaluator(mut self, evaluator: Arc<dyn Evaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Replaces the strategy's default re-ranker (e.g. to use custom weights).
    pub fn with_reranker(mut self, reranker: CandidateReranker) -> Self {
        self.reranker = reranker;
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Runs one search.
    ///
    /// An explicit `filter` is passed to the store as-is. Without one, and
    /// with `prefilter` on, a filter is derived from `hard_criteria`.
    pub async fn search(
        &self,
        query: &str,
        hard_criteria: &[String],
        soft_criteria: &[String],
        filter: Option<FilterExpr>,
    ) -> Result<Vec<SearchResult>, PipelineError> {
        info!(query, "Searching");

        let vector = self.embedder.embed_query(query).await?;
        debug!(dimension = vector.len(), "Embedded query");

        let filter = match filter {
            Some(filter) => Some(filter),
            None if self.options.prefilter => filter_from_hard_criteria(hard_criteria),
            None => None,
        };
        if !hard_criteria.is_empty() && filter.is_none() {
            debug!(
                hard = hard_criteria.len(),
                "Hard criteria enforced during re-ranking only"
            );
        }

        let candidates = self
            .store
            .query(
                vector,
                self.options.initial_k,
                filter.as_ref(),
                DEFAULT_ATTRIBUTES,
            )
            .await?;
        info!(
            backend = self.store.backend_name(),
            retrieved = candidates.len(),
            top_k = self.options.initial_k,
            "Retrieved candidates"
        );

        if candidates.is_empty() {
            warn!(query, "No candidates retrieved");
            return Ok(Vec::new());
        }

        let mut results: Vec<SearchResult> =
            if self.options.use_reranking && candidates.len() > 1 {
                self.rerank(query, candidates, hard_criteria, soft_criteria)
                    .await?
                    .into_iter()
                    .map(SearchResult::Ranked)
                    .collect()
            } else {
                candidates.into_iter().map(SearchResult::Retrieved).collect()
            };

        results.truncate(self.options.final_k);
        info!(returned = results.len(), "Search complete");
        Ok(results)
    }

    async fn rerank(
        &self,
        query: &str,
        candidates: Vec<Candidate>,
        hard_criteria: &[String],
        soft_criteria: &[String],
    ) -> Result<Vec<ScoredCandidate>, PipelineError> {
        let reranker = self.reranker.clone();
        let query = query.to_string();
        let hard = hard_criteria.to_vec();
        let soft = soft_criteria.to_vec();

        // Cross-encoder inference is CPU bound.
        let scored = tokio::task::spawn_blocking(move || {
            reranker.rerank(&query, candidates, &hard[..], &soft[..])
        })
        .await
        .map_err(|e| PipelineError::TaskFailed {
            reason: e.to_string(),
        })??;

        debug!(reranked = scored.len(), "Re-ranked candidates");
        Ok(scored)
    }

    pub async fn search_config(
        &self,
        config: &QueryConfig,
    ) -> Result<Vec<SearchResult>, PipelineError> {
        self.search(
            &config.natural_language,
            &config.hard_criteria,
            &config.soft_criteria,
            None,
        )
        .await
    }

    pub async fn search_from_config(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Vec<SearchResult>, PipelineError> {
        let config = QueryConfig::load(path)?;
        self.search_config(&config).await
    }

    /// Searches with the config at `path` and grades the top `final_k` results.
    pub async fn evaluate_query(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<QueryEvaluation, PipelineError> {
        let path = path.as_ref();
        let evaluator = self.evaluator.as_ref().ok_or(PipelineError::NoEvaluator)?;
        let config_name = config_file_name(path)?;

        let results = self.search_from_config(path).await?;
        if results.is_empty() {
            return Err(PipelineError::NoResults {
                config: config_name,
            });
        }

        let ids: Vec<String> = results.iter().map(|r| r.id().to_string()).collect();
        let evaluation = evaluator
            .evaluate_results(&config_name, ids, self.options.final_k)
            .await?;

        info!(
            config = %config_name,
            average_final_score = evaluation.average_final_score,
            "Query evaluated"
        );

        Ok(QueryEvaluation {
            config_path: path.to_path_buf(),
            config_name,
            results,
            evaluation,
        })
    }

    /// Evaluates several configs, at most `concurrency` at a time.
    ///
    /// Results come back in input order; one failing config does not stop
    /// the others.
    pub async fn evaluate_batch(
        &self,
        paths: &[PathBuf],
        concurrency: usize,
    ) -> Vec<(PathBuf, Result<QueryEvaluation, PipelineError>)> {
        stream::iter(paths)
            .map(|path| async move { (path.clone(), self.evaluate_query(path).await) })
            .buffered(concurrency.max(1))
            .collect()
            .await
    }
}
