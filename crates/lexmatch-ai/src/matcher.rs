//! The match decision engine.
//!
//! Sequences the pool read, the oracle call, response parsing, the confidence
//! threshold, and random fallback into one decision. Every path that has at
//! least one advocate to offer produces a complete [`MatchResult`]; the only
//! failures are an empty pool and a fallback pick that comes back empty.
//!
//! # Decision rule
//!
//! | oracle outcome                    | winner             | match type       |
//! |-----------------------------------|--------------------|------------------|
//! | failed or timed out               | random             | Random Selection |
//! | quality ≥ 6, name resolves        | named advocate     | AI Selected      |
//! | quality ≥ 6, name missing/unknown | random             | Random Selection |
//! | quality < 6                       | random             | Random Selection |

use std::sync::Arc;
use std::time::Duration;

use lexmatch_core::{Advocate, CaseDescription, MatchResult, MatchType, messages};
use lexmatch_store::AdvocateRepository;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{OracleError, ParsedResponse, ScoringOracle, build_prompt, parse_response};

/// Upper bound on a single oracle call unless configured otherwise.
pub const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("No advocates found in the database.")]
    NoCandidates,
    /// The oracle failed and there was no advocate left to substitute.
    #[error("Error processing AI response: {0}")]
    Oracle(#[source] OracleError),
    #[error("No advocate available for fallback selection.")]
    FallbackUnavailable,
}

/// Selects one advocate for a case description.
///
/// Holds only process-scoped dependencies; each call re-reads the pool and
/// consults the oracle once, so concurrent calls share nothing mutable.
pub struct Matcher {
    repository: AdvocateRepository,
    oracle: Arc<dyn ScoringOracle>,
    oracle_timeout: Duration,
}

impl Matcher {
    pub fn new(repository: AdvocateRepository, oracle: Arc<dyn ScoringOracle>) -> Self {
        Self {
            repository,
            oracle,
            oracle_timeout: DEFAULT_ORACLE_TIMEOUT,
        }
    }

    pub fn with_oracle_timeout(mut self, timeout: Duration) -> Self {
        self.oracle_timeout = timeout;
        self
    }

    pub fn repository(&self) -> &AdvocateRepository {
        &self.repository
    }

    /// Pick the best-suited advocate for `case`.
    pub async fn find_best_advocate(
        &self,
        case: &CaseDescription,
    ) -> Result<MatchResult, MatchError> {
        info!("analyzing case requirements");
        let advocates = self.repository.list_all().await;
        if advocates.is_empty() {
            return Err(MatchError::NoCandidates);
        }

        let prompt = build_prompt(case.as_str(), &advocates);
        let text = match self.consult(&prompt).await {
            Ok(text) => text,
            Err(err) => return self.oracle_fallback(err).await,
        };

        let result = self.decide(parse_response(&text)).await?;
        info!(
            sl_no = result.advocate.sl_no,
            match_type = result.match_type.as_str(),
            accuracy = %result.match_accuracy,
            "match completed"
        );
        Ok(result)
    }

    async fn consult(&self, prompt: &str) -> Result<String, OracleError> {
        info!(model = self.oracle.model(), "AI processing case description");
        match tokio::time::timeout(self.oracle_timeout, self.oracle.generate(prompt)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(OracleError::Timeout(self.oracle_timeout)),
        }
    }

    async fn oracle_fallback(&self, err: OracleError) -> Result<MatchResult, MatchError> {
        error!(error = %err, "AI processing failed, falling back to random selection");
        match self.repository.pick_random().await {
            Some(advocate) => Ok(MatchResult::oracle_unavailable(advocate)),
            None => Err(MatchError::Oracle(err)),
        }
    }

    async fn decide(&self, parsed: ParsedResponse) -> Result<MatchResult, MatchError> {
        let ParsedResponse {
            quality,
            selected_name,
            reason,
        } = parsed;

        if !quality.is_confident() {
            warn!(quality = quality.value(), "no specific match found, selecting random advocate");
            let advocate = self.random_fallback().await?;
            return Ok(MatchResult::scored(
                advocate,
                messages::NO_SPECIFIC_MATCH,
                MatchType::RandomSelection,
                quality,
            ));
        }

        info!(quality = quality.value(), "good match found, retrieving advocate details");
        if let Some(name) = selected_name.as_deref()
            && let Some(advocate) = self.repository.find_by_name(name).await
        {
            return Ok(MatchResult::scored(
                advocate,
                reason,
                MatchType::AiSelected,
                quality,
            ));
        }

        warn!(
            selected = selected_name.as_deref().unwrap_or(""),
            "suggested advocate not in pool, selecting random advocate"
        );
        let advocate = self.random_fallback().await?;
        Ok(MatchResult::scored(
            advocate,
            reason,
            MatchType::RandomSelection,
            quality,
        ))
    }

    async fn random_fallback(&self) -> Result<Advocate, MatchError> {
        self.repository
            .pick_random()
            .await
            .ok_or(MatchError::FallbackUnavailable)
    }
}
