//! The store seam and the soft-failing repository facade over it.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lexmatch_core::Advocate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, error, info};

use crate::{NamePattern, StoreError};

/// Read access to an advocate pool.
///
/// Implementations report storage failures as errors; deciding what a
/// failure means to the caller is [`AdvocateRepository`]'s job.
#[async_trait]
pub trait AdvocateStore: Send + Sync {
    /// Every stored advocate, order insignificant.
    async fn advocates(&self) -> Result<Vec<Advocate>, StoreError>;

    /// First advocate whose full name matches `pattern`.
    async fn find_first(&self, pattern: &NamePattern) -> Result<Option<Advocate>, StoreError>;
}

/// Read-only advocate repository used by the matcher and the HTTP surface.
///
/// Every operation fails softly: a storage error is logged and reported as
/// "no data". Random picks draw from an injectable RNG so fallback selection
/// is reproducible under test.
#[derive(Clone)]
pub struct AdvocateRepository {
    store: Arc<dyn AdvocateStore>,
    rng: Arc<Mutex<StdRng>>,
}

impl AdvocateRepository {
    pub fn new(store: Arc<dyn AdvocateStore>) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    pub fn with_rng(store: Arc<dyn AdvocateStore>, rng: StdRng) -> Self {
        Self {
            store,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// All advocates, or an empty list if the store cannot be read.
    pub async fn list_all(&self) -> Vec<Advocate> {
        match self.store.advocates().await {
            Ok(advocates) => {
                info!(count = advocates.len(), "retrieved advocates");
                advocates
            }
            Err(err) => {
                error!(error = %err, "error fetching advocates");
                Vec::new()
            }
        }
    }

    /// One advocate chosen uniformly from a fresh snapshot of the pool.
    pub async fn pick_random(&self) -> Option<Advocate> {
        let advocates = match self.store.advocates().await {
            Ok(advocates) => advocates,
            Err(err) => {
                error!(error = %err, "error fetching random advocate");
                return None;
            }
        };
        let picked = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            advocates.choose(&mut *rng).cloned()
        };
        if let Some(advocate) = &picked {
            info!(sl_no = advocate.sl_no, pool = advocates.len(), "retrieved random advocate");
        }
        picked
    }

    /// First advocate whose name matches `fragment` case-insensitively.
    pub async fn find_by_name(&self, fragment: &str) -> Option<Advocate> {
        let pattern = NamePattern::new(fragment)?;
        debug!(fragment, literal = pattern.is_literal(), "looking up advocate by name");
        match self.store.find_first(&pattern).await {
            Ok(found) => found,
            Err(err) => {
                error!(fragment, error = %err, "error looking up advocate by name");
                None
            }
        }
    }
}
