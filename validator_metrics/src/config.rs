use core::num::NonZeroUsize;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const DEFAULT_SAMPLE_LIMIT: usize = 5;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AggregationConfig {
    /// Maximum length of every detail list. Zero disables sampling.
    pub sample_limit: usize,
    pub worker_count: NonZeroUsize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            worker_count: default_worker_count(),
        }
    }
}

impl AggregationConfig {
    pub fn with_worker_count(self, worker_count: usize) -> Result<Self> {
        let worker_count = NonZeroUsize::new(worker_count).ok_or(Error::ZeroWorkerCount)?;

        Ok(Self {
            worker_count,
            ..self
        })
    }

    #[must_use]
    pub const fn with_sample_limit(self, sample_limit: usize) -> Self {
        Self {
            sample_limit,
            ..self
        }
    }
}

#[must_use]
pub fn default_worker_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}
