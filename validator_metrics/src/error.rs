use rayon::ThreadPoolBuildError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("worker count must be at least 1")]
    ZeroWorkerCount,
    #[error("unable to build aggregation thread pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
}
