use thiserror::Error;

/// Failures while starting or talking to a fixture container.
#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("failed to run container: {0}")]
    Container(#[from] testcontainers::TestcontainersError),

    #[error("failed to reach redis fixture: {0}")]
    Redis(#[from] redis::RedisError),
}

pub type Result<T> = std::result::Result<T, TestInfraError>;
