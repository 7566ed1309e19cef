//! Mock backend for testing
//!
//! Returns a deterministic suggestion embedding the total, or a failure
//! when configured, to exercise the fallback path without a network.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::AdvisorBackend;

/// Mock advisor backend for testing
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether calls should fail (exercises the fallback path)
    failing: bool,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self { failing: false }
    }

    /// Create a backend whose calls always fail
    pub fn failing() -> Self {
        Self { failing: true }
    }
}

#[async_trait]
impl AdvisorBackend for MockBackend {
    async fn advise(&self, total: i64) -> Result<String> {
        if self.failing {
            return Err(Error::InvalidData("mock advisor failure".into()));
        }
        Ok(format!(
            "Con un saldo proyectado de {}, destina una parte al pago anticipado de tus cuotas.",
            total
        ))
    }

    async fn health_check(&self) -> bool {
        !self.failing
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
