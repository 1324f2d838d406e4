//! Trust validation seam.
//!
//! Fetched content is submitted to the validator before any local state is
//! touched. Rejection is terminal for that update: re-fetching the same
//! content yields the same verdict, so the dispatcher never retries.

use async_trait::async_trait;
use lsr_types::Name;

/// Verdict on a fetched piece of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accept,
    Reject(String),
}

impl ValidationOutcome {
    pub fn is_accept(&self) -> bool {
        matches!(self, ValidationOutcome::Accept)
    }
}

/// Opaque accept/reject capability consulted before applying remote updates.
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, name: &Name, content: &[u8]) -> ValidationOutcome;
}

/// Validator that accepts everything.
///
/// Default wiring for single-trust-domain deployments; a real trust engine
/// is injected in its place where cryptographic validation is required.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAllValidator;

#[async_trait]
impl Validator for AcceptAllValidator {
    async fn validate(&self, _name: &Name, _content: &[u8]) -> ValidationOutcome {
        ValidationOutcome::Accept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_accept_all() {
        let validator = AcceptAllValidator;
        let name: Name = "/ndn/site/router1/lsa".parse().unwrap();
        assert!(validator.validate(&name, b"payload").await.is_accept());
    }
}
