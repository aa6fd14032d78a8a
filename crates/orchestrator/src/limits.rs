//! Usage quota collaborator.

use async_trait::async_trait;

/// Reports a user's usage limits for the `#limits` command.
#[async_trait]
pub trait UsageLimits: Send + Sync {
    /// Human-readable limits for `identity`. May be empty.
    async fn describe(&self, identity: &str) -> String;
}

/// No quotas are tracked; always reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUsageLimits;

#[async_trait]
impl UsageLimits for NoUsageLimits {
    async fn describe(&self, _identity: &str) -> String {
        String::new()
    }
}
