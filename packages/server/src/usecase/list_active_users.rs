//! UseCase: active-user listing for the HTTP API.

use std::sync::Arc;

use crate::domain::{Identity, IdentityRegistry};

/// Read-only roster lookup
pub struct ListActiveUsersUseCase {
    registry: Arc<dyn IdentityRegistry>,
}

impl ListActiveUsersUseCase {
    pub fn new(registry: Arc<dyn IdentityRegistry>) -> Self {
        Self { registry }
    }

    /// One entry per distinct active identity, in id order
    pub async fn execute(&self) -> Vec<Identity> {
        self.registry.list_active().await
    }
}
