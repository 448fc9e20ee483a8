use std::sync::Arc;

use rolegate_application::{PermissionGate, TokenVerifier};

use crate::content_store::ContentStore;

/// Shared content service state.
#[derive(Clone)]
pub struct ContentState {
    pub store: ContentStore,
    pub gate: PermissionGate,
    pub token_verifier: Arc<dyn TokenVerifier>,
    pub application: String,
}
