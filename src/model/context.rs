//! Request context.

use serde::{Deserialize, Serialize};

/// The tenant/user pair a call runs on behalf of.
///
/// Every engine entry point takes the context explicitly; there is no
/// ambient current-tenant state. The tenant is the isolation boundary for
/// definitions, records, and audit rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub tenant_id: String,
    pub user_id: String,
}

impl RequestContext {
    pub fn new(tenant_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            user_id: user_id.into(),
        }
    }
}
