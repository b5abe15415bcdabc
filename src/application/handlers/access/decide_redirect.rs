//! DecideRedirectHandler - Command handler choosing between chat and payment.

use std::sync::Arc;

use tracing::info;

use super::resolve_access::{ResolveAccessHandler, ResolveAccessQuery};
use crate::domain::access::{merge_user_id, RedirectDecision};

/// Command to decide where an identifier should be sent.
#[derive(Debug, Clone)]
pub struct DecideRedirectCommand {
    pub lookup_id: String,
    /// Returned verbatim when access is granted.
    pub chat_url: String,
    /// Base for the payment redirect; may be absolute, relative or blank.
    pub payment_base_url: String,
}

/// Handler building a [`RedirectDecision`].
pub struct DecideRedirectHandler {
    resolver: Arc<ResolveAccessHandler>,
}

impl DecideRedirectHandler {
    pub fn new(resolver: Arc<ResolveAccessHandler>) -> Self {
        Self { resolver }
    }

    pub async fn handle(&self, cmd: DecideRedirectCommand) -> RedirectDecision {
        let ticket = self
            .resolver
            .handle(ResolveAccessQuery::new(cmd.lookup_id))
            .await;

        if ticket.has_chat_access {
            return RedirectDecision {
                destination: cmd.chat_url,
                ticket,
            };
        }

        let destination = merge_user_id(&cmd.payment_base_url, ticket.payment_user_id());
        info!(
            lookup_id = %ticket.lookup_id,
            reason = %ticket.reason,
            destination = %destination,
            "Routing to payment page"
        );

        RedirectDecision { destination, ticket }
    }
}
