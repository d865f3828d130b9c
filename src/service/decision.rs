//! Remote opponent-decision boundary

use std::future::Future;

use crate::battle::ai::llm_gateway::{DecisionRequest, DecisionResponse};
use crate::core::error::Result;
use crate::service::client::ServiceClient;

/// Something that can pick the opponent's move remotely
pub trait DecisionService {
    fn request_decision(
        &self,
        request: &DecisionRequest,
    ) -> impl Future<Output = Result<DecisionResponse>> + Send;
}

impl DecisionService for ServiceClient {
    async fn request_decision(&self, request: &DecisionRequest) -> Result<DecisionResponse> {
        tracing::debug!(url = %self.decision_url(), turn = request.turn_number, "Requesting remote decision");
        self.post_json(self.decision_url(), request).await
    }
}
