//! Remote monster-generation boundary

use std::future::Future;

use crate::core::error::Result;
use crate::monster::catalog::Archetype;
use crate::monster::generation::{GeneratedMonster, GenerationRequest};
use crate::service::client::ServiceClient;

/// Something that can invent a monster for an archetype
pub trait MonsterService {
    fn generate(&self, archetype: Archetype) -> impl Future<Output = Result<GeneratedMonster>> + Send;
}

impl MonsterService for ServiceClient {
    async fn generate(&self, archetype: Archetype) -> Result<GeneratedMonster> {
        let request = GenerationRequest {
            monster_type: archetype,
        };
        tracing::debug!(url = %self.generation_url(), archetype = %archetype, "Requesting generated monster");
        self.post_json(self.generation_url(), &request).await
    }
}
