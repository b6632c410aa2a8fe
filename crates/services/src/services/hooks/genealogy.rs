use models::{Genealogy, RecordId};

use super::{ApiContext, QueryResult};
use crate::{query_key, services::query_cache::QueryKey};

/// Family tree lookup for one animal.
#[derive(Debug, Clone)]
pub struct GenealogyHook {
    ctx: ApiContext,
}

impl GenealogyHook {
    pub fn new(ctx: &ApiContext) -> Self {
        Self { ctx: ctx.clone() }
    }

    pub fn key(lapin_id: RecordId) -> QueryKey {
        query_key!["lapin", lapin_id, "genealogy"]
    }

    pub fn path(lapin_id: RecordId) -> String {
        format!("/api/lapins/{lapin_id}/genealogy")
    }

    pub async fn fetch(&self, lapin_id: RecordId) -> QueryResult<Genealogy> {
        self.ctx
            .query(&Self::key(lapin_id), &Self::path(lapin_id))
            .await
    }

    pub fn cached(&self, lapin_id: RecordId) -> QueryResult<Genealogy> {
        self.ctx.peek(&Self::key(lapin_id))
    }
}
