use models::{Absence, NewAbsence, RecordId, StatutAbsence, UpdateAbsence};

use super::{
    ApiContext, QueryResult,
    planning::PlanningResource,
    resource::{ApiResource, ResourceHooks},
};
use crate::services::{api_client::RequestError, query_cache::QueryKey};

pub struct AbsencesResource;

impl ApiResource for AbsencesResource {
    type Record = Absence;
    type Create = NewAbsence;
    type Update = UpdateAbsence;

    const PATH: &'static str = "/api/employes/absences";

    fn related_keys() -> Vec<QueryKey> {
        // The planning page greys out shifts covered by an approved absence.
        vec![PlanningResource::list_key()]
    }
}

pub struct AbsencesHooks {
    inner: ResourceHooks<AbsencesResource>,
}

impl AbsencesHooks {
    pub fn new(ctx: &ApiContext) -> Self {
        Self {
            inner: ResourceHooks::new(ctx),
        }
    }

    pub fn key() -> QueryKey {
        AbsencesResource::list_key()
    }

    pub async fn list(&self) -> QueryResult<Vec<Absence>> {
        self.inner.list().await
    }

    /// Requests still waiting for a decision.
    pub async fn pending(&self) -> QueryResult<Vec<Absence>> {
        self.list().await.map(|absences| {
            absences
                .into_iter()
                .filter(|a| a.statut == StatutAbsence::EnAttente)
                .collect()
        })
    }

    pub async fn approve(&self, id: RecordId) -> Result<Absence, RequestError> {
        self.set_statut(id, StatutAbsence::Approuvee).await
    }

    pub async fn refuse(&self, id: RecordId) -> Result<Absence, RequestError> {
        self.set_statut(id, StatutAbsence::Refusee).await
    }

    async fn set_statut(&self, id: RecordId, statut: StatutAbsence) -> Result<Absence, RequestError> {
        self.inner
            .update_by_id(id, &UpdateAbsence::statut(statut))
            .await
    }
}

impl std::ops::Deref for AbsencesHooks {
    type Target = ResourceHooks<AbsencesResource>;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
