use chrono::NaiveDate;
use models::{NewPlanning, Planning, RecordId, UpdatePlanning};

use super::{
    ApiContext, QueryResult,
    resource::{ApiResource, ResourceHooks},
};
use crate::services::query_cache::QueryKey;

pub struct PlanningResource;

impl ApiResource for PlanningResource {
    type Record = Planning;
    type Create = NewPlanning;
    type Update = UpdatePlanning;

    const PATH: &'static str = "/api/employes/planning";
}

/// Staff schedule: the shared CRUD hooks plus the views the planning page
/// filters out of the list.
pub struct PlanningHooks {
    inner: ResourceHooks<PlanningResource>,
}

impl PlanningHooks {
    pub fn new(ctx: &ApiContext) -> Self {
        Self {
            inner: ResourceHooks::new(ctx),
        }
    }

    pub fn key() -> QueryKey {
        PlanningResource::list_key()
    }

    pub async fn list(&self) -> QueryResult<Vec<Planning>> {
        self.inner.list().await
    }

    pub async fn for_employe(&self, employe_id: RecordId) -> QueryResult<Vec<Planning>> {
        self.list()
            .await
            .map(|shifts| shifts.into_iter().filter(|p| p.employe_id == employe_id).collect())
    }

    pub async fn for_date(&self, date: NaiveDate) -> QueryResult<Vec<Planning>> {
        self.list()
            .await
            .map(|shifts| shifts.into_iter().filter(|p| p.date == date).collect())
    }
}

impl std::ops::Deref for PlanningHooks {
    type Target = ResourceHooks<PlanningResource>;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
