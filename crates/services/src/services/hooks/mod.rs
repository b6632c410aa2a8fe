//! Resource hooks: typed reads through the query cache and writes that
//! invalidate the cache keys they affect.
//!
//! Queries surface `{data, is_loading, error}` and mutations surface
//! `{mutate, is_pending, error}` regardless of the resource.

pub mod absences;
pub mod genealogy;
pub mod planning;
pub mod resource;

use std::{
    marker::PhantomData,
    sync::{Arc, Mutex, MutexGuard},
};

use models::RecordId;
use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

pub use self::{
    absences::AbsencesHooks,
    genealogy::GenealogyHook,
    planning::PlanningHooks,
    resource::{ApiResource, ResourceHooks},
};
use super::{
    api_client::{ApiClient, RequestError, read_json},
    query_cache::{FetchStatus, QueryCache, QueryKey},
};

/// The dependencies every hook is built from.
#[derive(Debug, Clone)]
pub struct ApiContext {
    client: ApiClient,
    cache: QueryCache,
}

impl ApiContext {
    pub fn new(client: ApiClient, cache: QueryCache) -> Self {
        Self { client, cache }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Reads `key` through the cache, loading it with `GET path` when absent
    /// or stale.
    pub async fn query<T: DeserializeOwned>(&self, key: &QueryKey, path: &str) -> QueryResult<T> {
        let client = self.client.clone();
        let path = path.to_string();
        let result = self
            .cache
            .fetch(key, || async move { client.get::<Value>(&path).await })
            .await;
        QueryResult::from_result(result.and_then(decode))
    }

    /// Current cached state of `key` without touching the network.
    pub fn peek<T: DeserializeOwned>(&self, key: &QueryKey) -> QueryResult<T> {
        let Some(entry) = self.cache.read(key) else {
            return QueryResult::idle();
        };

        let (data, decode_error) = match entry.payload.map(decode::<T>) {
            Some(Ok(data)) => (Some(data), None),
            Some(Err(e)) => (None, Some(e)),
            None => (None, None),
        };
        QueryResult {
            data,
            is_loading: entry.status == FetchStatus::Loading,
            error: decode_error.or(entry.error),
        }
    }

    pub fn mutation<P, R>(&self, descriptor: MutationDescriptor) -> Mutation<P, R> {
        Mutation {
            ctx: self.clone(),
            descriptor,
            state: Arc::new(Mutex::new(MutationState::default())),
            _marker: PhantomData,
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, RequestError> {
    serde_json::from_value(value).map_err(|e| RequestError::Serde(e.to_string()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<RequestError>,
}

impl<T> QueryResult<T> {
    pub fn idle() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }

    pub fn from_result(result: Result<T, RequestError>) -> Self {
        match result {
            Ok(data) => Self {
                data: Some(data),
                is_loading: false,
                error: None,
            },
            Err(error) => Self {
                data: None,
                is_loading: false,
                error: Some(error),
            },
        }
    }

    pub fn into_result(self) -> Result<Option<T>, RequestError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.data),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryResult<U> {
        QueryResult {
            data: self.data.map(f),
            is_loading: self.is_loading,
            error: self.error,
        }
    }
}

/// A write operation and the cache keys it invalidates on success.
#[derive(Debug, Clone)]
pub struct MutationDescriptor {
    pub endpoint: String,
    pub method: Method,
    pub invalidates: Vec<QueryKey>,
}

impl MutationDescriptor {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            invalidates: Vec::new(),
        }
    }

    pub fn invalidates(mut self, keys: impl IntoIterator<Item = QueryKey>) -> Self {
        self.invalidates.extend(keys);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationState {
    pub is_pending: bool,
    pub error: Option<RequestError>,
}

/// Executes a [`MutationDescriptor`] with payloads of type `P`, decoding
/// responses as `R`. Clones share pending/error state.
///
/// Declared keys are invalidated on any 2xx status, before the body is
/// decoded; a body that does not decode as `R` is still reported as an
/// error.
pub struct Mutation<P, R = Value> {
    ctx: ApiContext,
    descriptor: MutationDescriptor,
    state: Arc<Mutex<MutationState>>,
    _marker: PhantomData<fn(&P) -> R>,
}

impl<P, R> Clone for Mutation<P, R> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            descriptor: self.descriptor.clone(),
            state: self.state.clone(),
            _marker: PhantomData,
        }
    }
}

impl<P, R> std::fmt::Debug for Mutation<P, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mutation")
            .field("descriptor", &self.descriptor)
            .field("state", &self.state())
            .finish()
    }
}

impl<P, R> Mutation<P, R>
where
    P: Serialize,
    R: DeserializeOwned,
{
    /// Sends `payload` to the descriptor's endpoint.
    pub async fn mutate(&self, payload: &P) -> Result<R, RequestError> {
        let endpoint = self.descriptor.endpoint.clone();
        self.execute(&endpoint, Some(payload)).await
    }

    /// Sends to `{endpoint}/{id}`, with or without a body.
    pub async fn mutate_at(&self, id: RecordId, payload: Option<&P>) -> Result<R, RequestError> {
        let endpoint = format!("{}/{}", self.descriptor.endpoint.trim_end_matches('/'), id);
        self.execute(&endpoint, payload).await
    }

    async fn execute(&self, endpoint: &str, payload: Option<&P>) -> Result<R, RequestError> {
        {
            let mut state = self.lock_state();
            state.is_pending = true;
            state.error = None;
        }

        let response = self
            .ctx
            .client
            .send_raw(endpoint, self.descriptor.method.clone(), payload)
            .await;

        // Any 2xx: the write is applied even if the body does not decode.
        let result = match response {
            Ok(res) => {
                for key in &self.descriptor.invalidates {
                    self.ctx.cache.invalidate(key);
                }
                debug!(
                    method = %self.descriptor.method,
                    endpoint = endpoint,
                    invalidated = self.descriptor.invalidates.len(),
                    "mutation succeeded"
                );
                read_json::<R>(res).await.inspect_err(|e| {
                    warn!(
                        method = %self.descriptor.method,
                        endpoint = endpoint,
                        error = %e,
                        "mutation applied but response could not be decoded"
                    );
                })
            }
            Err(e) => {
                warn!(
                    method = %self.descriptor.method,
                    endpoint = endpoint,
                    error = %e,
                    "mutation failed"
                );
                Err(e)
            }
        };

        let mut state = self.lock_state();
        state.is_pending = false;
        state.error = result.as_ref().err().cloned();
        drop(state);

        result
    }
}

impl<P, R> Mutation<P, R> {
    pub fn descriptor(&self) -> &MutationDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> MutationState {
        self.lock_state().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.lock_state().is_pending
    }

    pub fn error(&self) -> Option<RequestError> {
        self.lock_state().error.clone()
    }

    pub fn reset(&self) {
        *self.lock_state() = MutationState::default();
    }

    fn lock_state(&self) -> MutexGuard<'_, MutationState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
