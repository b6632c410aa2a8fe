pub mod services;

pub use services::{
    api_client::{ApiClient, ApiConfig, RequestError},
    auth::{AuthProvider, AuthState},
    hooks::ApiContext,
    query_cache::{QueryCache, QueryKey},
    router::{Navigator, Page, Resolution, resolve},
};
