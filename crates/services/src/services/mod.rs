pub mod api_client;
pub mod auth;
pub mod forms;
pub mod hooks;
pub mod query_cache;
pub mod router;
