mod error;
pub use error::{ApiError, ErrorKind};

mod handler;
pub use handler::ApiHandler;

mod adapter;
pub use adapter::AnalyzerApiAdapter;

#[cfg(feature = "http")]
mod cors;

#[cfg(feature = "http")]
pub use cors::cors_layer;

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpApi;

#[cfg(feature = "http")]
pub use axum;
