#![deny(
    missing_copy_implementations,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts
)]

pub mod domain;
pub mod infrastructure;

pub use domain::errors::ParseError;
pub use infrastructure::config::{ParseErrorPolicy, ServerConfig};
pub use infrastructure::server_impl::parser::parse_http;
pub use infrastructure::server_impl::request::{Headers, Request};
pub use infrastructure::server_impl::response::{Response, StatusCode};
pub use infrastructure::server_impl::server::Server;

pub type AnyResult<T> = eyre::Result<T>;
