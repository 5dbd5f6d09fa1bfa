//! Server settings, optionally overridden from the environment.

use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;

use eyre::{bail, WrapErr};
use strum::{Display, EnumString};

use crate::AnyResult;

pub const LISTEN_ADDR_VAR: &str = "PLAINTEXT_LISTEN_ADDR";
pub const READ_BUFFER_SIZE_VAR: &str = "PLAINTEXT_READ_BUFFER_SIZE";
pub const ON_PARSE_ERROR_VAR: &str = "PLAINTEXT_ON_PARSE_ERROR";

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4096;

/// What a connection gets back when its request does not parse.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ParseErrorPolicy {
    /// Reply `400 Bad Request` before closing.
    #[default]
    BadRequest,
    /// Close without writing anything.
    Drop,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    /// Upper bound of the single read done per connection. Anything the
    /// client sends past it is never looked at.
    pub read_buffer_size: usize,
    pub on_parse_error: ParseErrorPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            on_parse_error: ParseErrorPolicy::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> AnyResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from defaults, replacing every value `lookup` has a
    /// setting for.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AnyResult<Self> {
        let mut config = Self::default();

        if let Some(addr) = lookup(LISTEN_ADDR_VAR) {
            config.listen_addr = SocketAddr::from_str(addr.trim())
                .wrap_err_with(|| format!("{LISTEN_ADDR_VAR}={addr:?} is not a socket address"))?;
        }

        if let Some(size) = lookup(READ_BUFFER_SIZE_VAR) {
            config.read_buffer_size = usize::from_str(size.trim())
                .wrap_err_with(|| format!("{READ_BUFFER_SIZE_VAR}={size:?} is not a size"))?;
        }

        if let Some(policy) = lookup(ON_PARSE_ERROR_VAR) {
            config.on_parse_error = ParseErrorPolicy::from_str(policy.trim()).wrap_err_with(|| {
                format!("{ON_PARSE_ERROR_VAR}={policy:?} must be `bad-request` or `drop`")
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AnyResult<()> {
        if self.read_buffer_size == 0 {
            bail!("read buffer size must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn success_defaults_without_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.read_buffer_size, 4096);
        assert_eq!(config.on_parse_error, ParseErrorPolicy::BadRequest);
    }

    #[test]
    fn success_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            (LISTEN_ADDR_VAR, "127.0.0.1:9000"),
            (READ_BUFFER_SIZE_VAR, " 1024 "),
            (ON_PARSE_ERROR_VAR, "drop"),
        ]))
        .unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.read_buffer_size, 1024);
        assert_eq!(config.on_parse_error, ParseErrorPolicy::Drop);
    }

    #[test]
    fn success_policy_names() {
        assert_eq!(ParseErrorPolicy::BadRequest.to_string(), "bad-request");
        assert_eq!(
            ParseErrorPolicy::from_str("bad-request").unwrap(),
            ParseErrorPolicy::BadRequest
        );
    }

    #[test]
    fn failure_invalid_values() {
        assert!(ServerConfig::from_lookup(lookup_from(&[(LISTEN_ADDR_VAR, "localhost")])).is_err());
        assert!(ServerConfig::from_lookup(lookup_from(&[(READ_BUFFER_SIZE_VAR, "-1")])).is_err());
        assert!(ServerConfig::from_lookup(lookup_from(&[(READ_BUFFER_SIZE_VAR, "0")])).is_err());
        assert!(ServerConfig::from_lookup(lookup_from(&[(ON_PARSE_ERROR_VAR, "ignore")])).is_err());
    }
}
