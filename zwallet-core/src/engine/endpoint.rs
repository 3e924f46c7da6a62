//! Backing service endpoints

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A `host:port` connection string for the service an engine talks to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl FromStr for Endpoint {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| EngineError::InvalidEndpoint(format!("{}: {:?}", reason, s));

        let (host, port) = s.rsplit_once(':').ok_or_else(|| invalid("expected host:port"))?;

        // IPv6 literals are bracketed: [::1]:9067
        let host = match host.strip_prefix('[') {
            Some(inner) => inner
                .strip_suffix(']')
                .filter(|inner| inner.contains(':'))
                .ok_or_else(|| invalid("malformed IPv6 host"))?,
            None if host.contains(':') => return Err(invalid("IPv6 hosts must be bracketed")),
            None => host,
        };

        if host.is_empty() || host.chars().any(char::is_whitespace) {
            return Err(invalid("malformed host"));
        }

        let port = port.parse::<u16>().map_err(|_| invalid("malformed port"))?;

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_endpoints() {
        let endpoint: Endpoint = "127.0.0.1:0".parse().unwrap();
        assert_eq!(endpoint.host(), "127.0.0.1");
        assert_eq!(endpoint.port(), 0);

        let endpoint: Endpoint = "lightwalletd.example.com:9067".parse().unwrap();
        assert_eq!(endpoint.host(), "lightwalletd.example.com");
        assert_eq!(endpoint.port(), 9067);

        let endpoint: Endpoint = "[::1]:18232".parse().unwrap();
        assert_eq!(endpoint.host(), "::1");
        assert_eq!(endpoint.to_string(), "[::1]:18232");
    }

    #[test]
    fn test_reject_malformed_endpoints() {
        for input in [
            "",
            "localhost",
            ":9067",
            "localhost:",
            "localhost:65536",
            "localhost:port",
            "::1:9067",
            "[]:9067",
            "[::1:9067",
            "bad host:1",
        ] {
            assert!(
                matches!(input.parse::<Endpoint>(), Err(EngineError::InvalidEndpoint(_))),
                "accepted {:?}",
                input
            );
        }
    }
}
