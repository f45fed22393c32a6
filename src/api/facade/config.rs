use crate::client::Credentials;
use crate::error::{ReaderError, ReaderResult};

/// Port used when the endpoint string does not carry one.
pub const DEFAULT_PORT: u16 = 3322;

/// Host and port of the store, parsed from `[scheme://]host[:port]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// Parses an endpoint string.
    ///
    /// Any `scheme://` prefix is dropped and the port defaults to
    /// [`DEFAULT_PORT`]. IPv6 hosts must be bracketed (`[::1]:3322`).
    ///
    /// # Examples
    ///
    /// ```
    /// use immudb_explorer::facade::Endpoint;
    ///
    /// let endpoint = Endpoint::parse("grpc://db.internal:3323").unwrap();
    /// assert_eq!(endpoint.host, "db.internal");
    /// assert_eq!(endpoint.port, 3323);
    ///
    /// let endpoint = Endpoint::parse("localhost").unwrap();
    /// assert_eq!(endpoint.port, 3322);
    /// ```
    pub fn parse(raw: &str) -> ReaderResult<Self> {
        let invalid = |reason| ReaderError::InvalidEndpoint {
            endpoint: raw.to_string(),
            reason,
        };

        let trimmed = raw.trim();
        let authority = match trimmed.split_once("://") {
            Some((_, rest)) => rest,
            None => trimmed,
        };
        let authority = authority.trim_end_matches('/');

        let (host, port) = match authority.strip_prefix('[') {
            Some(bracketed) => {
                let (host, rest) = bracketed
                    .split_once(']')
                    .ok_or_else(|| invalid("unterminated '[' in host"))?;
                let port = match rest {
                    "" => None,
                    _ => Some(
                        rest.strip_prefix(':')
                            .ok_or_else(|| invalid("unexpected text after ']'"))?,
                    ),
                };
                (host, port)
            }
            None => match authority.split_once(':') {
                Some((_, port)) if port.contains(':') => {
                    return Err(invalid("IPv6 hosts must be enclosed in '[' and ']'"));
                }
                Some((host, port)) => (host, Some(port)),
                None => (authority, None),
            },
        };
        let port = match port {
            Some(port) => port
                .parse::<u16>()
                .map_err(|_| invalid("port is not a number between 0 and 65535"))?,
            None => DEFAULT_PORT,
        };

        if host.is_empty() {
            return Err(invalid("host is empty"));
        }

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    /// `host:port` form handed to clients and used in diagnostics.
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Connection parameters for [`ImmuDbReader`](super::ImmuDbReader).
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Endpoint string, `[scheme://]host[:port]`
    pub endpoint: String,
    /// Database selected after login
    pub database: String,
    /// Login credentials (default: `immudb` / `immudb`)
    pub credentials: Credentials,
    /// Maximum number of entries per scan call (0 = unbounded)
    pub scan_limit: usize,
}

impl ReaderConfig {
    pub fn new(endpoint: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            database: database.into(),
            credentials: Credentials::default(),
            scan_limit: 0,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_scan_limit(mut self, limit: usize) -> Self {
        self.scan_limit = limit;
        self
    }

    pub fn parsed_endpoint(&self) -> ReaderResult<Endpoint> {
        Endpoint::parse(&self.endpoint)
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self::new("localhost:3322", "defaultdb")
    }
}
