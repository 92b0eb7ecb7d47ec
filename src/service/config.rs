use std::net::SocketAddr;

const DEFAULT_ENDPOINT: &str = "[::1]:8080";
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_SERVICE_NAME: &str = "deploytrack";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub endpoint: SocketAddr,
    pub service_name: String,
}

impl ServiceConfig {
    /// Reads the process environment, after any `.env` file has been loaded.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let endpoint = lookup("ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned());
        let endpoint: SocketAddr = endpoint
            .parse()
            .map_err(|err| anyhow::anyhow!("ENDPOINT {endpoint} is not a socket address: {err}"))?;

        let database_max_connections: u32 = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value.parse().map_err(|err| {
                anyhow::anyhow!("DATABASE_MAX_CONNECTIONS {value} is not a number: {err}")
            })?,
            None => DEFAULT_DATABASE_MAX_CONNECTIONS,
        };

        let service_name =
            lookup("SERVICE_NAME").unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_owned());

        Ok(Self {
            database_url,
            database_max_connections,
            endpoint,
            service_name,
        })
    }
}
