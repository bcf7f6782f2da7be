use std::net::SocketAddr;

/// Runtime configuration, assembled from CLI flags and environment in the
/// server binary.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub database_url: String,
}
