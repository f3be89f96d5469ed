//! Network boundary implementations
//!
//! Wi-Fi link management, the Open-Meteo forecast client, and the SNTP
//! client, all over the shared embassy-net stack.

pub mod forecast;
pub mod ntp;
pub mod wifi;

pub use forecast::OpenMeteo;
pub use ntp::SntpClient;
pub use wifi::WifiLink;

use embassy_net::dns::DnsQueryType;
use embassy_net::{IpAddress, Stack};
use meteoron_core::traits::NetworkError;

/// Resolve a host name to its first A record
pub(crate) async fn resolve(stack: Stack<'static>, host: &str) -> Result<IpAddress, NetworkError> {
    let addresses = stack
        .dns_query(host, DnsQueryType::A)
        .await
        .map_err(|_| NetworkError::Dns)?;
    addresses.first().copied().ok_or(NetworkError::Dns)
}
