use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};

use crate::DEFAULT_TIMEOUT;

/// Configuration for the UDP tracker transport.
#[serde_as]
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Udp {
    /// Maximum time in seconds for a whole request: the connect handshake
    /// plus the exchange.
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "Udp::default_timeout")]
    pub timeout: Duration,

    /// Local IP for the sockets used to talk to IPv4 trackers. Every
    /// request binds its own socket to a random free port on this IP.
    #[serde(default = "Udp::default_bind_ip")]
    pub bind_ip: IpAddr,

    /// Local IP for the sockets used to talk to IPv6 trackers.
    #[serde(default = "Udp::default_bind_ip_v6")]
    pub bind_ip_v6: IpAddr,
}

impl Default for Udp {
    fn default() -> Self {
        Self {
            timeout: Self::default_timeout(),
            bind_ip: Self::default_bind_ip(),
            bind_ip_v6: Self::default_bind_ip_v6(),
        }
    }
}

impl Udp {
    fn default_timeout() -> Duration {
        DEFAULT_TIMEOUT
    }

    fn default_bind_ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    }

    fn default_bind_ip_v6() -> IpAddr {
        IpAddr::V6(Ipv6Addr::UNSPECIFIED)
    }

    /// The local address to bind for a tracker on the given remote address.
    /// The port is always `0`, so concurrent requests never share one.
    #[must_use]
    pub fn bind_address_for(&self, remote: &SocketAddr) -> SocketAddr {
        let ip = if remote.is_ipv6() { self.bind_ip_v6 } else { self.bind_ip };

        SocketAddr::new(ip, 0)
    }
}
