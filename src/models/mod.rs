//! Resource types
//!
//! Each type validates the fields the API rejects outright and carries any
//! other attribute through untouched in its `extra` map.

mod bgp_auth_profile;
mod dns_proxy;
mod ike_crypto_profile;
mod ipsec_tunnel;
mod qos_profile;
mod security_zone;
mod tunnel_interface;
mod zone_protection_profile;

pub use bgp_auth_profile::BgpAuthProfile;
pub use dns_proxy::{DnsProxy, DnsProxyCache, DnsProxyDefault, MaxTtl};
pub use ike_crypto_profile::{IkeCryptoProfile, IkeLifetime};
pub use ipsec_tunnel::{AutoKey, IpsecTunnel, NamedRef};
pub use qos_profile::{AggregateBandwidth, QosProfile};
pub use security_zone::{SecurityZone, ZoneNetwork};
pub use tunnel_interface::{IpEntry, TunnelInterface};
pub use zone_protection_profile::ZoneProtectionProfile;
