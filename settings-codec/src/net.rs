//! Network address, CIDR network, and URL codecs.

use std::net::IpAddr;

use ipnet::IpNet;
use url::Url;

use crate::{Codec, CodecError, CodecResult, SettingValue};

/// IPv4 or IPv6 address literal.
#[derive(Debug, Default, Clone, Copy)]
pub struct IpAddress;

impl Codec for IpAddress {
    type Value = IpAddr;

    fn type_name(&self) -> &'static str {
        "IP address"
    }

    fn parse(&self, input: &str) -> CodecResult<IpAddr> {
        input
            .parse()
            .map_err(|err| CodecError::decode(input, "IP address", err))
    }

    fn format(&self, value: &IpAddr) -> String {
        value.to_string()
    }
}

impl SettingValue for IpAddr {
    type Codec = IpAddress;
}

/// CIDR network such as `10.0.0.0/8`. Host bits are masked off on parse.
#[derive(Debug, Default, Clone, Copy)]
pub struct IpNetwork;

impl Codec for IpNetwork {
    type Value = IpNet;

    fn type_name(&self) -> &'static str {
        "CIDR network"
    }

    fn parse(&self, input: &str) -> CodecResult<IpNet> {
        input
            .parse::<IpNet>()
            .map(|net| net.trunc())
            .map_err(|err| CodecError::decode(input, "CIDR network", err))
    }

    fn format(&self, value: &IpNet) -> String {
        value.to_string()
    }
}

impl SettingValue for IpNet {
    type Codec = IpNetwork;
}

/// Absolute URL.
#[derive(Debug, Default, Clone, Copy)]
pub struct UrlCodec;

impl Codec for UrlCodec {
    type Value = Url;

    fn type_name(&self) -> &'static str {
        "URL"
    }

    fn parse(&self, input: &str) -> CodecResult<Url> {
        Url::parse(input).map_err(|err| CodecError::decode(input, "URL", err))
    }

    fn format(&self, value: &Url) -> String {
        value.as_str().to_owned()
    }
}

impl SettingValue for Url {
    type Codec = UrlCodec;
}
