//! Application services and ports.

#![forbid(unsafe_code)]

mod access_service;
mod proxy_ports;
mod proxy_service;

pub use access_service::AccessService;
pub use proxy_ports::{
    ForwardedHeader, UpstreamBody, UpstreamGateway, UpstreamMethod, UpstreamPath,
    UpstreamRequest, UpstreamResponse,
};
pub use proxy_service::{ProxiedResponse, ProxyService};
