//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod reqwest_upstream_gateway;

pub use reqwest_upstream_gateway::ReqwestUpstreamGateway;
