//! Client-side adapters for talking to a running payment API.

mod http_status_client;

pub use http_status_client::HttpPaymentStatusClient;
