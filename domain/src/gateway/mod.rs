//! Clients for services the relay talks to.

pub mod slack;

/// Builds the HTTP client shared by all outbound calls.
pub fn build_http_client() -> Result<reqwest::Client, crate::error::Error> {
    Ok(reqwest::Client::builder()
        .use_rustls_tls()
        .user_agent(concat!("booking-relay/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
