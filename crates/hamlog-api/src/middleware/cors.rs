//! CORS policy built from configuration

use hamlog_core::config::ApiConfig;
use http::{HeaderName, HeaderValue, Method, header, request::Parts};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::handlers::qsos::TOTAL_COUNT_HEADER;

/// Build the CORS layer for the configured origins
///
/// `X-Total-Count` and `Location` are exposed so browser clients can read
/// pagination totals and the address of created records.
#[must_use]
pub fn cors_layer(api: &ApiConfig) -> CorsLayer {
    let allow_origin = if api.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins = api.cors_origins.clone();
        AllowOrigin::predicate(move |origin: &HeaderValue, _parts: &Parts| {
            origin
                .to_str()
                .is_ok_and(|origin| is_origin_allowed(origin, &origins))
        })
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([HeaderName::from_static(TOTAL_COUNT_HEADER), header::LOCATION])
}

/// Check if the given origin is allowed by the CORS policy
///
/// Entries match exactly, `*` matches everything and `*.example.com`
/// matches any subdomain of `example.com`.
fn is_origin_allowed(origin: &str, allowed_origins: &[String]) -> bool {
    allowed_origins.iter().any(|allowed| {
        if allowed == "*" || allowed == origin {
            return true;
        }
        allowed
            .strip_prefix('*')
            .filter(|suffix| suffix.starts_with('.'))
            .is_some_and(|suffix| origin.ends_with(suffix))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn origins(list: &[&str]) -> Vec<String> {
        list.iter().map(|o| (*o).to_string()).collect()
    }

    #[rstest]
    #[case("https://log.example.com", &["*"], true)]
    #[case("http://localhost:3000", &["http://localhost:3000"], true)]
    #[case("http://localhost:3001", &["http://localhost:3000"], false)]
    #[case("https://app.example.com", &["*.example.com"], true)]
    #[case("https://deep.app.example.com", &["*.example.com"], true)]
    #[case("https://evilexample.com", &["*.example.com"], false)]
    #[case("https://example.org", &["*.example.com", "https://example.org"], true)]
    #[case("null", &[], false)]
    fn test_is_origin_allowed(#[case] origin: &str, #[case] allowed: &[&str], #[case] expected: bool) {
        assert_eq!(is_origin_allowed(origin, &origins(allowed)), expected);
    }
}
