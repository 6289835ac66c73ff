//! Allow-listed CORS handling.
//!
//! Only origins on the configured list receive CORS headers; every other
//! origin gets none and the browser blocks the cross-origin read. `OPTIONS`
//! preflights are answered here with an empty 200 and never reach a route.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS, PUT, DELETE";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization, Cache-Control, Pragma";

/// The set of origins allowed to make cross-origin requests.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: Arc<[HeaderValue]>,
}

impl CorsPolicy {
    /// Build a policy from origin strings. Entries that are not valid header
    /// values are skipped with a warning.
    pub fn new<S: AsRef<str>>(origins: &[S]) -> Self {
        let allowed_origins = origins
            .iter()
            .filter_map(|origin| {
                let origin = origin.as_ref();
                match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin: {:?}", origin);
                        None
                    }
                }
            })
            .collect();
        Self { allowed_origins }
    }

    pub fn allows(&self, origin: &HeaderValue) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }
}

pub async fn cors_middleware(
    State(policy): State<CorsPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .filter(|origin| policy.allows(origin))
        .cloned();

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
    if let Some(origin) = origin {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_matches_exact_origins() {
        let policy = CorsPolicy::new(&["https://art.example.com", "http://localhost:3000"]);
        assert!(policy.allows(&HeaderValue::from_static("https://art.example.com")));
        assert!(policy.allows(&HeaderValue::from_static("http://localhost:3000")));
        assert!(!policy.allows(&HeaderValue::from_static("https://art.example.com/")));
        assert!(!policy.allows(&HeaderValue::from_static("http://localhost:3001")));
    }

    #[test]
    fn test_policy_skips_invalid_origins() {
        let policy = CorsPolicy::new(&["bad\norigin", "https://ok.example"]);
        assert_eq!(policy.allowed_origins.len(), 1);
    }

    #[test]
    fn test_empty_policy_allows_nothing() {
        let policy = CorsPolicy::new::<&str>(&[]);
        assert!(!policy.allows(&HeaderValue::from_static("http://localhost:3000")));
    }
}
