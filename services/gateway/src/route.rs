//! Request classification: API call or client bundle.
//!
//! Pure over the request line, so the routing rules can be checked without
//! sockets or a build directory. Which bundle file answers is up to
//! [`crate::assets::ClientBundle`].

use axum::http::Method;

pub const API_PREFIX: &str = "/api";

/// Where a request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Forward to the backend at `upstream_path` (prefix already removed).
    Api { upstream_path: String },
    /// Serve from the client bundle: a matching file, else the entry page.
    Bundle,
    /// Non-API path with a method the static side does not answer.
    MethodNotAllowed,
}

/// Remove the `/api` prefix on a segment boundary.
///
/// `/api` maps to `/`, `/api/users` to `/users`; `/apidocs` is not an API path.
pub fn strip_api_prefix(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(API_PREFIX)?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

pub fn classify(method: &Method, path: &str) -> Route {
    if let Some(rest) = strip_api_prefix(path) {
        return Route::Api {
            upstream_path: rest.to_owned(),
        };
    }

    if method == Method::GET || method == Method::HEAD {
        Route::Bundle
    } else {
        Route::MethodNotAllowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/api", "/")]
    #[case("/api/", "/")]
    #[case("/api/users", "/users")]
    #[case("/api/users/7", "/users/7")]
    #[case("/api/api/users", "/api/users")]
    fn api_paths_lose_their_prefix(#[case] path: &str, #[case] upstream: &str) {
        for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
            assert_eq!(
                classify(&method, path),
                Route::Api {
                    upstream_path: upstream.to_owned()
                }
            );
        }
    }

    #[rstest]
    #[case("/apidocs")]
    #[case("/apis/users")]
    #[case("/v1/api/users")]
    fn prefix_must_end_on_a_segment(#[case] path: &str) {
        assert_eq!(strip_api_prefix(path), None);
        assert_eq!(classify(&Method::GET, path), Route::Bundle);
    }

    #[rstest]
    #[case("/")]
    #[case("/favicon.ico")]
    #[case("/static/js/main.3f1a.js")]
    #[case("/users/7/edit")]
    #[case("/my%20file.txt")]
    fn reads_go_to_the_bundle(#[case] path: &str) {
        assert_eq!(classify(&Method::GET, path), Route::Bundle);
        assert_eq!(classify(&Method::HEAD, path), Route::Bundle);
    }

    #[test]
    fn writes_outside_the_api_are_refused() {
        assert_eq!(classify(&Method::POST, "/users"), Route::MethodNotAllowed);
        assert_eq!(
            classify(&Method::DELETE, "/favicon.ico"),
            Route::MethodNotAllowed
        );
    }
}
