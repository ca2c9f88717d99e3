//! The pre-built client bundle on disk.

use std::path::Path;

use axum::{body::Body, extract::Request, response::Response};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

pub const ENTRY_PAGE: &str = "index.html";

/// Files under the bundle root, with the entry page answering any path that
/// names no file there.
///
/// Request paths are percent-decoded before lookup; a decoded path that would
/// leave the root is treated as unknown.
#[derive(Debug, Clone)]
pub struct ClientBundle {
    files: ServeDir<ServeFile>,
}

impl ClientBundle {
    pub fn new(root: &Path) -> Self {
        // Directories are neither listed nor redirected; they get the entry
        // page like any other unknown path.
        let files = ServeDir::new(root)
            .append_index_html_on_directories(false)
            .fallback(ServeFile::new(root.join(ENTRY_PAGE)));
        Self { files }
    }

    pub async fn serve(&self, request: Request) -> Response {
        match self.files.clone().oneshot(request).await {
            Ok(response) => response.map(Body::new),
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Method, StatusCode};
    use tempfile::TempDir;

    const ENTRY: &str = "<html>entry</html>";

    /// `<tmp>/bundle` is the root; `<tmp>/secret.txt` sits just outside it.
    fn layout() -> (TempDir, ClientBundle) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("bundle");
        std::fs::create_dir_all(root.join("static/js")).unwrap();
        std::fs::write(root.join(ENTRY_PAGE), ENTRY).unwrap();
        std::fs::write(root.join("static/js/main.js"), "run()").unwrap();
        std::fs::write(root.join("my file.txt"), "asset-bytes").unwrap();
        std::fs::write(dir.path().join("secret.txt"), "secret").unwrap();
        let bundle = ClientBundle::new(&root);
        (dir, bundle)
    }

    async fn get(bundle: &ClientBundle, method: Method, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = bundle.serve(request).await;
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn existing_files_are_served() {
        let (_dir, bundle) = layout();
        assert_eq!(
            get(&bundle, Method::GET, "/static/js/main.js").await,
            (StatusCode::OK, "run()".to_owned())
        );
    }

    #[tokio::test]
    async fn encoded_names_are_decoded_before_lookup() {
        let (_dir, bundle) = layout();
        assert_eq!(
            get(&bundle, Method::GET, "/my%20file.txt").await,
            (StatusCode::OK, "asset-bytes".to_owned())
        );
    }

    #[tokio::test]
    async fn unknown_paths_and_directories_get_the_entry_page() {
        let (_dir, bundle) = layout();
        for uri in ["/", "/users/7/edit", "/static", "/static/js/", "/static/js/gone.js"] {
            assert_eq!(
                get(&bundle, Method::GET, uri).await,
                (StatusCode::OK, ENTRY.to_owned()),
                "uri {uri}"
            );
        }
    }

    #[tokio::test]
    async fn nothing_outside_the_root_is_reachable() {
        let (_dir, bundle) = layout();
        for uri in ["/../secret.txt", "/%2e%2e/secret.txt", "/static/%2E%2E/%2E%2E/secret.txt"] {
            let (status, body) = get(&bundle, Method::GET, uri).await;
            assert_eq!(status, StatusCode::OK, "uri {uri}");
            assert_eq!(body, ENTRY, "uri {uri}");
        }
    }

    #[tokio::test]
    async fn head_reports_the_file_length() {
        let (_dir, bundle) = layout();
        let request = Request::builder()
            .method(Method::HEAD)
            .uri("/my%20file.txt")
            .body(Body::empty())
            .unwrap();
        let response = bundle.serve(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "11");
    }
}
