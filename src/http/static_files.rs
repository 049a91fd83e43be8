//! Static file services for the front-end build.
//!
//! Two services are built from the same directory: one for fingerprinted
//! assets under the asset prefix, and one for everything else that falls back
//! to the index document so client-side routes resolve.

use tower_http::services::{ServeDir, ServeFile};

use crate::config::StaticFilesConfig;

/// Service for `<dir><asset_prefix>`, mounted under the asset prefix.
pub fn create_asset_service(config: &StaticFilesConfig) -> ServeDir {
    ServeDir::new(config.asset_dir())
}

/// Service for the whole build directory.
///
/// Serves a file when one matches the request path, otherwise the index
/// document regardless of the path.
pub fn create_app_service(config: &StaticFilesConfig) -> ServeDir<ServeFile> {
    ServeDir::new(&config.dir).fallback(ServeFile::new(config.index_path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn site() -> (tempfile::TempDir, StaticFilesConfig) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>app</html>").unwrap();
        std::fs::write(dir.path().join("robots.txt"), "User-agent: *").unwrap();
        std::fs::write(dir.path().join("assets/app.js"), "console.log(1)").unwrap();

        let config = StaticFilesConfig {
            dir: dir.path().to_string_lossy().into_owned(),
            ..StaticFilesConfig::default()
        };
        (dir, config)
    }

    macro_rules! body_string {
        ($response:expr) => {{
            let bytes = $response.into_body().collect().await.unwrap().to_bytes();
            String::from_utf8(bytes.to_vec()).unwrap()
        }};
    }

    #[tokio::test]
    async fn test_asset_service_serves_from_asset_dir() {
        let (_dir, config) = site();
        let response = create_asset_service(&config)
            .oneshot(Request::get("/app.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string!(response), "console.log(1)");
    }

    #[tokio::test]
    async fn test_app_service_prefers_existing_file() {
        let (_dir, config) = site();
        let response = create_app_service(&config)
            .oneshot(Request::get("/robots.txt").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_string!(response), "User-agent: *");
    }

    #[tokio::test]
    async fn test_app_service_falls_back_to_index() {
        let (_dir, config) = site();
        let response = create_app_service(&config)
            .oneshot(Request::get("/settings/profile").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string!(response), "<html>app</html>");
    }
}
