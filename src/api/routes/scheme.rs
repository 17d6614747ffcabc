use axum::extract::Query;
use axum::Json;
use serde::Deserialize;

use crate::api::ApiError;
use crate::scheme::{convert, Conversion};

#[derive(Debug, Deserialize)]
pub struct UrlSchemeParams {
    pub url: String,
}

pub async fn convert_url(
    Query(params): Query<UrlSchemeParams>,
) -> Result<Json<Conversion>, ApiError> {
    convert(&params.url)
        .map(Json)
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::*;
    use crate::config::AppConfig;
    use axum::http::StatusCode;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_convert_article_url() {
        let dir = TempDir::new().unwrap();
        let app = build_router(setup_state(dir.path(), AppConfig::default()));

        let (status, json) = get_json(
            app,
            "/api/url-scheme?url=https%3A%2F%2Fwww.jianshu.com%2Fp%2F088f7eed2ca3",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["kind"], "article");
        assert_eq!(json["scheme"], "jianshu://notes/088f7eed2ca3");
    }

    #[tokio::test]
    async fn test_convert_rejects_foreign_url() {
        let dir = TempDir::new().unwrap();
        let app = build_router(setup_state(dir.path(), AppConfig::default()));

        let (status, json) =
            get_json(app, "/api/url-scheme?url=https%3A%2F%2Fexample.com%2Fp%2Fabc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("not a Jianshu URL"));
    }
}
