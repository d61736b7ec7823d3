//! reqwest implementation of the category API

use async_trait::async_trait;
use reqwest::{multipart, Client, Response, Url};
use std::path::Path;
use tracing::{debug, warn};

use super::{ApiError, CategoryApi};
use crate::config::ApiConfig;
use crate::models::{ApiStatus, Category, CategoryChanges, SpreadsheetKind, UploadFile};

/// Category API endpoints and constants
pub struct CategoriesEndpoint;

impl CategoriesEndpoint {
    /// Collection path segments
    pub const COLLECTION: [&'static str; 2] = ["api", "categories"];
    /// Bulk import segment, appended to the collection
    pub const UPLOAD: &'static str = "upload";
    /// Multipart field carrying the spreadsheet
    pub const UPLOAD_FIELD: &'static str = "file";
}

/// HTTP client bound to one backend
#[derive(Debug, Clone)]
pub struct HttpCategoryApi {
    client: Client,
    base_url: Url,
}

impl HttpCategoryApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let client = Client::builder().user_agent(&config.user_agent).build()?;

        Ok(Self { client, base_url })
    }

    /// Build an endpoint URL below `/api/categories`, encoding each segment.
    /// Empty and dot segments are refused: URL normalisation would drop
    /// them, silently addressing the collection instead.
    fn endpoint(&self, extra: &[&str]) -> Result<Url, ApiError> {
        if let Some(segment) = extra
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(ApiError::UnaddressableSegment(segment.to_string()));
        }

        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            path.extend(CategoriesEndpoint::COLLECTION);
            path.extend(extra);
        }
        Ok(url)
    }

    /// Interpret a `{ success: bool }` response
    async fn read_status(response: Response, operation: &str) -> Result<(), ApiError> {
        let status = response.status();
        if !status.is_success() {
            warn!("{} returned status {}", operation, status);
            return Err(ApiError::Status {
                status_code: status.as_u16(),
                endpoint: operation.to_string(),
            });
        }

        let body: ApiStatus = response.json().await?;
        if body.success {
            Ok(())
        } else {
            Err(ApiError::Rejected(operation.to_string()))
        }
    }
}

#[async_trait]
impl CategoryApi for HttpCategoryApi {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = self.endpoint(&[])?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status_code: status.as_u16(),
                endpoint: "GET /api/categories".to_string(),
            });
        }

        Ok(response.json().await?)
    }

    async fn create_category(&self, category: &Category) -> Result<(), ApiError> {
        let url = self.endpoint(&[])?;
        debug!("POST {} uid={}", url, category.uid);

        let response = self.client.post(url).json(category).send().await?;
        Self::read_status(response, "POST /api/categories").await
    }

    async fn update_category(&self, uid: &str, changes: &CategoryChanges) -> Result<(), ApiError> {
        let url = self.endpoint(&[uid])?;
        debug!("PUT {} ({} field(s))", url, changes.len());

        let response = self.client.put(url).json(changes).send().await?;
        Self::read_status(response, &format!("PUT /api/categories/{}", uid)).await
    }

    async fn upload_spreadsheet(&self, file: UploadFile) -> Result<(), ApiError> {
        let url = self.endpoint(&[CategoriesEndpoint::UPLOAD])?;
        debug!("POST {} file={} ({} bytes)", url, file.file_name, file.bytes.len());

        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)?;
        let form = multipart::Form::new().part(CategoriesEndpoint::UPLOAD_FIELD, part);

        let response = self.client.post(url).multipart(form).send().await?;
        Self::read_status(response, "POST /api/categories/upload").await
    }
}

/// Read a spreadsheet from disk into an upload payload
pub async fn read_upload_file(path: &Path) -> Result<UploadFile, ApiError> {
    let kind = SpreadsheetKind::from_path(path)
        .ok_or_else(|| ApiError::UnsupportedFile(path.display().to_string()))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ApiError::UnsupportedFile(path.display().to_string()))?;

    let bytes = tokio::fs::read(path).await?;

    Ok(UploadFile {
        file_name,
        content_type: kind.content_type().to_string(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryField;
    use axum::{
        extract::{Multipart, Path as UrlPath, State},
        http::StatusCode,
        routing::{get, post, put},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Requests seen by the test backend
    #[derive(Debug, Clone, PartialEq)]
    enum Received {
        Create(Category),
        Update(String, Value),
        Upload {
            field: String,
            file_name: String,
            content_type: String,
            size: usize,
        },
    }

    #[derive(Clone, Default)]
    struct Backend {
        received: Arc<Mutex<Vec<Received>>>,
    }

    async fn list(State(_): State<Backend>) -> Json<Vec<Category>> {
        Json(vec![
            Category::new("C1", "Grocery", "Chain", "Test"),
            Category::new("C2", "Pharmacy", "Independent", "Other"),
        ])
    }

    async fn create(State(backend): State<Backend>, Json(category): Json<Category>) -> Json<Value> {
        let success = category.uid != "DUP";
        backend.received.lock().unwrap().push(Received::Create(category));
        Json(json!({ "success": success }))
    }

    async fn update(
        State(backend): State<Backend>,
        UrlPath(uid): UrlPath<String>,
        Json(body): Json<Value>,
    ) -> Result<Json<Value>, StatusCode> {
        if uid == "BROKEN" {
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
        backend.received.lock().unwrap().push(Received::Update(uid, body));
        Ok(Json(json!({ "success": true })))
    }

    async fn upload(State(backend): State<Backend>, mut multipart: Multipart) -> Json<Value> {
        while let Some(field) = multipart.next_field().await.unwrap_or(None) {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let size = field.bytes().await.map(|b| b.len()).unwrap_or(0);
            backend.received.lock().unwrap().push(Received::Upload {
                field: name,
                file_name,
                content_type,
                size,
            });
        }
        Json(json!({ "success": true }))
    }

    async fn spawn_backend() -> (HttpCategoryApi, Backend) {
        let backend = Backend::default();
        let app = Router::new()
            .route("/api/categories", get(list).post(create))
            .route("/api/categories/upload", post(upload))
            .route("/api/categories/:uid", put(update))
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = ApiConfig {
            base_url: format!("http://{}", addr),
            ..ApiConfig::default()
        };
        (HttpCategoryApi::new(&config).unwrap(), backend)
    }

    #[test]
    fn test_endpoint_encodes_uid_segment() {
        let api = HttpCategoryApi::new(&ApiConfig::default()).unwrap();
        assert_eq!(
            api.endpoint(&[]).unwrap().as_str(),
            "http://localhost:5000/api/categories"
        );
        assert_eq!(
            api.endpoint(&["A/B C"]).unwrap().as_str(),
            "http://localhost:5000/api/categories/A%2FB%20C"
        );
    }

    #[test]
    fn test_endpoint_refuses_dot_and_empty_uids() {
        let api = HttpCategoryApi::new(&ApiConfig::default()).unwrap();
        for uid in [".", "..", ""] {
            let err = api.endpoint(&[uid]).unwrap_err();
            assert!(matches!(err, ApiError::UnaddressableSegment(ref s) if s == uid));
            assert!(!err.is_rejection());
        }
        // dots inside a uid are ordinary characters
        assert_eq!(
            api.endpoint(&["..A"]).unwrap().as_str(),
            "http://localhost:5000/api/categories/..A"
        );
    }

    #[tokio::test]
    async fn test_update_of_dot_uid_never_reaches_collection() {
        let (api, backend) = spawn_backend().await;

        for uid in [".", ".."] {
            let err = api
                .update_category(uid, &CategoryChanges::new())
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::UnaddressableSegment(_)));
        }
        assert!(backend.received.lock().unwrap().is_empty());
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let config = ApiConfig {
            base_url: "http://localhost:5000/backend/".to_string(),
            ..ApiConfig::default()
        };
        let api = HttpCategoryApi::new(&config).unwrap();
        assert_eq!(
            api.endpoint(&[CategoriesEndpoint::UPLOAD]).unwrap().as_str(),
            "http://localhost:5000/backend/api/categories/upload"
        );
    }

    #[tokio::test]
    async fn test_list_categories_preserves_order() {
        let (api, _) = spawn_backend().await;
        let categories = api.list_categories().await.unwrap();
        let uids: Vec<_> = categories.iter().map(|c| c.uid.as_str()).collect();
        assert_eq!(uids, vec!["C1", "C2"]);
    }

    #[tokio::test]
    async fn test_create_category_success_and_rejection() {
        let (api, backend) = spawn_backend().await;

        let category = Category::new("C1", "Grocery", "Chain", "Test");
        api.create_category(&category).await.unwrap();

        let err = api
            .create_category(&Category::new("DUP", "Grocery", "Chain", "Test"))
            .await
            .unwrap_err();
        assert!(err.is_rejection());

        let received = backend.received.lock().unwrap().clone();
        assert_eq!(received[0], Received::Create(category));
    }

    #[tokio::test]
    async fn test_update_sends_only_changed_fields() {
        let (api, backend) = spawn_backend().await;

        let changes = CategoryChanges::new().with(CategoryField::Description, "Updated");
        api.update_category("C1", &changes).await.unwrap();

        let received = backend.received.lock().unwrap().clone();
        assert_eq!(
            received,
            vec![Received::Update("C1".to_string(), json!({ "description": "Updated" }))]
        );
    }

    #[tokio::test]
    async fn test_server_error_status_is_not_a_rejection() {
        let (api, _) = spawn_backend().await;

        let err = api
            .update_category("BROKEN", &CategoryChanges::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status_code: 500, .. }));
        assert!(!err.is_rejection());
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_file_field() {
        let (api, backend) = spawn_backend().await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stores.xlsx");
        std::fs::write(&path, b"PK\x03\x04fake").unwrap();

        let file = read_upload_file(&path).await.unwrap();
        api.upload_spreadsheet(file).await.unwrap();

        let received = backend.received.lock().unwrap().clone();
        assert_eq!(
            received,
            vec![Received::Upload {
                field: "file".to_string(),
                file_name: "stores.xlsx".to_string(),
                content_type: SpreadsheetKind::Xlsx.content_type().to_string(),
                size: 8,
            }]
        );
    }

    #[tokio::test]
    async fn test_read_upload_file_rejects_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stores.csv");
        std::fs::write(&path, b"uid,description").unwrap();

        let err = read_upload_file(&path).await.unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedFile(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ApiConfig {
            base_url: format!("http://{}", addr),
            ..ApiConfig::default()
        };
        let api = HttpCategoryApi::new(&config).unwrap();

        let err = api.list_categories().await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }
}
