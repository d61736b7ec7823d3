//! Category REST API client
//!
//! The [`CategoryApi`] trait is the seam between the screens and the backend.
//! [`HttpCategoryApi`] implements it with reqwest; tests substitute an
//! in-memory double.

pub mod client;
pub mod errors;

#[cfg(test)]
pub mod testing;

pub use client::{read_upload_file, CategoriesEndpoint, HttpCategoryApi};
pub use errors::ApiError;

use async_trait::async_trait;

use crate::models::{Category, CategoryChanges, UploadFile};

/// Operations offered by the category backend
#[async_trait]
pub trait CategoryApi: Send + Sync {
    /// `GET /api/categories`
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;

    /// `POST /api/categories`
    async fn create_category(&self, category: &Category) -> Result<(), ApiError>;

    /// `PUT /api/categories/{uid}`
    async fn update_category(&self, uid: &str, changes: &CategoryChanges) -> Result<(), ApiError>;

    /// `POST /api/categories/upload`
    async fn upload_spreadsheet(&self, file: UploadFile) -> Result<(), ApiError>;
}
