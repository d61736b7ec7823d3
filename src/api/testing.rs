//! In-memory API double for screen tests

use async_trait::async_trait;
use std::sync::Mutex;

use super::{ApiError, CategoryApi};
use crate::models::{Category, CategoryChanges, CategoryField, UploadFile};

/// How the double answers a mutating call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Success,
    Rejected,
    TransportError,
}

impl Outcome {
    fn into_result(self, operation: &str) -> Result<(), ApiError> {
        match self {
            Outcome::Success => Ok(()),
            Outcome::Rejected => Err(ApiError::Rejected(operation.to_string())),
            Outcome::TransportError => Err(ApiError::Status {
                status_code: 503,
                endpoint: operation.to_string(),
            }),
        }
    }
}

/// Calls recorded by the double
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    List,
    Create(Category),
    Update(String, CategoryChanges),
    Upload(String),
}

pub struct MockCategoryApi {
    pub categories: Mutex<Vec<Category>>,
    pub calls: Mutex<Vec<ApiCall>>,
    pub create_outcome: Mutex<Outcome>,
    pub update_outcome: Mutex<Outcome>,
    pub upload_outcome: Mutex<Outcome>,
    pub list_outcome: Mutex<Outcome>,
}

impl MockCategoryApi {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories: Mutex::new(categories),
            calls: Mutex::new(Vec::new()),
            create_outcome: Mutex::new(Outcome::Success),
            update_outcome: Mutex::new(Outcome::Success),
            upload_outcome: Mutex::new(Outcome::Success),
            list_outcome: Mutex::new(Outcome::Success),
        }
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_create_outcome(&self, outcome: Outcome) {
        *self.create_outcome.lock().unwrap() = outcome;
    }

    pub fn set_update_outcome(&self, outcome: Outcome) {
        *self.update_outcome.lock().unwrap() = outcome;
    }

    pub fn set_upload_outcome(&self, outcome: Outcome) {
        *self.upload_outcome.lock().unwrap() = outcome;
    }

    pub fn set_list_outcome(&self, outcome: Outcome) {
        *self.list_outcome.lock().unwrap() = outcome;
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl CategoryApi for MockCategoryApi {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.record(ApiCall::List);
        let outcome = *self.list_outcome.lock().unwrap();
        outcome.into_result("GET /api/categories")?;
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn create_category(&self, category: &Category) -> Result<(), ApiError> {
        self.record(ApiCall::Create(category.clone()));
        let outcome = *self.create_outcome.lock().unwrap();
        outcome.into_result("POST /api/categories")?;
        self.categories.lock().unwrap().push(category.clone());
        Ok(())
    }

    async fn update_category(&self, uid: &str, changes: &CategoryChanges) -> Result<(), ApiError> {
        self.record(ApiCall::Update(uid.to_string(), changes.clone()));
        let outcome = *self.update_outcome.lock().unwrap();
        outcome.into_result("PUT /api/categories")?;

        let mut categories = self.categories.lock().unwrap();
        if let Some(category) = categories.iter_mut().find(|c| c.uid == uid) {
            if let Some(value) = changes.get(CategoryField::RetailStoreType) {
                category.retail_store_type = value.to_string();
            }
            if let Some(value) = changes.get(CategoryField::StoreTypes) {
                category.store_types = value.to_string();
            }
            if let Some(value) = changes.get(CategoryField::Description) {
                category.description = value.to_string();
            }
        }
        Ok(())
    }

    async fn upload_spreadsheet(&self, file: UploadFile) -> Result<(), ApiError> {
        self.record(ApiCall::Upload(file.file_name.clone()));
        let outcome = *self.upload_outcome.lock().unwrap();
        outcome.into_result("POST /api/categories/upload")
    }
}
