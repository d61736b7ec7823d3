use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::Path;

use crate::validation::{check_all, FieldRule};

/// Maximum length of a category uid
pub const UID_MAX_CHARS: usize = 10;

/// A category record as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Category {
    pub uid: String,
    pub retail_store_type: String,
    pub store_types: String,
    pub description: String,
}

impl Category {
    pub fn new(uid: &str, retail_store_type: &str, store_types: &str, description: &str) -> Self {
        Self {
            uid: uid.to_string(),
            retail_store_type: retail_store_type.to_string(),
            store_types: store_types.to_string(),
            description: description.to_string(),
        }
    }

    pub fn get(&self, field: CategoryField) -> &str {
        match field {
            CategoryField::Uid => &self.uid,
            CategoryField::RetailStoreType => &self.retail_store_type,
            CategoryField::StoreTypes => &self.store_types,
            CategoryField::Description => &self.description,
        }
    }

    /// Validate every field; returns the failing fields with their messages
    pub fn validate(&self) -> Result<(), Vec<(CategoryField, String)>> {
        let errors: Vec<_> = CategoryField::ALL
            .iter()
            .filter_map(|field| {
                check_all(&field.rules(), self.get(*field))
                    .err()
                    .map(|message| (*field, message))
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Category field names
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryField {
    Uid,
    RetailStoreType,
    StoreTypes,
    Description,
}

impl CategoryField {
    pub const ALL: [CategoryField; 4] = [
        CategoryField::Uid,
        CategoryField::RetailStoreType,
        CategoryField::StoreTypes,
        CategoryField::Description,
    ];

    /// Fields that may change after creation
    pub const MUTABLE: [CategoryField; 3] = [
        CategoryField::RetailStoreType,
        CategoryField::StoreTypes,
        CategoryField::Description,
    ];

    /// Wire name used in JSON bodies
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryField::Uid => "uid",
            CategoryField::RetailStoreType => "retail_store_type",
            CategoryField::StoreTypes => "store_types",
            CategoryField::Description => "description",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryField::Uid => "UID",
            CategoryField::RetailStoreType => "Retail Store Type",
            CategoryField::StoreTypes => "Store Types",
            CategoryField::Description => "Description",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            CategoryField::Uid => "Enter UID",
            CategoryField::RetailStoreType => "Enter Retail Store Type",
            CategoryField::StoreTypes => "Enter Store Types",
            CategoryField::Description => "Enter Description",
        }
    }

    pub fn is_mutable(&self) -> bool {
        !matches!(self, CategoryField::Uid)
    }

    pub fn rules(&self) -> Vec<FieldRule> {
        match self {
            CategoryField::Uid => vec![
                FieldRule::required("UID is required"),
                FieldRule::max_chars(UID_MAX_CHARS, "UID must be at most 10 characters"),
            ],
            CategoryField::RetailStoreType => {
                vec![FieldRule::required("Retail store type is required")]
            }
            CategoryField::StoreTypes => vec![FieldRule::required("Store types are required")],
            CategoryField::Description => vec![FieldRule::required("Description is required")],
        }
    }
}

/// Partial update of a category's mutable fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryChanges {
    changes: BTreeMap<CategoryField, String>,
}

impl CategoryChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new value; the uid is ignored because it never changes
    pub fn set(&mut self, field: CategoryField, value: String) {
        if field.is_mutable() {
            self.changes.insert(field, value);
        }
    }

    pub fn with(mut self, field: CategoryField, value: &str) -> Self {
        self.set(field, value.to_string());
        self
    }

    pub fn get(&self, field: CategoryField) -> Option<&str> {
        self.changes.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }
}

impl Serialize for CategoryChanges {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.changes.len()))?;
        for (field, value) in &self.changes {
            map.serialize_entry(field.as_str(), value)?;
        }
        map.end()
    }
}

/// `{ "success": bool }` body returned by mutating endpoints
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiStatus {
    #[serde(default)]
    pub success: bool,
}

/// Spreadsheet formats accepted by the bulk import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetKind {
    Xlsx,
    Xls,
}

impl SpreadsheetKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "xlsx" => Some(SpreadsheetKind::Xlsx),
            "xls" => Some(SpreadsheetKind::Xls),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            SpreadsheetKind::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            SpreadsheetKind::Xls => "application/vnd.ms-excel",
        }
    }
}

/// Opaque file payload for the bulk import endpoint
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
