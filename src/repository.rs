// Payment repository: the only component that touches the stored blobs.
//
// Every mutation is a full read-modify-write of the `payment_dues` list.
// Fine for a personal list with a single writer; not a scalable design.

use crate::payment::{total_due, PaymentDue, PaymentFields};
use crate::store::KeyValueStore;
use crate::theme::ThemeMode;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;

pub const STORAGE_KEY: &str = "payment_dues";
pub const THEME_KEY: &str = "theme_mode";

const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Error)]
pub enum DueError {
    #[error("Payment due not found: {0}")]
    NotFound(String),

    #[error("Invalid payment due: {0}")]
    Invalid(String),

    #[error("Failed to read from storage")]
    StorageRead(#[source] anyhow::Error),

    #[error("Failed to write to storage")]
    StorageWrite(#[source] anyhow::Error),
}

pub type DueResult<T> = std::result::Result<T, DueError>;

/// CRUD over payment dues plus the theme flag
///
/// Cloning is cheap and shares the underlying store.
#[derive(Clone)]
pub struct PaymentRepository {
    store: Arc<dyn KeyValueStore>,
}

impl PaymentRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All stored dues in insertion order
    ///
    /// Read failures and unparsable content yield an empty list.
    pub fn list(&self) -> Vec<PaymentDue> {
        match self.store.get(STORAGE_KEY) {
            Ok(raw) => parse_dues(raw),
            Err(e) => {
                tracing::error!(error = %e, "Error loading payment dues");
                Vec::new()
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<PaymentDue> {
        self.list().into_iter().find(|due| due.id == id)
    }

    pub fn total_due(&self) -> f64 {
        total_due(&self.list())
    }

    pub fn create(&self, fields: PaymentFields) -> DueResult<PaymentDue> {
        fields.validate().map_err(DueError::Invalid)?;

        let mut dues = self.read_dues()?;

        let mut id = generate_id();
        while dues.iter().any(|due| due.id == id) {
            id = generate_id();
        }

        let new_due = PaymentDue {
            id,
            title: fields.title,
            amount: fields.amount,
            due_date: fields.due_date,
            category: fields.category,
            created_at: Utc::now(),
        };

        dues.push(new_due.clone());
        self.write_dues(&dues)?;

        tracing::info!(id = %new_due.id, amount = new_due.amount, "payment due created");
        Ok(new_due)
    }

    /// Replace every field except `id` and `created_at`
    pub fn update(&self, id: &str, fields: PaymentFields) -> DueResult<PaymentDue> {
        fields.validate().map_err(DueError::Invalid)?;

        let mut dues = self.read_dues()?;
        let index = dues
            .iter()
            .position(|due| due.id == id)
            .ok_or_else(|| DueError::NotFound(id.to_string()))?;

        let updated = PaymentDue {
            id: id.to_string(),
            title: fields.title,
            amount: fields.amount,
            due_date: fields.due_date,
            category: fields.category,
            created_at: dues[index].created_at,
        };

        dues[index] = updated.clone();
        self.write_dues(&dues)?;

        tracing::info!(id = %id, "payment due updated");
        Ok(updated)
    }

    /// Remove the due with `id`; a missing id is not an error
    pub fn remove(&self, id: &str) -> DueResult<()> {
        let dues = self.read_dues()?;
        let before = dues.len();

        let remaining: Vec<PaymentDue> = dues.into_iter().filter(|due| due.id != id).collect();
        tracing::debug!(id = %id, before, after = remaining.len(), "removing payment due");

        self.write_dues(&remaining)
    }

    /// Stored theme, `Light` when unset, unknown or unreadable
    pub fn theme_mode(&self) -> ThemeMode {
        match self.store.get(THEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Unknown theme mode stored, using light");
                ThemeMode::Light
            }),
            Ok(None) => ThemeMode::Light,
            Err(e) => {
                tracing::warn!(error = %e, "Error loading theme mode");
                ThemeMode::Light
            }
        }
    }

    pub fn set_theme_mode(&self, mode: ThemeMode) -> DueResult<()> {
        self.store
            .set(THEME_KEY, mode.as_str())
            .map_err(DueError::StorageWrite)
    }

    /// Current list for a mutation; an unreadable store is an error so the
    /// following write cannot clobber records it never saw
    fn read_dues(&self) -> DueResult<Vec<PaymentDue>> {
        let raw = self.store.get(STORAGE_KEY).map_err(|e| {
            tracing::error!(error = %e, "Error loading payment dues for update");
            DueError::StorageRead(e)
        })?;
        Ok(parse_dues(raw))
    }

    fn write_dues(&self, dues: &[PaymentDue]) -> DueResult<()> {
        let json = serde_json::to_string(dues)
            .map_err(|e| DueError::StorageWrite(anyhow::Error::new(e)))?;

        self.store.set(STORAGE_KEY, &json).map_err(|e| {
            tracing::error!(error = %e, "Error saving payment dues");
            DueError::StorageWrite(e)
        })
    }
}

/// Absent key -> empty; unparsable content is logged and treated as empty
fn parse_dues(raw: Option<String>) -> Vec<PaymentDue> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<PaymentDue>>(&raw) {
        Ok(dues) => dues,
        Err(e) => {
            tracing::error!(error = %e, "Stored payment dues are not valid JSON");
            Vec::new()
        }
    }
}

/// Random base-36 token (128 bits of v4 randomness)
fn generate_id() -> String {
    let mut n = uuid::Uuid::new_v4().as_u128();
    let mut digits = Vec::with_capacity(25);

    loop {
        digits.push(ID_ALPHABET[(n % 36) as usize] as char);
        n /= 36;
        if n == 0 {
            break;
        }
    }

    digits.iter().rev().collect()
}
