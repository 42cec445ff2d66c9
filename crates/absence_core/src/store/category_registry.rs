//! Editable absence category vocabulary.
//!
//! # Responsibility
//! - Own the ordered label list and the currently selected label.
//! - Persist labels and selection after every mutation.
//!
//! # Invariants
//! - Labels are unique by exact, case-sensitive string match.
//! - After `load`, `add` and `remove`, a non-empty list always has a selected
//!   member and an empty list has no selection.
//! - Removing a label never touches absence records that reference it.

use crate::model::category::{default_categories, is_valid_label};
use crate::persist::{PersistError, PersistencePort, CATEGORIES_KEY, SELECTED_CATEGORY_KEY};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Category registry errors.
#[derive(Debug)]
pub enum RegistryError {
    /// Persisted labels or selection could not be decoded.
    InvalidData(String),
    /// In-memory change applied, but the write-through failed.
    Persistence(PersistError),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidData(message) => write!(f, "invalid persisted category data: {message}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidData(_) => None,
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<PersistError> for RegistryError {
    fn from(value: PersistError) -> Self {
        Self::Persistence(value)
    }
}

/// Ordered category labels plus the default used for new records.
pub struct CategoryRegistry<P: PersistencePort> {
    port: P,
    labels: Vec<String>,
    selected: Option<String>,
}

impl<P: PersistencePort> CategoryRegistry<P> {
    /// Creates a registry seeded with the built-in vocabulary, first label
    /// selected. Nothing is read from or written to `port`.
    pub fn with_defaults(port: P) -> Self {
        let labels = default_categories();
        let selected = labels.first().cloned();
        Self {
            port,
            labels,
            selected,
        }
    }

    /// Loads labels and selection from `port`.
    ///
    /// Missing labels fall back to the built-in vocabulary. A missing or
    /// stale selection is repaired to the first label.
    pub fn load(port: P) -> RegistryResult<Self> {
        let labels = match port.get(CATEGORIES_KEY)? {
            Some(blob) => decode_labels(&blob)?,
            None => default_categories(),
        };
        let persisted_selection = match port.get(SELECTED_CATEGORY_KEY)? {
            Some(blob) => serde_json::from_str::<Option<String>>(&blob)
                .map_err(|err| RegistryError::InvalidData(format!("selection blob: {err}")))?,
            None => None,
        };

        let selected = persisted_selection
            .filter(|label| labels.contains(label))
            .or_else(|| labels.first().cloned());

        info!(
            "event=categories_load module=registry status=ok count={} has_selection={}",
            labels.len(),
            selected.is_some()
        );
        Ok(Self {
            port,
            labels,
            selected,
        })
    }

    /// Appends `label` and makes it the selection.
    ///
    /// Returns `Ok(false)` with no change when `label` is empty or already
    /// present.
    pub fn add(&mut self, label: impl Into<String>) -> RegistryResult<bool> {
        let label = label.into();
        if !is_valid_label(&label) || self.contains(&label) {
            info!(
                "event=category_add module=registry status=rejected count={}",
                self.labels.len()
            );
            return Ok(false);
        }

        self.labels.push(label.clone());
        self.selected = Some(label);
        info!(
            "event=category_add module=registry status=ok count={}",
            self.labels.len()
        );
        self.persist("category_add")?;
        Ok(true)
    }

    /// Removes `label` when present, repairing the selection if it pointed
    /// at the removed label.
    pub fn remove(&mut self, label: &str) -> RegistryResult<()> {
        let before = self.labels.len();
        self.labels.retain(|existing| existing != label);
        let removed = before != self.labels.len();

        if self.selected.as_deref() == Some(label) {
            self.selected = self.labels.first().cloned();
        }
        if self.labels.is_empty() {
            self.selected = None;
        }

        info!(
            "event=category_remove module=registry status=ok removed={removed} count={}",
            self.labels.len()
        );
        self.persist("category_remove")
    }

    /// Sets the selection without checking membership.
    pub fn select(&mut self, label: impl Into<String>) -> RegistryResult<()> {
        self.selected = Some(label.into());
        self.persist("category_select")
    }

    pub fn list(&self) -> &[String] {
        &self.labels
    }

    pub fn current(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|existing| existing == label)
    }

    /// Writes labels, then selection, to the port.
    ///
    /// The two keys are written separately. If the selection write fails
    /// after the labels landed, `load` repairs the stale selection to the
    /// first stored label.
    pub fn save(&self) -> RegistryResult<()> {
        let labels = serde_json::to_string(&self.labels).map_err(PersistError::from)?;
        let selected = serde_json::to_string(&self.selected).map_err(PersistError::from)?;
        self.port.set(CATEGORIES_KEY, &labels)?;
        self.port.set(SELECTED_CATEGORY_KEY, &selected)?;
        Ok(())
    }

    fn persist(&self, event: &str) -> RegistryResult<()> {
        self.save().inspect_err(|err| {
            error!(
                "event={event} module=registry status=persist_failed count={} error={err}",
                self.labels.len()
            );
        })
    }
}

fn decode_labels(blob: &str) -> RegistryResult<Vec<String>> {
    let raw: Vec<String> = serde_json::from_str(blob)
        .map_err(|err| RegistryError::InvalidData(format!("labels blob: {err}")))?;

    let mut labels: Vec<String> = Vec::with_capacity(raw.len());
    for label in raw {
        if is_valid_label(&label) && !labels.contains(&label) {
            labels.push(label);
        }
    }
    Ok(labels)
}
