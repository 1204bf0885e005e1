//! Reference data options backing the select fields

use serde::{Deserialize, Serialize};

/// One selectable entry (province, municipality or hire status)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceOption {
    pub id: String,
    pub display_label: String,
}

impl ReferenceOption {
    pub fn new(id: impl Into<String>, display_label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_label: display_label.into(),
        }
    }
}

/// Reference lists fetched once per dialog opening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceList {
    Provinces,
    HireStatuses,
}

impl ReferenceList {
    pub const ALL: [ReferenceList; 2] = [ReferenceList::Provinces, ReferenceList::HireStatuses];

    pub fn label(self) -> &'static str {
        match self {
            Self::Provinces => "provinces",
            Self::HireStatuses => "hire statuses",
        }
    }
}

/// Load status of an option list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Options for one select field together with their load status
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionList {
    options: Vec<ReferenceOption>,
    status: LoadStatus,
}

impl OptionList {
    pub fn options(&self) -> &[ReferenceOption] {
        &self.options
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == LoadStatus::Ready
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Mark a fetch as started; current options stay until replaced
    pub fn begin_loading(&mut self) {
        self.status = LoadStatus::Loading;
    }

    pub fn fill(&mut self, options: Vec<ReferenceOption>) {
        self.options = options;
        self.status = LoadStatus::Ready;
    }

    /// Record a failed fetch; the list degrades to empty
    pub fn fail(&mut self) {
        self.options.clear();
        self.status = LoadStatus::Failed;
    }

    pub fn clear(&mut self) {
        self.options.clear();
        self.status = LoadStatus::Idle;
    }

    pub fn contains(&self, id: &str) -> bool {
        self.options.iter().any(|o| o.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.options.iter().position(|o| o.id == id)
    }

    pub fn label_of(&self, id: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.display_label.as_str())
    }

    /// Option `delta` steps away from `current`, wrapping around.
    /// With no current selection, moving forward picks the first entry and
    /// moving backward the last.
    pub fn step(&self, current: Option<&str>, delta: isize) -> Option<&ReferenceOption> {
        if self.options.is_empty() {
            return None;
        }
        let len = self.options.len() as isize;
        let next = match current.and_then(|id| self.position(id)) {
            Some(idx) => (idx as isize + delta).rem_euclid(len),
            None if delta >= 0 => 0,
            None => len - 1,
        };
        self.options.get(next as usize)
    }
}
