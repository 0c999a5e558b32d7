//! Expanded-row tracking and sub-row rendering
//!
//! Expansion is keyed by [`RowId`], never by position, so a row stays
//! expanded while it moves between pages or drops out of (and back into)
//! the filtered set. Only removing the row from the source set clears it.

use std::collections::HashSet;

use stockroom_core::RowId;

/// Set of expanded row identities
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<RowId>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a row's membership; returns the new state
    pub fn toggle(&mut self, row_id: &RowId) -> bool {
        if self.expanded.remove(row_id) {
            false
        } else {
            self.expanded.insert(row_id.clone());
            true
        }
    }

    pub fn set_expanded(&mut self, row_id: &RowId, expanded: bool) {
        if expanded {
            self.expanded.insert(row_id.clone());
        } else {
            self.expanded.remove(row_id);
        }
    }

    pub fn is_expanded(&self, row_id: &RowId) -> bool {
        self.expanded.contains(row_id)
    }

    pub fn expand_all<'a>(&mut self, row_ids: impl IntoIterator<Item = &'a RowId>) {
        self.expanded.extend(row_ids.into_iter().cloned());
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Drop identities for which `keep` is false; returns how many were dropped
    pub fn retain(&mut self, mut keep: impl FnMut(&RowId) -> bool) -> usize {
        let before = self.expanded.len();
        self.expanded.retain(|id| keep(id));
        before - self.expanded.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RowId> {
        self.expanded.iter()
    }
}

/// Produces auxiliary content for an expanded row.
///
/// Called with the row and its visual index on the current page.
pub trait SubRowRenderer<T> {
    type Output;

    fn render(&self, row: &T, visual_index: usize) -> Self::Output;
}

impl<T, O, F> SubRowRenderer<T> for F
where
    F: Fn(&T, usize) -> O,
{
    type Output = O;

    fn render(&self, row: &T, visual_index: usize) -> O {
        self(row, visual_index)
    }
}

/// Sub-row outcome for one visible row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubRow<O> {
    /// No renderer was supplied; nothing is ever rendered
    NotConfigured,
    /// A renderer exists but the row is collapsed
    Collapsed,
    /// Rendered content spanning `col_span` visible columns
    Expanded { col_span: usize, content: O },
}

impl<O> SubRow<O> {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Expanded { .. })
    }

    pub fn content(&self) -> Option<&O> {
        match self {
            Self::Expanded { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn into_content(self) -> Option<O> {
        match self {
            Self::Expanded { content, .. } => Some(content),
            _ => None,
        }
    }
}
