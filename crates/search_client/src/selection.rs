use shared::{domain::DocumentId, protocol::Notification};

use crate::bus::NotificationBus;

/// Insertion-ordered set of selected document ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<DocumentId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the id was already selected.
    pub fn add(&mut self, id: DocumentId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn remove(&mut self, id: &DocumentId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|selected| selected != id);
        before != self.ids.len()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn first(&self) -> Option<&DocumentId> {
        self.ids.first()
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentId> {
        self.ids.iter()
    }
}

pub trait SelectionService {
    fn selection_set(&self) -> &SelectionSet;
}

/// Selection service that announces every change on the bus.
pub struct InMemorySelectionService {
    selection: SelectionSet,
    single_selection: bool,
    bus: NotificationBus,
}

impl InMemorySelectionService {
    pub fn new(bus: NotificationBus) -> Self {
        Self {
            selection: SelectionSet::new(),
            single_selection: false,
            bus,
        }
    }

    pub fn with_single_selection(mut self, single_selection: bool) -> Self {
        self.single_selection = single_selection;
        self
    }

    /// Makes `id` the only selected document.
    pub fn select(&mut self, id: impl Into<DocumentId>) {
        self.selection.clear();
        self.selection.add(id.into());
        self.notify();
    }

    pub fn add(&mut self, id: impl Into<DocumentId>) {
        if self.single_selection {
            self.selection.clear();
        }
        self.selection.add(id.into());
        self.notify();
    }

    pub fn remove(&mut self, id: &DocumentId) {
        if self.selection.remove(id) {
            self.notify();
        }
    }

    pub fn clear(&mut self) {
        self.selection.clear();
        self.notify();
    }

    fn notify(&self) {
        self.bus.publish(Notification::SelectionSetUpdate);
    }
}

impl SelectionService for InMemorySelectionService {
    fn selection_set(&self) -> &SelectionSet {
        &self.selection
    }
}
