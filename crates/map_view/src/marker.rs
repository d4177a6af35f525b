use shared::domain::LatLng;

/// Identifies a marker within one update cycle. Keys from an earlier cycle never resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerKey {
    generation: u64,
    index: usize,
}

impl MarkerKey {
    pub(crate) fn new(generation: u64, index: usize) -> Self {
        Self { generation, index }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    key: MarkerKey,
    title: Option<String>,
    icon: &'static str,
    position: LatLng,
    popup: String,
}

impl Marker {
    pub fn new(
        key: MarkerKey,
        title: Option<String>,
        icon: &'static str,
        position: LatLng,
        popup: String,
    ) -> Self {
        Self {
            key,
            title,
            icon,
            position,
            popup,
        }
    }

    pub fn key(&self) -> MarkerKey {
        self.key
    }

    /// Tooltip label.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn icon(&self) -> &'static str {
        self.icon
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    /// HTML shown in the info window when the marker is clicked.
    pub fn popup(&self) -> &str {
        &self.popup
    }
}
