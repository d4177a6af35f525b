use serde::{Deserialize, Serialize};

macro_rules! string_id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id_newtype!(DocumentId);

/// Entity type reported by the search index for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    CorporateBody,
    Government,
    Organization,
    Person,
    Other,
}

impl Category {
    /// Missing and unrecognized types collapse to [`Category::Other`].
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("corporateBody") => Self::CorporateBody,
            Some("government") => Self::Government,
            Some("organization") => Self::Organization,
            Some("person") => Self::Person,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Rectangle accumulated from points; starts empty.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLngBounds {
    corners: Option<(LatLng, LatLng)>,
}

impl LatLngBounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_point(point: LatLng) -> Self {
        let mut bounds = Self::new();
        bounds.extend(point);
        bounds
    }

    pub fn extend(&mut self, point: LatLng) {
        self.corners = Some(match self.corners {
            None => (point, point),
            Some((south_west, north_east)) => (
                LatLng::new(south_west.lat.min(point.lat), south_west.lng.min(point.lng)),
                LatLng::new(north_east.lat.max(point.lat), north_east.lng.max(point.lng)),
            ),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.corners.is_none()
    }

    pub fn south_west(&self) -> Option<LatLng> {
        self.corners.map(|(south_west, _)| south_west)
    }

    pub fn north_east(&self) -> Option<LatLng> {
        self.corners.map(|(_, north_east)| north_east)
    }

    pub fn center(&self) -> Option<LatLng> {
        self.corners.map(|(south_west, north_east)| {
            LatLng::new(
                (south_west.lat + north_east.lat) / 2.0,
                (south_west.lng + north_east.lng) / 2.0,
            )
        })
    }

    pub fn contains(&self, point: LatLng) -> bool {
        match self.corners {
            None => false,
            Some((south_west, north_east)) => {
                (south_west.lat..=north_east.lat).contains(&point.lat)
                    && (south_west.lng..=north_east.lng).contains(&point.lng)
            }
        }
    }
}
