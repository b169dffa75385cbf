//! Floor-plan marker overlay for active sink rolls
//!
//! Maps each location to an anchor point on the floor-plan image and lays
//! out one marker per active roll. Rolls sharing a location are spread to the
//! right of the anchor so their markers don't cover each other. Drawing the
//! image and the markers is left to the caller.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::model::Location;

/// Horizontal distance between markers at the same location, in image pixels.
pub const DEFAULT_STRIDE: f64 = 65.0;

/// Anchor points on the floor-plan image (origin bottom-left).
static ANCHORS: Lazy<Vec<(Location, (f64, f64))>> = Lazy::new(|| {
    vec![
        (Location::EmLinha, (75.0, 670.0)),
        (Location::OficinaOcp, (250.0, 630.0)),
        (Location::Usinagem, (250.0, 225.0)),
        (Location::Revestimento, (250.0, 78.0)),
    ]
});

/// Something to place on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayEntry {
    pub code: String,
    pub location: Location,
    /// Label/value pairs shown in the tooltip, in order
    pub attributes: Vec<(String, String)>,
}

/// One marker to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotMarker {
    pub x: f64,
    pub y: f64,
    pub label: String,
    pub tooltip: String,
}

/// Anchor table plus marker spacing.
#[derive(Debug, Clone)]
pub struct Overlay {
    anchors: HashMap<Location, (f64, f64)>,
    stride: f64,
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new(DEFAULT_STRIDE)
    }
}

impl Overlay {
    /// Overlay with the standard floor-plan anchors.
    #[must_use]
    pub fn new(stride: f64) -> Self {
        Self {
            anchors: ANCHORS.iter().cloned().collect(),
            stride,
        }
    }

    /// Anchor for `location`, if the floor plan shows it.
    #[must_use]
    pub fn anchor(&self, location: &Location) -> Option<(f64, f64)> {
        self.anchors.get(location).copied()
    }

    /// Lay out markers for `entries` in order.
    ///
    /// The n-th entry at a location (counting from zero) lands at
    /// `anchor.x + n * stride`. Entries at locations without an anchor are
    /// skipped.
    pub fn plot<'a>(&self, entries: impl IntoIterator<Item = &'a OverlayEntry>) -> Vec<PlotMarker> {
        let mut placed: HashMap<&Location, usize> = HashMap::new();
        let mut markers = Vec::new();

        for entry in entries {
            let Some((x, y)) = self.anchor(&entry.location) else {
                log::debug!(
                    "No floor-plan anchor for '{}', skipping {}",
                    entry.location,
                    entry.code
                );
                continue;
            };
            let count = placed.entry(&entry.location).or_insert(0);
            let offset = self.stride * *count as f64;
            *count += 1;

            markers.push(PlotMarker {
                x: x + offset,
                y,
                label: entry.code.clone(),
                tooltip: tooltip(entry),
            });
        }

        markers
    }
}

fn tooltip(entry: &OverlayEntry) -> String {
    entry
        .attributes
        .iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str, location: Location) -> OverlayEntry {
        OverlayEntry {
            code: code.to_string(),
            location,
            attributes: vec![("Código".to_string(), code.to_string())],
        }
    }

    #[test]
    fn test_same_location_markers_are_strided() {
        let entries = vec![
            entry("SR01", Location::EmLinha),
            entry("SR02", Location::Usinagem),
            entry("SR03", Location::EmLinha),
        ];
        let markers = Overlay::default().plot(&entries);

        assert_eq!(markers.len(), 3);
        assert_eq!((markers[0].x, markers[0].y), (75.0, 670.0));
        assert_eq!((markers[1].x, markers[1].y), (250.0, 225.0));
        assert_eq!((markers[2].x, markers[2].y), (140.0, 670.0));
        assert_eq!(markers[2].label, "SR03");
        assert_eq!(markers[2].tooltip, "Código: SR03");
    }

    #[test]
    fn test_unmapped_locations_are_skipped() {
        let entries = vec![
            entry("SR01", Location::Baia),
            entry("SR02", Location::Other("Pátio".to_string())),
        ];
        assert!(Overlay::default().plot(&entries).is_empty());
    }

    #[test]
    fn test_custom_stride() {
        let entries = vec![
            entry("SR01", Location::Revestimento),
            entry("SR02", Location::Revestimento),
        ];
        let markers = Overlay::new(10.0).plot(&entries);
        assert_eq!(markers[1].x, 260.0);
    }
}
