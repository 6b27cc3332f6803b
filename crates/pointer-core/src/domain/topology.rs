//! Display topology domain entity.
//!
//! The topology is a directed adjacency graph: for each display it lists the
//! displays touching each of its four edges, together with an offset (in
//! pixels, in the source display's rotated space) at which the neighbour's
//! edge begins. A mouse cursor leaving a display through an edge reappears on
//! the opposite edge of the neighbour whose span contains the crossing point.
//!
//! ```text
//!             offset_px
//!             ├───────►┌──────────┐
//! ┌────────────────────┤          │
//! │     source         │  dest    │
//! │                    │          │
//! └────────────────────┤          │
//!                      └──────────┘
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::geometry::Vec2;
use super::ids::DisplayId;
use super::viewport::DisplayViewport;

/// Offset applied between neighbours when a fallback topology is synthesized.
pub const FALLBACK_OFFSET_PX: f32 = 100.0;

/// The edge of a display through which the cursor leaves or enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayPosition {
    Top,
    Bottom,
    Left,
    Right,
}

impl DisplayPosition {
    fn is_horizontal_edge(self) -> bool {
        matches!(self, DisplayPosition::Top | DisplayPosition::Bottom)
    }
}

/// One neighbour of a display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjacentDisplay {
    /// The neighbouring display.
    pub display_id: DisplayId,
    /// The edge of the *source* display the neighbour touches.
    pub position: DisplayPosition,
    /// Where the neighbour's edge starts, measured along the source edge.
    pub offset_px: f32,
}

/// Errors raised while building a topology.
#[derive(Debug, Error, PartialEq)]
pub enum TopologyError {
    /// A display was listed as its own neighbour.
    #[error("display {0} cannot be adjacent to itself")]
    SelfAdjacent(DisplayId),

    /// The same neighbour was listed twice on the same edge.
    #[error("display {adjacent} is already adjacent to {source_display} on the {position:?} edge")]
    DuplicateAdjacency {
        source_display: DisplayId,
        adjacent: DisplayId,
        position: DisplayPosition,
    },

    /// An adjacency referenced the invalid display id.
    #[error("adjacency references an invalid display id")]
    InvalidDisplay,
}

/// The display adjacency graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayTopology {
    graph: HashMap<DisplayId, Vec<AdjacentDisplay>>,
}

impl DisplayTopology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a neighbour to `source`'s adjacency list.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidDisplay`] for [`DisplayId::INVALID`] on either side,
    /// [`TopologyError::SelfAdjacent`] if `source` equals the neighbour, and
    /// [`TopologyError::DuplicateAdjacency`] if the neighbour is already listed on that edge.
    pub fn add_adjacency(
        &mut self,
        source: DisplayId,
        adjacent: AdjacentDisplay,
    ) -> Result<(), TopologyError> {
        if !source.is_valid() || !adjacent.display_id.is_valid() {
            return Err(TopologyError::InvalidDisplay);
        }
        if source == adjacent.display_id {
            return Err(TopologyError::SelfAdjacent(source));
        }
        let entries = self.graph.entry(source).or_default();
        if entries
            .iter()
            .any(|e| e.display_id == adjacent.display_id && e.position == adjacent.position)
        {
            return Err(TopologyError::DuplicateAdjacency {
                source_display: source,
                adjacent: adjacent.display_id,
                position: adjacent.position,
            });
        }
        entries.push(adjacent);
        Ok(())
    }

    /// Returns the neighbours of `display_id`, if it is part of the topology.
    pub fn adjacent_displays(&self, display_id: DisplayId) -> Option<&[AdjacentDisplay]> {
        self.graph.get(&display_id).map(Vec::as_slice)
    }

    pub fn contains(&self, display_id: DisplayId) -> bool {
        self.graph.contains_key(&display_id)
    }

    /// Number of displays that have an entry in the graph.
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Synthesizes a chain topology for when no real topology is available.
    ///
    /// The default display's top edge touches the first other display, and
    /// every later display is chained to the right of its predecessor, each
    /// shifted by [`FALLBACK_OFFSET_PX`]:
    ///
    /// ```text
    ///   ┌────────┐
    ///   │ next   ├─────────┐
    /// ┌─└───────┐┤ next 2  │ ...
    /// │ default │└─────────┘
    /// └─────────┘
    /// ```
    pub fn synthesize_fallback(displays: &[DisplayId]) -> Self {
        let mut graph: HashMap<DisplayId, Vec<AdjacentDisplay>> = HashMap::new();
        let mut previous = DisplayId::DEFAULT;
        for &display_id in displays {
            if display_id == DisplayId::DEFAULT {
                continue;
            }
            let (outgoing, incoming) = if previous == DisplayId::DEFAULT {
                (DisplayPosition::Top, DisplayPosition::Bottom)
            } else {
                (DisplayPosition::Right, DisplayPosition::Left)
            };
            graph.entry(previous).or_default().push(AdjacentDisplay {
                display_id,
                position: outgoing,
                offset_px: FALLBACK_OFFSET_PX,
            });
            graph.entry(display_id).or_default().push(AdjacentDisplay {
                display_id: previous,
                position: incoming,
                offset_px: -FALLBACK_OFFSET_PX,
            });
            previous = display_id;
        }
        Self { graph }
    }

    /// Returns `true` if the graph holds exactly the given displays.
    pub fn covers_exactly(&self, displays: &[DisplayId]) -> bool {
        displays.len() == self.graph.len() && displays.iter().all(|d| self.graph.contains_key(d))
    }

    /// Finds the neighbour reached by leaving `source` through `boundary` at
    /// `cursor_offset` (measured along that edge in rotated space).
    ///
    /// Returns the neighbour's viewport and the neighbour's recorded offset.
    /// Neighbours with no known viewport are skipped; a source missing from
    /// the graph yields `None`. Both happen transiently while topology and
    /// viewport updates race each other.
    pub fn find_destination<'v>(
        &self,
        source: DisplayId,
        boundary: DisplayPosition,
        cursor_offset: f32,
        viewports: &'v [DisplayViewport],
    ) -> Option<(&'v DisplayViewport, f32)> {
        let Some(neighbours) = self.graph.get(&source) else {
            warn!("source display {source} missing from topology");
            return None;
        };

        for adjacent in neighbours.iter().filter(|a| a.position == boundary) {
            let Some(viewport) = viewports
                .iter()
                .find(|vp| vp.display_id == adjacent.display_id)
            else {
                warn!(
                    "cannot find viewport for display {} adjacent to {source}",
                    adjacent.display_id
                );
                continue;
            };

            let edge_size = if boundary.is_horizontal_edge() {
                viewport.logical_width()
            } else {
                viewport.logical_height()
            } as f32;

            if cursor_offset >= adjacent.offset_px && cursor_offset <= adjacent.offset_px + edge_size
            {
                return Some((viewport, adjacent.offset_px));
            }
        }
        None
    }
}

/// Determines which edge a cursor is crossing and its offset along that edge.
///
/// Both arguments must already be in the source display's rotated space.
/// Horizontal motion wins over vertical motion, which only matters near corners.
pub fn crossing_boundary(rotated_delta: Vec2, rotated_position: Vec2) -> (DisplayPosition, f32) {
    if rotated_delta.x > 0.0 {
        (DisplayPosition::Right, rotated_position.y)
    } else if rotated_delta.x < 0.0 {
        (DisplayPosition::Left, rotated_position.y)
    } else if rotated_delta.y > 0.0 {
        (DisplayPosition::Bottom, rotated_position.x)
    } else {
        (DisplayPosition::Top, rotated_position.x)
    }
}

/// Computes where the cursor appears on the destination display, in rotated space.
///
/// The cursor enters on the edge opposite `source_boundary`, `pointer_offset`
/// pixels along it.
pub fn destination_position(
    destination: &DisplayViewport,
    pointer_offset: f32,
    source_boundary: DisplayPosition,
) -> Vec2 {
    match source_boundary {
        DisplayPosition::Right => Vec2::new(0.0, pointer_offset),
        DisplayPosition::Top => Vec2::new(pointer_offset, destination.logical_bottom as f32),
        DisplayPosition::Left => Vec2::new(destination.logical_right as f32, pointer_offset),
        DisplayPosition::Bottom => Vec2::new(pointer_offset, 0.0),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
