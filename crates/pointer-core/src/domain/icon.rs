//! Pointer icon selection.

/// Named pointer icon styles understood by pointer controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerIconStyle {
    /// No explicit request; the controller falls back to its default.
    #[default]
    NotSpecified,
    Arrow,
    Hand,
    Text,
    Crosshair,
    Wait,
    /// Hover indicator drawn for a stylus while show-touches is on.
    SpotHover,
    SpotTouch,
    SpotAnchor,
}

/// A bitmap icon supplied by an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteIcon {
    pub width: u32,
    pub height: u32,
    /// RGBA8888 pixels, row-major.
    pub pixels: Vec<u8>,
    pub hotspot_x: i32,
    pub hotspot_y: i32,
    /// Style reported alongside the bitmap, usually [`PointerIconStyle::NotSpecified`].
    pub style: PointerIconStyle,
}

/// The icon to show for a pointer: either an application bitmap or a named style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerIcon {
    Custom(SpriteIcon),
    Style(PointerIconStyle),
}

impl From<PointerIconStyle> for PointerIcon {
    fn from(style: PointerIconStyle) -> Self {
        PointerIcon::Style(style)
    }
}

impl From<SpriteIcon> for PointerIcon {
    fn from(icon: SpriteIcon) -> Self {
        PointerIcon::Custom(icon)
    }
}
