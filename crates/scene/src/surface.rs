use foundation::bounds::Aabb2;
use foundation::math::Vec2;

/// Draw layers in paint order (later variants paint on top).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    Background,
    Graticule,
    AngleTicks,
    Skymap,
    Fields,
    Observations,
    Sources,
    Galaxies,
}

impl LayerKind {
    pub const ALL: [LayerKind; 8] = [
        LayerKind::Background,
        LayerKind::Graticule,
        LayerKind::AngleTicks,
        LayerKind::Skymap,
        LayerKind::Fields,
        LayerKind::Observations,
        LayerKind::Sources,
        LayerKind::Galaxies,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            LayerKind::Background => "background",
            LayerKind::Graticule => "graticule",
            LayerKind::AngleTicks => "angle-ticks",
            LayerKind::Skymap => "skymap",
            LayerKind::Fields => "fields",
            LayerKind::Observations => "observations",
            LayerKind::Sources => "sources",
            LayerKind::Galaxies => "galaxies",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Projected polylines in pixels. Closed paths are filled.
    Path { rings: Vec<Vec<Vec2>>, closed: bool },
    Circle { center: Vec2, radius: f64 },
    Text { anchor: Vec2, text: String },
}

impl Shape {
    pub fn bounds(&self) -> Aabb2 {
        match self {
            Shape::Path { rings, .. } => Aabb2::from_points(rings.iter().flatten()),
            Shape::Circle { center, radius } => Aabb2::new(
                [center.x - radius, center.y - radius],
                [center.x + radius, center.y + radius],
            ),
            Shape::Text { anchor, .. } => Aabb2::new([anchor.x, anchor.y], [anchor.x, anchor.y]),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Shape::Path { rings, .. } => rings.iter().all(|r| r.len() < 2),
            Shape::Circle { radius, .. } => *radius <= 0.0,
            Shape::Text { text, .. } => text.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub opacity: f64,
    pub font_size_px: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            opacity: 1.0,
            font_size_px: 12.0,
        }
    }
}

impl Style {
    pub fn filled(color: impl Into<String>) -> Self {
        Self {
            fill: Some(color.into()),
            ..Self::default()
        }
    }

    pub fn stroked(color: impl Into<String>, width: f64) -> Self {
        Self {
            stroke: Some(color.into()),
            stroke_width: width,
            ..Self::default()
        }
    }

    pub fn with_stroke(mut self, color: impl Into<String>, width: f64) -> Self {
        self.stroke = Some(color.into());
        self.stroke_width = width;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_font_size(mut self, px: f64) -> Self {
        self.font_size_px = px;
        self
    }
}

/// What a click on an element does.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Interaction {
    ToggleField(u32),
    ToggleObservation(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub layer: LayerKind,
    pub shape: Shape,
    pub style: Style,
    /// Hidden elements stay in the surface (for labels culled on the far
    /// side) but are neither painted nor pickable.
    pub visible: bool,
    pub tooltip: Option<String>,
    pub link: Option<String>,
    pub interaction: Option<Interaction>,
}

impl Element {
    pub fn new(layer: LayerKind, shape: Shape, style: Style) -> Self {
        Self {
            layer,
            shape,
            style,
            visible: true,
            tooltip: None,
            link: None,
            interaction: None,
        }
    }

    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_link(mut self, url: Option<&str>) -> Self {
        self.link = url.map(str::to_string);
        self
    }

    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interaction = Some(interaction);
        self
    }
}

/// Retained draw surface: cleared and rebuilt in full on every redraw.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    elements: Vec<Element>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Drops every element and adopts the new dimensions.
    pub fn reset(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.elements.clear();
    }

    /// Appends `element` unless its shape is degenerate.
    pub fn push(&mut self, element: Element) {
        if element.shape.is_empty() {
            return;
        }
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn layer(&self, kind: LayerKind) -> impl Iterator<Item = &Element> + '_ {
        self.elements.iter().filter(move |e| e.layer == kind)
    }

    pub fn count(&self, kind: LayerKind) -> usize {
        self.layer(kind).count()
    }

    pub fn visible_count(&self, kind: LayerKind) -> usize {
        self.layer(kind).filter(|e| e.visible).count()
    }
}

#[cfg(test)]
mod tests {
    use super::{Element, LayerKind, Shape, Style, Surface};
    use foundation::math::Vec2;

    fn dot(layer: LayerKind) -> Element {
        Element::new(
            layer,
            Shape::Circle {
                center: Vec2::new(1.0, 1.0),
                radius: 2.0,
            },
            Style::filled("red"),
        )
    }

    #[test]
    fn push_skips_degenerate_shapes() {
        let mut s = Surface::new(10, 10);
        s.push(dot(LayerKind::Sources));
        s.push(Element::new(
            LayerKind::Graticule,
            Shape::Path {
                rings: vec![vec![Vec2::new(0.0, 0.0)]],
                closed: false,
            },
            Style::default(),
        ));
        assert_eq!(s.elements().len(), 1);
        assert_eq!(s.count(LayerKind::Sources), 1);
        assert_eq!(s.count(LayerKind::Graticule), 0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut s = Surface::new(10, 10);
        s.push(dot(LayerKind::Galaxies));
        s.push(dot(LayerKind::Galaxies).with_visibility(false));
        assert_eq!(s.visible_count(LayerKind::Galaxies), 1);
        s.reset(20, 30);
        assert!(s.is_empty());
        assert_eq!((s.width(), s.height()), (20, 30));
    }

    #[test]
    fn layers_are_in_paint_order() {
        let mut sorted = LayerKind::ALL;
        sorted.sort();
        assert_eq!(sorted, LayerKind::ALL);
    }
}
