use foundation::math::Vec2;

use crate::surface::{Interaction, LayerKind, Shape, Surface};

#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    /// Index into `Surface::elements()`.
    pub index: usize,
    pub layer: LayerKind,
    pub interaction: Interaction,
}

/// Screen-space picking of interactive elements.
///
/// Ordering contract:
/// - The topmost element (last painted) under `px` wins.
/// - Hidden elements and elements without an interaction are skipped.
///
/// Closed paths use the even-odd rule over all of their rings, so holes and
/// multi-part footprints behave as painted. Open paths are never hit.
pub fn pick(surface: &Surface, px: Vec2) -> Option<PickHit> {
    for (index, element) in surface.elements().iter().enumerate().rev() {
        if !element.visible {
            continue;
        }
        let Some(interaction) = &element.interaction else {
            continue;
        };
        if !element.shape.bounds().contains(px) {
            continue;
        }
        if shape_contains(&element.shape, px) {
            return Some(PickHit {
                index,
                layer: element.layer,
                interaction: interaction.clone(),
            });
        }
    }
    None
}

fn shape_contains(shape: &Shape, px: Vec2) -> bool {
    match shape {
        Shape::Path {
            rings,
            closed: true,
        } => rings
            .iter()
            .filter(|ring| ring_contains(ring, px))
            .count()
            % 2
            == 1,
        Shape::Path { closed: false, .. } => false,
        Shape::Circle { center, radius } => center.distance(px) <= *radius,
        Shape::Text { .. } => false,
    }
}

fn ring_contains(ring: &[Vec2], p: Vec2) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}
