//! Colours and stroke styles for every layer, and the hash-derived colour
//! that identifies a filter combination.

use scene::Style;

pub const SPHERE_FILL: &str = "#f0f8ff";
pub const SPHERE_STROKE: &str = "#000000";
pub const GRATICULE_STROKE: &str = "#bbbbbb";
pub const TICK_COLOR: &str = "#444444";
pub const CONTOUR_STROKE: &str = "#000000";
pub const CENTER_MARKER_FILL: &str = "#ff0000";
pub const FIELD_STROKE: &str = "#444444";
pub const FIELD_OBSERVABLE: &str = "white";
pub const FIELD_UNOBSERVABLE: &str = "gray";
pub const OBSERVATION_FILL: &str = "#1f77b4";
pub const OBSERVATION_SELECTED_FILL: &str = "#ff7f0e";
pub const SOURCE_FILL: &str = "#000000";
pub const GALAXY_FILL: &str = "#2e8b57";

/// Default airmass below which an unselected field counts as observable.
pub const DEFAULT_AIRMASS_THRESHOLD: f64 = 2.5;

/// 32-bit string hash with the same overflow behaviour as Java's
/// `String.hashCode` (`h = 31 * h + c` over UTF-16 code units).
pub fn hash_code(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Low 24 bits of `value` as upper-case `RRGGBB`.
pub fn int_to_rgb(value: i32) -> String {
    format!("{:06X}", value & 0x00FF_FFFF)
}

/// Colour shared by every field observed with this filter set.
pub fn filter_color(filters: &[String]) -> String {
    format!("#{}", int_to_rgb(hash_code(&filters.concat())))
}

/// Fill for an instrument field.
///
/// Selected fields take the filter colour. Unselected fields are white when
/// their airmass is known and below `airmass_threshold`, gray otherwise.
pub fn field_fill(
    selected: bool,
    airmass: Option<f64>,
    airmass_threshold: f64,
    filters: &[String],
) -> String {
    if selected {
        return filter_color(filters);
    }
    match airmass {
        Some(a) if a < airmass_threshold => FIELD_OBSERVABLE.to_string(),
        _ => FIELD_UNOBSERVABLE.to_string(),
    }
}

pub fn observation_fill(selected: bool) -> &'static str {
    if selected {
        OBSERVATION_SELECTED_FILL
    } else {
        OBSERVATION_FILL
    }
}

pub fn graticule_style() -> Style {
    Style::stroked(GRATICULE_STROKE, 0.5).with_opacity(0.8)
}

pub fn contour_style() -> Style {
    Style::stroked(CONTOUR_STROKE, 1.5)
}

pub fn field_style(fill: String) -> Style {
    Style::filled(fill)
        .with_stroke(FIELD_STROKE, 0.5)
        .with_opacity(0.6)
}

pub fn observation_style(selected: bool) -> Style {
    Style::filled(observation_fill(selected))
        .with_stroke(FIELD_STROKE, 0.5)
        .with_opacity(0.6)
}

#[cfg(test)]
mod tests {
    use super::{field_fill, filter_color, hash_code, int_to_rgb};
    use pretty_assertions::assert_eq;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn hash_matches_reference_values() {
        assert_eq!(hash_code(""), 0);
        assert_eq!(hash_code("a"), 97);
        assert_eq!(hash_code("hello"), 99_162_322);
        // Long inputs overflow and wrap.
        assert_eq!(hash_code("the quick brown fox"), 1_302_335_171);
        assert_eq!(filter_color(&names(&["ztfg", "ztfr"])), "#0E8CED");
    }

    #[test]
    fn rgb_is_masked_and_padded() {
        assert_eq!(int_to_rgb(0), "000000");
        assert_eq!(int_to_rgb(255), "0000FF");
        assert_eq!(int_to_rgb(-1), "FFFFFF");
        assert_eq!(int_to_rgb(0x7F12_3456), "123456");
    }

    #[test]
    fn filter_sets_share_colours() {
        let a = filter_color(&names(&["ztfg", "ztfr"]));
        let b = filter_color(&names(&["ztfg", "ztfr"]));
        let c = filter_color(&names(&["sdssu", "atlasc"]));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 7);
        assert!(a.starts_with('#'));
        // Joined without a separator.
        assert_eq!(filter_color(&names(&["ab", "c"])), filter_color(&names(&["a", "bc"])));
    }

    #[test]
    fn unselected_fill_follows_airmass() {
        let filters = names(&["ztfg"]);
        assert_eq!(field_fill(false, Some(1.2), 2.5, &filters), "white");
        assert_eq!(field_fill(false, Some(2.5), 2.5, &filters), "gray");
        assert_eq!(field_fill(false, None, 2.5, &filters), "gray");
        assert_eq!(field_fill(true, Some(9.0), 2.5, &filters), filter_color(&filters));
    }
}
