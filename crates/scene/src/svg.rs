//! SVG export of a draw surface.

use std::fmt::Write as _;

use foundation::math::Vec2;

use crate::surface::{Element, Shape, Style, Surface};

impl Surface {
    /// Serializes the surface as a standalone SVG document, one `<g>` per
    /// layer in paint order. Hidden elements are emitted with
    /// `display="none"` so label positions survive for later inspection.
    pub fn to_svg(&self) -> String {
        let mut svg = String::with_capacity(16 * 1024);
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width(),
            h = self.height()
        );

        let mut current = None;
        for element in self.elements() {
            if current != Some(element.layer) {
                if current.is_some() {
                    svg.push_str("</g>");
                }
                let _ = write!(svg, r#"<g class="{}">"#, element.layer.name());
                current = Some(element.layer);
            }
            write_element(&mut svg, element);
        }
        if current.is_some() {
            svg.push_str("</g>");
        }
        svg.push_str("</svg>");
        svg
    }
}

/// SVG path data for `rings`; closed rings end with `Z`.
pub fn path_data(rings: &[Vec<Vec2>], closed: bool) -> String {
    let mut d = String::new();
    for ring in rings.iter().filter(|r| r.len() >= 2) {
        for (i, p) in ring.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd}{},{}", fmt_num(p.x), fmt_num(p.y));
        }
        if closed {
            d.push('Z');
        }
    }
    d
}

fn write_element(svg: &mut String, element: &Element) {
    if let Some(url) = &element.link {
        let _ = write!(svg, r#"<a xlink:href="{}" href="{}">"#, escape(url), escape(url));
    }

    let attrs = style_attrs(&element.style, element.visible);
    let title = element
        .tooltip
        .as_ref()
        .map(|t| format!("<title>{}</title>", escape(t)))
        .unwrap_or_default();

    match &element.shape {
        Shape::Path { rings, closed } => {
            let fill = if *closed { "" } else { r#" fill="none""# };
            let _ = write!(
                svg,
                r#"<path d="{}"{fill}{attrs}>{title}</path>"#,
                path_data(rings, *closed)
            );
        }
        Shape::Circle { center, radius } => {
            let _ = write!(
                svg,
                r#"<circle cx="{}" cy="{}" r="{}"{attrs}>{title}</circle>"#,
                fmt_num(center.x),
                fmt_num(center.y),
                fmt_num(*radius)
            );
        }
        Shape::Text { anchor, text } => {
            let _ = write!(
                svg,
                r#"<text x="{}" y="{}" font-size="{}"{attrs}>{title}{}</text>"#,
                fmt_num(anchor.x),
                fmt_num(anchor.y),
                fmt_num(element.style.font_size_px),
                escape(text)
            );
        }
    }

    if element.link.is_some() {
        svg.push_str("</a>");
    }
}

fn style_attrs(style: &Style, visible: bool) -> String {
    let mut out = String::new();
    if let Some(fill) = &style.fill {
        let _ = write!(out, r#" fill="{}""#, escape(fill));
    }
    if let Some(stroke) = &style.stroke {
        let _ = write!(
            out,
            r#" stroke="{}" stroke-width="{}""#,
            escape(stroke),
            fmt_num(style.stroke_width)
        );
    }
    if style.opacity < 1.0 {
        let _ = write!(out, r#" opacity="{}""#, fmt_num(style.opacity));
    }
    if !visible {
        out.push_str(r#" display="none""#);
    }
    out
}

fn fmt_num(v: f64) -> String {
    let r = (v * 100.0).round() / 100.0;
    if r == 0.0 {
        // Avoids "-0".
        return "0".to_string();
    }
    format!("{r}")
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::path_data;
    use crate::surface::{Element, LayerKind, Shape, Style, Surface};
    use foundation::math::Vec2;

    #[test]
    fn path_data_rounds_and_closes() {
        let d = path_data(
            &[vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(10.004, 5.5),
                Vec2::new(-0.001, 3.0),
            ]],
            true,
        );
        assert_eq!(d, "M0,0L10,5.5L0,3Z");
    }

    #[test]
    fn groups_layers_and_escapes_text() {
        let mut s = Surface::new(600, 600);
        s.push(Element::new(
            LayerKind::Background,
            Shape::Circle {
                center: Vec2::new(300.0, 300.0),
                radius: 285.0,
            },
            Style::filled("#f0f8ff"),
        ));
        s.push(
            Element::new(
                LayerKind::Sources,
                Shape::Text {
                    anchor: Vec2::new(10.0, 20.0),
                    text: "ZTF<19> & co".to_string(),
                },
                Style::filled("black"),
            )
            .with_link(Some("/source/ZTF19"))
            .with_tooltip("a \"quote\""),
        );
        s.push(
            Element::new(
                LayerKind::Sources,
                Shape::Circle {
                    center: Vec2::new(1.0, 1.0),
                    radius: 3.0,
                },
                Style::filled("black"),
            )
            .with_visibility(false),
        );

        let svg = s.to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(
            r##"<g class="background"><circle cx="300" cy="300" r="285" fill="#f0f8ff"></circle></g>"##
        ));
        assert!(svg.contains("ZTF&lt;19&gt; &amp; co"));
        assert!(svg.contains("<title>a &quot;quote&quot;</title>"));
        assert!(svg.contains(r#"href="/source/ZTF19""#));
        assert!(svg.contains(r#"display="none""#));
        assert_eq!(svg.matches("<g ").count(), 2);
    }
}
