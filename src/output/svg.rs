//! SVG serialization of a scene graph.
//!
//! Walks the canvas group tree and emits one SVG element per shape; groups
//! become `<g>` elements carrying their translation.

use crate::color::Rgba;
use crate::error::Result;
use crate::scene::{Canvas, Group, Shape, Style, TextAnchor};
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Serialize a canvas to an SVG document string.
#[must_use]
pub fn to_svg(canvas: &Canvas) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" \
         viewBox=\"0 0 {} {}\">\n",
        canvas.width, canvas.height, canvas.width, canvas.height
    );
    write_group(&mut out, &canvas.root, 1);
    out.push_str("</svg>\n");
    out
}

/// Write a canvas to an SVG file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_svg(canvas: &Canvas, path: impl AsRef<Path>) -> Result<()> {
    let svg = to_svg(canvas);
    let mut file = File::create(path)?;
    file.write_all(svg.as_bytes())?;
    Ok(())
}

fn write_group(out: &mut String, group: &Group, depth: usize) {
    let pad = "  ".repeat(depth);
    let translated = group.offset != (0.0, 0.0);
    if translated {
        let _ = write!(
            out,
            "{pad}<g transform=\"translate({} {})\">\n",
            fmt_f(group.offset.0),
            fmt_f(group.offset.1)
        );
    } else {
        let _ = write!(out, "{pad}<g>\n");
    }
    for shape in &group.shapes {
        write_shape(out, shape, depth + 1);
    }
    for child in &group.children {
        write_group(out, child, depth + 1);
    }
    let _ = write!(out, "{pad}</g>\n");
}

fn write_shape(out: &mut String, shape: &Shape, depth: usize) {
    let pad = "  ".repeat(depth);
    match shape {
        Shape::Rect { x, y, width, height, style } => {
            let _ = write!(
                out,
                "{pad}<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{}/>\n",
                fmt_f(*x),
                fmt_f(*y),
                fmt_f(*width),
                fmt_f(*height),
                style_attrs(style)
            );
        }
        Shape::Circle { cx, cy, r, style } => {
            let _ = write!(
                out,
                "{pad}<circle cx=\"{}\" cy=\"{}\" r=\"{}\"{}/>\n",
                fmt_f(*cx),
                fmt_f(*cy),
                fmt_f(*r),
                style_attrs(style)
            );
        }
        Shape::Line { x1, y1, x2, y2, style } => {
            let _ = write!(
                out,
                "{pad}<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"{}/>\n",
                fmt_f(*x1),
                fmt_f(*y1),
                fmt_f(*x2),
                fmt_f(*y2),
                style_attrs(style)
            );
        }
        Shape::Polyline { points, style } => {
            let _ = write!(
                out,
                "{pad}<polyline points=\"{}\"{}/>\n",
                points_attr(points),
                style_attrs(style)
            );
        }
        Shape::Polygon { points, style } => {
            let _ = write!(
                out,
                "{pad}<polygon points=\"{}\"{}/>\n",
                points_attr(points),
                style_attrs(style)
            );
        }
        Shape::Text { x, y, text, size, color, anchor } => {
            let anchor_attr = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let _ = write!(
                out,
                "{pad}<text x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"{}\" \
                 text-anchor=\"{anchor_attr}\" font-family=\"sans-serif\">{}</text>\n",
                fmt_f(*x),
                fmt_f(*y),
                fmt_f(*size),
                color.to_hex(),
                escape(text)
            );
        }
    }
}

fn style_attrs(style: &Style) -> String {
    let mut attrs = String::new();
    match style.fill {
        Some(color) => {
            let _ = write!(attrs, " fill=\"{}\"", color.to_hex());
            if color.a < 255 {
                let _ = write!(attrs, " fill-opacity=\"{}\"", fmt_f(f32::from(color.a) / 255.0));
            }
        }
        None => attrs.push_str(" fill=\"none\""),
    }
    if let Some(color) = style.stroke {
        let _ = write!(
            attrs,
            " stroke=\"{}\" stroke-width=\"{}\"",
            color.to_hex(),
            fmt_f(style.stroke_width)
        );
        if color.a < 255 {
            let _ = write!(attrs, " stroke-opacity=\"{}\"", fmt_f(f32::from(color.a) / 255.0));
        }
    }
    if style.opacity < 1.0 {
        let _ = write!(attrs, " opacity=\"{}\"", fmt_f(style.opacity));
    }
    attrs
}

fn points_attr(points: &[(f32, f32)]) -> String {
    let mut s = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        let _ = write!(s, "{},{}", fmt_f(*x), fmt_f(*y));
    }
    s
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Trim float formatting to two decimals, dropping a trailing `.00`.
fn fmt_f(v: f32) -> String {
    if (v - v.round()).abs() < 0.005 {
        format!("{}", v.round() as i64)
    } else {
        format!("{v:.2}")
    }
}
