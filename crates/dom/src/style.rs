//! Inline-style parsing and the minimal computed-style model: inline
//! declarations override a small user-agent default table, and color values
//! are canonicalised so computed reads are stable regardless of how the
//! author spelled them.

use csscolorparser::Color as CssColor;

/// Tags that never render content and are never edit targets.
pub const NON_VISUAL_TAGS: &[&str] = &[
    "script", "style", "meta", "link", "head", "title", "base", "noscript", "template",
];

/// Normalise a property name to kebab-case: `backgroundColor` and
/// `background-color` address the same declaration.
pub fn normalize_property(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    for ch in name.trim().chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Parse a `style` attribute into `(property, value)` pairs, names
/// normalised, empty declarations dropped.
pub fn parse_inline(attr: &str) -> Vec<(String, String)> {
    let mut decls = Vec::new();
    for chunk in attr.split(';') {
        let Some((name, value)) = chunk.split_once(':') else {
            continue;
        };
        let name = normalize_property(name);
        let value = value.trim();
        if name.is_empty() || value.is_empty() {
            continue;
        }
        decls.push((name, value.to_owned()));
    }
    decls
}

pub fn serialize_inline(decls: &[(String, String)]) -> String {
    let mut out = String::new();
    for (name, value) in decls {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push(';');
    }
    out
}

/// Properties whose inline values flow down to descendants in this model.
pub fn is_inherited(property: &str) -> bool {
    matches!(
        property,
        "color"
            | "font-size"
            | "font-weight"
            | "font-family"
            | "font-style"
            | "text-align"
            | "visibility"
            | "line-height"
    )
}

/// Canonicalise a declaration value for computed-style reads. Color-valued
/// properties are run through the color parser so `rgb(59,130,246)`,
/// `#3b82f6`, and `blue` all read back in one spelling.
pub fn canonicalize_value(property: &str, value: &str) -> String {
    let trimmed = value.trim();
    if !property.contains("color") {
        return trimmed.to_owned();
    }
    let Ok(parsed) = trimmed.parse::<CssColor>() else {
        return trimmed.to_owned();
    };
    format_rgba(parsed.to_rgba8())
}

fn format_rgba(rgba: [u8; 4]) -> String {
    let [red, green, blue, alpha] = rgba;
    if alpha == 255 {
        format!("rgb({red}, {green}, {blue})")
    } else {
        let alpha_float = f64::from(alpha) / 255.0;
        format!("rgba({red}, {green}, {blue}, {})", round3(alpha_float))
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// User-agent default for a property on a given tag. Empty string means the
/// property has no default in this model (reads as "not set").
pub fn default_value(tag: &str, property: &str) -> String {
    match property {
        "display" => default_display(tag).to_owned(),
        "color" => "rgb(0, 0, 0)".to_owned(),
        "background-color" => "rgba(0, 0, 0, 0)".to_owned(),
        "visibility" => "visible".to_owned(),
        "font-size" => default_font_size(tag).to_owned(),
        "font-weight" => {
            if matches!(tag, "b" | "strong" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6") {
                "700".to_owned()
            } else {
                "400".to_owned()
            }
        }
        "font-family" => "sans-serif".to_owned(),
        "text-align" => "start".to_owned(),
        "margin" | "padding" => "0px".to_owned(),
        "border" | "border-width" => "0px none".to_owned(),
        _ => String::new(),
    }
}

fn default_display(tag: &str) -> &'static str {
    match tag {
        "span" | "a" | "b" | "i" | "em" | "strong" | "code" | "small" | "label" | "img"
        | "input" | "button" | "select" | "textarea" => "inline",
        "li" => "list-item",
        "table" => "table",
        "" => "inline",
        _ => "block",
    }
}

fn default_font_size(tag: &str) -> &'static str {
    match tag {
        "h1" => "32px",
        "h2" => "24px",
        "h3" => "18.72px",
        "h4" => "16px",
        "h5" => "13.28px",
        "h6" => "10.72px",
        "small" => "13.28px",
        _ => "16px",
    }
}
