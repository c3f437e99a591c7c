use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use egui::Color32;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PadError, PadResult};
use crate::stroke::PenStyle;
use crate::surface::MAX_SURFACE_DIMENSION;

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Svg,
}

impl ExportFormat {
    /// Lenient lookup used for user-facing format names. Anything that is not
    /// a known format exports as PNG.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::warn!("Unknown export format `{name}`, using png");
            ExportFormat::Png
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Svg => "svg",
        }
    }

    /// File extension used by `download`.
    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Svg => "image/svg+xml;charset=utf-8",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = PadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpeg" | "jpg" => Ok(ExportFormat::Jpeg),
            "svg" => Ok(ExportFormat::Svg),
            other => Err(PadError::InvalidOption {
                name: "format".to_owned(),
                reason: format!("unknown format `{other}`"),
            }),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a CSS hex color (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`) or
/// `transparent`.
pub fn parse_css_color(text: &str) -> Result<Color32, String> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("transparent") {
        return Ok(Color32::TRANSPARENT);
    }
    Color32::from_hex(text).map_err(|err| format!("`{text}` is not a hex color ({err:?})"))
}

/// Formats a color for SVG/CSS output.
pub fn css_color(color: Color32) -> String {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    if a == u8::MAX {
        format!("#{r:02x}{g:02x}{b:02x}")
    } else {
        format!("rgba({r}, {g}, {b}, {})", f32::from(a) / 255.0)
    }
}

mod css_color_serde {
    use egui::Color32;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::css_color(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color32, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_css_color(&text).map_err(serde::de::Error::custom)
    }
}

/// Side effect the engine has to apply after an option changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionEffect {
    PenColor(Color32),
    PenSize(f32),
    /// Width or height changed; the surface must be resized
    Resize,
    Dark(bool),
    /// Recognized option without an immediate engine effect
    Stored,
    /// Unrecognized option kept verbatim in `extra`
    Passthrough,
}

/// Drawing and export settings of a pad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PadOptions {
    #[serde(with = "css_color_serde")]
    pub pen_color: Color32,
    pub pen_size: f32,
    #[serde(with = "css_color_serde")]
    pub background_color: Color32,
    /// Fixed canvas width; `None` follows the host container width
    pub width: Option<u32>,
    pub height: u32,
    pub show_date: bool,
    pub show_custom_text: bool,
    pub custom_text: String,
    pub add_border: bool,
    pub format: ExportFormat,
    pub class_name: String,
    pub dark: bool,
    /// Options the engine does not know about, kept as given
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for PadOptions {
    fn default() -> Self {
        Self {
            pen_color: Color32::BLACK,
            pen_size: 2.0,
            background_color: Color32::WHITE,
            width: None,
            height: 200,
            show_date: false,
            show_custom_text: false,
            custom_text: String::new(),
            add_border: false,
            format: ExportFormat::Png,
            class_name: "signature-pad".to_owned(),
            dark: false,
            extra: BTreeMap::new(),
        }
    }
}

impl PadOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn pen(&self) -> PenStyle {
        PenStyle::new(self.pen_color, self.pen_size)
    }

    /// Custom text is only drawn when enabled and non-empty.
    pub fn has_custom_text(&self) -> bool {
        self.show_custom_text && !self.custom_text.is_empty()
    }

    /// Updates one option by its camelCase name. A recognized option with a
    /// value of the wrong type leaves the options untouched.
    pub fn apply(&mut self, name: &str, value: Value) -> PadResult<OptionEffect> {
        let effect = match name {
            "penColor" => {
                let color = color_value(name, &value)?;
                self.pen_color = color;
                OptionEffect::PenColor(color)
            }
            "penSize" => {
                let size = number_value(name, &value)?;
                if !(size.is_finite() && size > 0.0) {
                    return Err(invalid(name, "pen size must be positive"));
                }
                self.pen_size = size;
                OptionEffect::PenSize(size)
            }
            "backgroundColor" => {
                self.background_color = color_value(name, &value)?;
                OptionEffect::Stored
            }
            "width" => {
                self.width = match value {
                    Value::Null => None,
                    ref other => Some(dimension_value(name, other)?),
                };
                OptionEffect::Resize
            }
            "height" => {
                self.height = dimension_value(name, &value)?;
                OptionEffect::Resize
            }
            "showDate" => {
                self.show_date = bool_value(name, &value)?;
                OptionEffect::Stored
            }
            "showCustomText" => {
                self.show_custom_text = bool_value(name, &value)?;
                OptionEffect::Stored
            }
            "customText" => {
                self.custom_text = string_value(name, &value)?.to_owned();
                OptionEffect::Stored
            }
            "addBorder" => {
                self.add_border = bool_value(name, &value)?;
                OptionEffect::Stored
            }
            "format" => {
                self.format = ExportFormat::from_name(string_value(name, &value)?);
                OptionEffect::Stored
            }
            "className" => {
                self.class_name = string_value(name, &value)?.to_owned();
                OptionEffect::Stored
            }
            "dark" => {
                let dark = bool_value(name, &value)?;
                self.dark = dark;
                OptionEffect::Dark(dark)
            }
            _ => {
                self.extra.insert(name.to_owned(), value);
                OptionEffect::Passthrough
            }
        };
        Ok(effect)
    }
}

fn invalid(name: &str, reason: impl Into<String>) -> PadError {
    PadError::InvalidOption {
        name: name.to_owned(),
        reason: reason.into(),
    }
}

fn color_value(name: &str, value: &Value) -> PadResult<Color32> {
    let text = string_value(name, value)?;
    parse_css_color(text).map_err(|reason| invalid(name, reason))
}

// Form inputs hand numbers over as strings, so numeric strings are accepted too
fn number_value(name: &str, value: &Value) -> PadResult<f32> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .map(|n| n as f32)
            .ok_or_else(|| invalid(name, "number out of range")),
        Value::String(text) => text
            .trim()
            .parse::<f32>()
            .map_err(|_| invalid(name, format!("`{text}` is not a number"))),
        other => Err(invalid(name, format!("expected a number, got {other}"))),
    }
}

fn dimension_value(name: &str, value: &Value) -> PadResult<u32> {
    let number = number_value(name, value)?;
    if !(number.is_finite() && number >= 1.0 && number <= MAX_SURFACE_DIMENSION as f32) {
        return Err(invalid(
            name,
            format!("dimension must be between 1 and {MAX_SURFACE_DIMENSION}"),
        ));
    }
    Ok(number as u32)
}

fn bool_value(name: &str, value: &Value) -> PadResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| invalid(name, format!("expected a boolean, got {value}")))
}

fn string_value<'a>(name: &str, value: &'a Value) -> PadResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| invalid(name, format!("expected a string, got {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_match_widget() {
        let options = PadOptions::default();
        assert_eq!(options.pen_color, Color32::BLACK);
        assert_eq!(options.pen_size, 2.0);
        assert_eq!(options.background_color, Color32::WHITE);
        assert_eq!(options.height, 200);
        assert_eq!(options.format, ExportFormat::Png);
    }

    #[test]
    fn test_from_json_with_unknown_keys() {
        let options = PadOptions::from_json(
            r##"{"penColor": "#ff0000", "penSize": 3, "addBorder": true, "tooltip": "Sign"}"##,
        )
        .unwrap();
        assert_eq!(options.pen_color, Color32::from_rgb(255, 0, 0));
        assert_eq!(options.pen_size, 3.0);
        assert!(options.add_border);
        assert_eq!(options.extra.get("tooltip"), Some(&json!("Sign")));
    }

    #[test]
    fn test_apply_reports_effects() {
        let mut options = PadOptions::default();
        assert_eq!(
            options.apply("penColor", json!("#00ff00")).unwrap(),
            OptionEffect::PenColor(Color32::from_rgb(0, 255, 0))
        );
        assert_eq!(options.apply("penSize", json!("4")).unwrap(), OptionEffect::PenSize(4.0));
        assert_eq!(options.apply("height", json!(150)).unwrap(), OptionEffect::Resize);
        assert_eq!(options.apply("width", json!(null)).unwrap(), OptionEffect::Resize);
        assert_eq!(options.apply("dark", json!(true)).unwrap(), OptionEffect::Dark(true));
        assert_eq!(options.apply("whatever", json!([1, 2])).unwrap(), OptionEffect::Passthrough);
        assert_eq!(options.extra.get("whatever"), Some(&json!([1, 2])));
    }

    #[test]
    fn test_invalid_value_leaves_options_untouched() {
        let mut options = PadOptions::default();
        assert!(options.apply("penColor", json!("not a color")).is_err());
        assert!(options.apply("penSize", json!(-1)).is_err());
        assert!(options.apply("height", json!(0)).is_err());
        assert!(options.apply("width", json!(600_000_000)).is_err());
        assert!(options.apply("showDate", json!("yes")).is_err());
        assert_eq!(options, PadOptions::default());
    }

    #[test]
    fn test_format_names() {
        assert_eq!("JPG".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
        assert!("gif".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::from_name("gif"), ExportFormat::Png);
        assert_eq!(ExportFormat::Svg.to_string(), "svg");
    }

    #[test]
    fn test_css_color_round_trip() {
        assert_eq!(css_color(Color32::from_rgb(255, 0, 16)), "#ff0010");
        assert_eq!(parse_css_color("#FFF").unwrap(), Color32::WHITE);
        assert_eq!(parse_css_color("transparent").unwrap(), Color32::TRANSPARENT);
    }
}
