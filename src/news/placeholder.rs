//! Same-origin placeholder images.
//!
//! External article images can trip cross-origin loading policies, so the
//! UI is given `/api/placeholder?...` URLs instead. This module builds those
//! URLs and renders the SVG the route serves for them.

use url::form_urlencoded;

pub const PLACEHOLDER_PATH: &str = "/api/placeholder";

const DEFAULT_WIDTH: u32 = 300;
const DEFAULT_HEIGHT: u32 = 200;
const DEFAULT_TEXT: &str = "Placeholder";
const DEFAULT_BG: &str = "e2e8f0";
const DEFAULT_FG: &str = "64748b";

/// Size, caption and colors of a placeholder image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSpec {
  pub width: u32,
  pub height: u32,
  pub text: String,
  /// Background color as hex digits without `#`
  pub bg: String,
  /// Text color as hex digits without `#`
  pub fg: String,
}

impl Default for PlaceholderSpec {
  fn default() -> Self {
    Self {
      width: DEFAULT_WIDTH,
      height: DEFAULT_HEIGHT,
      text: DEFAULT_TEXT.to_string(),
      bg: DEFAULT_BG.to_string(),
      fg: DEFAULT_FG.to_string(),
    }
  }
}

impl PlaceholderSpec {
  pub fn new(width: u32, height: u32, text: &str) -> Self {
    Self {
      width,
      height,
      text: text.to_string(),
      ..Self::default()
    }
  }

  /// The red-on-pink 640x360 thumbnail used for urgent video items.
  pub fn urgent(title: &str) -> Self {
    Self {
      width: 640,
      height: 360,
      text: title.to_string(),
      bg: "fee2e2".to_string(),
      fg: "ef4444".to_string(),
    }
  }

  /// Parse the route's query string. Missing or invalid values get defaults.
  pub fn from_query(query: &str) -> Self {
    let mut spec = Self::default();
    for (name, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
      match name.as_ref() {
        "width" => spec.width = value.parse().unwrap_or(DEFAULT_WIDTH),
        "height" => spec.height = value.parse().unwrap_or(DEFAULT_HEIGHT),
        "text" if !value.is_empty() => spec.text = value.into_owned(),
        "bg" if is_hex_color(&value) => spec.bg = value.into_owned(),
        "fg" if is_hex_color(&value) => spec.fg = value.into_owned(),
        _ => {}
      }
    }
    spec
  }

  /// Relative URL of this placeholder on the current origin.
  pub fn to_url(&self) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
      .append_pair("width", &self.width.to_string())
      .append_pair("height", &self.height.to_string())
      .append_pair("text", &self.text)
      .append_pair("bg", &self.bg)
      .append_pair("fg", &self.fg)
      .finish();
    format!("{}?{}", PLACEHOLDER_PATH, query)
  }

  pub fn render_svg(&self) -> String {
    let bg = if is_hex_color(&self.bg) { &self.bg } else { DEFAULT_BG };
    let fg = if is_hex_color(&self.fg) { &self.fg } else { DEFAULT_FG };
    let text = escape_xml(&self.text.replace('+', " "));

    format!(
      r##"<svg width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg">
  <rect width="100%" height="100%" fill="#{bg}"/>
  <text x="50%" y="50%" font-family="Arial, sans-serif" font-size="20" fill="#{fg}" text-anchor="middle" dominant-baseline="middle">{text}</text>
</svg>
"##,
      w = self.width,
      h = self.height,
      bg = bg,
      fg = fg,
      text = text,
    )
  }
}

/// Placeholder URL carrying `text` as its caption.
pub fn placeholder_url(text: &str) -> String {
  PlaceholderSpec::urgent(text).to_url()
}

fn is_hex_color(value: &str) -> bool {
  matches!(value.len(), 3 | 6 | 8) && value.chars().all(|c| c.is_ascii_hexdigit())
}

fn escape_xml(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&apos;"),
      _ => out.push(c),
    }
  }
  out
}
