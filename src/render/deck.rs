use serde::Serialize;
use serde_json::{Map, Value};

use super::error::Error;
use super::escape_html;

const DECK_GL_JS: &str = "https://unpkg.com/deck.gl@9.0.38/dist.min.js";
const MAPLIBRE_JS: &str = "https://unpkg.com/maplibre-gl@4.7.1/dist/maplibre-gl.js";
const MAPLIBRE_CSS: &str = "https://unpkg.com/maplibre-gl@4.7.1/dist/maplibre-gl.css";
pub const CARTO_DARK_STYLE: &str =
    "https://basemaps.cartocdn.com/gl/dark-matter-nolabels-gl-style/style.json";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8" />
  <title>{{title}}</title>
  <script src="{{deck_js}}"></script>
  <script src="{{maplibre_js}}"></script>
  <link href="{{maplibre_css}}" rel="stylesheet" />
  <style>
    html, body { margin: 0; padding: 0; height: 100%; width: 100%; }
    #deck-container { position: absolute; inset: 0; }
    .deck-description {
      position: absolute;
      top: 10px;
      left: 10px;
      z-index: 2;
      padding: 8px 12px;
      background: rgba(255, 255, 255, 0.9);
      font-family: Arial, sans-serif;
    }
{{style}}
  </style>
</head>
<body>
  <div id="deck-container"></div>
{{description}}
{{overlay}}
  <script type="application/json" id="deck-spec">{{spec}}</script>
  <script>
    const spec = JSON.parse(document.getElementById('deck-spec').textContent);

    function accessor(field) {
      if (Array.isArray(field)) return d => field.map(f => d[f]);
      if (typeof field === 'string') return d => d[field];
      return field;
    }

    const layers = spec.layers.map(layer => {
      const props = Object.assign({ id: layer.id, data: layer.data }, layer.props);
      for (const [key, field] of Object.entries(layer.accessors)) {
        props[key] = accessor(field);
      }
      return new deck[layer.type](props);
    });

    function tooltip(info) {
      if (!spec.tooltip || !info.picked) return null;
      const object = info.object || {};
      return {
        text: spec.tooltip.replace(/\{(\w+)\}/g, (_, key) => (key in object ? object[key] : ''))
      };
    }

    new deck.DeckGL({
      container: 'deck-container',
      mapStyle: spec.mapStyle,
      initialViewState: spec.initialViewState,
      controller: true,
      layers: layers,
      getTooltip: tooltip
    });
  </script>
</body>
</html>
"#;

/// Camera position of the map when the page opens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

impl ViewState {
    pub const fn new(latitude: f64, longitude: f64, zoom: f64) -> ViewState {
        ViewState {
            latitude,
            longitude,
            zoom,
            pitch: 0.0,
            bearing: 0.0,
        }
    }

    pub const fn tilted(self, pitch: f64, bearing: f64) -> ViewState {
        ViewState {
            pitch,
            bearing,
            ..self
        }
    }
}

/// deck.gl layer classes the pages use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LayerType {
    PathLayer,
    HeatmapLayer,
}

/// A declarative deck.gl layer.
///
/// `props` are passed through as-is. `accessors` name row fields: a string reads one
/// field, an array of strings reads several into an array (e.g. `["lng", "lat"]`),
/// anything else is used as a constant.
#[derive(Debug, Clone, Serialize)]
pub struct Layer {
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    pub id: String,
    pub data: Vec<Value>,
    pub props: Map<String, Value>,
    pub accessors: Map<String, Value>,
}

impl Layer {
    pub fn new(layer_type: LayerType, id: &str, data: Vec<Value>) -> Layer {
        Layer {
            layer_type,
            id: id.to_string(),
            data,
            props: Map::new(),
            accessors: Map::new(),
        }
    }

    pub fn prop(mut self, key: &str, value: Value) -> Layer {
        self.props.insert(key.to_string(), value);
        self
    }

    pub fn accessor(mut self, key: &str, field: Value) -> Layer {
        self.accessors.insert(key.to_string(), field);
        self
    }
}

/// Document-level pieces around the map.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub title: String,
    /// Extra CSS rules
    pub style: String,
    /// Extra HTML placed above the map
    pub overlay: String,
}

impl Page {
    pub fn new(title: &str) -> Page {
        Page {
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn style(mut self, css: &str) -> Page {
        self.style = css.to_string();
        self
    }

    pub fn overlay(mut self, html: &str) -> Page {
        self.overlay = html.to_string();
        self
    }
}

/// A deck.gl map: layers, camera, tooltip and an optional HTML description.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub layers: Vec<Layer>,
    pub initial_view_state: ViewState,
    pub map_style: String,
    pub tooltip: Option<String>,
    #[serde(skip)]
    pub description: Option<String>,
}

impl Deck {
    pub fn new(initial_view_state: ViewState) -> Deck {
        Deck {
            layers: vec![],
            initial_view_state,
            map_style: CARTO_DARK_STYLE.to_string(),
            tooltip: None,
            description: None,
        }
    }

    pub fn layer(mut self, layer: Layer) -> Deck {
        self.layers.push(layer);
        self
    }

    /// Tooltip text; `{field}` is replaced by the hovered row's field.
    pub fn tooltip(mut self, template: &str) -> Deck {
        self.tooltip = Some(template.to_string());
        self
    }

    /// Trusted HTML shown in a box in the top-left corner.
    pub fn description(mut self, html: String) -> Deck {
        self.description = Some(html);
        self
    }

    /// The deck spec as JSON that is safe to embed in a `<script>` element.
    pub fn spec_json(&self) -> Result<String, Error> {
        let json = serde_json::to_string(self)?;
        // `<`, `>` and `&` only occur inside JSON strings, where unicode escapes are valid.
        Ok(json
            .replace('<', "\\u003c")
            .replace('>', "\\u003e")
            .replace('&', "\\u0026"))
    }

    /// Render a standalone HTML document.
    pub fn to_html(&self, page: &Page) -> Result<String, Error> {
        let description = match &self.description {
            Some(html) => format!("  <div class=\"deck-description\">{}</div>", html),
            None => String::new(),
        };
        let spec = self.spec_json()?;
        let title = escape_html(&page.title);
        Ok(fill_template(
            PAGE_TEMPLATE,
            &[
                ("title", title.as_str()),
                ("deck_js", DECK_GL_JS),
                ("maplibre_js", MAPLIBRE_JS),
                ("maplibre_css", MAPLIBRE_CSS),
                ("style", page.style.as_str()),
                ("description", description.as_str()),
                ("overlay", page.overlay.as_str()),
                ("spec", spec.as_str()),
            ],
        ))
    }
}

/// Substitute `{{name}}` markers in a single pass. Inserted text is never scanned
/// again, and unknown markers are left as they are.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut html = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        html.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let value = after.find("}}").and_then(|end| {
            values
                .iter()
                .find(|(name, _)| *name == &after[..end])
                .map(|(_, value)| (end, *value))
        });
        match value {
            Some((end, value)) => {
                html.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                html.push_str("{{");
                rest = after;
            }
        }
    }
    html.push_str(rest);
    html
}
