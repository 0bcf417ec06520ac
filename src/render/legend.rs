use crate::layers::route_network::{
    EmissionLevel, EmissionSummary, LOW_EMISSION_KG, MEDIUM_EMISSION_KG,
};

use super::color::{css_gradient_to_top, Rgb};
use super::error::Error;
use super::escape_html;

const LEGEND_STYLE: &str = r#"<style>
  .legend {
    width: 300px;
  }
  .square {
    height: 15px;
    width: 15px;
    border: 1px solid grey;
    display: inline-block;
    margin-right: 5px;
  }
</style>"#;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendLabel {
    pub text: String,
    pub color: Rgb,
}

/// One label per emission bucket, highest first.
pub fn emission_labels() -> Vec<LegendLabel> {
    let level_label = |level: EmissionLevel, range: String| LegendLabel {
        text: format!("{} ({} kg CO2)", level.label(), range),
        color: Rgb(level.rgb()),
    };
    vec![
        level_label(EmissionLevel::High, format!(">= {:.2}", MEDIUM_EMISSION_KG)),
        level_label(
            EmissionLevel::Medium,
            format!("{:.2} - {:.2}", LOW_EMISSION_KG, MEDIUM_EMISSION_KG),
        ),
        level_label(EmissionLevel::Low, format!("< {:.2}", LOW_EMISSION_KG)),
    ]
}

/// One line describing the emissions actually seen in the dataset.
pub fn observed_range(summary: &EmissionSummary) -> String {
    format!(
        "<p>Observed: {:.2} - {:.2} kg CO2 (mid {:.2}, total {:.2})</p>",
        summary.min, summary.max, summary.mid, summary.total
    )
}

/// Render the text legend: a heading and one colored square per label.
pub fn render_legend(heading: &str, labels: &[LegendLabel]) -> Result<String, Error> {
    let mut html = String::from(LEGEND_STYLE);
    html.push_str(&format!("\n<h2>{}</h2>", escape_html(heading)));
    for label in labels {
        if label.text.trim().is_empty() {
            return Err(Error::InvalidLegend(format!(
                "label with color {} has no text",
                label.color.css()
            )));
        }
        html.push_str(&format!(
            "\n<div class='legend'>\n  <div class=\"square\" style=\"background:{}\"></div>\n  <span>{}</span>\n</div>",
            label.color.css(),
            escape_html(&label.text)
        ));
    }
    Ok(html)
}

/// A vertical colorbar in the bottom-left corner with low/high labels.
pub struct GradientLegend<'a> {
    pub title: &'a str,
    pub colors: &'a [Rgb],
    pub low_label: String,
    pub high_label: String,
}

impl GradientLegend<'_> {
    pub fn style(&self) -> String {
        format!(
            r#"    .colorbar {{
      width: 20px;
      height: 200px;
      background: {};
      position: absolute;
      bottom: 20px;
      left: 20px;
      z-index: 2;
      border: 1px solid black;
    }}
    .colorbar-label {{
      position: absolute;
      left: 50px;
      z-index: 2;
      color: white;
      font-family: Arial, sans-serif;
      font-size: 12px;
    }}
    .title {{
      position: absolute;
      top: 10px;
      left: 50%;
      z-index: 2;
      transform: translateX(-50%);
      color: white;
      font-family: Arial, sans-serif;
      font-size: 24px;
    }}"#,
            css_gradient_to_top(self.colors)
        )
    }

    pub fn overlay(&self) -> String {
        format!(
            r#"  <div class="title">{}</div>
  <div class="colorbar"></div>
  <div class="colorbar-label" style="bottom: 20px;">{}</div>
  <div class="colorbar-label" style="bottom: 220px;">{}</div>"#,
            escape_html(self.title),
            escape_html(&self.low_label),
            escape_html(&self.high_label)
        )
    }
}
