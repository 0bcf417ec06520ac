use serde::Serialize;

/// An opaque RGB color, serialized as `[r, g, b]` the way deck.gl expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub fn css(&self) -> String {
        let [r, g, b] = self.0;
        format!("rgb({}, {}, {})", r, g, b)
    }

    pub fn hex(&self) -> String {
        let [r, g, b] = self.0;
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }
}

/// Heatmap color range, lowest density first.
pub const HEATMAP_COLOR_RANGE: [Rgb; 32] = [
    Rgb([247, 252, 240]),
    Rgb([242, 250, 229]),
    Rgb([237, 248, 217]),
    Rgb([232, 246, 206]),
    Rgb([227, 244, 195]),
    Rgb([222, 243, 184]),
    Rgb([217, 241, 173]),
    Rgb([204, 235, 197]),
    Rgb([191, 229, 220]),
    Rgb([179, 223, 204]),
    Rgb([166, 217, 188]),
    Rgb([153, 211, 172]),
    Rgb([140, 205, 156]),
    Rgb([123, 204, 196]),
    Rgb([106, 203, 196]),
    Rgb([89, 202, 196]),
    Rgb([72, 201, 196]),
    Rgb([55, 200, 196]),
    Rgb([38, 199, 196]),
    Rgb([21, 198, 196]),
    Rgb([67, 162, 202]),
    Rgb([57, 152, 192]),
    Rgb([47, 142, 182]),
    Rgb([37, 132, 172]),
    Rgb([27, 122, 162]),
    Rgb([17, 112, 152]),
    Rgb([8, 104, 172]),
    Rgb([7, 93, 162]),
    Rgb([6, 82, 152]),
    Rgb([5, 71, 142]),
    Rgb([4, 60, 132]),
    Rgb([3, 49, 122]),
];

/// CSS `linear-gradient` running through `colors` from bottom to top.
pub fn css_gradient_to_top(colors: &[Rgb]) -> String {
    let last = colors.len().saturating_sub(1).max(1) as f64;
    let stops = colors
        .iter()
        .enumerate()
        .map(|(i, color)| format!("{} {:.1}%", color.hex(), i as f64 / last * 100.0))
        .collect::<Vec<String>>();
    format!("linear-gradient(to top, {})", stops.join(", "))
}
