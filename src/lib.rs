pub mod layers;
pub mod render;
