pub mod error;
pub mod features;
pub mod geo_util;
pub mod poi;
pub mod route_network;
