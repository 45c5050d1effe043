mod mapbox;

pub use mapbox::MapboxGeocoder;
