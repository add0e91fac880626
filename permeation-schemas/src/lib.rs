pub mod boundary;
pub mod experiment;
pub mod file_formats;
pub mod material;
pub mod mesh;
pub mod model;
pub mod property;
pub mod series;
