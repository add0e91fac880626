pub mod boundary;
pub mod builder;
pub mod materials;
pub mod mesh;
