pub mod nutrition;
pub mod translate;
