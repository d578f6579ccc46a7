pub mod grouped;
pub mod inhomogeneous;
pub mod list;
