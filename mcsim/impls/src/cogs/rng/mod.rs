pub mod rand;
pub mod wyhash;
