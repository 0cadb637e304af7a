pub mod cell;
pub mod field;
pub mod frame;
pub mod map;
pub mod spread;
