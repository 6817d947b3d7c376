pub mod entity;
pub mod enums;
pub mod filters;
pub mod table;

pub use entity::*;
pub use enums::*;
pub use filters::*;
pub use table::*;
