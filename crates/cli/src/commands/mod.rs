pub mod patch;
pub mod scan;

pub use patch::*;
pub use scan::*;
