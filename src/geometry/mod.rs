//! Point and region value types used for every on-screen coordinate.

pub mod point;
pub mod region;

pub use point::Point;
pub use region::Region;
