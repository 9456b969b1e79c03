pub mod bounds1;
pub mod bounds3;
pub mod lbbox;
pub mod vector3;

pub use bounds1::*;
pub use bounds3::*;
pub use lbbox::*;
pub use vector3::*;
