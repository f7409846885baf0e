pub mod like_target;
pub mod object_id;
pub mod sort;

pub use like_target::*;
pub use object_id::*;
pub use sort::*;
