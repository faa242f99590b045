pub mod repository_util;

pub use repository_util::*;
