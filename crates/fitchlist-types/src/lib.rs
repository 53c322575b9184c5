pub mod column;
pub mod error;
pub mod page;
pub mod row;
pub mod view;

pub use column::*;
pub use error::{Error, Result};
pub use page::*;
pub use row::*;
pub use view::*;
