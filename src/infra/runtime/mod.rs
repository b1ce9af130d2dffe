pub mod limits;
pub mod stdio;
