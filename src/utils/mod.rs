pub mod scroll;
pub mod url;
