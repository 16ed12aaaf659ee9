pub mod answers;
pub mod limit;
pub mod parse;
pub mod session;
