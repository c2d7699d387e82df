pub mod check;
pub mod generate;
pub mod options;
pub mod variants;
