mod errors;
pub mod utils;
