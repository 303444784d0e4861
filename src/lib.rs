pub mod app;
pub mod market;
pub mod sim;
pub mod util;
