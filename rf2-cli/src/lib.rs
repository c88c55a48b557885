pub mod check;
pub mod cli;
pub mod create;
pub mod logging;
