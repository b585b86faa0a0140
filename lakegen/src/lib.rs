pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod inspect;
pub mod plan;
pub mod run;
pub mod storage;

pub use error::{GenError, Result};
