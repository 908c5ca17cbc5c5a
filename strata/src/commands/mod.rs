// strata/src/commands/mod.rs

pub mod generate;
pub mod init;
pub mod inspect;
