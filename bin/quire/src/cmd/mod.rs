//! Command implementations.

pub mod build;
pub mod check;
pub mod init;
pub mod page;
pub mod site;
