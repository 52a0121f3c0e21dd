//! Embassy tasks

pub mod bus;
pub mod console_rx;
pub mod console_tx;
