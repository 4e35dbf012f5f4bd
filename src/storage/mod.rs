pub mod report_writer;
pub mod storage_manager;

pub use report_writer::*;
pub use storage_manager::*;
