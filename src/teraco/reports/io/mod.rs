pub mod convert;
pub mod fs;
pub mod store;
pub mod workbook;
