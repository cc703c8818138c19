pub mod reader;
pub mod utils;
pub mod writer;

pub use reader::ExcelReader;
pub use writer::{ExcelWriter, OUTPUT_FILE_NAME, XLSX_MIME_TYPE};
