// Spreadsheet generation from the first table of a document.

pub mod sheet_service;
pub mod table_extract;

#[allow(unused_imports)]
pub use sheet_service::{SheetComposeService, SheetError, SpreadsheetHost};
#[allow(unused_imports)]
pub use table_extract::first_table_grid;
