//! Sheet storage: provision trees and stage records as CSV files.

mod error;
pub mod sheet;
pub mod table;

pub use error::StoreError;
pub use sheet::{
    read_matches, read_structure, read_translations, write_matches, write_structure,
    write_translations,
};
pub use table::{PREAMBLE_LEVEL, StructureRow, clean_cell, flatten, rebuild};
