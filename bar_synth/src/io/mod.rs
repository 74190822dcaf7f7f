//! Text encodings for generated fixtures.
//!
//! Both encodings carry the same six columns in the same order and render
//! prices with two fractional digits:
//!
//! | format    | header           | row                                         |
//! |-----------|------------------|---------------------------------------------|
//! | delimited | `ts,o,h,l,c,v`   | `2024-01-08T14:30:00Z,220.00,220.61,219.87,220.43,31874` |
//! | spaced    | `# ts o h l c v` | `2024-01-08T14:30:00Z 220.00 220.61 219.87 220.43 31874` |

pub mod delimited;
pub mod file;
pub mod reader;
pub mod sink;
pub mod spaced;

/// Column names shared by both encodings.
pub const COLUMNS: [&str; 6] = ["ts", "o", "h", "l", "c", "v"];

/// A price as it appears in a fixture.
pub(crate) fn format_price(price: f64) -> String {
    format!("{price:.2}")
}
