//! Builders turning input records into intermediate TEI trees.
//!
//! The header builder and the page builder are independent of each other;
//! their output is later combined by [`crate::merge`].
//!
//! # Example
//!
//! ```
//! use teiconv::convert::build_page;
//! use teiconv::model::{Page, Token};
//!
//! let mut page = Page::new("uuid:1");
//! page.add_token(Token::new("Praha", 1).with_labels("B-gu"));
//! page.add_token(Token::new("žije", 2));
//!
//! let div = build_page(&page).unwrap();
//! assert_eq!(div.count("placeName"), 1);
//! ```

mod header;
pub mod normalize;
mod page;

pub use header::{build_header, build_header_at, self_record, WHEN_FORMAT};
pub use page::{build_page, PageBuilder};
