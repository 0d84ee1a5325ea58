//! # block-migrate-html
//!
//! HTML implementations of the collaborators `block-migrate` depends on.
//!
//! - [`HtmlParser`] evaluates extraction rules as CSS selectors over an HTML
//!   fragment.
//! - [`HtmlValidator`] decides whether two fragments are structurally the
//!   same: same elements, same attributes (class tokens compared as a set),
//!   same whitespace-collapsed text. Comments are ignored.
//! - [`escape_attribute`] and [`escape_text`] are for canonical renderers
//!   that build markup by hand.
//!
//! ```ignore
//! use block_migrate::MigrationResolver;
//! use block_migrate_html::{HtmlParser, HtmlValidator};
//!
//! let resolver = MigrationResolver::new(&block_type, &HtmlParser, &HtmlValidator);
//! ```

mod equivalence;
mod escape;
mod parser;

pub use equivalence::HtmlValidator;
pub use escape::{escape_attribute, escape_text};
pub use parser::HtmlParser;
