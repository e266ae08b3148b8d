//! Document search and taggable content operations.

pub mod document_filter;
pub mod taggable_content;
