//! HTTP routes exposing the document filter and taggable option lists.

pub mod document_filter;
