//! Common library exports shared between the filter backend and its callers.

extern crate serde;


pub mod search_const;
pub mod filter_criteria;
pub mod search_params;
pub mod search_result;
pub mod taggable;
