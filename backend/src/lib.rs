//! Document search backend: composes advanced search queries from filter
//! criteria, runs them against the search service and loads the matching
//! editions in ranking order.

pub mod api;
pub mod config;
pub mod db_utils;
pub mod server_extra;
