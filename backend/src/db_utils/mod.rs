//! Clients for the search service and the stores behind it.

pub mod clickhouse_utils;
pub mod search_gateway;
pub mod edition_store;
pub mod taggable_source;
