//! Constants shared by the query composer and its callers.

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PER_PAGE: u64 = 20;

/// Upper bound on a caller-requested page size.
pub const MAX_PER_PAGE: u64 = 100;

/// Value of the people selection meaning "every person", i.e. no constraint.
pub const PEOPLE_ALL_SENTINEL: &str = "all";

/// World location slug sent by the "All locations" select option. It names no
/// location, so it is dropped rather than sent as a facet value.
pub const WORLD_LOCATIONS_ALL_SENTINEL: &str = "all";

/// Date format used for `public_timestamp` bounds sent to the search service.
pub const SEARCH_DATE_FORMAT: &str = "%Y-%m-%d";
