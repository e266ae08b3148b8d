//! Builds advanced search parameters from filter criteria.
//!
//! Each `filter_by_*` function returns the sub-map for one criterion, empty
//! when the criterion is absent. Sub-maps never share keys, so merge order
//! does not matter.

use chrono::NaiveDate;
use common::{
    filter_criteria::{DateDirection, FilterCriteria, PeopleSelection, SearchType},
    search_const::SEARCH_DATE_FORMAT,
    search_params::{ParamValue, SearchParameters},
};

use crate::api::document_filter::format_types::{
    ContentType, DEFAULT_PUBLICATION_TYPES, find_announcement_option, find_publication_option,
};


pub fn build_search_parameters(
    criteria: &FilterCriteria,
    search_type: SearchType,
    relevant_to_local_government_default: bool,
) -> SearchParameters {
    standard_filter_args(criteria, relevant_to_local_government_default).merge(filter_by_format_type(criteria, search_type))
}

pub fn standard_filter_args(criteria: &FilterCriteria, relevant_to_local_government_default: bool) -> SearchParameters {
    default_filter_args(criteria)
        .merge(filter_by_keywords(criteria))
        .merge(filter_by_relevance_to_local_government(criteria, relevant_to_local_government_default))
        .merge(filter_by_people(criteria))
        .merge(filter_by_topics(criteria))
        .merge(filter_by_organisations(criteria))
        .merge(filter_by_locations(criteria))
        .merge(filter_by_date(criteria))
        .merge(sort(criteria))
}

pub fn default_filter_args(criteria: &FilterCriteria) -> SearchParameters {
    SearchParameters::single("page", ParamValue::text(criteria.page))
        .merge(SearchParameters::single("per_page", ParamValue::text(criteria.per_page)))
}

pub fn filter_by_keywords(criteria: &FilterCriteria) -> SearchParameters {
    match criteria.present_keywords() {
        Some(keywords) => SearchParameters::single("keywords", ParamValue::text(keywords)),
        None => SearchParameters::new(),
    }
}

pub fn filter_by_relevance_to_local_government(criteria: &FilterCriteria, default: bool) -> SearchParameters {
    let relevant = criteria.relevant_to_local_government.unwrap_or(default);
    SearchParameters::single("relevant_to_local_government", ParamValue::text(relevant))
}

pub fn filter_by_people(criteria: &FilterCriteria) -> SearchParameters {
    match &criteria.people {
        PeopleSelection::Only(ids) if !ids.is_empty() => SearchParameters::single("people", ParamValue::list(ids)),
        _ => SearchParameters::new(),
    }
}

pub fn filter_by_topics(criteria: &FilterCriteria) -> SearchParameters {
    if criteria.topics.is_empty() {
        return SearchParameters::new();
    }
    SearchParameters::single("topics", ParamValue::list(&criteria.topics))
}

pub fn filter_by_organisations(criteria: &FilterCriteria) -> SearchParameters {
    if criteria.organisations.is_empty() {
        return SearchParameters::new();
    }
    SearchParameters::single("organisations", ParamValue::list(&criteria.organisations))
}

pub fn filter_by_locations(criteria: &FilterCriteria) -> SearchParameters {
    if criteria.world_locations.is_empty() {
        return SearchParameters::new();
    }
    SearchParameters::single("world_locations", ParamValue::list(&criteria.world_locations))
}

/// A `before` date excludes the day itself: the bound sent is the previous day.
pub fn filter_by_date(criteria: &FilterCriteria) -> SearchParameters {
    let (Some(date), Some(direction)) = (criteria.date, criteria.date_direction()) else {
        return SearchParameters::new();
    };
    let bound = match direction {
        DateDirection::Before => date.pred_opt().map(|day_before| ("before", day_before)),
        DateDirection::After => Some(("after", date)),
    };
    match bound {
        Some((key, day)) => SearchParameters::single("public_timestamp", ParamValue::nested(key, format_date(day))),
        None => SearchParameters::new(),
    }
}

/// Keyword searches keep the provider's relevance ordering.
pub fn sort(criteria: &FilterCriteria) -> SearchParameters {
    if criteria.present_keywords().is_some() {
        return SearchParameters::new();
    }
    match criteria.date_direction() {
        Some(DateDirection::Before) => SearchParameters::single("order", ParamValue::nested("public_timestamp", "desc")),
        Some(DateDirection::After) => SearchParameters::single("order", ParamValue::nested("public_timestamp", "asc")),
        None => SearchParameters::new(),
    }
}

pub fn filter_by_format_type(criteria: &FilterCriteria, search_type: SearchType) -> SearchParameters {
    let types = match search_type {
        SearchType::Announcements => filter_by_announcement_type(criteria),
        SearchType::Publications => filter_by_publication_type(criteria),
        SearchType::Policies => vec![ContentType::Policy.search_format_type().to_string()],
    };
    SearchParameters::single("search_format_types", ParamValue::List(types))
}

fn filter_by_announcement_type(criteria: &FilterCriteria) -> Vec<String> {
    match criteria.announcement_type.as_deref().and_then(find_announcement_option) {
        Some(option) => option.search_format_types(),
        None => vec![ContentType::Announcement.search_format_type().to_string()],
    }
}

fn filter_by_publication_type(criteria: &FilterCriteria) -> Vec<String> {
    match criteria.publication_type.as_deref().and_then(find_publication_option) {
        Some(option) => option.search_format_types(),
        None => DEFAULT_PUBLICATION_TYPES.iter().map(|t| t.search_format_type().to_string()).collect(),
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(SEARCH_DATE_FORMAT).to_string()
}


#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn nested(key: &str, value: &str) -> ParamValue {
        ParamValue::Nested(BTreeMap::from([(key.to_string(), value.to_string())]))
    }

    fn list(values: &[&str]) -> ParamValue {
        ParamValue::List(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn empty_criteria_only_paginate_and_flag_relevance() {
        let params = standard_filter_args(&FilterCriteria::new(3, 15), false);
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["page", "per_page", "relevant_to_local_government"]);
        assert_eq!(params.get("page"), Some(&ParamValue::Text("3".into())));
        assert_eq!(params.get("per_page"), Some(&ParamValue::Text("15".into())));
        assert_eq!(params.get("relevant_to_local_government"), Some(&ParamValue::Text("false".into())));
    }

    #[test]
    fn relevance_flag_prefers_criteria_over_default() {
        let criteria = FilterCriteria::default();
        assert_eq!(
            filter_by_relevance_to_local_government(&criteria, true).get("relevant_to_local_government"),
            Some(&ParamValue::Text("true".into()))
        );
        let criteria = criteria.with_relevant_to_local_government(false);
        assert_eq!(
            filter_by_relevance_to_local_government(&criteria, true).get("relevant_to_local_government"),
            Some(&ParamValue::Text("false".into()))
        );
    }

    #[test]
    fn blank_keywords_are_omitted() {
        assert!(filter_by_keywords(&FilterCriteria::default().with_keywords("   ")).is_empty());
        assert_eq!(
            filter_by_keywords(&FilterCriteria::default().with_keywords(" tax credits ")).get("keywords"),
            Some(&ParamValue::Text("tax credits".into()))
        );
    }

    #[test]
    fn before_date_bound_is_the_previous_day() {
        let criteria = FilterCriteria::default().with_date(date(2013, 3, 1), "before");
        assert_eq!(filter_by_date(&criteria).get("public_timestamp"), Some(&nested("before", "2013-02-28")));
    }

    #[test]
    fn after_date_bound_is_the_date_itself() {
        let criteria = FilterCriteria::default().with_date(date(2013, 3, 1), "after");
        assert_eq!(filter_by_date(&criteria).get("public_timestamp"), Some(&nested("after", "2013-03-01")));
    }

    #[test]
    fn before_the_earliest_date_sends_no_bound() {
        let criteria = FilterCriteria::default().with_date(NaiveDate::MIN, "before");
        assert!(filter_by_date(&criteria).is_empty());
        let after = FilterCriteria::default().with_date(NaiveDate::MIN, "after");
        assert!(filter_by_date(&after).contains_key("public_timestamp"));
    }

    #[test]
    fn date_needs_a_recognised_direction() {
        let mut criteria = FilterCriteria::default();
        criteria.date = Some(date(2013, 3, 1));
        assert!(filter_by_date(&criteria).is_empty());
        assert!(filter_by_date(&criteria.clone().with_direction("sideways")).is_empty());
        assert!(filter_by_date(&FilterCriteria::default().with_direction("before")).is_empty());
    }

    #[test]
    fn sort_follows_direction_without_keywords() {
        let before = FilterCriteria::default().with_direction("before");
        assert_eq!(sort(&before).get("order"), Some(&nested("public_timestamp", "desc")));
        let after = FilterCriteria::default().with_direction("after");
        assert_eq!(sort(&after).get("order"), Some(&nested("public_timestamp", "asc")));
        assert!(sort(&FilterCriteria::default().with_direction("sideways")).is_empty());
        assert!(sort(&FilterCriteria::default()).is_empty());
    }

    #[test]
    fn keyword_searches_are_never_ordered() {
        for direction in ["before", "after", "other"] {
            let criteria = FilterCriteria::default().with_keywords("budget").with_date(date(2013, 1, 1), direction);
            let params = build_search_parameters(&criteria, SearchType::Announcements, false);
            assert!(!params.contains_key("order"), "unexpected order for {direction}");
        }
    }

    #[test]
    fn people_all_sentinel_is_omitted() {
        let criteria = FilterCriteria::default().with_people(PeopleSelection::from_values(vec!["all".into()]));
        assert!(filter_by_people(&criteria).is_empty());
        let criteria = FilterCriteria::default().with_people(PeopleSelection::Only(vec!["12".into(), "34".into()]));
        assert_eq!(filter_by_people(&criteria).get("people"), Some(&list(&["12", "34"])));
    }

    #[test]
    fn selections_are_stringified() {
        let criteria = FilterCriteria::default()
            .with_topics(vec![1, 2])
            .with_organisations(vec![9])
            .with_world_locations(vec!["france", "spain"]);
        let params = standard_filter_args(&criteria, false);
        assert_eq!(params.get("topics"), Some(&list(&["1", "2"])));
        assert_eq!(params.get("organisations"), Some(&list(&["9"])));
        assert_eq!(params.get("world_locations"), Some(&list(&["france", "spain"])));
    }

    #[test]
    fn publications_default_to_the_publication_family() {
        let params = build_search_parameters(&FilterCriteria::default(), SearchType::Publications, false);
        assert_eq!(
            params.get("search_format_types"),
            Some(&list(&["publication", "statistical-data-set", "consultation"]))
        );
    }

    #[test]
    fn publication_option_overrides_default_types() {
        let criteria = FilterCriteria::default().with_publication_type("consultations");
        let params = build_search_parameters(&criteria, SearchType::Publications, false);
        assert_eq!(params.get("search_format_types"), Some(&list(&["consultation"])));

        let unknown = FilterCriteria::default().with_publication_type("no-such-option");
        let params = build_search_parameters(&unknown, SearchType::Publications, false);
        assert_eq!(
            params.get("search_format_types"),
            Some(&list(&["publication", "statistical-data-set", "consultation"]))
        );
    }

    #[test]
    fn announcements_default_to_generic_type() {
        let params = build_search_parameters(&FilterCriteria::default(), SearchType::Announcements, false);
        assert_eq!(params.get("search_format_types"), Some(&list(&["announcement"])));

        let criteria = FilterCriteria::default().with_announcement_type("fatality-notices");
        let params = build_search_parameters(&criteria, SearchType::Announcements, false);
        assert_eq!(params.get("search_format_types"), Some(&list(&["fatality-notice"])));
    }

    #[test]
    fn policies_ignore_sub_filters() {
        let criteria = FilterCriteria::default().with_publication_type("consultations").with_announcement_type("speeches");
        let params = build_search_parameters(&criteria, SearchType::Policies, false);
        assert_eq!(params.get("search_format_types"), Some(&list(&["policy"])));
    }
}
