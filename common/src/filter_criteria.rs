//! Filter criteria for document searches and the permissive parsing of raw web input.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::search_const::{DEFAULT_PER_PAGE, MAX_PER_PAGE, PEOPLE_ALL_SENTINEL, WORLD_LOCATIONS_ALL_SENTINEL};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    Announcements,
    Publications,
    Policies,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Announcements => "announcements",
            SearchType::Publications => "publications",
            SearchType::Policies => "policies",
        }
    }
}

impl FromStr for SearchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "announcements" => Ok(SearchType::Announcements),
            "publications" => Ok(SearchType::Publications),
            "policies" => Ok(SearchType::Policies),
            other => Err(format!("unknown search type: {other}")),
        }
    }
}


/// Direction of a date filter. Anything other than `before`/`after` has no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateDirection {
    Before,
    After,
}

impl DateDirection {
    pub fn parse(raw: &str) -> Option<DateDirection> {
        match raw {
            "before" => Some(DateDirection::Before),
            "after" => Some(DateDirection::After),
            _ => None,
        }
    }
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PeopleSelection {
    /// Nothing selected.
    #[default]
    Any,
    /// The explicit "all people" choice.
    All,
    Only(Vec<String>),
}

impl PeopleSelection {
    pub fn from_values(values: Vec<String>) -> PeopleSelection {
        let values = values
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>();
        if values.is_empty() {
            PeopleSelection::Any
        } else if values.len() == 1 && values[0] == PEOPLE_ALL_SENTINEL {
            PeopleSelection::All
        } else {
            PeopleSelection::Only(values)
        }
    }
}


/// Criteria for one document search. Every field is optional; an absent
/// field places no constraint on the search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub keywords: Option<String>,
    pub people: PeopleSelection,
    pub topics: Vec<u64>,
    pub organisations: Vec<u64>,
    pub world_locations: Vec<String>,
    pub date: Option<NaiveDate>,
    /// Kept raw: unrecognised values are ignored rather than rejected.
    pub direction: Option<String>,
    pub announcement_type: Option<String>,
    pub publication_type: Option<String>,
    pub relevant_to_local_government: Option<bool>,
    pub page: u64,
    pub per_page: u64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            keywords: None,
            people: PeopleSelection::Any,
            topics: vec![],
            organisations: vec![],
            world_locations: vec![],
            date: None,
            direction: None,
            announcement_type: None,
            publication_type: None,
            relevant_to_local_government: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl FilterCriteria {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page: page.max(1), per_page: per_page.clamp(1, MAX_PER_PAGE), ..Default::default() }
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn with_people(mut self, people: PeopleSelection) -> Self {
        self.people = people;
        self
    }

    pub fn with_topics(mut self, topics: Vec<u64>) -> Self {
        self.topics = topics;
        self
    }

    pub fn with_organisations(mut self, organisations: Vec<u64>) -> Self {
        self.organisations = organisations;
        self
    }

    pub fn with_world_locations(mut self, slugs: Vec<impl Into<String>>) -> Self {
        self.world_locations = slugs.into_iter().map(|s| s.into()).collect();
        self
    }

    pub fn with_date(mut self, date: NaiveDate, direction: impl Into<String>) -> Self {
        self.date = Some(date);
        self.direction = Some(direction.into());
        self
    }

    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    pub fn with_announcement_type(mut self, slug: impl Into<String>) -> Self {
        self.announcement_type = Some(slug.into());
        self
    }

    pub fn with_publication_type(mut self, slug: impl Into<String>) -> Self {
        self.publication_type = Some(slug.into());
        self
    }

    pub fn with_relevant_to_local_government(mut self, relevant: bool) -> Self {
        self.relevant_to_local_government = Some(relevant);
        self
    }

    /// Keywords with surrounding whitespace removed, `None` when blank.
    pub fn present_keywords(&self) -> Option<&str> {
        self.keywords.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// The recognised date direction, `None` when absent or unrecognised.
    pub fn date_direction(&self) -> Option<DateDirection> {
        self.direction.as_deref().and_then(DateDirection::parse)
    }

    /// Builds criteria from raw request parameters. Malformed values are
    /// dropped or replaced by defaults, never reported as errors.
    pub fn from_raw(raw: &RawFilterParams, default_per_page: u64) -> Self {
        let page = parse_number(raw.page.as_deref()).unwrap_or(1);
        let per_page = parse_number(raw.per_page.as_deref()).unwrap_or(default_per_page);
        FilterCriteria {
            keywords: non_blank(raw.keywords.as_deref()),
            people: PeopleSelection::from_values(raw.people.clone()),
            topics: parse_ids(&raw.topics),
            organisations: parse_ids(&raw.organisations),
            world_locations: raw
                .world_locations
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty() && *s != WORLD_LOCATIONS_ALL_SENTINEL)
                .map(|s| s.to_string())
                .collect(),
            date: raw.date.as_deref().and_then(parse_date),
            direction: non_blank(raw.direction.as_deref()),
            announcement_type: non_blank(raw.announcement_type.as_deref()),
            publication_type: non_blank(raw.publication_type.as_deref()),
            relevant_to_local_government: raw.relevant_to_local_government.as_deref().and_then(parse_bool),
            ..FilterCriteria::new(page, per_page)
        }
    }
}


/// Filter parameters exactly as they arrive from a web request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RawFilterParams {
    pub keywords: Option<String>,
    pub people: Vec<String>,
    pub topics: Vec<String>,
    pub organisations: Vec<String>,
    pub world_locations: Vec<String>,
    pub date: Option<String>,
    pub direction: Option<String>,
    pub announcement_type: Option<String>,
    pub publication_type: Option<String>,
    pub relevant_to_local_government: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl RawFilterParams {
    /// Collects query-string pairs. List parameters accept both `topics=1`
    /// and `topics[]=1` forms; unknown keys are ignored.
    pub fn from_pairs<K: AsRef<str>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut raw = RawFilterParams::default();
        for (key, value) in pairs {
            let value = value.into();
            let key = key.as_ref();
            let key = key.strip_suffix("[]").unwrap_or(key);
            match key {
                "keywords" => raw.keywords = Some(value),
                "people" => raw.people.push(value),
                "topics" => raw.topics.push(value),
                "organisations" => raw.organisations.push(value),
                "world_locations" => raw.world_locations.push(value),
                "date" => raw.date = Some(value),
                "direction" => raw.direction = Some(value),
                "announcement_type" => raw.announcement_type = Some(value),
                "publication_type" => raw.publication_type = Some(value),
                "relevant_to_local_government" => raw.relevant_to_local_government = Some(value),
                "page" => raw.page = Some(value),
                "per_page" => raw.per_page = Some(value),
                _ => {}
            }
        }
        raw
    }
}


fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(|v| v.to_string())
}

fn parse_number(value: Option<&str>) -> Option<u64> {
    value.and_then(|v| v.trim().parse::<u64>().ok())
}

fn parse_ids(values: &[String]) -> Vec<u64> {
    values.iter().filter_map(|v| v.trim().parse::<u64>().ok()).collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}
