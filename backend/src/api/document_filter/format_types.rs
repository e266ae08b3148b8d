//! Search format type codes for each kind of content, and the announcement
//! and publication sub-filter options built on them.

use std::str::FromStr;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Announcement,
    NewsArticle,
    Speech,
    FatalityNotice,
    WorldLocationNewsArticle,
    Publication,
    StatisticalDataSet,
    Consultation,
    Policy,
}

impl ContentType {
    pub fn search_format_type(&self) -> &'static str {
        match self {
            ContentType::Announcement => "announcement",
            ContentType::NewsArticle => "news-article",
            ContentType::Speech => "speech",
            ContentType::FatalityNotice => "fatality-notice",
            ContentType::WorldLocationNewsArticle => "world-location-news-article",
            ContentType::Publication => "publication",
            ContentType::StatisticalDataSet => "statistical-data-set",
            ContentType::Consultation => "consultation",
            ContentType::Policy => "policy",
        }
    }
}

impl FromStr for ContentType {
    type Err = String;

    /// Parses the model name a content type is stored under, e.g. `StatisticalDataSet`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Announcement" => Ok(ContentType::Announcement),
            "NewsArticle" => Ok(ContentType::NewsArticle),
            "Speech" => Ok(ContentType::Speech),
            "FatalityNotice" => Ok(ContentType::FatalityNotice),
            "WorldLocationNewsArticle" => Ok(ContentType::WorldLocationNewsArticle),
            "Publication" => Ok(ContentType::Publication),
            "StatisticalDataSet" => Ok(ContentType::StatisticalDataSet),
            "Consultation" => Ok(ContentType::Consultation),
            "Policy" => Ok(ContentType::Policy),
            other => Err(format!("unknown content type: {other}")),
        }
    }
}

/// Type codes for a list of model names. Unknown names are skipped.
pub fn search_format_types_from_model_names<S: AsRef<str>>(model_names: &[S]) -> Vec<&'static str> {
    model_names
        .iter()
        .filter_map(|name| name.as_ref().parse::<ContentType>().ok())
        .map(|content_type| content_type.search_format_type())
        .collect()
}

pub const DEFAULT_PUBLICATION_TYPES: [ContentType; 3] =
    [ContentType::Publication, ContentType::StatisticalDataSet, ContentType::Consultation];


/// One entry of a sub-filter drop-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOption {
    pub slug: &'static str,
    pub label: &'static str,
    pub search_format_types: &'static [&'static str],
}

impl FilterOption {
    pub fn search_format_types(&self) -> Vec<String> {
        self.search_format_types.iter().map(|t| t.to_string()).collect()
    }
}

pub const ANNOUNCEMENT_FILTER_OPTIONS: &[FilterOption] = &[
    FilterOption {
        slug: "press-releases",
        label: "Press releases",
        search_format_types: &["news-article-press-release"],
    },
    FilterOption {
        slug: "news-stories",
        label: "News stories",
        search_format_types: &["news-article-news-story", "world-location-news-article"],
    },
    FilterOption { slug: "fatality-notices", label: "Fatality notices", search_format_types: &["fatality-notice"] },
    FilterOption {
        slug: "speeches",
        label: "Speeches",
        search_format_types: &["speech-transcript", "speech-draft-text", "speech-speaking-notes"],
    },
    FilterOption {
        slug: "statements",
        label: "Statements",
        search_format_types: &["speech-written-ministerial-statement", "speech-oral-ministerial-statement"],
    },
    FilterOption {
        slug: "government-responses",
        label: "Government responses",
        search_format_types: &["news-article-government-response"],
    },
];

pub const PUBLICATION_FILTER_OPTIONS: &[FilterOption] = &[
    FilterOption {
        slug: "policy-papers",
        label: "Policy papers",
        search_format_types: &["publication-policy-paper", "publication-impact-assessment"],
    },
    FilterOption { slug: "consultations", label: "Consultations", search_format_types: &["consultation"] },
    FilterOption {
        slug: "guidance",
        label: "Guidance",
        search_format_types: &["publication-guidance", "publication-form"],
    },
    FilterOption {
        slug: "statistics",
        label: "Statistics",
        search_format_types: &["publication-statistics", "publication-national-statistics", "statistical-data-set"],
    },
    FilterOption {
        slug: "research-and-analysis",
        label: "Research and analysis",
        search_format_types: &["publication-research-and-analysis", "publication-independent-report"],
    },
    FilterOption {
        slug: "corporate-reports",
        label: "Corporate reports",
        search_format_types: &["publication-corporate-report"],
    },
    FilterOption {
        slug: "transparency-data",
        label: "Transparency data",
        search_format_types: &["publication-transparency-data"],
    },
    FilterOption {
        slug: "foi-releases",
        label: "FOI releases",
        search_format_types: &["publication-foi-release"],
    },
];

pub fn find_announcement_option(slug: &str) -> Option<&'static FilterOption> {
    ANNOUNCEMENT_FILTER_OPTIONS.iter().find(|option| option.slug == slug)
}

pub fn find_publication_option(slug: &str) -> Option<&'static FilterOption> {
    PUBLICATION_FILTER_OPTIONS.iter().find(|option| option.slug == slug)
}
