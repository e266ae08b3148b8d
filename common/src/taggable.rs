//! Select options for tagging content with topics, organisations and roles.

use std::str::FromStr;

use serde::{Deserialize, Serialize};


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash, PartialOrd, Ord)]
pub struct TaggableOption {
    pub label: String,
    pub id: u64,
}

impl TaggableOption {
    pub fn new(label: impl Into<String>, id: u64) -> Self {
        Self { label: label.into(), id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaggableKind {
    Topics,
    TopicalEvents,
    Organisations,
    MinisterialRoleAppointments,
}

impl TaggableKind {
    /// Prefix of the cache digest for this list.
    pub fn cache_prefix(&self) -> &'static str {
        match self {
            TaggableKind::Topics => "taggable-topics",
            TaggableKind::TopicalEvents => "taggable-topical-events",
            TaggableKind::Organisations => "taggable-organisations",
            TaggableKind::MinisterialRoleAppointments => "taggable-ministerial-role-appointments",
        }
    }
}

impl FromStr for TaggableKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "topics" => Ok(TaggableKind::Topics),
            "topical-events" => Ok(TaggableKind::TopicalEvents),
            "organisations" => Ok(TaggableKind::Organisations),
            "ministerial-role-appointments" => Ok(TaggableKind::MinisterialRoleAppointments),
            other => Err(format!("unknown taggable kind: {other}")),
        }
    }
}
