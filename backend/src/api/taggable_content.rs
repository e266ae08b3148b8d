//! Select options for tagging content, cached until the underlying records change.
//!
//! Each list is stored under a digest of the `updated_at` timestamps of every
//! record it is built from, so editing or adding a record produces a new key
//! and the next read rebuilds the list.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use common::taggable::{TaggableKind, TaggableOption};
use lru::LruCache;

use crate::db_utils::taggable_source::{RoleAppointment, TaggableSource};

const CACHE_CAPACITY: usize = 64;
const LABEL_DATE_FORMAT: &str = "%-d %B %Y";


pub struct TaggableContent<S> {
    source: S,
    cache: Mutex<LruCache<String, Vec<TaggableOption>>>,
}

impl<S: TaggableSource> TaggableContent<S> {
    pub fn new(source: S) -> Self {
        let capacity = NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self { source, cache: Mutex::new(LruCache::new(capacity)) }
    }

    pub async fn taggable_topics(&self) -> anyhow::Result<Vec<TaggableOption>> {
        self.options(TaggableKind::Topics).await
    }

    pub async fn taggable_topical_events(&self) -> anyhow::Result<Vec<TaggableOption>> {
        self.options(TaggableKind::TopicalEvents).await
    }

    pub async fn taggable_organisations(&self) -> anyhow::Result<Vec<TaggableOption>> {
        self.options(TaggableKind::Organisations).await
    }

    /// Past and present ministerial appointments, labelled with the person,
    /// the role (with its dates when past) and the organisations.
    pub async fn taggable_ministerial_role_appointments(&self) -> anyhow::Result<Vec<TaggableOption>> {
        self.options(TaggableKind::MinisterialRoleAppointments).await
    }

    async fn current_digest(&self, kind: TaggableKind) -> anyhow::Result<String> {
        let timestamps = self.source.update_timestamps(kind).await?;
        Ok(cache_digest(kind, &timestamps))
    }

    async fn options(&self, kind: TaggableKind) -> anyhow::Result<Vec<TaggableOption>> {
        let digest = self.current_digest(kind).await?;
        let cached = self.lock_cache().get(&digest).cloned();
        if let Some(cached) = cached {
            tracing::debug!(kind = kind.cache_prefix(), "taggable options cache hit");
            return Ok(cached);
        }
        tracing::debug!(kind = kind.cache_prefix(), "taggable options cache miss");

        let options = match kind {
            TaggableKind::MinisterialRoleAppointments => self
                .source
                .ministerial_role_appointments()
                .await?
                .iter()
                .map(|appointment| TaggableOption::new(ministerial_role_appointment_label(appointment), appointment.id))
                .collect(),
            _ => self.source.named_options(kind).await?,
        };
        self.lock_cache().put(digest, options.clone());
        Ok(options)
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, LruCache<String, Vec<TaggableOption>>> {
        // A poisoned cache only holds complete entries, so keep using it.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}


pub fn cache_digest(kind: TaggableKind, update_timestamps: &[i64]) -> String {
    let joined = update_timestamps.iter().map(|t| t.to_string()).collect::<String>();
    sha256::digest(format!("{}-{}", kind.cache_prefix(), joined))
}

pub fn ministerial_role_appointment_label(appointment: &RoleAppointment) -> String {
    let mut role = appointment.role_name.clone();
    if let Some(ended_at) = appointment.ended_at {
        role.push_str(&format!(
            " ({} to {})",
            appointment.started_at.format(LABEL_DATE_FORMAT),
            ended_at.format(LABEL_DATE_FORMAT)
        ));
    }
    [appointment.person_name.clone(), role, to_sentence(&appointment.organisation_names)].join(", ")
}

/// `a`, `a and b`, `a, b and c`.
pub fn to_sentence(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}


#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;

    struct FakeSource {
        timestamps: Mutex<Vec<i64>>,
        loads: AtomicUsize,
    }

    impl FakeSource {
        fn new(timestamps: Vec<i64>) -> Self {
            Self { timestamps: Mutex::new(timestamps), loads: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl TaggableSource for FakeSource {
        async fn update_timestamps(&self, _kind: TaggableKind) -> anyhow::Result<Vec<i64>> {
            Ok(self.timestamps.lock().unwrap().clone())
        }

        async fn named_options(&self, _kind: TaggableKind) -> anyhow::Result<Vec<TaggableOption>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(vec![TaggableOption::new("Arts", 2), TaggableOption::new("Schools", 1)])
        }

        async fn ministerial_role_appointments(&self) -> anyhow::Result<Vec<RoleAppointment>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(vec![appointment(None)])
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn appointment(ended_at: Option<NaiveDate>) -> RoleAppointment {
        RoleAppointment {
            id: 11,
            person_name: "Jane Smith".into(),
            role_name: "Minister of State".into(),
            organisation_names: vec!["Cabinet Office".into(), "HM Treasury".into()],
            started_at: date(2010, 5, 12),
            ended_at,
        }
    }

    #[test]
    fn digest_changes_with_timestamps_and_kind() {
        let a = cache_digest(TaggableKind::Topics, &[100, 200]);
        assert_eq!(a, cache_digest(TaggableKind::Topics, &[100, 200]));
        assert_ne!(a, cache_digest(TaggableKind::Topics, &[100, 201]));
        assert_ne!(a, cache_digest(TaggableKind::Topics, &[100, 200, 300]));
        assert_ne!(a, cache_digest(TaggableKind::TopicalEvents, &[100, 200]));
        assert_eq!(a, sha256::digest("taggable-topics-100200"));
    }

    #[test]
    fn sentences_join_like_prose() {
        let items = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(to_sentence(&items(&[])), "");
        assert_eq!(to_sentence(&items(&["a"])), "a");
        assert_eq!(to_sentence(&items(&["a", "b"])), "a and b");
        assert_eq!(to_sentence(&items(&["a", "b", "c"])), "a, b and c");
    }

    #[test]
    fn current_appointments_have_no_dates() {
        assert_eq!(
            ministerial_role_appointment_label(&appointment(None)),
            "Jane Smith, Minister of State, Cabinet Office and HM Treasury"
        );
    }

    #[test]
    fn past_appointments_show_their_dates() {
        assert_eq!(
            ministerial_role_appointment_label(&appointment(Some(date(2012, 9, 4)))),
            "Jane Smith, Minister of State (12 May 2010 to 4 September 2012), Cabinet Office and HM Treasury"
        );
    }

    #[tokio::test]
    async fn lists_are_cached_until_a_record_changes() {
        let content = TaggableContent::new(FakeSource::new(vec![1, 2]));
        let first = content.taggable_topics().await.unwrap();
        let second = content.taggable_topics().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(content.source.loads.load(Ordering::SeqCst), 1);

        content.source.timestamps.lock().unwrap().push(3);
        content.taggable_topics().await.unwrap();
        assert_eq!(content.source.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn appointments_are_labelled() {
        let content = TaggableContent::new(FakeSource::new(vec![1]));
        let options = content.taggable_ministerial_role_appointments().await.unwrap();
        assert_eq!(
            options,
            vec![TaggableOption::new("Jane Smith, Minister of State, Cabinet Office and HM Treasury", 11)]
        );
    }
}
