//! Pull parameters, notification messages and pull results.
//!
//! A pull is incremental: callers send the watermark they received last time
//! and get back every message created strictly after it, oldest first, plus
//! a new watermark to send on the next call.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Identifies the caller and the watermark for an incremental fetch.
///
/// Built either from GET path segments or from a POST body; immutable once
/// constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestParameters {
    user_uuid: String,
    user_major: String,
    user_minor: String,
    last_notification_time: DateTime<Utc>,
}

impl PullRequestParameters {
    /// Assemble parameters from already-parsed parts.
    pub fn new(
        user_uuid: impl Into<String>,
        user_major: impl Into<String>,
        user_minor: impl Into<String>,
        last_notification_time: DateTime<Utc>,
    ) -> Self {
        Self {
            user_uuid: user_uuid.into(),
            user_major: user_major.into(),
            user_minor: user_minor.into(),
            last_notification_time,
        }
    }

    /// Device-issued user UUID as sent by the client.
    pub fn user_uuid(&self) -> &str {
        &self.user_uuid
    }

    /// Beacon major value.
    pub fn user_major(&self) -> &str {
        &self.user_major
    }

    /// Beacon minor value.
    pub fn user_minor(&self) -> &str {
        &self.user_minor
    }

    /// Watermark returned by the previous pull.
    pub fn last_notification_time(&self) -> DateTime<Utc> {
        self.last_notification_time
    }

    /// Key used by the user repository for the existence check.
    pub fn user_key(&self) -> UserKey {
        UserKey(format!(
            "{}.{}.{}",
            self.user_uuid, self.user_major, self.user_minor
        ))
    }
}

/// Existence-check key: `"{userUuid}.{userMajor}.{userMinor}"`.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use notification_pull::domain::PullRequestParameters;
///
/// let params = PullRequestParameters::new("u1", "1", "2", Utc::now());
/// assert_eq!(params.user_key().as_ref(), "u1.1.2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserKey(String);

impl UserKey {
    /// Wrap a raw key, typically one read back from storage.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl AsRef<str> for UserKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A published notification as delivered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMessage {
    /// Stable message identifier.
    pub id: Uuid,
    /// Short headline shown in the client notification.
    #[schema(example = "Exposure alert")]
    pub title: String,
    /// Full message body.
    pub message: String,
    /// Publication time; drives watermark ordering.
    pub created: DateTime<Utc>,
}

/// Messages newer than the caller's watermark together with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PullResult {
    /// Messages ordered by `created` ascending, ties broken by `id`.
    pub messages: Vec<NotificationMessage>,
    /// Watermark to send on the next pull.
    pub last_notification_time: DateTime<Utc>,
}

impl PullResult {
    /// Build a result from an already-filtered, ordered page of messages.
    ///
    /// The watermark advances to the newest returned message, or stays at
    /// `since` when nothing new was published.
    pub fn from_page(messages: Vec<NotificationMessage>, since: DateTime<Utc>) -> Self {
        let last_notification_time = messages
            .last()
            .map_or(since, |message| message.created.max(since));
        Self {
            messages,
            last_notification_time,
        }
    }

    /// Select the page a pull at `since` should return from an unordered
    /// candidate set.
    ///
    /// Applies the boundary rules used by every notification source: only
    /// messages created strictly after `since`, ordered by `(created, id)`,
    /// cut to `limit` with [`PullResult::page_cut`].
    ///
    /// # Examples
    /// ```
    /// use chrono::{Duration, Utc};
    /// use notification_pull::domain::{NotificationMessage, PullResult};
    /// use uuid::Uuid;
    ///
    /// let since = Utc::now();
    /// let newer = NotificationMessage {
    ///     id: Uuid::new_v4(),
    ///     title: "t".into(),
    ///     message: "m".into(),
    ///     created: since + Duration::seconds(1),
    /// };
    /// let result = PullResult::select_since(vec![newer.clone()], since, 10);
    /// assert_eq!(result.messages, vec![newer.clone()]);
    /// assert_eq!(result.last_notification_time, newer.created);
    /// ```
    pub fn select_since<I>(candidates: I, since: DateTime<Utc>, limit: usize) -> Self
    where
        I: IntoIterator<Item = NotificationMessage>,
    {
        let mut page: Vec<NotificationMessage> = candidates
            .into_iter()
            .filter(|message| message.created > since)
            .collect();
        page.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));
        let keep = match Self::page_cut(&page, limit) {
            PageCut::Keep(count) => count,
            PageCut::WholeGroup(created) => page
                .iter()
                .position(|message| message.created > created)
                .unwrap_or(page.len()),
        };
        page.truncate(keep);
        Self::from_page(page, since)
    }

    /// Decide where an ordered run of candidates ends for a page of `limit`.
    ///
    /// The watermark is a bare timestamp and the next pull is exclusive, so a
    /// page never ends inside a group of messages sharing one `created` time.
    /// A split group is dropped and left for the next pull; when that group
    /// is the whole page it is returned complete even past `limit`.
    ///
    /// `ordered` must be sorted by `(created, id)` and hold at least
    /// `limit + 1` entries when more exist, so a split is detectable.
    pub fn page_cut(ordered: &[NotificationMessage], limit: usize) -> PageCut {
        if ordered.len() <= limit {
            return PageCut::Keep(ordered.len());
        }
        let Some(last_kept) = limit.checked_sub(1).and_then(|index| ordered.get(index)) else {
            return PageCut::Keep(0);
        };
        let boundary = last_kept.created;
        if ordered
            .get(limit)
            .is_none_or(|next| next.created != boundary)
        {
            return PageCut::Keep(limit);
        }
        match ordered
            .iter()
            .position(|message| message.created == boundary)
        {
            Some(0) | None => PageCut::WholeGroup(boundary),
            Some(group_start) => PageCut::Keep(group_start),
        }
    }
}

/// Where a page of candidates ends; see [`PullResult::page_cut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCut {
    /// Keep this many leading candidates.
    Keep(usize),
    /// Return every message created at exactly this time and nothing later.
    WholeGroup(DateTime<Utc>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::{fixture, rstest};

    #[fixture]
    fn since() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    fn message(id: u128, created: DateTime<Utc>) -> NotificationMessage {
        NotificationMessage {
            id: Uuid::from_u128(id),
            title: format!("title {id}"),
            message: format!("message {id}"),
            created,
        }
    }

    #[rstest]
    fn user_key_joins_identity_parts(since: DateTime<Utc>) {
        let params = PullRequestParameters::new("u1", "1", "2", since);
        assert_eq!(params.user_key(), UserKey::from_raw("u1.1.2"));
    }

    #[rstest]
    fn select_since_excludes_messages_at_the_watermark(since: DateTime<Utc>) {
        let at = message(1, since);
        let after = message(2, since + Duration::seconds(5));
        let result = PullResult::select_since(vec![at, after.clone()], since, 10);
        assert_eq!(result.messages, vec![after.clone()]);
        assert_eq!(result.last_notification_time, after.created);
    }

    #[rstest]
    fn select_since_orders_by_created_then_id(since: DateTime<Utc>) {
        let later = message(1, since + Duration::seconds(10));
        let tie_b = message(3, since + Duration::seconds(5));
        let tie_a = message(2, since + Duration::seconds(5));
        let result =
            PullResult::select_since(vec![later.clone(), tie_b.clone(), tie_a.clone()], since, 10);
        assert_eq!(result.messages, vec![tie_a, tie_b, later]);
    }

    #[rstest]
    fn select_since_truncates_and_advances_watermark_to_last_returned(since: DateTime<Utc>) {
        let first = message(1, since + Duration::seconds(1));
        let second = message(2, since + Duration::seconds(2));
        let third = message(3, since + Duration::seconds(3));
        let result = PullResult::select_since(vec![third, second.clone(), first], since, 2);
        assert_eq!(result.messages.len(), 2);
        assert_eq!(result.last_notification_time, second.created);
    }

    #[rstest]
    fn split_timestamp_group_is_left_for_the_next_pull(since: DateTime<Utc>) {
        let first = message(1, since + Duration::seconds(1));
        let tied = since + Duration::seconds(2);
        let candidates = vec![
            first.clone(),
            message(2, tied),
            message(3, tied),
            message(4, since + Duration::seconds(3)),
        ];

        let page1 = PullResult::select_since(candidates.clone(), since, 2);
        assert_eq!(page1.messages, vec![first.clone()]);
        assert_eq!(page1.last_notification_time, first.created);

        let page2 = PullResult::select_since(candidates, page1.last_notification_time, 2);
        let ids: Vec<u128> = page2.messages.iter().map(|m| m.id.as_u128()).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(page2.last_notification_time, tied);
    }

    #[rstest]
    fn group_larger_than_the_limit_is_delivered_whole(since: DateTime<Utc>) {
        let tied = since + Duration::seconds(1);
        let later = message(9, since + Duration::seconds(2));
        let candidates = vec![message(1, tied), message(2, tied), message(3, tied), later.clone()];

        let page1 = PullResult::select_since(candidates.clone(), since, 2);
        assert_eq!(page1.messages.len(), 3);
        assert_eq!(page1.last_notification_time, tied);

        let page2 = PullResult::select_since(candidates, page1.last_notification_time, 2);
        assert_eq!(page2.messages, vec![later]);
    }

    #[rstest]
    #[case::fits(3, 2, PageCut::Keep(2))]
    #[case::clean_cut(2, 5, PageCut::Keep(2))]
    #[case::zero_limit(0, 5, PageCut::Keep(0))]
    fn page_cut_without_ties(
        since: DateTime<Utc>,
        #[case] limit: usize,
        #[case] available: u32,
        #[case] expected: PageCut,
    ) {
        let ordered: Vec<NotificationMessage> = (1..=available)
            .map(|n| message(u128::from(n), since + Duration::seconds(i64::from(n))))
            .collect();
        assert_eq!(PullResult::page_cut(&ordered, limit), expected);
    }

    #[rstest]
    fn empty_page_keeps_the_callers_watermark(since: DateTime<Utc>) {
        let result = PullResult::select_since(Vec::new(), since, 10);
        assert!(result.messages.is_empty());
        assert_eq!(result.last_notification_time, since);
    }

    #[rstest]
    fn pull_result_serialises_camel_case(since: DateTime<Utc>) {
        let result = PullResult::from_page(Vec::new(), since);
        let value = serde_json::to_value(&result).expect("serialise result");
        assert_eq!(
            value,
            serde_json::json!({ "messages": [], "lastNotificationTime": "2024-01-01T00:00:00Z" })
        );
    }
}
