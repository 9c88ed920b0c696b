//! Wire types for the triage backend API.
//!
//! Field names follow the backend's camelCase JSON contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of a mailbox message, as returned by the message list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSummary {
    /// Provider-assigned message identifier. Unique and stable.
    pub message_id: String,
    /// Conversation thread identifier.
    #[serde(default)]
    pub thread_id: String,
    /// Sender address (display form).
    pub from: String,
    /// Recipient addresses.
    #[serde(default)]
    pub to: Vec<String>,
    /// Message subject.
    #[serde(default)]
    pub subject: String,
    /// Short body preview.
    #[serde(default)]
    pub snippet: String,
    /// Provider label identifiers attached to the message.
    #[serde(default)]
    pub label_ids: Vec<String>,
    /// When the message was received.
    pub received_date: DateTime<Utc>,
    /// Whether the message has been read.
    #[serde(default)]
    pub is_read: bool,
}

/// Learned preference for a sender.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderPreference {
    /// Whether suggestions for this sender are applied automatically.
    #[serde(default)]
    pub auto_apply: bool,
    /// Default triage action for this sender.
    pub default_action: SuggestionAction,
    /// Default label name, when the action is `Label`.
    #[serde(default)]
    pub default_label: Option<String>,
}

/// Aggregated information about a sender.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sender {
    /// Sender email address. Unique key within a mailbox.
    pub sender_email: String,
    /// Domain extracted from the address.
    #[serde(default)]
    pub sender_domain: String,
    /// Display name, if known.
    #[serde(default)]
    pub sender_name: String,
    /// Number of messages received from this sender.
    #[serde(default)]
    pub email_count: u64,
    /// Stored preference, if the user has set one.
    #[serde(default)]
    pub preference: Option<SenderPreference>,
}

/// Triage action proposed by a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionAction {
    /// Move the message out of the inbox.
    Archive,
    /// Move the message to trash.
    Delete,
    /// Apply a label to the message.
    Label,
    /// Leave the message where it is.
    Keep,
}

impl SuggestionAction {
    /// Wire string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Delete => "delete",
            Self::Label => "label",
            Self::Keep => "keep",
        }
    }
}

/// Lifecycle state of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    /// Awaiting a user decision.
    #[default]
    Pending,
    /// The suggested action has been executed.
    Applied,
    /// The user declined the suggestion.
    Rejected,
}

impl SuggestionStatus {
    /// Wire string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Applied => "applied",
            Self::Rejected => "rejected",
        }
    }
}

/// An AI-generated triage suggestion for a single message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Unique identifier. Older backend revisions emit this as `_id`.
    #[serde(alias = "_id")]
    pub id: String,
    /// Identifier of the message this suggestion targets.
    pub email_id: String,
    /// Proposed action.
    pub action: SuggestionAction,
    /// Label to apply, when the action is `Label`.
    #[serde(default)]
    pub label_name: Option<String>,
    /// Model confidence, in `[0, 1]`.
    #[serde(default)]
    pub confidence: f64,
    /// Model explanation for the suggestion.
    #[serde(default)]
    pub reasoning: String,
    /// Lifecycle state.
    #[serde(default)]
    pub status: SuggestionStatus,
}

/// Aggregate mailbox counters. Always treated as one atomic snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailboxStats {
    /// Total number of messages in the mailbox.
    pub total_messages: u64,
    /// Total number of conversation threads.
    #[serde(default)]
    pub total_threads: u64,
    /// Messages currently in the inbox.
    pub inbox_count: u64,
    /// Unread messages.
    pub unread_count: u64,
    /// Messages in the sent folder.
    pub sent_count: u64,
    /// Draft messages.
    pub draft_count: u64,
    /// Messages marked as spam.
    pub spam_count: u64,
    /// Messages in the trash.
    pub trash_count: u64,
}

/// One page of a message listing, with its continuation cursor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePage {
    /// Messages in this page, in arrival order.
    #[serde(rename = "emails", alias = "messages")]
    pub messages: Vec<MessageSummary>,
    /// Opaque cursor for the next page. `None` means no more pages.
    #[serde(default)]
    pub next_page_token: Option<String>,
    /// Approximate total number of matching messages.
    #[serde(default)]
    pub result_size_estimate: u64,
}

/// Raw message list response.
///
/// The backend historically returned a bare array; newer revisions return
/// a page object carrying the pagination cursor. Both shapes remain valid,
/// and normalizing them here keeps callers independent of which one the
/// backend speaks.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageList {
    /// Page object with cursor and size estimate.
    Paged(MessagePage),
    /// Legacy bare array of messages.
    Plain(Vec<MessageSummary>),
}

impl MessageList {
    /// Normalize either wire shape into a page.
    ///
    /// A bare array becomes a terminal page: no continuation token and an
    /// estimate equal to the array length.
    #[must_use]
    pub fn into_page(self) -> MessagePage {
        match self {
            Self::Paged(page) => page,
            Self::Plain(messages) => {
                let estimate = messages.len() as u64;
                MessagePage {
                    messages,
                    next_page_token: None,
                    result_size_estimate: estimate,
                }
            }
        }
    }
}

/// Result of a bulk action over all messages from one sender.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOutcome {
    /// Number of messages the action was applied to.
    pub applied_count: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_message_list_paged_shape() {
        let json = r#"{
            "emails": [{
                "messageId": "m1",
                "from": "alice@example.com",
                "subject": "Hello",
                "receivedDate": "2026-08-01T10:00:00Z"
            }],
            "nextPageToken": "tok-2",
            "resultSizeEstimate": 42
        }"#;

        let list: MessageList = serde_json::from_str(json).unwrap();
        let page = list.into_page();
        assert_eq!(page.messages.len(), 1);
        assert_eq!(page.messages[0].message_id, "m1");
        assert_eq!(page.next_page_token.as_deref(), Some("tok-2"));
        assert_eq!(page.result_size_estimate, 42);
    }

    #[test]
    fn test_message_list_legacy_array_shape() {
        let json = r#"[{
            "messageId": "m1",
            "from": "alice@example.com",
            "receivedDate": "2026-08-01T10:00:00Z"
        }, {
            "messageId": "m2",
            "from": "bob@example.com",
            "receivedDate": "2026-08-01T11:00:00Z"
        }]"#;

        let list: MessageList = serde_json::from_str(json).unwrap();
        let page = list.into_page();
        assert_eq!(page.messages.len(), 2);
        assert!(page.next_page_token.is_none());
        assert_eq!(page.result_size_estimate, 2);
    }

    #[test]
    fn test_suggestion_legacy_id_alias() {
        let json = r#"{
            "_id": "s1",
            "emailId": "m1",
            "action": "archive",
            "confidence": 0.9,
            "reasoning": "newsletter",
            "status": "pending"
        }"#;

        let suggestion: Suggestion = serde_json::from_str(json).unwrap();
        assert_eq!(suggestion.id, "s1");
        assert_eq!(suggestion.action, SuggestionAction::Archive);
        assert_eq!(suggestion.status, SuggestionStatus::Pending);
    }

    #[test]
    fn test_stats_round_trip() {
        let stats = MailboxStats {
            total_messages: 100,
            inbox_count: 20,
            unread_count: 5,
            ..MailboxStats::default()
        };

        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"totalMessages\":100"));
        let back: MailboxStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
