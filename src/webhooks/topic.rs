//! Topic dispatch table.
//!
//! Maps a topic string onto the action the worker takes for it. The table is
//! total: topics the source system adds later map to [`TopicAction::Ignore`]
//! rather than failing.

/// Topic sent when a hook is first registered.
pub const ACTIVATION_TOPIC: &str = "activation";

/// Topic for a full theme snapshot.
pub const THEME_UPDATED_TOPIC: &str = "themes.updated";

/// What the pipeline does for a given topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicAction {
    /// Hook handshake, answered at the HTTP boundary and never queued.
    Activation,
    /// Clear the shop directory and rewrite every template and asset.
    ReplaceTheme,
    /// Write one template (create and update are the same overwrite).
    WriteTemplate,
    /// Remove one template.
    DeleteTemplate,
    /// Download and write one asset.
    WriteAsset,
    /// Remove one asset.
    DeleteAsset,
    /// Unrecognised topic; nothing happens.
    Ignore,
}

impl TopicAction {
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            ACTIVATION_TOPIC => TopicAction::Activation,
            THEME_UPDATED_TOPIC => TopicAction::ReplaceTheme,
            "themes.updated.templates.created" | "themes.updated.templates.updated" => {
                TopicAction::WriteTemplate
            }
            "themes.updated.templates.deleted" => TopicAction::DeleteTemplate,
            "themes.updated.assets.created" | "themes.updated.assets.updated" => {
                TopicAction::WriteAsset
            }
            "themes.updated.assets.deleted" => TopicAction::DeleteAsset,
            _ => TopicAction::Ignore,
        }
    }

    /// Whether a successful mutation for this action is recorded as a commit.
    pub fn commits(&self) -> bool {
        match self {
            TopicAction::ReplaceTheme
            | TopicAction::WriteTemplate
            | TopicAction::DeleteTemplate
            | TopicAction::WriteAsset
            | TopicAction::DeleteAsset => true,
            TopicAction::Activation | TopicAction::Ignore => false,
        }
    }
}

/// Returns the last dot-separated segment of a topic (`created`, `deleted`, ...).
pub fn topic_verb(topic: &str) -> &str {
    topic.rsplit('.').next().unwrap_or(topic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn dispatch_table() {
        let cases = [
            ("activation", TopicAction::Activation, false),
            ("themes.updated", TopicAction::ReplaceTheme, true),
            ("themes.updated.templates.created", TopicAction::WriteTemplate, true),
            ("themes.updated.templates.updated", TopicAction::WriteTemplate, true),
            ("themes.updated.templates.deleted", TopicAction::DeleteTemplate, true),
            ("themes.updated.assets.created", TopicAction::WriteAsset, true),
            ("themes.updated.assets.updated", TopicAction::WriteAsset, true),
            ("themes.updated.assets.deleted", TopicAction::DeleteAsset, true),
            ("themes.published", TopicAction::Ignore, false),
            ("", TopicAction::Ignore, false),
        ];

        for (topic, action, commits) in cases {
            assert_eq!(TopicAction::from_topic(topic), action, "topic {topic:?}");
            assert_eq!(action.commits(), commits, "topic {topic:?}");
        }
    }

    #[test]
    fn verb_is_last_segment() {
        assert_eq!(topic_verb("themes.updated.assets.deleted"), "deleted");
        assert_eq!(topic_verb("themes.updated"), "updated");
        assert_eq!(topic_verb("activation"), "activation");
        assert_eq!(topic_verb(""), "");
    }

    proptest! {
        #[test]
        fn unknown_prefixes_are_ignored(suffix in "[a-z.]{0,20}") {
            let topic = format!("orders.{}", suffix);
            prop_assert_eq!(TopicAction::from_topic(&topic), TopicAction::Ignore);
        }

        #[test]
        fn verb_never_contains_a_dot(topic in "[a-z.]{0,40}") {
            prop_assert!(!topic_verb(&topic).contains('.'));
        }
    }
}
