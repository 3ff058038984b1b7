//! Render-ready snapshot of the address field.
//!
//! Everything a host needs to draw the field in one value, derived from the
//! coordinator and the address book at read time. Age labels use the wall
//! clock at the moment the view is built.

use chrono::{DateTime, Utc};
use magic_address_types::Address;
use serde::Serialize;

use crate::address_book::Suggestion;
use crate::coordinator::{Coordinator, LookupState};

/// Avatar next to an alias prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "url", rename_all = "snake_case")]
pub enum AvatarView {
    Loading,
    Ready(String),
    /// No avatar record, or the lookup failed; show a placeholder.
    Missing,
}

/// What sits in front of the text box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prefix {
    None,
    Loading,
    Alias { label: String, avatar: AvatarView },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionView {
    pub address: Address,
    /// Abbreviated address text, absent when the host hides it.
    pub short: Option<String>,
    pub label: Option<String>,
}

impl SuggestionView {
    fn build(suggestion: &Suggestion, hide_address_text: bool, now: DateTime<Utc>) -> Self {
        Self {
            address: suggestion.address,
            short: (!hide_address_text).then(|| suggestion.address.short()),
            label: suggestion.display_label(now),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputView {
    pub value: String,
    pub prefix: Prefix,
    pub disabled: bool,
    pub error: bool,
    pub refocus: bool,
    pub suggestions_open: bool,
    pub suggestions: Vec<SuggestionView>,
}

impl InputView {
    pub fn build(coordinator: &Coordinator, hide_address_text: bool) -> Self {
        Self::build_at(coordinator, hide_address_text, Utc::now())
    }

    pub fn build_at(coordinator: &Coordinator, hide_address_text: bool, now: DateTime<Utc>) -> Self {
        let suggestions = coordinator
            .book()
            .suggestions()
            .iter()
            .map(|s| SuggestionView::build(s, hide_address_text, now))
            .collect();
        Self {
            value: coordinator.value().to_string(),
            prefix: prefix_of(coordinator),
            disabled: coordinator.is_disabled(),
            error: coordinator.has_error(),
            refocus: coordinator.refocus(),
            suggestions_open: coordinator.suggestions_open(),
            suggestions,
        }
    }
}

fn prefix_of(coordinator: &Coordinator) -> Prefix {
    if let Some(label) = coordinator.display_alias() {
        let avatar = match coordinator.avatar() {
            LookupState::Found(url) => AvatarView::Ready(url.clone()),
            LookupState::Idle | LookupState::Pending => AvatarView::Loading,
            _ => AvatarView::Missing,
        };
        return Prefix::Alias {
            label: label.to_string(),
            avatar,
        };
    }
    if coordinator.is_loading() {
        Prefix::Loading
    } else {
        Prefix::None
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use chrono::Duration;

    use super::*;
    use crate::address_book::{AddressBook, Label};
    use crate::config::InputConfig;
    use crate::coordinator::{Completion, Outcome};

    const ADDR: &str = "0xab00000000000000000000000000000000000123";

    #[test]
    fn test_suggestion_rows() {
        let book = AddressBook::shared();
        let now = Utc::now();
        let address: Address = ADDR.parse().unwrap();
        book.merge(address, Label::custom("bob.eth"), Some(now - Duration::seconds(90)));
        let coordinator = Coordinator::new(&InputConfig::default(), book.clone());

        let view = InputView::build_at(&coordinator, false, now);
        assert_eq!(
            view.suggestions,
            vec![SuggestionView {
                address,
                short: Some("0xab0...123".to_string()),
                label: Some("bob.eth".to_string()),
            }]
        );

        let hidden = InputView::build_at(&coordinator, true, now);
        assert_eq!(hidden.suggestions[0].short, None);
    }

    #[test]
    fn test_prefix_follows_lookups() {
        let mut coordinator = Coordinator::new(&InputConfig::default(), AddressBook::shared());
        let t0 = Instant::now();
        coordinator.on_change(ADDR, t0);
        assert_eq!(InputView::build(&coordinator, false).prefix, Prefix::Loading);

        coordinator.apply(
            Completion {
                key: ADDR.to_string(),
                outcome: Outcome::Reverse(Ok(Some("bob.eth".to_string()))),
            },
            t0,
        );
        let view = InputView::build(&coordinator, false);
        assert_eq!(
            view.prefix,
            Prefix::Alias {
                label: "bob.eth".to_string(),
                avatar: AvatarView::Loading
            }
        );
        assert!(!view.disabled);

        coordinator.apply(
            Completion {
                key: ADDR.to_string(),
                outcome: Outcome::Avatar(Ok(None)),
            },
            t0,
        );
        assert!(matches!(
            InputView::build(&coordinator, false).prefix,
            Prefix::Alias {
                avatar: AvatarView::Missing,
                ..
            }
        ));
    }

    #[test]
    fn test_plain_text_has_no_prefix() {
        let mut coordinator = Coordinator::new(&InputConfig::default(), AddressBook::shared());
        coordinator.on_change("hello", Instant::now());
        let view = InputView::build(&coordinator, false);
        assert_eq!(view.prefix, Prefix::None);
        assert_eq!(view.value, "hello");
        assert!(!view.error);
    }
}
