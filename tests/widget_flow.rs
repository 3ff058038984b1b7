//! End-to-end flows through the address field driver.
//!
//! All tests run on a paused tokio clock, so debounce windows elapse only when
//! every task is idle and timing is deterministic.

mod common;

use std::time::Duration;

use common::*;
use magic_address::{
    AddressBook, AvatarView, Effect, Label, LookupState, Prefix, ResolutionError,
};
use magic_resolver::LookupKind;
use tokio::time::{timeout, Instant};

#[tokio::test(start_paused = true)]
async fn test_alias_resolves_and_decorates() {
    let (mut input, resolver) = scripted_input();
    resolver.script_forward(VITALIK_NAME, Ok(Some(vitalik())));
    resolver.script_reverse(vitalik(), Ok(Some(VITALIK_NAME.to_string())));
    resolver.script_avatar(VITALIK_NAME, Ok(Some(VITALIK_AVATAR.to_string())));

    let started = Instant::now();
    assert!(input.on_change(VITALIK_NAME).is_empty());
    let effects = input.settle().await;

    // One debounce window, no more.
    assert!(started.elapsed() >= Duration::from_millis(500));
    assert!(started.elapsed() < Duration::from_millis(600));
    assert_eq!(
        effects,
        vec![
            Effect::SetValue(VITALIK_HEX.to_string()),
            Effect::Registered {
                address: vitalik(),
                label: Label::custom(VITALIK_NAME),
            },
        ]
    );

    let view = input.view();
    assert_eq!(view.value, VITALIK_HEX);
    assert!(view.refocus);
    assert!(!view.error);
    assert!(!view.disabled);
    assert_eq!(
        view.prefix,
        Prefix::Alias {
            label: VITALIK_NAME.to_string(),
            avatar: AvatarView::Ready(VITALIK_AVATAR.to_string()),
        }
    );
    assert_eq!(view.suggestions.len(), 1);
    assert_eq!(view.suggestions[0].label.as_deref(), Some(VITALIK_NAME));
    assert_eq!(
        resolver.calls_of(LookupKind::Forward),
        vec![VITALIK_NAME.to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn test_unknown_alias_marks_field_invalid() {
    let (mut input, resolver) = scripted_input();
    resolver.script_forward("nobody.eth", Ok(None));

    input.on_change("nobody.eth");
    let effects = input.settle().await;

    assert_eq!(
        effects,
        vec![Effect::Invalid(ResolutionError::NotFound {
            input: "nobody.eth".to_string()
        })]
    );
    let view = input.view();
    assert!(view.error);
    assert!(view.refocus);
    assert_eq!(view.value, "nobody.eth");
    assert_eq!(view.prefix, Prefix::None);
    assert!(input.book().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_looks_like_not_found() {
    let (mut input, resolver) = scripted_input();
    resolver.script_forward("flaky.eth", Err("gateway unavailable".to_string()));

    input.on_change("flaky.eth");
    let effects = input.settle().await;

    assert!(matches!(
        &effects[..],
        [Effect::Invalid(ResolutionError::Transport { message, .. })] if message == "gateway unavailable"
    ));
    assert!(input.view().error);
    assert!(input.book().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_only_last_rapid_keystroke_is_resolved() {
    let (mut input, resolver) = scripted_input();
    resolver.script_forward(VITALIK_NAME, Ok(None));

    for text in ["v", "vit", "vitalik.et", VITALIK_NAME] {
        input.on_change(text);
        tokio::time::advance(Duration::from_millis(100)).await;
    }
    input.settle().await;

    assert_eq!(
        resolver.calls(),
        vec![(LookupKind::Forward, VITALIK_NAME.to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn test_pasted_address_skips_debounce() {
    let (mut input, resolver) = scripted_input();
    resolver.script_reverse(vitalik(), Ok(Some(VITALIK_NAME.to_string())));
    resolver.script_avatar(VITALIK_NAME, Ok(None));

    let started = Instant::now();
    let effects = input.on_change(VITALIK_HEX);
    assert_eq!(input.in_flight(), 1);
    assert_eq!(
        effects,
        vec![Effect::Registered {
            address: vitalik(),
            label: None
        }]
    );

    input.settle().await;
    assert!(started.elapsed() < Duration::from_millis(500));

    let view = input.view();
    assert_eq!(
        view.prefix,
        Prefix::Alias {
            label: VITALIK_NAME.to_string(),
            avatar: AvatarView::Missing,
        }
    );
    assert_eq!(
        view.suggestions[0].label.as_deref(),
        Some("added 0s ago")
    );
    assert!(!view.error);
}

#[tokio::test(start_paused = true)]
async fn test_out_of_order_results_keep_latest_input() {
    let (mut input, resolver) = scripted_input();
    resolver.script_reverse(bob(), Ok(None));

    input.on_change("alice.eth");
    input.step().await;
    input.on_change("bob.eth");
    input.step().await;
    let_lookups_park().await;
    assert_eq!(resolver.parked_forward("alice.eth"), 1);
    assert_eq!(resolver.parked_forward("bob.eth"), 1);

    resolver.complete_forward("bob.eth", Ok(Some(bob())));
    resolver.complete_forward("alice.eth", Ok(Some(alice())));
    input.settle().await;

    let view = input.view();
    assert_eq!(view.value, BOB_HEX);
    assert_eq!(input.book().len(), 1);
    assert!(input.book().get(&alice()).is_none());
    assert_eq!(
        input.book().get(&bob()).map(|s| s.label),
        Some(Label::custom("bob.eth"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_stale_result_after_edit_is_dropped() {
    let (mut input, resolver) = scripted_input();

    input.on_change("alice.eth");
    input.step().await;
    let_lookups_park().await;

    // Typing past the settled value invalidates the pending lookup.
    input.on_change("alice.eth2");
    resolver.complete_forward("alice.eth", Ok(Some(alice())));
    input.settle().await;

    let view = input.view();
    assert_eq!(view.value, "alice.eth2");
    assert!(!view.refocus);
    assert!(!view.disabled);
    assert!(input.book().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_lost_lookup_keeps_field_disabled() {
    let (mut input, _resolver) = scripted_input();

    input.on_change("stuck.eth");
    let outcome = timeout(Duration::from_secs(60), input.settle()).await;
    assert!(outcome.is_err());

    let view = input.view();
    assert!(view.disabled);
    assert!(!view.error);
    assert_eq!(view.prefix, Prefix::Loading);
    assert!(input.coordinator().forward().is_pending());

    // The user can still move on.
    input.on_change("hello");
    assert!(!input.view().disabled);
}

#[tokio::test(start_paused = true)]
async fn test_selection_overrides_alias_label() {
    let (mut input, resolver) = scripted_input();
    input.book().merge(bob(), Label::custom("Bob"), None);
    resolver.script_forward(VITALIK_NAME, Ok(Some(vitalik())));
    resolver.script_reverse(vitalik(), Ok(Some("other.eth".to_string())));
    resolver.script_avatar("other.eth", Ok(None));
    resolver.script_reverse(bob(), Ok(None));

    input.on_change(VITALIK_NAME);
    input.settle().await;
    assert_eq!(input.coordinator().override_label(), Some(VITALIK_NAME));
    assert!(matches!(
        input.view().prefix,
        Prefix::Alias { ref label, .. } if label == VITALIK_NAME
    ));

    input.toggle_suggestions();
    let effects = input.select_suggestion(bob());
    input.settle().await;

    assert_eq!(effects[0], Effect::SetValue(BOB_HEX.to_string()));
    let view = input.view();
    assert_eq!(view.value, BOB_HEX);
    assert!(!view.suggestions_open);
    assert_eq!(view.prefix, Prefix::None);
    assert_eq!(input.coordinator().override_label(), None);
    assert_eq!(*input.coordinator().reverse(), LookupState::NotFound);
}

#[tokio::test(start_paused = true)]
async fn test_fields_share_one_address_book() {
    let book = AddressBook::shared();
    let (mut first, first_resolver) = scripted_input_with_book(book.clone());
    let (second, _) = scripted_input_with_book(book.clone());
    first_resolver.script_reverse(alice(), Ok(None));

    book.set_primary(vitalik());
    first.on_change(ALICE_HEX);
    first.settle().await;
    book.set_primary(bob());

    let labels: Vec<_> = second
        .view()
        .suggestions
        .into_iter()
        .map(|s| (s.address, s.label))
        .collect();
    assert_eq!(
        labels,
        vec![
            (vitalik(), Some("Prev. connected wallet".to_string())),
            (alice(), Some("added 0s ago".to_string())),
            (bob(), Some("Connected wallet".to_string())),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_retyping_known_address_keeps_label() {
    let (mut input, resolver) = scripted_input();
    input.book().merge(alice(), Label::custom("Treasury"), None);
    resolver.script_reverse(alice(), Ok(None));

    let effects = input.on_change(ALICE_HEX.to_uppercase().replacen("0X", "0x", 1));
    input.settle().await;

    assert!(effects.is_empty());
    let entry = input.book().get(&alice()).unwrap();
    assert_eq!(entry.label, Label::custom("Treasury"));
    assert_eq!(entry.added_at, None);
}
