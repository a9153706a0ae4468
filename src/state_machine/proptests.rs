//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::transition::*;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> FormContext {
    FormContext::new("dm-chan", "origin-chan")
}

/// Feed one reply and run any persistence outcome the way the runtime would
fn drive_reply(state: &FormState, text: String, persist_ok: bool) -> (FormState, Vec<Effect>) {
    let ctx = test_context();
    let mut all_effects = Vec::new();
    let mut result = transition(state, &ctx, Event::Reply { text }).unwrap();
    loop {
        let follow_up = result.effects.iter().find_map(|e| match e {
            Effect::PersistRecord { .. } if persist_ok => {
                Some(Event::RecordPersisted { record_id: 1 })
            }
            Effect::PersistRecord { .. } => Some(Event::PersistFailed {
                message: "unavailable".to_string(),
            }),
            _ => None,
        });
        all_effects.extend(result.effects.clone());
        match follow_up {
            Some(event) => result = transition(&result.new_state, &ctx, event).unwrap(),
            None => return (result.new_state, all_effects),
        }
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), ".{0,40}"]
}

fn arb_answers() -> impl Strategy<Value = FormAnswers> {
    (arb_text(), arb_text()).prop_map(|(food, game)| FormAnswers::new(food, game))
}

fn arb_state() -> impl Strategy<Value = FormState> {
    prop_oneof![
        Just(FormState::AwaitingFirstAnswer),
        arb_text().prop_map(|favorite_food| FormState::AwaitingSecondAnswer { favorite_food }),
        arb_answers().prop_map(|answers| FormState::Committing { answers }),
        (arb_answers(), 1i64..10_000)
            .prop_map(|(answers, record_id)| FormState::Completed { answers, record_id }),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_text().prop_map(|text| Event::Reply { text }),
        (1i64..10_000).prop_map(|record_id| Event::RecordPersisted { record_id }),
        "[a-z ]{1,20}".prop_map(|message| Event::PersistFailed { message }),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // A fresh session needs exactly one reply per slot, whatever the content
    #[test]
    fn prop_two_replies_complete_a_form(food in arb_text(), game in arb_text()) {
        let (state, effects) = drive_reply(&FormState::AwaitingFirstAnswer, food.clone(), true);
        prop_assert_eq!(state.stage(), Some(FormStage::AwaitingSecondAnswer));
        prop_assert!(effects.contains(&Effect::SaveSession));
        prop_assert!(!effects.contains(&Effect::RemoveSession));

        let (state, effects) = drive_reply(&state, game.clone(), true);
        prop_assert!(state.is_terminal());
        prop_assert_eq!(
            effects.iter().filter(|e| **e == Effect::RemoveSession).count(),
            1
        );
        let expected = FormAnswers::new(food, game);
        prop_assert!(
            effects.contains(&Effect::PersistRecord { answers: expected }),
            "answers must be persisted verbatim"
        );
    }

    // Summaries only ever go to the origin channel, prompts only to the private one
    #[test]
    fn prop_effects_target_the_right_channels(state in arb_state(), event in arb_event()) {
        let ctx = test_context();
        if let Ok(result) = transition(&state, &ctx, event) {
            for effect in &result.effects {
                match effect {
                    Effect::SendSummary { channel_id, .. } => {
                        prop_assert_eq!(channel_id, &ctx.origin_channel_id);
                    }
                    Effect::SendText { channel_id, .. } => {
                        prop_assert_eq!(channel_id, &ctx.channel_id);
                    }
                    _ => {}
                }
            }
        }
    }

    // The session is never both saved and removed, and only removed when terminal
    #[test]
    fn prop_remove_only_on_completion(state in arb_state(), event in arb_event()) {
        if let Ok(result) = transition(&state, &test_context(), event) {
            let removes = result.effects.contains(&Effect::RemoveSession);
            let saves = result.effects.contains(&Effect::SaveSession);
            prop_assert!(!(removes && saves));
            prop_assert_eq!(removes, result.new_state.is_terminal());
            if saves {
                prop_assert!(result.new_state.stage().is_some(), "saved a transient state");
            }
        }
    }

    // A failed write leaves the session retryable and sends nothing to the origin
    #[test]
    fn prop_failed_write_is_retryable(food in arb_text(), game in arb_text(), retry in arb_text()) {
        let start = FormState::AwaitingSecondAnswer { favorite_food: food.clone() };
        let (state, effects) = drive_reply(&start, game, false);
        prop_assert_eq!(&state, &start);
        prop_assert!(
            !effects.iter().any(|e| matches!(e, Effect::SendSummary { .. })),
            "summary sent after failed write"
        );

        let (state, effects) = drive_reply(&state, retry.clone(), true);
        prop_assert!(state.is_terminal());
        prop_assert!(
            effects.contains(&Effect::PersistRecord {
                answers: FormAnswers::new(food, retry),
            }),
            "retry did not persist the new second answer"
        );
    }

    // Nothing leaves the terminal state
    #[test]
    fn prop_completed_is_terminal(answers in arb_answers(), event in arb_event()) {
        let state = FormState::Completed { answers, record_id: 1 };
        prop_assert_eq!(
            transition(&state, &test_context(), event).unwrap_err(),
            TransitionError::AlreadyCompleted
        );
    }
}
