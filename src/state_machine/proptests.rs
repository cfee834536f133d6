//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use crate::catalog::Catalog;
use crate::knowledge::{KnowledgeBase, QaRecord};
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Test Helpers
// ============================================================================

const SUBJECTS: &[&str] = &["Math", "History", "Geo"];

fn test_records() -> Vec<QaRecord> {
    vec![
        QaRecord::new("Math", "2+2?", "4"),
        QaRecord::new("Math", "3+3?", "6"),
        QaRecord::new("History", "Year WWII started?", "1939"),
        QaRecord::new("Geo", "Capital of France?", "Paris"),
        QaRecord::new("Geo", "2+2?", "four"),
    ]
}

fn test_context() -> ConvContext {
    let kb = KnowledgeBase::from_records(test_records());
    ConvContext::new(Some(Arc::new(Catalog::new(kb))), AnswerStyle::Plain)
}

fn questions_of(subject: &str) -> Vec<String> {
    test_records()
        .into_iter()
        .filter(|r| r.subject == subject)
        .map(|r| r.question)
        .collect()
}

fn turn_count(effects: &[Effect], role: Role) -> usize {
    effects
        .iter()
        .filter_map(Effect::as_turn)
        .filter(|t| t.role == role)
        .count()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_subject() -> impl Strategy<Value = String> {
    proptest::sample::select(SUBJECTS).prop_map(String::from)
}

fn arb_known_label() -> impl Strategy<Value = String> {
    proptest::sample::select(
        test_records()
            .into_iter()
            .flat_map(|r| [r.subject, r.question])
            .collect::<Vec<_>>(),
    )
}

fn arb_label() -> impl Strategy<Value = String> {
    prop_oneof![arb_known_label(), "[a-zA-Z0-9 ?+]{0,20}"]
}

fn arb_menu_state() -> impl Strategy<Value = ConvState> {
    prop_oneof![
        Just(ConvState::Main),
        arb_subject().prop_map(|subject| ConvState::Subject { subject }),
    ]
}

fn arb_state() -> impl Strategy<Value = ConvState> {
    prop_oneof![
        arb_menu_state(),
        "[a-z ]{1,20}".prop_map(|question| ConvState::AwaitingCompletion { question }),
        Just(ConvState::Unavailable),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_label().prop_map(|label| Event::Select { label }),
        Just(Event::Back),
        "[a-z ]{0,20}".prop_map(|text| Event::Ask { text }),
        "[a-z ]{0,20}".prop_map(|text| Event::CompletionReady { text }),
        "[a-z ]{0,20}".prop_map(|message| Event::CompletionFailed { message }),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // From Main, a known subject always opens that subject without transcript changes
    #[test]
    fn prop_main_select_subject(subject in arb_subject()) {
        let result = transition(&ConvState::Main, &test_context(), Event::select(subject.clone()))
            .unwrap();
        prop_assert_eq!(result.new_state, ConvState::Subject { subject });
        prop_assert!(result.effects.is_empty());
    }

    // From Subject, a listed question appends one user turn, at least one
    // assistant turn and returns to Main
    #[test]
    fn prop_subject_select_question(subject in arb_subject(), idx in 0usize..4) {
        let questions = questions_of(&subject);
        let question = questions[idx % questions.len()].clone();
        let state = ConvState::Subject { subject };

        for style in [AnswerStyle::Plain, AnswerStyle::Explained] {
            let mut ctx = test_context();
            ctx.answer_style = style;
            let result = transition(&state, &ctx, Event::select(question.clone())).unwrap();
            prop_assert_eq!(&result.new_state, &ConvState::Main);
            prop_assert_eq!(turn_count(&result.effects, Role::User), 1);
            prop_assert!(turn_count(&result.effects, Role::Assistant) >= 1);

            let first = result.effects[0].as_turn().unwrap();
            prop_assert_eq!(first.role, Role::User);
            prop_assert_eq!(&first.text, &question);
        }
    }

    // Back from any subject returns to Main with no effects
    #[test]
    fn prop_back_returns_to_main(subject in arb_subject()) {
        let result = transition(&ConvState::Subject { subject }, &test_context(), Event::Back)
            .unwrap();
        prop_assert_eq!(result.new_state, ConvState::Main);
        prop_assert!(result.effects.is_empty());
    }

    // Labels not offered by the current menu never change anything
    #[test]
    fn prop_unrecognized_label_is_noop(state in arb_menu_state(), label in arb_label()) {
        let ctx = test_context();
        let catalog = ctx.catalog.clone().unwrap();
        let offered = match &state {
            ConvState::Main => catalog.menu().has_subject(&label),
            ConvState::Subject { subject } => catalog.menu().has_question(subject, &label),
            _ => unreachable!(),
        };
        prop_assume!(!offered);

        let result = transition(&state, &ctx, Event::select(label)).unwrap();
        prop_assert!(result.is_noop(&state));
    }

    // Unavailable never moves
    #[test]
    fn prop_unavailable_is_terminal(event in arb_event()) {
        let result = transition(&ConvState::Unavailable, &test_context(), event);
        prop_assert_eq!(result.unwrap_err(), TransitionError::DataUnavailable);
    }

    // Without a catalog every event is refused
    #[test]
    fn prop_no_catalog_refuses(state in arb_state(), event in arb_event()) {
        let ctx = ConvContext::new(None, AnswerStyle::Plain);
        prop_assert_eq!(transition(&state, &ctx, event).unwrap_err(), TransitionError::DataUnavailable);
    }

    // Effects match the state they lead to
    #[test]
    fn prop_effects_consistent(events in proptest::collection::vec(arb_event(), 0..30)) {
        let ctx = test_context();
        let mut state = ConvState::Main;

        for event in events {
            let Ok(result) = transition(&state, &ctx, event) else { continue };
            let requests = result
                .effects
                .iter()
                .filter(|e| matches!(e, Effect::RequestCompletion { .. }))
                .count();

            if requests > 0 {
                prop_assert_eq!(requests, 1);
                prop_assert!(result.new_state.is_busy());
            }
            if turn_count(&result.effects, Role::User) > 0 {
                prop_assert_eq!(&result.new_state, &ConvState::Main);
            }
            prop_assert!(!result.new_state.is_terminal());
            state = result.new_state;
        }
    }

    // Transitions are deterministic up to turn timestamps
    #[test]
    fn prop_transition_is_deterministic(state in arb_state(), event in arb_event()) {
        let ctx = test_context();
        let a = transition(&state, &ctx, event.clone());
        let b = transition(&state, &ctx, event);
        match (a, b) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(&a.new_state, &b.new_state);
                let strip = |effects: &[Effect]| -> Vec<(Option<Role>, String)> {
                    effects
                        .iter()
                        .map(|e| match e {
                            Effect::AppendTurn(t) => (Some(t.role), t.text.clone()),
                            Effect::RequestCompletion { question } => (None, question.clone()),
                        })
                        .collect()
                };
                prop_assert_eq!(strip(&a.effects), strip(&b.effects));
            }
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            (a, b) => prop_assert!(false, "diverged: {:?} vs {:?}", a, b),
        }
    }

    // Busy sessions reject further menu or ask input
    #[test]
    fn prop_busy_rejects_input(question in "[a-z]{1,10}", label in arb_label()) {
        let state = ConvState::AwaitingCompletion { question };
        let ctx = test_context();
        for event in [Event::select(label.clone()), Event::Back, Event::ask(label.clone())] {
            prop_assert_eq!(transition(&state, &ctx, event).unwrap_err(), TransitionError::Busy);
        }
    }
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[test]
fn test_duplicate_question_text_resolves_to_first_record() {
    let ctx = test_context();
    let result = transition(
        &ConvState::Subject {
            subject: "Geo".into(),
        },
        &ctx,
        Event::select("2+2?"),
    )
    .unwrap();
    let answer = result.effects[1].as_turn().unwrap();
    assert_eq!(answer.text, "4");
}
