//! Unit tests for `TicketReducer`.
//!
//! These tests drive the reducer directly (no store) and cover:
//! - Issuance and the minter gate
//! - Transfers, including transfers of consumed tickets
//! - Consumption, its check order and its event
//! - Role management
//! - Rejections leaving state untouched

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

use crate::{
    Identity, RegistryEnvironment, RegistryState, TicketAction, TicketError, TicketEvent,
    TicketId, TicketReducer,
};
use std::sync::Arc;
use ticket721_core::environment::Clock;
use ticket721_core::reducer::Reducer;
use ticket721_testing::reducer_test::assertions;
use ticket721_testing::{test_clock, ReducerTest};

fn id(name: &str) -> Identity {
    Identity::new(name).expect("test identities are non-empty")
}

fn operator() -> Identity {
    id("operator")
}

fn alice() -> Identity {
    id("alice")
}

fn bob() -> Identity {
    id("bob")
}

/// Helper to create a test environment with a fixed clock.
fn test_env() -> RegistryEnvironment {
    RegistryEnvironment::new(Arc::new(test_clock()))
}

/// Registry with tickets 1001..=1003 issued to alice.
fn seeded_state() -> RegistryState {
    let reducer = TicketReducer::new();
    let env = test_env();
    let mut state = RegistryState::new(operator());

    for raw in 1001..=1003 {
        reducer
            .reduce(
                &mut state,
                TicketAction::Issue {
                    caller: operator(),
                    recipient: alice(),
                    ticket_id: TicketId::new(raw),
                },
                &env,
            )
            .unwrap();
    }

    state
}

// ============================================================================
// Issue
// ============================================================================

#[test]
fn test_minter_issues_ticket() {
    ReducerTest::new(TicketReducer::new())
        .with_env(test_env())
        .given_state(RegistryState::new(operator()))
        .when_action(TicketAction::Issue {
            caller: operator(),
            recipient: alice(),
            ticket_id: TicketId::new(2001),
        })
        .then_state(|state| {
            let ticket = state.ticket(TicketId::new(2001)).unwrap();
            assert_eq!(ticket.owner(), &alice());
            assert!(!ticket.is_consumed());
            assert_eq!(ticket.issued_at(), test_clock().now());
            assert!(state.is_consumable(TicketId::new(2001)));
        })
        .then_effects(|effects| {
            assertions::assert_no_effects(effects);
        })
        .run();
}

#[test]
fn test_non_minter_cannot_issue() {
    ReducerTest::new(TicketReducer::new())
        .with_env(test_env())
        .given_state(seeded_state())
        .when_action(TicketAction::Issue {
            caller: alice(),
            recipient: alice(),
            ticket_id: TicketId::new(2001),
        })
        .then_state(|state| {
            assert!(!state.is_consumable(TicketId::new(2001)));
            assert_eq!(state.total_supply(), 3);
        })
        .then_error(|error| {
            assert_eq!(*error, TicketError::Unauthorized { caller: alice() });
            assert_eq!(error.to_string(), "Only minter can issue ticket.");
        })
        .run();
}

#[test]
fn test_reissue_is_rejected_without_overwrite() {
    ReducerTest::new(TicketReducer::new())
        .with_env(test_env())
        .given_state(seeded_state())
        .when_action(TicketAction::Issue {
            caller: operator(),
            recipient: bob(),
            ticket_id: TicketId::new(1001),
        })
        .then_state(|state| {
            assert_eq!(state.owner_of(TicketId::new(1001)), Some(&alice()));
        })
        .then_error(|error| {
            assert_eq!(
                *error,
                TicketError::AlreadyIssued {
                    ticket_id: TicketId::new(1001)
                }
            );
        })
        .run();
}

#[test]
fn test_non_minter_reissue_reports_unauthorized() {
    ReducerTest::new(TicketReducer::new())
        .with_env(test_env())
        .given_state(seeded_state())
        .when_action(TicketAction::Issue {
            caller: bob(),
            recipient: bob(),
            ticket_id: TicketId::new(1001),
        })
        .then_error(|error| {
            assert_eq!(error.code(), "unauthorized");
        })
        .run();
}

// ============================================================================
// Transfer
// ============================================================================

#[test]
fn test_holder_transfers_ticket() {
    ReducerTest::new(TicketReducer::new())
        .with_env(test_env())
        .given_state(seeded_state())
        .when_action(TicketAction::TransferFrom {
            caller: alice(),
            from: alice(),
            to: bob(),
            ticket_id: TicketId::new(1001),
        })
        .then_state(|state| {
            assert_eq!(state.owner_of(TicketId::new(1001)), Some(&bob()));
            assert!(state.is_consumable(TicketId::new(1001)));
            assert_eq!(state.balance_of(&alice()), 2);
            assert_eq!(state.balance_of(&bob()), 1);
        })
        .then_effects(|effects| {
            assertions::assert_no_effects(effects);
        })
        .run();
}

#[test]
fn test_transfer_by_non_holder_is_rejected() {
    ReducerTest::new(TicketReducer::new())
        .with_env(test_env())
        .given_state(seeded_state())
        .when_action(TicketAction::TransferFrom {
            caller: bob(),
            from: alice(),
            to: bob(),
            ticket_id: TicketId::new(1001),
        })
        .then_state(|state| {
            assert_eq!(state.owner_of(TicketId::new(1001)), Some(&alice()));
        })
        .then_error(|error| {
            assert!(matches!(error, TicketError::NotAuthorized { .. }));
        })
        .run();
}

#[test]
fn test_transfer_with_wrong_from_is_rejected() {
    ReducerTest::new(TicketReducer::new())
        .with_env(test_env())
        .given_state(seeded_state())
        .when_action(TicketAction::TransferFrom {
            caller: bob(),
            from: bob(),
            to: operator(),
            ticket_id: TicketId::new(1001),
        })
        .then_error(|error| {
            assert!(matches!(error, TicketError::NotOwner { .. }));
        })
        .run();
}

#[test]
fn test_transfer_of_unissued_ticket_is_rejected() {
    ReducerTest::new(TicketReducer::new())
        .with_env(test_env())
        .given_state(seeded_state())
        .when_action(TicketAction::TransferFrom {
            caller: alice(),
            from: alice(),
            to: bob(),
            ticket_id: TicketId::new(9999),
        })
        .then_state(|state| {
            assert!(!state.is_issued(TicketId::new(9999)));
        })
        .then_error(|error| {
            assert_eq!(error.code(), "not_owner");
        })
        .run();
}

#[test]
fn test_consumed_ticket_can_still_be_transferred() {
    let reducer = TicketReducer::new();
    let env = test_env();
    let mut state = seeded_state();

    reducer
        .reduce(
            &mut state,
            TicketAction::Consume {
                caller: alice(),
                ticket_id: TicketId::new(1002),
            },
            &env,
        )
        .unwrap();

    ReducerTest::new(reducer)
        .with_env(env)
        .given_state(state)
        .when_action(TicketAction::TransferFrom {
            caller: alice(),
            from: alice(),
            to: bob(),
            ticket_id: TicketId::new(1002),
        })
        .then_state(|state| {
            let ticket = state.ticket(TicketId::new(1002)).unwrap();
            assert_eq!(ticket.owner(), &bob());
            assert!(ticket.is_consumed());
            assert!(!state.is_consumable(TicketId::new(1002)));
        })
        .then_effects(|effects| {
            assertions::assert_no_effects(effects);
        })
        .run();
}

// ============================================================================
// Consume
// ============================================================================

#[test]
fn test_holder_consumes_ticket() {
    ReducerTest::new(TicketReducer::new())
        .with_env(test_env())
        .given_state(seeded_state())
        .when_action(TicketAction::Consume {
            caller: alice(),
            ticket_id: TicketId::new(1002),
        })
        .then_state(|state| {
            let ticket = state.ticket(TicketId::new(1002)).unwrap();
            assert!(ticket.is_consumed());
            assert_eq!(ticket.consumed_at(), Some(test_clock().now()));
            assert!(!state.is_consumable(TicketId::new(1002)));
            assert_eq!(ticket.owner(), &alice());
        })
        .then_effects(|effects| {
            assertions::assert_emitted_once(
                effects,
                &TicketEvent::OnConsumption {
                    ticket_id: TicketId::new(1002),
                    consumed_at: test_clock().now(),
                },
            );
        })
        .run();
}

#[test]
fn test_non_holder_cannot_consume() {
    ReducerTest::new(TicketReducer::new())
        .with_env(test_env())
        .given_state(seeded_state())
        .when_action(TicketAction::Consume {
            caller: bob(),
            ticket_id: TicketId::new(1002),
        })
        .then_state(|state| {
            let ticket = state.ticket(TicketId::new(1002)).unwrap();
            assert!(!ticket.is_consumed());
            assert_eq!(ticket.owner(), &alice());
        })
        .then_error(|error| {
            assert_eq!(error.to_string(), "Ticket should be held by tx sender to be consumed.");
        })
        .run();
}

#[test]
fn test_unissued_ticket_is_not_consumable_for_anyone() {
    for caller in [operator(), alice(), bob()] {
        ReducerTest::new(TicketReducer::new())
            .with_env(test_env())
            .given_state(seeded_state())
            .when_action(TicketAction::Consume {
                caller,
                ticket_id: TicketId::new(3001),
            })
            .then_error(|error| {
                assert_eq!(error.to_string(), "Ticket needs to be consumable.");
            })
            .run();
    }
}

#[test]
fn test_second_consume_reports_not_consumable() {
    let reducer = TicketReducer::new();
    let env = test_env();
    let mut state = seeded_state();
    let consume = |caller: Identity| TicketAction::Consume {
        caller,
        ticket_id: TicketId::new(1001),
    };

    reducer.reduce(&mut state, consume(alice()), &env).unwrap();
    let before = state.clone();

    // Holder and non-holder both see NotConsumable: consumability is checked first
    for caller in [alice(), bob()] {
        let error = reducer.reduce(&mut state, consume(caller), &env).unwrap_err();
        assert_eq!(
            error,
            TicketError::NotConsumable {
                ticket_id: TicketId::new(1001)
            }
        );
    }

    assert_eq!(state, before);
}

// ============================================================================
// Minter role
// ============================================================================

#[test]
fn test_minter_adds_minter() {
    ReducerTest::new(TicketReducer::new())
        .with_env(test_env())
        .given_state(RegistryState::new(operator()))
        .when_action(TicketAction::AddMinter {
            caller: operator(),
            account: alice(),
        })
        .then_state(|state| {
            assert!(state.is_minter(&alice()));
            assert!(state.is_minter(&operator()));
        })
        .then_effects(|effects| {
            assertions::assert_no_effects(effects);
        })
        .run();
}

#[test]
fn test_adding_existing_minter_is_a_no_op() {
    ReducerTest::new(TicketReducer::new())
        .with_env(test_env())
        .given_state(RegistryState::new(operator()).with_minter(alice()))
        .when_action(TicketAction::AddMinter {
            caller: operator(),
            account: alice(),
        })
        .then_state(|state| {
            assert_eq!(state.minters(), vec![&alice(), &operator()]);
        })
        .then_effects(|effects| {
            assertions::assert_no_effects(effects);
        })
        .run();
}

#[test]
fn test_non_minter_cannot_add_minter() {
    ReducerTest::new(TicketReducer::new())
        .with_env(test_env())
        .given_state(RegistryState::new(operator()))
        .when_action(TicketAction::AddMinter {
            caller: alice(),
            account: bob(),
        })
        .then_state(|state| {
            assert!(!state.is_minter(&bob()));
        })
        .then_error(|error| {
            assert_eq!(*error, TicketError::MinterRequired { caller: alice() });
        })
        .run();
}

#[test]
fn test_renounced_minter_can_no_longer_issue() {
    let reducer = TicketReducer::new();
    let env = test_env();
    let mut state = RegistryState::new(operator()).with_minter(alice());

    reducer
        .reduce(&mut state, TicketAction::RenounceMinter { caller: alice() }, &env)
        .unwrap();
    assert!(!state.is_minter(&alice()));

    let error = reducer
        .reduce(
            &mut state,
            TicketAction::Issue {
                caller: alice(),
                recipient: alice(),
                ticket_id: TicketId::new(1),
            },
            &env,
        )
        .unwrap_err();
    assert!(matches!(error, TicketError::Unauthorized { .. }));

    let error = reducer
        .reduce(&mut state, TicketAction::RenounceMinter { caller: alice() }, &env)
        .unwrap_err();
    assert_eq!(error.code(), "minter_required");
}
