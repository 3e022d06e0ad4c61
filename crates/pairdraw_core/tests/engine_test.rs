//! Tests for the draw phases and the assignment algorithm.

use pairdraw_core::invariants::{ExchangeInvariants, InvariantSet};
use pairdraw_core::{
    Degradation, ExchangeComplete, ExchangeInProgress, ExchangeSetup, FinishOutcome, Letter,
    LetterTier, Roster,
};

fn roster(names: &[&str]) -> Roster {
    Roster::from_names(names).expect("valid roster")
}

fn numbered_names(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("P{i:02}")).collect()
}

fn finished(game: ExchangeInProgress) -> ExchangeComplete {
    match game.finish() {
        FinishOutcome::Complete(complete) => complete,
        FinishOutcome::Pending(_) => panic!("expected a finished draw"),
    }
}

fn assert_valid_pairing(complete: &ExchangeComplete) {
    assert_eq!(complete.assignments().len(), complete.roster().len());

    let mut targets: Vec<&str> = complete
        .assignments()
        .iter()
        .map(|a| a.target().as_str())
        .collect();
    targets.sort_unstable();

    let mut expected: Vec<&str> = complete.roster().iter().collect();
    expected.sort_unstable();

    assert_eq!(targets, expected);
    assert!(ExchangeInvariants::check_all(complete).is_ok());
}

#[test]
fn test_batch_draw_assigns_everyone() {
    let setup = ExchangeSetup::new(roster(&["Alice", "Bob", "Carol"])).with_seed(42);
    let complete = setup.assign_all();

    assert!(complete.is_complete());
    assert_valid_pairing(&complete);
    for assignment in complete.assignments() {
        assert!(!assignment.is_self_assignment());
    }
}

#[test]
fn test_batch_draw_is_reproducible_with_seed() {
    let names = ["Alice", "Bob", "Carol", "Dave", "Erin"];

    let first = ExchangeSetup::new(roster(&names)).with_seed(99).assign_all();
    let second = ExchangeSetup::new(roster(&names)).with_seed(99).assign_all();

    assert_eq!(first.assignments(), second.assignments());
    assert_eq!(first.summary(), second.summary());
}

#[test]
fn test_mutually_restricted_pair_overrides() {
    let mut setup = ExchangeSetup::new(roster(&["Alice", "Bob"])).with_seed(7);
    setup.add_restriction("Alice", "Bob").unwrap();

    let complete = setup.assign_all();

    assert_valid_pairing(&complete);
    assert!(complete.is_degraded());
    assert_eq!(*complete.summary().restriction_overrides(), 2);
    assert_eq!(*complete.summary().self_assignments(), 0);
}

#[test]
fn test_fully_restricted_drawer_keeps_own_name() {
    let mut setup = ExchangeSetup::new(roster(&["Alice", "Bob", "Carol"])).with_seed(21);
    setup.add_restriction("Alice", "Bob").unwrap();
    setup.add_restriction("Alice", "Carol").unwrap();

    let mut game = setup.start();
    game.draw_turn("Bob").unwrap();
    game.draw_turn("Carol").unwrap();
    let last = game.draw_turn("Alice").unwrap();

    // Both earlier pairings involve Alice's restricted partners, so no swap
    // can free a target for her.
    assert_eq!(
        last.degradation(),
        &Some(Degradation::SelfAssignment {
            drawer: "Alice".to_string()
        })
    );

    let complete = finished(game);
    assert_valid_pairing(&complete);
    assert_eq!(*complete.summary().self_assignments(), 1);
    assert_eq!(*complete.summary().restriction_overrides(), 0);
}

#[test]
fn test_turn_by_turn_covers_pool_exactly() {
    let names = ["Alice", "Bob", "Carol", "Dave"];
    let mut game = ExchangeSetup::new(roster(&names)).with_seed(3).start();

    assert_eq!(game.targets_remaining(), 4);
    assert_eq!(game.next_drawer(), Some("Alice"));

    for (turns, name) in names.iter().enumerate() {
        assert_eq!(game.remaining().len(), 4 - turns);
        game.draw_turn(name).unwrap();
        assert_eq!(game.targets_remaining(), 4 - turns - 1);
    }

    assert!(game.all_drawn());
    assert_eq!(game.next_drawer(), None);
    assert_valid_pairing(&finished(game));
}

#[test]
fn test_unrestricted_draws_never_degrade() {
    for count in 2..=7 {
        let names = numbered_names(count);
        for seed in 0..30 {
            let setup = ExchangeSetup::new(Roster::from_names(&names).unwrap()).with_seed(seed);
            let complete = setup.assign_all();

            assert_valid_pairing(&complete);
            assert!(!complete.is_degraded());
            for assignment in complete.assignments() {
                assert!(!assignment.is_self_assignment());
            }
        }
    }
}

#[test]
fn test_final_turn_swap_repairs_self_draw() {
    let names = ["Alice", "Bob", "Carol", "Dave"];
    let mut seeds_with_swap = 0;

    for seed in 0..200 {
        let mut game = ExchangeSetup::new(roster(&names)).with_seed(seed).start();
        for name in &names {
            game.draw_turn(name).unwrap();
        }

        let complete = finished(game);
        assert_valid_pairing(&complete);
        assert!(!complete.is_degraded());

        if *complete.summary().swap_repairs() > 0 {
            seeds_with_swap += 1;
        }
    }

    // Roughly a quarter of seeds leave the last drawer holding their own
    // name; the swap must repair every one of them.
    assert!(seeds_with_swap > 0);
}

#[test]
fn test_heavy_restrictions_still_complete() {
    let names = ["Alice", "Bob", "Carol", "Dave", "Erin"];
    let mut setup = ExchangeSetup::new(roster(&names)).with_seed(17);
    for other in &names[1..] {
        setup.add_restriction("Alice", other).unwrap();
    }

    let complete = setup.assign_all();

    assert!(complete.is_complete());
    assert_valid_pairing(&complete);
}

#[test]
fn test_finish_before_all_turns_is_pending() {
    let mut game = ExchangeSetup::new(roster(&["Alice", "Bob", "Carol"]))
        .with_seed(5)
        .start();
    game.draw_turn("Alice").unwrap();

    let mut game = match game.finish() {
        FinishOutcome::Pending(game) => game,
        FinishOutcome::Complete(_) => panic!("draw finished with turns remaining"),
    };

    game.draw_turn("Bob").unwrap();
    game.draw_turn("Carol").unwrap();
    assert_valid_pairing(&finished(game));
}

#[test]
fn test_restart_preserves_configuration() {
    let mut setup = ExchangeSetup::new(roster(&["Alice", "Bob", "Carol", "Dave"])).with_seed(31);
    setup.add_restriction("Alice", "Bob").unwrap();
    setup.set_excluded_letters([Letter::Q, Letter::Z]);

    let complete = setup.assign_all();
    let again = complete.restart();

    assert_eq!(again.roster().len(), 4);
    assert_eq!(again.restrictions().len(), 1);
    assert_eq!(
        again.excluded_letters().collect::<Vec<_>>(),
        vec![Letter::Q, Letter::Z]
    );

    assert_valid_pairing(&again.assign_all());
}

#[test]
fn test_letters_stay_fresh_while_alphabet_lasts() {
    let names = numbered_names(10);
    let mut game = ExchangeSetup::new(Roster::from_names(&names).unwrap())
        .with_seed(12)
        .start();

    let mut letters = Vec::new();
    for name in &names {
        let record = game.draw_turn(name).unwrap();
        assert_eq!(record.tier(), &LetterTier::Fresh);
        letters.push(record.letter());
    }

    letters.sort_unstable();
    letters.dedup();
    assert_eq!(letters.len(), 10);
}
