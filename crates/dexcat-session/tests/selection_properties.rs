use dexcat_model::{Catalog, Category, EntityRecord};
use dexcat_session::{SelectionState, Session};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn catalog(n: u32) -> Catalog {
    Catalog::from_records(
        (1..=n)
            .map(|id| EntityRecord::new(id, format!("mon{id}"), vec![Category::Normal]).unwrap())
            .collect(),
    )
}

proptest! {
    #[test]
    fn random_pick_draws_from_the_eligible_pool(
        size in 0u32..20,
        disabled in proptest::collection::btree_set(1u32..20, 0..10),
        seed in any::<u64>(),
    ) {
        let mut session = Session::with_seed(catalog(size), seed);
        for &id in &disabled {
            session.toggle_disabled(id);
        }
        let pool: Vec<u32> = session.eligible().iter().map(|r| r.id).collect();
        match session.choose_random() {
            Some(id) => {
                prop_assert!(pool.contains(&id));
                prop_assert_eq!(session.selection().chosen_id(), Some(id));
            }
            None => {
                prop_assert!(pool.is_empty());
                prop_assert_eq!(session.selection().chosen_id(), None);
            }
        }
    }

    #[test]
    fn at_most_one_entry_is_ever_chosen(choices in proptest::collection::vec(1u32..6, 0..30)) {
        let mut selection = SelectionState::new();
        let mut expected = None;
        for id in choices {
            expected = if expected == Some(id) { None } else { Some(id) };
            prop_assert_eq!(selection.choose(id), expected);
        }
    }

    #[test]
    fn toggling_disabled_twice_is_identity(ids in proptest::collection::vec(1u32..50, 0..20)) {
        let mut selection = SelectionState::new();
        for &id in &ids {
            selection.toggle_disabled(id);
        }
        let after_once = selection.clone();
        for &id in &ids {
            selection.toggle_disabled(id);
            selection.toggle_disabled(id);
        }
        prop_assert_eq!(selection, after_once);
    }
}

#[test]
fn seeded_sessions_pick_the_same_sequence() {
    let picks = |seed| {
        let mut session = Session::with_seed(catalog(50), seed);
        (0..8).map(|_| session.choose_random()).collect::<Vec<_>>()
    };
    assert_eq!(picks(11), picks(11));
}

#[test]
fn choose_random_on_selection_state_uses_the_given_rng() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut selection = SelectionState::new();
    assert_eq!(selection.choose_random([8], &mut rng), Some(8));
    assert_eq!(selection.chosen_id(), Some(8));
}
