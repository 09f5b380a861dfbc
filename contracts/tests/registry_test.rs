//! Integration tests for the election registry.
//!
//! Elections created through the registry are independent: separate
//! owners, separate escrow accounts, separate lifecycles.

use tally_contracts::{ElectionError, ElectionId, ElectionRegistry, Ownable, Phase, RegistryError};
use tally_protocol::config::DEFAULT_CONTRIBUTION;
use tally_protocol::{Identity, InMemoryLedger, Ledger, ManualClock};

fn id(s: &str) -> Identity {
    Identity::new(s).unwrap()
}

#[test]
fn every_creation_is_recorded_in_order() {
    let mut registry = ElectionRegistry::new(id("deployer"));
    assert!(registry.deployed_votings().is_empty());

    let handles: Vec<ElectionId> = ["alice", "bob", "alice"]
        .iter()
        .map(|creator| registry.create_voting(&id(creator)))
        .collect();

    assert_eq!(registry.deployed_votings(), handles);
    assert_eq!(registry.len(), 3);

    let creators: Vec<Identity> = registry
        .deployments()
        .into_iter()
        .map(|d| d.creator)
        .collect();
    assert_eq!(creators, vec![id("alice"), id("bob"), id("alice")]);
}

#[test]
fn creator_not_deployer_owns_election() {
    let mut registry = ElectionRegistry::new(id("deployer"));
    let handle = registry.create_voting(&id("alice"));
    let election = registry.election(handle).unwrap();
    assert_eq!(election.owner(), &id("alice"));
    assert!(!election.is_owner(registry.deployer()));

    // The registry deployer has no rights over hosted elections.
    let err = registry
        .election_mut(handle)
        .unwrap()
        .register_candidate(&id("deployer"), None, id("c1"))
        .unwrap_err();
    assert!(matches!(err, ElectionError::NotOwner(_)));
}

#[test]
fn ownership_filter() {
    let mut registry = ElectionRegistry::new(id("deployer"));
    let a0 = registry.create_voting(&id("alice"));
    let _b0 = registry.create_voting(&id("bob"));
    let a1 = registry.create_voting(&id("alice"));
    assert_eq!(registry.elections_owned_by(&id("alice")), vec![a0, a1]);
    assert!(registry.elections_owned_by(&id("carol")).is_empty());
}

#[test]
fn elections_have_isolated_state_and_escrow() {
    let mut registry = ElectionRegistry::new(id("deployer"));
    let mut ledger = InMemoryLedger::new();
    let clock = ManualClock::starting_now();
    ledger.deposit(&id("voter"), DEFAULT_CONTRIBUTION * 2).unwrap();

    let first = registry.create_voting(&id("alice"));
    let second = registry.create_voting(&id("bob"));

    for (handle, owner) in [(first, "alice"), (second, "bob")] {
        let election = registry.election_mut(handle).unwrap();
        election.register_candidate(&id(owner), None, id("c1")).unwrap();
        election.start_voting(&id(owner), &clock).unwrap();
    }

    registry
        .election_mut(first)
        .unwrap()
        .vote(&id("voter"), 0, DEFAULT_CONTRIBUTION, &clock, &mut ledger)
        .unwrap();

    // Voting in one election does not count as voting in another.
    registry
        .election_mut(second)
        .unwrap()
        .vote(&id("voter"), 0, DEFAULT_CONTRIBUTION, &clock, &mut ledger)
        .unwrap();

    let a = registry.election(first).unwrap();
    let b = registry.election(second).unwrap();
    assert_ne!(a.account(), b.account());
    assert_eq!(ledger.balance_of(a.account()), DEFAULT_CONTRIBUTION);
    assert_eq!(ledger.balance_of(b.account()), DEFAULT_CONTRIBUTION);
    assert_eq!(a.phase(), Phase::Open);
    assert_eq!(b.number_of_voters(), 1);
}

#[test]
fn registry_errors_wrap_election_errors() {
    let mut registry = ElectionRegistry::new(id("deployer"));
    let handle = registry.create_voting(&id("alice"));

    let run = |registry: &mut ElectionRegistry| -> Result<(), RegistryError> {
        let clock = ManualClock::starting_now();
        registry
            .election_mut(handle)?
            .start_voting(&id("alice"), &clock)?;
        Ok(())
    };
    assert_eq!(
        run(&mut registry),
        Err(RegistryError::Election(ElectionError::NoCandidates))
    );
    assert_eq!(
        registry.election(ElectionId(9)).unwrap_err(),
        RegistryError::ElectionNotFound(ElectionId(9))
    );
}

#[test]
fn registry_survives_a_serde_round_trip() {
    let mut registry = ElectionRegistry::new(id("deployer"));
    let handle = registry.create_voting(&id("alice"));
    registry
        .election_mut(handle)
        .unwrap()
        .register_candidate(&id("alice"), Some("Candidate1".into()), id("c1"))
        .unwrap();

    let json = serde_json::to_string(&registry).unwrap();
    let restored: ElectionRegistry = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, registry);

    // Account derivation continues from the persisted nonce.
    let mut restored = restored;
    let next = restored.create_voting(&id("alice"));
    assert_ne!(
        restored.election(next).unwrap().account(),
        restored.election(handle).unwrap().account()
    );
}
