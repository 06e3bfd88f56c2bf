//! Integration tests for registration management and tournament status transitions.

use foosball_tournament::{
    cancel_tournament, close_registration, complete_tournament, open_registration,
    start_tournament, start_tournament_with_rng, MatchStatus, Registration, Tournament,
    TournamentError, TournamentFormat, TournamentSettings, TournamentStatus,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn open_tournament() -> Tournament {
    let mut t = Tournament::new("Friday Cup", TournamentFormat::SingleElimination);
    open_registration(&mut t).unwrap();
    t
}

#[test]
fn new_tournament_starts_as_draft() {
    let t = Tournament::new("Friday Cup", TournamentFormat::SingleElimination);
    assert_eq!(t.status, TournamentStatus::Draft);
    assert!(!t.can_register());
    assert!(t.matches.is_empty());
    assert!(t.champion().is_none());
}

#[test]
fn registration_requires_an_open_window() {
    let mut t = Tournament::new("Friday Cup", TournamentFormat::SingleElimination);
    assert_eq!(
        t.register(Registration::single("Alice")),
        Err(TournamentError::InvalidState)
    );

    open_registration(&mut t).unwrap();
    assert!(open_registration(&mut t).is_err());
    assert!(t.can_register());
    t.register(Registration::single("Alice")).unwrap();

    close_registration(&mut t).unwrap();
    assert_eq!(t.status, TournamentStatus::RegistrationClosed);
    assert!(close_registration(&mut t).is_err());
    assert_eq!(
        t.register(Registration::single("Bob")),
        Err(TournamentError::InvalidState)
    );
}

#[test]
fn a_player_can_only_be_registered_once() {
    let mut t = open_tournament();
    t.register(Registration::pair("Alice", "Bob", None)).unwrap();
    assert_eq!(
        t.register(Registration::single("alice")),
        Err(TournamentError::DuplicateRegistration)
    );
    assert_eq!(
        t.register(Registration::pair("Carol", " BOB ", None)),
        Err(TournamentError::DuplicateRegistration)
    );
    t.register(Registration::pair("Carol", "Dave", None)).unwrap();
    assert_eq!(t.registrations.len(), 2);
}

#[test]
fn withdrawn_player_may_register_again() {
    let mut t = open_tournament();
    let id = t.register(Registration::single("Alice")).unwrap();
    t.withdraw(id).unwrap();
    t.register(Registration::single("Alice")).unwrap();
    assert_eq!(t.active_registrations().len(), 1);
}

#[test]
fn blank_player_names_are_rejected() {
    let mut t = open_tournament();
    for blank in [Registration::single("   "), Registration::pair("Alice", "", None)] {
        let err = t.register(blank).unwrap_err();
        assert!(matches!(err, TournamentError::InvalidRegistration { .. }));
        assert!(!err.is_not_found());
    }
    assert!(t.registrations.is_empty());
}

#[test]
fn max_participants_is_enforced() {
    let mut t = open_tournament();
    t.max_participants = Some(2);
    t.register(Registration::single("Alice")).unwrap();
    t.register(Registration::single("Bob")).unwrap();
    assert!(!t.can_register());
    assert_eq!(
        t.register(Registration::single("Carol")),
        Err(TournamentError::TournamentFull { max: 2 })
    );
}

#[test]
fn display_names() {
    assert_eq!(Registration::single("  Alice ").display_name(), "Alice");
    assert_eq!(
        Registration::pair("Alice", "Bob", None).display_name(),
        "Alice & Bob"
    );
    assert_eq!(
        Registration::pair("Alice", "Bob", Some("Spinners".into())).display_name(),
        "Spinners"
    );
    assert_eq!(
        Registration::pair("Alice", "Bob", Some("  ".into())).display_name(),
        "Alice & Bob"
    );
    assert!(Registration::pair("Alice", "Bob", None).is_team());
    assert!(!Registration::single("Alice").is_team());
}

#[test]
fn can_play_against_requires_distinct_active_entrants() {
    let alice_bob = Registration::pair("Alice", "Bob", None);
    let bob_carol = Registration::pair("Bob", "Carol", None);
    let mut dave = Registration::single("Dave");

    assert!(!alice_bob.can_play_against(&alice_bob));
    assert!(!alice_bob.can_play_against(&bob_carol));
    assert!(alice_bob.can_play_against(&dave));

    dave.disqualify();
    assert!(!alice_bob.can_play_against(&dave));
    dave.reactivate();
    assert!(dave.can_play_against(&alice_bob));
}

#[test]
fn start_builds_the_bracket_from_active_registrations_only() {
    let mut t = open_tournament();
    let mut ids = Vec::new();
    for name in ["Alice", "Bob", "Carol", "Dave", "Erin"] {
        ids.push(t.register(Registration::single(name)).unwrap());
    }
    t.withdraw(ids[4]).unwrap();
    close_registration(&mut t).unwrap();

    start_tournament_with_rng(&mut t, &mut StdRng::seed_from_u64(3)).unwrap();
    assert_eq!(t.status, TournamentStatus::InProgress);
    assert!(t.start_date.is_some());
    assert_eq!(t.matches.len(), 3);
    assert!(t.matches.iter().all(|m| !m.contains(ids[4])));
    assert_eq!(
        t.matches
            .iter()
            .filter(|m| m.status == MatchStatus::Ready)
            .count(),
        2
    );

    assert_eq!(t.withdraw(ids[0]), Err(TournamentError::InvalidState));
    assert!(start_tournament(&mut t).is_err());
}

#[test]
fn start_requires_closed_registration_and_enough_entrants() {
    let mut t = open_tournament();
    t.register(Registration::single("Alice")).unwrap();
    assert_eq!(start_tournament(&mut t), Err(TournamentError::InvalidState));

    close_registration(&mut t).unwrap();
    assert_eq!(
        start_tournament(&mut t),
        Err(TournamentError::InsufficientParticipants {
            required: 2,
            available: 1,
        })
    );
    assert_eq!(t.status, TournamentStatus::RegistrationClosed);
    assert!(t.matches.is_empty());
}

#[test]
fn disqualification_mid_tournament_holds_back_ready_matches() {
    let regs: Vec<_> = ["Alice", "Bob", "Carol", "Dave"]
        .into_iter()
        .enumerate()
        .map(|(i, name)| Registration::single(name).with_seed(i as u32 + 1))
        .collect();
    let bob = regs[1].id;
    let mut t = Tournament::with_registrations("Cup", TournamentFormat::SingleElimination, regs);
    start_tournament(&mut t).unwrap();

    t.disqualify(bob).unwrap();
    let bobs_match = t.matches.iter().find(|m| m.contains(bob)).unwrap();
    assert_eq!(bobs_match.status, MatchStatus::Pending);
    assert_eq!(
        t.disqualify(uuid::Uuid::nil()),
        Err(TournamentError::RegistrationNotFound(uuid::Uuid::nil()))
    );
}

#[test]
fn cancel_and_complete_transitions() {
    let mut t = open_tournament();
    cancel_tournament(&mut t).unwrap();
    assert_eq!(t.status, TournamentStatus::Cancelled);
    assert_eq!(cancel_tournament(&mut t), Err(TournamentError::InvalidState));
    assert_eq!(complete_tournament(&mut t), Err(TournamentError::InvalidState));

    let regs = vec![Registration::single("Alice"), Registration::single("Bob")];
    let mut t = Tournament::with_registrations("Cup", TournamentFormat::SingleElimination, regs);
    assert_eq!(complete_tournament(&mut t), Err(TournamentError::InvalidState));
    start_tournament(&mut t).unwrap();
    complete_tournament(&mut t).unwrap();
    assert!(t.end_date.is_some());
    assert_eq!(cancel_tournament(&mut t), Err(TournamentError::InvalidState));
}

#[test]
fn settings_are_frozen_once_registration_closes() {
    let mut t = Tournament::new("Cup", TournamentFormat::SingleElimination);
    let mut settings = TournamentSettings::default();
    settings.points.points_for_win = 2;
    settings.auto_advancement = false;
    t.update_settings(settings).unwrap();
    assert_eq!(t.settings.points.points_for_win, 2);

    open_registration(&mut t).unwrap();
    t.update_settings(TournamentSettings::default()).unwrap();

    close_registration(&mut t).unwrap();
    assert_eq!(
        t.update_settings(settings),
        Err(TournamentError::InvalidState)
    );
    assert_eq!(t.settings, TournamentSettings::default());
}

#[test]
fn settings_deserialize_with_defaults() {
    let settings: TournamentSettings =
        serde_json::from_str(r#"{"points_for_win": 2, "auto_advancement": false}"#).unwrap();
    assert_eq!(settings.points.points_for_win, 2);
    assert_eq!(settings.points.points_for_draw, 1);
    assert!(settings.allow_draws);
    assert!(!settings.auto_advancement);
}
