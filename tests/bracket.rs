//! Integration tests for bracket generation, bye resolution, advancement and completion.

use foosball_tournament::{
    advance_winner, generate_bracket, is_complete, MatchScore, MatchStatus, Registration,
    TournamentError, TournamentMatch,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn registrations(n: usize) -> Vec<Registration> {
    (0..n)
        .map(|i| Registration::single(format!("Player {}", i + 1)))
        .collect()
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn find(matches: &[TournamentMatch], round: u32, number: u32) -> &TournamentMatch {
    matches
        .iter()
        .find(|m| m.round == round && m.match_number == number)
        .unwrap()
}

/// Play every ready match (team 1 wins) until nothing is left to play.
fn play_out(matches: &mut Vec<TournamentMatch>, regs: &[Registration]) {
    while let Some(idx) = matches.iter().position(|m| m.status == MatchStatus::Ready) {
        let winner = matches[idx].team_1.unwrap();
        let id = matches[idx].id;
        matches[idx]
            .complete(
                winner,
                MatchScore {
                    team_1_goals: 10,
                    team_2_goals: 3,
                },
            )
            .unwrap();
        advance_winner(matches, regs, id);
    }
}

#[test]
fn fewer_than_two_participants_is_rejected() {
    for n in 0..2 {
        assert_eq!(
            generate_bracket(&registrations(n), &mut rng()),
            Err(TournamentError::InsufficientParticipants {
                required: 2,
                available: n,
            })
        );
    }
}

#[test]
fn match_count_and_round_sizes_follow_next_power_of_two() {
    for n in 2..=33 {
        let matches = generate_bracket(&registrations(n), &mut rng()).unwrap();
        let slots = n.next_power_of_two();
        assert_eq!(matches.len(), slots - 1, "n = {n}");

        let rounds = slots.trailing_zeros();
        for r in 1..=rounds {
            let in_round = matches.iter().filter(|m| m.round == r).count();
            assert_eq!(in_round, slots >> r, "n = {n}, round {r}");
        }
        assert_eq!(matches.iter().filter(|m| m.round == rounds).count(), 1);

        let keys: HashSet<_> = matches.iter().map(|m| (m.round, m.match_number)).collect();
        assert_eq!(keys.len(), matches.len());
        assert!(matches.iter().all(|m| m.round >= 1 && m.match_number >= 1));
    }
}

#[test]
fn two_players_get_a_single_ready_final() {
    let regs = registrations(2);
    let matches = generate_bracket(&regs, &mut rng()).unwrap();
    assert_eq!(matches.len(), 1);
    let m = &matches[0];
    assert_eq!((m.round, m.match_number), (1, 1));
    assert_eq!(m.status, MatchStatus::Ready);
    assert!(m.next_match.is_none());
    let placed: HashSet<_> = [m.team_1.unwrap(), m.team_2.unwrap()].into_iter().collect();
    let expected: HashSet<_> = regs.iter().map(|r| r.id).collect();
    assert_eq!(placed, expected);
}

#[test]
fn four_players_feed_both_semifinals_into_the_final() {
    let matches = generate_bracket(&registrations(4), &mut rng()).unwrap();
    assert_eq!(matches.len(), 3);
    let final_match = find(&matches, 2, 1);
    assert_eq!(find(&matches, 1, 1).next_match, Some(final_match.id));
    assert_eq!(find(&matches, 1, 2).next_match, Some(final_match.id));
    assert!(final_match.next_match.is_none());
    assert_eq!(find(&matches, 1, 1).status, MatchStatus::Ready);
    assert_eq!(find(&matches, 1, 2).status, MatchStatus::Ready);
    assert_eq!(final_match.status, MatchStatus::Pending);
}

#[test]
fn three_players_get_one_bye_advanced_into_the_final() {
    let matches = generate_bracket(&registrations(3), &mut rng()).unwrap();
    assert_eq!(matches.len(), 3);

    let walkovers: Vec<_> = matches
        .iter()
        .filter(|m| m.round == 1 && m.status == MatchStatus::Walkover)
        .collect();
    assert_eq!(walkovers.len(), 1);
    let bye = walkovers[0];
    assert_eq!(bye.match_number, 2);
    assert!(bye.has_bye());
    let winner = bye.winner.unwrap();
    assert_eq!(bye.team_1, Some(winner));

    let final_match = find(&matches, 2, 1);
    assert_eq!(final_match.team_1, Some(winner));
    assert_eq!(final_match.team_2, None);
    assert_eq!(final_match.status, MatchStatus::Pending);
    assert_eq!(find(&matches, 1, 1).status, MatchStatus::Ready);
}

#[test]
fn every_first_round_bye_is_a_walkover_already_in_its_successor() {
    for n in 2..=33 {
        let matches = generate_bracket(&registrations(n), &mut rng()).unwrap();
        for m in matches.iter().filter(|m| m.round == 1 && m.has_bye()) {
            assert_eq!(m.status, MatchStatus::Walkover, "n = {n}");
            let winner = m.winner.expect("bye has a winner");
            if let Some(next_id) = m.next_match {
                let next = matches.iter().find(|x| x.id == next_id).unwrap();
                assert!(next.contains(winner), "n = {n}");
            }
        }
    }
}

#[test]
fn any_participant_count_can_be_played_to_completion() {
    for n in 2..=20 {
        let regs = registrations(n);
        let mut matches = generate_bracket(&regs, &mut rng()).unwrap();
        assert!(!is_complete(&matches), "n = {n}");
        play_out(&mut matches, &regs);
        assert!(is_complete(&matches), "n = {n}");
    }
}

#[test]
fn seeds_fill_slots_in_order_with_unseeded_last() {
    let regs = vec![
        Registration::single("Unseeded A"),
        Registration::single("Second").with_seed(2),
        Registration::single("Unseeded B"),
        Registration::single("First").with_seed(1),
    ];
    let matches = generate_bracket(&regs, &mut rng()).unwrap();
    let first = find(&matches, 1, 1);
    let second = find(&matches, 1, 2);
    assert_eq!(first.team_1, Some(regs[3].id));
    assert_eq!(first.team_2, Some(regs[1].id));
    assert_eq!(second.team_1, Some(regs[0].id));
    assert_eq!(second.team_2, Some(regs[2].id));
}

#[test]
fn advancing_twice_does_not_fill_the_successor_twice() {
    let regs = registrations(4);
    let mut matches = generate_bracket(&regs, &mut rng()).unwrap();
    let semi_id = find(&matches, 1, 1).id;
    let idx = matches.iter().position(|m| m.id == semi_id).unwrap();
    let winner = matches[idx].team_1.unwrap();
    matches[idx].complete(winner, MatchScore::default()).unwrap();

    let updated = advance_winner(&mut matches, &regs, semi_id);
    let final_id = find(&matches, 2, 1).id;
    assert_eq!(updated, vec![final_id]);
    let after_first = find(&matches, 2, 1).clone();
    assert_eq!(after_first.team_1, Some(winner));
    assert_eq!(after_first.team_2, None);

    let updated = advance_winner(&mut matches, &regs, semi_id);
    assert!(updated.is_empty());
    assert_eq!(find(&matches, 2, 1), &after_first);
}

#[test]
fn undecided_matches_and_the_final_do_not_advance() {
    let regs = registrations(4);
    let mut matches = generate_bracket(&regs, &mut rng()).unwrap();
    let semi_id = find(&matches, 1, 1).id;
    assert!(advance_winner(&mut matches, &regs, semi_id).is_empty());
    assert_eq!(find(&matches, 2, 1).team_1, None);

    let regs = registrations(2);
    let mut matches = generate_bracket(&regs, &mut rng()).unwrap();
    let winner = matches[0].team_2.unwrap();
    matches[0].complete(winner, MatchScore::default()).unwrap();
    let id = matches[0].id;
    assert!(advance_winner(&mut matches, &regs, id).is_empty());
}

#[test]
fn completion_requires_a_decided_final() {
    assert!(!is_complete(&[]));

    let regs = registrations(4);
    let mut matches = generate_bracket(&regs, &mut rng()).unwrap();
    for number in 1..=2 {
        let idx = matches
            .iter()
            .position(|m| m.round == 1 && m.match_number == number)
            .unwrap();
        let winner = matches[idx].team_1.unwrap();
        let id = matches[idx].id;
        matches[idx].complete(winner, MatchScore::default()).unwrap();
        advance_winner(&mut matches, &regs, id);
    }
    assert!(!is_complete(&matches));

    let idx = matches.iter().position(|m| m.round == 2).unwrap();
    assert_eq!(matches[idx].status, MatchStatus::Ready);
    let winner = matches[idx].team_2.unwrap();
    matches[idx].walkover(winner).unwrap();
    assert!(is_complete(&matches));
}
