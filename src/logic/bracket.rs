//! Single-elimination bracket: generation, bye resolution, winner advancement, completion check.

use crate::models::{
    MatchId, MatchStatus, Registration, RegistrationId, TournamentError, TournamentMatch,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Fewest entrants a single-elimination bracket can be built for.
pub const MINIMUM_PARTICIPANTS: usize = 2;

/// Placement order: by seed ascending (unseeded last, ties keep registration order)
/// when any entrant is seeded, otherwise a uniform shuffle.
pub fn order_registrations<R: Rng + ?Sized>(
    registrations: &[Registration],
    rng: &mut R,
) -> Vec<Registration> {
    let mut ordered = registrations.to_vec();
    if ordered.iter().any(|r| r.seed.is_some()) {
        ordered.sort_by_key(|r| (r.seed.is_none(), r.seed));
    } else {
        ordered.shuffle(rng);
    }
    ordered
}

/// Rounds needed for `participants` entrants: ceil(log2(n)).
pub fn round_count(participants: usize) -> u32 {
    participants.next_power_of_two().trailing_zeros()
}

/// Build the full bracket for `registrations` (expected to be the active entrants).
///
/// 1. Order entrants (seeds or shuffle).
/// 2. Allocate 2^R / 2^r matches per round r, wire each match k into round r+1, match ceil(k/2).
/// 3. Fill round 1 two entrants at a time; a half-filled match is a bye.
/// 4. Resolve byes immediately (walkover + advancement), cancelling empty first-round matches.
pub fn generate_bracket<R: Rng + ?Sized>(
    registrations: &[Registration],
    rng: &mut R,
) -> Result<Vec<TournamentMatch>, TournamentError> {
    if registrations.len() < MINIMUM_PARTICIPANTS {
        return Err(TournamentError::InsufficientParticipants {
            required: MINIMUM_PARTICIPANTS,
            available: registrations.len(),
        });
    }

    let ordered = order_registrations(registrations, rng);
    let rounds = round_count(ordered.len());

    let mut matches = Vec::with_capacity((1usize << rounds) - 1);
    for round in 1..=rounds {
        let in_round = 1u32 << (rounds - round);
        for match_number in 1..=in_round {
            matches.push(TournamentMatch::new(round, match_number));
        }
    }
    wire_advancement(&mut matches, rounds);

    let is_active = active_lookup(&ordered);
    let mut entrants = ordered.iter().map(|r| r.id);
    for m in matches.iter_mut().filter(|m| m.round == 1) {
        m.team_1 = entrants.next();
        m.team_2 = entrants.next();
        m.refresh_status(&is_active);
    }

    let byes = resolve_byes(&mut matches, &ordered);
    log::debug!("Resolved {} bye match(es) at bracket generation", byes.len());
    Ok(matches)
}

/// Point every non-final match at its successor.
fn wire_advancement(matches: &mut [TournamentMatch], rounds: u32) {
    let ids: HashMap<(u32, u32), MatchId> = matches
        .iter()
        .map(|m| ((m.round, m.match_number), m.id))
        .collect();
    for m in matches.iter_mut().filter(|m| m.round < rounds) {
        m.next_match = ids.get(&(m.round + 1, (m.match_number + 1) / 2)).copied();
    }
}

/// Push the winner of a decided match into its successor's first open slot.
///
/// No-op when the match is undecided, is the final, or its winner already sits in
/// the successor; calling it twice leaves the successor unchanged. Returns the ids
/// of every match that changed, including any byes resolved as a consequence.
pub fn advance_winner(
    matches: &mut [TournamentMatch],
    registrations: &[Registration],
    match_id: MatchId,
) -> Vec<MatchId> {
    let Some(source) = matches.iter().position(|m| m.id == match_id) else {
        return Vec::new();
    };
    let is_active = active_lookup(registrations);
    let mut updated = Vec::new();
    if let Some(next) = place_winner(matches, source, &is_active) {
        log::debug!("Advanced winner of match {} into match {}", match_id, next);
        updated.push(next);
        updated.extend(resolve_byes(matches, registrations));
    }
    updated
}

fn place_winner(
    matches: &mut [TournamentMatch],
    source: usize,
    is_active: &impl Fn(RegistrationId) -> bool,
) -> Option<MatchId> {
    let source = &matches[source];
    if !source.status.is_decided() {
        return None;
    }
    let winner = source.winner?;
    let next_id = source.next_match?;
    let next = matches.iter_mut().find(|m| m.id == next_id)?;
    if next.contains(winner) || next.status.is_terminal() {
        return None;
    }
    let slot = next.first_open_slot()?;
    next.assign_slot(slot, winner, is_active);
    Some(next_id)
}

/// Settle every unstarted match that can no longer receive an opponent: a slot is
/// still empty and every feeder match is spent (round 1 has none). A sole active
/// entrant wins by walkover and advances; a match with no entrant, or only an
/// inactive one, is cancelled.
/// Repeats until nothing changes and returns the ids it settled.
pub fn resolve_byes(
    matches: &mut [TournamentMatch],
    registrations: &[Registration],
) -> Vec<MatchId> {
    let is_active = active_lookup(registrations);
    let mut settled = Vec::new();
    loop {
        let candidate = matches.iter().position(|m| {
            matches!(m.status, MatchStatus::Pending | MatchStatus::Ready)
                && (m.team_1.is_none() || m.team_2.is_none())
                && feeders_settled(matches, m)
        });
        let Some(idx) = candidate else {
            break;
        };
        match matches[idx].bye_winner().filter(|&id| is_active(id)) {
            Some(winner) => {
                if matches[idx].walkover(winner).is_err() {
                    break;
                }
                place_winner(matches, idx, &is_active);
            }
            None => {
                if matches[idx].cancel().is_err() {
                    break;
                }
            }
        }
        settled.push(matches[idx].id);
    }
    settled
}

/// A feeder is spent once it can send nobody else into `successor`: cancelled, or
/// decided with its winner already placed there. A decided feeder whose winner has
/// not been advanced yet (manual advancement) still owes the successor an entrant.
fn feeders_settled(matches: &[TournamentMatch], successor: &TournamentMatch) -> bool {
    matches
        .iter()
        .filter(|f| f.next_match == Some(successor.id))
        .all(|f| match f.status {
            MatchStatus::Cancelled => true,
            MatchStatus::Completed | MatchStatus::Walkover => {
                f.winner.map_or(true, |w| successor.contains(w))
            }
            _ => false,
        })
}

/// Complete once every match of the highest round is completed or walked over.
/// An empty match set is never complete.
pub fn is_complete(matches: &[TournamentMatch]) -> bool {
    let Some(max_round) = matches.iter().map(|m| m.round).max() else {
        return false;
    };
    matches
        .iter()
        .filter(|m| m.round == max_round)
        .all(|m| m.status.is_decided())
}

/// Lookup closure: is this registration present and active?
pub(crate) fn active_lookup(
    registrations: &[Registration],
) -> impl Fn(RegistrationId) -> bool + '_ {
    move |id| registrations.iter().any(|r| r.id == id && r.is_active())
}
