//! Unit and scenario tests for the pool engine.
//!
//! Each test drives the engine against an `InMemoryPool`, applying the
//! returned effects the way a real caller would.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use super::engine::*;
use super::memory::InMemoryPool;
use crate::effects::{AdminAction, Effect, EffectInterpreter};
use crate::state::PickValidationError;
use crate::test_utils::{TestTournament, entrant_id};
use crate::types::{
    Bracket, BracketId, EntrantId, MatchCoord, MatchId, Region, Round, RoundWindow, Settings,
    UserId,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn lock_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 19, 16, 0, 0).unwrap()
}

fn before_lock() -> DateTime<Utc> {
    lock_at() - Duration::hours(1)
}

fn after_lock() -> DateTime<Utc> {
    lock_at() + Duration::hours(1)
}

struct Harness {
    t: TestTournament,
    engine: PoolEngine,
    pool: InMemoryPool,
}

impl Harness {
    fn new() -> Self {
        let t = TestTournament::new();
        let settings = Settings::new().with_lock_at(lock_at());
        let mut pool = InMemoryPool::new(t.tournament.clone(), settings.clone());
        pool.add_bracket(Bracket::new("b1", "alice")).unwrap();
        pool.add_bracket(Bracket::new("b2", "bob")).unwrap();
        Harness {
            t,
            engine: PoolEngine::new(settings),
            pool,
        }
    }

    fn pick(
        &mut self,
        actor: &Actor,
        bracket: &str,
        coord: MatchCoord,
        entrant: EntrantId,
        now: DateTime<Utc>,
    ) -> Result<PickOutcome, PoolError> {
        let bracket_id = BracketId::new(bracket);
        let match_id = self.t.id_at(coord);
        let outcome = self.engine.place_pick(
            self.pool.tournament(),
            self.pool.bracket(&bracket_id).unwrap(),
            self.pool.picks(&bracket_id).unwrap(),
            actor,
            &match_id,
            &entrant,
            now,
        )?;
        self.pool.apply(&outcome.effects).unwrap();
        Ok(outcome)
    }

    fn fill_chalk(&mut self, bracket: &str, owner: &str) {
        let chalk = self.t.chalk_picks(bracket);
        let actor = Actor::participant(owner);
        for coord in crate::state::all_coords() {
            let entrant = chalk.entrant_for(&self.t.id_at(coord)).unwrap().clone();
            self.pick(&actor, bracket, coord, entrant, before_lock())
                .unwrap();
        }
    }

    fn result(&mut self, coord: MatchCoord, winner: EntrantId) -> ResultOutcome {
        let outcome = self
            .engine
            .record_result(
                self.pool.tournament(),
                &Actor::admin("admin"),
                &self.t.id_at(coord),
                &winner,
                after_lock(),
            )
            .unwrap();
        self.pool.apply(&outcome.effects).unwrap();
        outcome
    }

    fn pick_on(&self, bracket: &str, coord: MatchCoord) -> Option<EntrantId> {
        self.pool
            .picks(&BracketId::new(bracket))
            .unwrap()
            .entrant_for(&self.t.id_at(coord))
            .cloned()
    }
}

fn r64(region: Region, n: u8) -> MatchCoord {
    MatchCoord::regional(Round::R64, region, n)
}

// ─────────────────────────────────────────────────────────────────────────────
// place_pick
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn owner_places_first_round_pick() {
    let mut h = Harness::new();
    let outcome = h
        .pick(
            &Actor::participant("alice"),
            "b1",
            r64(Region::East, 1),
            entrant_id(Region::East, 16),
            before_lock(),
        )
        .unwrap();

    assert_eq!(outcome.replaced, None);
    assert!(outcome.invalidated.is_empty());
    assert_eq!(outcome.effects.len(), 1);
    assert_eq!(h.pick_on("b1", r64(Region::East, 1)), Some(entrant_id(Region::East, 16)));
}

#[test]
fn later_pick_must_be_projected() {
    let mut h = Harness::new();
    let r32 = MatchCoord::regional(Round::R32, Region::East, 1);
    let err = h
        .pick(
            &Actor::participant("alice"),
            "b1",
            r32,
            entrant_id(Region::East, 1),
            before_lock(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        PoolError::InvalidPick(PickValidationError::NotAVirtualEntrant { .. })
    ));
}

#[test]
fn participant_cannot_edit_someone_elses_bracket() {
    let mut h = Harness::new();
    let err = h
        .pick(
            &Actor::participant("bob"),
            "b1",
            r64(Region::East, 1),
            entrant_id(Region::East, 1),
            before_lock(),
        )
        .unwrap_err();
    assert!(matches!(err, PoolError::NotOwner { .. }));
}

#[test]
fn participant_cannot_pick_after_lock() {
    let mut h = Harness::new();
    let err = h
        .pick(
            &Actor::participant("alice"),
            "b1",
            r64(Region::East, 1),
            entrant_id(Region::East, 1),
            after_lock(),
        )
        .unwrap_err();
    assert!(matches!(err, PoolError::PoolLocked { lock_at: at } if at == lock_at()));
}

#[test]
fn lock_instant_itself_is_still_open() {
    let mut h = Harness::new();
    assert!(
        h.pick(
            &Actor::participant("alice"),
            "b1",
            r64(Region::East, 1),
            entrant_id(Region::East, 1),
            lock_at(),
        )
        .is_ok()
    );
}

#[test]
fn admin_override_is_flagged_and_audited() {
    let mut h = Harness::new();
    let outcome = h
        .pick(
            &Actor::admin("admin"),
            "b1",
            r64(Region::West, 2),
            entrant_id(Region::West, 9),
            after_lock(),
        )
        .unwrap();

    assert!(outcome.effects.iter().any(|e| matches!(e, Effect::MarkAdminOverride { .. })));
    let bracket = h.pool.bracket(&BracketId::new("b1")).unwrap();
    assert!(bracket.admin_override);
    let log = h.pool.audit_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].actor, UserId::new("admin"));
    assert!(matches!(log[0].action, AdminAction::OverridePick { .. }));
}

#[test]
fn admin_editing_own_open_bracket_is_not_an_override() {
    let mut h = Harness::new();
    h.pool.add_bracket(Bracket::new("b3", "admin")).unwrap();
    let outcome = h
        .pick(
            &Actor::admin("admin"),
            "b3",
            r64(Region::West, 2),
            entrant_id(Region::West, 9),
            before_lock(),
        )
        .unwrap();
    assert_eq!(outcome.effects.len(), 1);
    assert!(h.pool.audit_log().is_empty());
}

#[test]
fn re_picking_same_entrant_is_a_no_op() {
    let mut h = Harness::new();
    h.fill_chalk("b1", "alice");
    let outcome = h
        .pick(
            &Actor::participant("alice"),
            "b1",
            r64(Region::East, 1),
            entrant_id(Region::East, 1),
            before_lock(),
        )
        .unwrap();
    assert!(outcome.effects.is_empty());
    assert_eq!(h.pool.picks(&BracketId::new("b1")).unwrap().len(), 63);
}

#[test]
fn changing_a_pick_cascades_through_final_four_and_championship() {
    let mut h = Harness::new();
    h.fill_chalk("b1", "alice");

    let outcome = h
        .pick(
            &Actor::participant("alice"),
            "b1",
            r64(Region::East, 1),
            entrant_id(Region::East, 16),
            before_lock(),
        )
        .unwrap();

    assert_eq!(outcome.replaced, Some(entrant_id(Region::East, 1)));
    assert_eq!(outcome.invalidated.len(), 5);
    assert_eq!(h.pool.picks(&BracketId::new("b1")).unwrap().len(), 58);
    for coord in [
        MatchCoord::regional(Round::E8, Region::East, 1),
        MatchCoord::final_four(1),
        MatchCoord::championship(),
    ] {
        assert_eq!(h.pick_on("b1", coord), None);
    }
    // Other brackets are untouched.
    h.fill_chalk("b2", "bob");
    assert_eq!(h.pool.picks(&BracketId::new("b2")).unwrap().len(), 63);
}

#[test]
fn submitted_bracket_rejects_owner_edits() {
    let mut h = Harness::new();
    h.fill_chalk("b1", "alice");
    let effects = h
        .engine
        .submit_bracket(
            h.pool.tournament(),
            h.pool.bracket(&BracketId::new("b1")).unwrap(),
            h.pool.picks(&BracketId::new("b1")).unwrap(),
            &Actor::participant("alice"),
            before_lock(),
        )
        .unwrap();
    h.pool.apply(&effects).unwrap();

    let err = h
        .pick(
            &Actor::participant("alice"),
            "b1",
            r64(Region::East, 1),
            entrant_id(Region::East, 16),
            before_lock(),
        )
        .unwrap_err();
    assert!(matches!(err, PoolError::BracketSubmitted(_)));
}

#[test]
fn mismatched_pick_set_is_rejected() {
    let h = Harness::new();
    let err = h
        .engine
        .place_pick(
            h.pool.tournament(),
            h.pool.bracket(&BracketId::new("b1")).unwrap(),
            h.pool.picks(&BracketId::new("b2")).unwrap(),
            &Actor::participant("alice"),
            &h.t.id_at(r64(Region::East, 1)),
            &entrant_id(Region::East, 1),
            before_lock(),
        )
        .unwrap_err();
    assert!(matches!(err, PoolError::PickSetMismatch { .. }));
}

// ─────────────────────────────────────────────────────────────────────────────
// submit_bracket
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn incomplete_bracket_cannot_be_submitted() {
    let mut h = Harness::new();
    h.pick(
        &Actor::participant("alice"),
        "b1",
        r64(Region::East, 1),
        entrant_id(Region::East, 1),
        before_lock(),
    )
    .unwrap();

    let err = h
        .engine
        .submit_bracket(
            h.pool.tournament(),
            h.pool.bracket(&BracketId::new("b1")).unwrap(),
            h.pool.picks(&BracketId::new("b1")).unwrap(),
            &Actor::participant("alice"),
            before_lock(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        PoolError::IncompleteBracket {
            missing: 62,
            total: 63,
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "bracket b1 is incomplete: 62 of 63 matches unpicked"
    );
}

#[test]
fn only_owner_submits_and_only_once() {
    let mut h = Harness::new();
    h.fill_chalk("b1", "alice");
    let submit = |h: &Harness, actor: Actor| {
        h.engine.submit_bracket(
            h.pool.tournament(),
            h.pool.bracket(&BracketId::new("b1")).unwrap(),
            h.pool.picks(&BracketId::new("b1")).unwrap(),
            &actor,
            before_lock(),
        )
    };

    assert!(matches!(
        submit(&h, Actor::admin("admin")),
        Err(PoolError::NotOwner { .. })
    ));
    let effects = submit(&h, Actor::participant("alice")).unwrap();
    assert!(matches!(effects[..], [Effect::LockBracket { .. }]));
    h.pool.apply(&effects).unwrap();
    assert!(matches!(
        submit(&h, Actor::participant("alice")),
        Err(PoolError::BracketSubmitted(_))
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// record_result
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn admin_records_sixteen_seed_upset() {
    let mut h = Harness::new();
    h.result(r64(Region::East, 1), entrant_id(Region::East, 16));

    let r32 = h
        .pool
        .tournament()
        .at(MatchCoord::regional(Round::R32, Region::East, 1))
        .unwrap();
    assert_eq!(r32.left, Some(entrant_id(Region::East, 16)));
    assert_eq!(h.pool.audit_log().len(), 1);
}

#[test]
fn participants_cannot_record_results() {
    let h = Harness::new();
    let err = h
        .engine
        .record_result(
            h.pool.tournament(),
            &Actor::participant("alice"),
            &h.t.id_at(r64(Region::East, 1)),
            &entrant_id(Region::East, 1),
            after_lock(),
        )
        .unwrap_err();
    assert!(matches!(err, PoolError::AdminOnly(_)));
}

#[test]
fn invalid_winner_is_rejected() {
    let h = Harness::new();
    let err = h
        .engine
        .record_result(
            h.pool.tournament(),
            &Actor::admin("admin"),
            &h.t.id_at(r64(Region::East, 1)),
            &entrant_id(Region::East, 2),
            after_lock(),
        )
        .unwrap_err();
    assert!(matches!(err, PoolError::InvalidWinner(_)));
}

#[test]
fn correction_voids_dependent_results_but_keeps_picks() {
    let mut h = Harness::new();
    h.fill_chalk("b1", "alice");
    for coord in TestTournament::path_to(MatchCoord::regional(Round::R32, Region::East, 1)) {
        let favorite = TestTournament::favorite(h.pool.tournament(), coord);
        h.result(coord, favorite);
    }

    let outcome = h.result(r64(Region::East, 1), entrant_id(Region::East, 16));
    assert_eq!(outcome.previous_winner, Some(entrant_id(Region::East, 1)));
    assert_eq!(
        outcome.voided,
        vec![MatchId::new("r32-east-1")]
    );

    let r32 = h
        .pool
        .tournament()
        .at(MatchCoord::regional(Round::R32, Region::East, 1))
        .unwrap();
    assert_eq!(r32.left, Some(entrant_id(Region::East, 16)));
    assert_eq!(r32.winner, None);
    assert_eq!(h.pool.picks(&BracketId::new("b1")).unwrap().len(), 63);
}

#[test]
fn recording_same_result_twice_is_idempotent() {
    let mut h = Harness::new();
    h.result(r64(Region::South, 8), entrant_id(Region::South, 2));
    let before = h.pool.tournament().clone();
    let outcome = h.result(r64(Region::South, 8), entrant_id(Region::South, 2));
    assert!(outcome.voided.is_empty());
    assert_eq!(*h.pool.tournament(), before);
}

// ─────────────────────────────────────────────────────────────────────────────
// leaderboard
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn leaderboard_ranks_after_results() {
    let mut h = Harness::new();
    h.fill_chalk("b1", "alice");
    h.fill_chalk("b2", "bob");
    h.pick(
        &Actor::participant("bob"),
        "b2",
        r64(Region::Midwest, 8),
        entrant_id(Region::Midwest, 15),
        before_lock(),
    )
    .unwrap();

    h.result(r64(Region::Midwest, 8), entrant_id(Region::Midwest, 15));

    let today = after_lock().date_naive();
    let board = h
        .engine
        .leaderboard(h.pool.tournament(), h.pool.entries(), today)
        .leaderboard;
    assert_eq!(board.participants, 2);
    assert_eq!(board.perfect_brackets, 1);
    assert_eq!(board.standings[0].bracket_id, BracketId::new("b2"));
    assert_eq!(board.standings[0].total_points, 1);
    assert_eq!(board.standings[1].rank, 2);
}

#[test]
fn leaderboard_reports_scheduled_round() {
    let h = Harness::new();
    let day = |d| NaiveDate::from_ymd_opt(2026, 3, d).unwrap();
    let engine = PoolEngine::new(h.engine.settings.clone().with_schedule(vec![
        RoundWindow {
            round: Round::R64,
            start: day(19),
            end: day(20),
        },
        RoundWindow {
            round: Round::R32,
            start: day(21),
            end: day(22),
        },
    ]));

    let standings = engine.leaderboard(h.pool.tournament(), h.pool.entries(), day(22));
    assert_eq!(standings.current_round, Round::R32);
    assert_eq!(standings.leaderboard.participants, 2);

    let json = serde_json::to_value(&standings).unwrap();
    assert_eq!(json["current_round"], "R32");
    assert_eq!(json["participants"], 2);

    let before = engine.leaderboard(h.pool.tournament(), h.pool.entries(), day(1));
    assert_eq!(before.current_round, Round::R64);
}
