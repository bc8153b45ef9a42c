//! The game registry and arbiter.
//!
//! [`Arbiter`] owns every game, the escrow ledger and the event log. Each
//! operation takes the authenticated caller and the current time, validates
//! all of its preconditions, performs at most one fallible ledger step, and
//! only then writes the game and appends its events. A failed operation
//! therefore leaves games, escrow and log untouched.

mod config;
mod game;
mod settlement;

pub use config::{ArbiterConfig, DEFAULT_REVEAL_TIMEOUT_SECS};
pub use game::{BetAmounts, Game};

use crate::crypto::{Commitment, Salt};
use crate::error::ArbiterError;
use crate::games::{judge, Move, Outcome};
use crate::ledger::{AccountId, Ledger};
use crate::protocol::{ArbiterEvent, EventRecord, GameId, GameState, Resolution, Seat, Timestamp};
use settlement::SettlementPlan;
use tracing::info;

/// Result of a successful reveal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealStatus {
    /// The opponent has not revealed yet
    AwaitingOpponentReveal,
    /// This reveal completed the game and it was settled
    Settled(Outcome),
}

/// Registry of games plus the value they hold in escrow
#[derive(Debug)]
pub struct Arbiter<L> {
    config: ArbiterConfig,
    ledger: L,
    games: Vec<Game>,
    log: Vec<EventRecord>,
}

impl<L: Ledger> Arbiter<L> {
    pub fn new(ledger: L) -> Self {
        Self::with_config(ArbiterConfig::default(), ledger)
    }

    pub fn with_config(config: ArbiterConfig, ledger: L) -> Self {
        Self {
            config,
            ledger,
            games: Vec::new(),
            log: Vec::new(),
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Access to the ledger for account management outside any game
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    // Operations

    /// Open a game against `opponent` with the caller's commitment.
    pub fn start_game(
        &mut self,
        caller: &AccountId,
        opponent: &AccountId,
        commitment1: Commitment,
        now: Timestamp,
    ) -> Result<GameId, ArbiterError> {
        if opponent.is_null() {
            return Err(ArbiterError::NullOpponent);
        }
        if opponent == caller {
            return Err(ArbiterError::SelfPlay);
        }
        if commitment1.is_empty() {
            return Err(ArbiterError::EmptyCommitment);
        }

        let game_id = GameId::new(self.games.len() as u64);
        self.games
            .push(Game::new(game_id, *caller, *opponent, commitment1, now));

        info!(%game_id, player1 = %caller, player2 = %opponent, "game created");
        self.record(
            now,
            vec![
                ArbiterEvent::GameCreated {
                    game_id,
                    player1: *caller,
                    player2: *opponent,
                },
                ArbiterEvent::MoveCommitted {
                    game_id,
                    player: *caller,
                    commitment: commitment1,
                },
            ],
        );
        Ok(game_id)
    }

    /// The invited opponent commits and the reveal window opens.
    pub fn join_game(
        &mut self,
        caller: &AccountId,
        game_id: GameId,
        commitment2: Commitment,
        now: Timestamp,
    ) -> Result<(), ArbiterError> {
        let timeout = self.config.reveal_timeout_secs;
        let game = self.game_mut(game_id)?;
        expect_state(game, GameState::AwaitingOpponent)?;
        if *caller != game.player(Seat::Player2) {
            return Err(ArbiterError::NotParticipant {
                game_id,
                caller: *caller,
            });
        }
        if commitment2.is_empty() {
            return Err(ArbiterError::EmptyCommitment);
        }

        let deadline = now.saturating_add(timeout);
        game.accept_opponent(commitment2, deadline);

        info!(%game_id, player2 = %caller, reveal_deadline = deadline, "opponent joined");
        self.record(
            now,
            vec![ArbiterEvent::MoveCommitted {
                game_id,
                player: *caller,
                commitment: commitment2,
            }],
        );
        Ok(())
    }

    /// Escrow the caller's stake. Each player bets at most once.
    pub fn send_bet(
        &mut self,
        caller: &AccountId,
        game_id: GameId,
        amount: u64,
        now: Timestamp,
    ) -> Result<(), ArbiterError> {
        let game = self.game(game_id)?;
        expect_state(game, GameState::AwaitingReveal)?;
        let seat = game.seat_of(caller).ok_or(ArbiterError::NotParticipant {
            game_id,
            caller: *caller,
        })?;
        if amount == 0 {
            return Err(ArbiterError::ZeroBet);
        }
        if game.bet(seat) != 0 {
            return Err(ArbiterError::AlreadyBet(*caller));
        }
        game.bet(seat.opponent())
            .checked_add(amount)
            .ok_or(ArbiterError::PoolOverflow)?;

        self.ledger.deposit(caller, amount)?;
        self.game_mut(game_id)?.place_bet(seat, amount);

        info!(%game_id, player = %caller, amount, "bet received");
        self.record(
            now,
            vec![ArbiterEvent::BetReceived {
                game_id,
                player: *caller,
                amount,
            }],
        );
        Ok(())
    }

    /// Reveal the caller's committed move. The second reveal judges the
    /// game and settles it in the same operation.
    pub fn reveal_move(
        &mut self,
        caller: &AccountId,
        game_id: GameId,
        play: Move,
        salt: &Salt,
        now: Timestamp,
    ) -> Result<RevealStatus, ArbiterError> {
        let mut game = self.game(game_id)?.clone();
        expect_state(&game, GameState::AwaitingReveal)?;
        if !play.is_playable() {
            return Err(ArbiterError::InvalidMove);
        }
        let deadline = game.reveal_deadline().unwrap_or_default();
        if now > deadline {
            return Err(ArbiterError::StaleReveal { deadline, now });
        }
        let seat = game.seat_of(caller).ok_or(ArbiterError::NotParticipant {
            game_id,
            caller: *caller,
        })?;
        if game.has_revealed(seat) {
            return Err(ArbiterError::AlreadyRevealed(*caller));
        }
        let committed = game.commitment(seat).ok_or(ArbiterError::BadCommitment)?;
        if !committed.verify(play, salt) {
            return Err(ArbiterError::BadCommitment);
        }

        game.record_move(seat, play);
        info!(%game_id, player = %caller, %play, "move revealed");
        let mut events = vec![ArbiterEvent::MoveRevealed {
            game_id,
            player: *caller,
            play,
        }];

        let status = if game.both_revealed() {
            let outcome = self.determine_winner(&mut game, &mut events)?;
            RevealStatus::Settled(outcome)
        } else {
            RevealStatus::AwaitingOpponentReveal
        };

        self.commit_game(game, now, events);
        Ok(status)
    }

    /// Refund both bets once the reveal window has closed. Anyone may call
    /// this, so a game abandoned by one player cannot lock the other's stake.
    pub fn abort_game(
        &mut self,
        caller: &AccountId,
        game_id: GameId,
        now: Timestamp,
    ) -> Result<(), ArbiterError> {
        let mut game = self.game(game_id)?.clone();
        expect_state(&game, GameState::AwaitingReveal)?;
        let deadline = game.reveal_deadline().unwrap_or_default();
        if now <= deadline {
            return Err(ArbiterError::DeadlineNotReached { deadline, now });
        }

        let plan = SettlementPlan::refund_each(&game);
        debug_assert_eq!(plan.total(), game.pool());
        plan.execute(&mut self.ledger)?;
        game.settle(Resolution::Aborted);

        let mut events = vec![ArbiterEvent::GameAborted {
            game_id,
            aborted_by: *caller,
        }];
        events.extend(plan.events());

        info!(%game_id, aborted_by = %caller, refunded = game.pool(), "game aborted");
        self.commit_game(game, now, events);
        Ok(())
    }

    /// Judge a fully revealed game and pay out. Runs only from the second
    /// reveal, on a working copy of the game.
    fn determine_winner(
        &mut self,
        game: &mut Game,
        events: &mut Vec<ArbiterEvent>,
    ) -> Result<Outcome, ArbiterError> {
        let outcome = judge(
            game.revealed_move(Seat::Player1),
            game.revealed_move(Seat::Player2),
        );
        let plan = SettlementPlan::for_outcome(game, outcome);
        debug_assert_eq!(plan.total(), game.pool());
        plan.execute(&mut self.ledger)?;
        game.settle(Resolution::Decided(outcome));

        events.push(ArbiterEvent::WinnerDetermined {
            game_id: game.id(),
            outcome,
            winner: outcome.winner().map(|seat| game.player(seat)),
        });
        events.extend(plan.events());

        info!(game_id = %game.id(), %outcome, pool = game.pool(), "game settled");
        Ok(outcome)
    }

    // Queries

    pub fn game(&self, game_id: GameId) -> Result<&Game, ArbiterError> {
        usize::try_from(game_id.as_u64())
            .ok()
            .and_then(|index| self.games.get(index))
            .ok_or(ArbiterError::GameNotFound(game_id))
    }

    pub fn game_state(&self, game_id: GameId) -> Result<GameState, ArbiterError> {
        Ok(self.game(game_id)?.state())
    }

    pub fn bet_amounts(&self, game_id: GameId) -> Result<BetAmounts, ArbiterError> {
        Ok(self.game(game_id)?.bet_amounts())
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// The full ordered event log
    pub fn events(&self) -> &[EventRecord] {
        &self.log
    }

    pub fn events_for(&self, game_id: GameId) -> impl DoubleEndedIterator<Item = &EventRecord> {
        self.log
            .iter()
            .filter(move |record| record.event.game_id() == game_id)
    }

    // Internals

    fn game_mut(&mut self, game_id: GameId) -> Result<&mut Game, ArbiterError> {
        usize::try_from(game_id.as_u64())
            .ok()
            .and_then(|index| self.games.get_mut(index))
            .ok_or(ArbiterError::GameNotFound(game_id))
    }

    fn commit_game(&mut self, game: Game, now: Timestamp, events: Vec<ArbiterEvent>) {
        let index = game.id().as_u64() as usize;
        self.games[index] = game;
        self.record(now, events);
    }

    fn record(&mut self, now: Timestamp, events: Vec<ArbiterEvent>) {
        for event in events {
            let seq = self.log.len() as u64;
            self.log.push(EventRecord {
                seq,
                recorded_at: now,
                event,
            });
        }
    }
}

fn expect_state(game: &Game, expected: GameState) -> Result<(), ArbiterError> {
    if game.state() != expected {
        return Err(ArbiterError::StateMismatch {
            game_id: game.id(),
            expected,
            actual: game.state(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;

    const T0: Timestamp = 1_700_000_000;
    const TIMEOUT: u64 = 3600;

    struct Table {
        arbiter: Arbiter<InMemoryLedger>,
        alice: AccountId,
        bob: AccountId,
        salt_a: Salt,
        salt_b: Salt,
    }

    impl Table {
        fn new() -> Self {
            let mut ledger = InMemoryLedger::new();
            let alice = ledger.open_account(1000);
            let bob = ledger.open_account(1000);
            Self {
                arbiter: Arbiter::with_config(ArbiterConfig::with_reveal_timeout(TIMEOUT), ledger),
                alice,
                bob,
                salt_a: Salt::random(),
                salt_b: Salt::random(),
            }
        }

        /// Alice plays `a` against Bob's `b`; both joined at T0
        fn joined(&mut self, a: Move, b: Move) -> GameId {
            let id = self
                .arbiter
                .start_game(&self.alice, &self.bob, Commitment::for_move(a, &self.salt_a), T0)
                .unwrap();
            self.arbiter
                .join_game(&self.bob, id, Commitment::for_move(b, &self.salt_b), T0)
                .unwrap();
            id
        }
    }

    #[test]
    fn test_start_game_validation() {
        let mut t = Table::new();
        let commitment = Commitment::for_move(Move::Rock, &t.salt_a);

        assert_eq!(
            t.arbiter
                .start_game(&t.alice, &AccountId::null(), commitment, T0),
            Err(ArbiterError::NullOpponent)
        );
        assert_eq!(
            t.arbiter.start_game(&t.alice, &t.alice, commitment, T0),
            Err(ArbiterError::SelfPlay)
        );
        assert_eq!(
            t.arbiter
                .start_game(&t.alice, &t.bob, Commitment::empty(), T0),
            Err(ArbiterError::EmptyCommitment)
        );
        assert_eq!(t.arbiter.game_count(), 0);
        assert!(t.arbiter.events().is_empty());
    }

    #[test]
    fn test_sequential_ids_and_creation_records() {
        let mut t = Table::new();
        let commitment = Commitment::for_move(Move::Rock, &t.salt_a);

        let first = t.arbiter.start_game(&t.alice, &t.bob, commitment, T0).unwrap();
        let second = t.arbiter.start_game(&t.bob, &t.alice, commitment, T0).unwrap();

        assert_eq!(first, GameId::new(0));
        assert_eq!(second, GameId::new(1));
        assert_eq!(
            t.arbiter.game_state(first).unwrap(),
            GameState::AwaitingOpponent
        );
        let kinds: Vec<_> = t.arbiter.events_for(first).map(|r| &r.event).collect();
        assert!(matches!(kinds[0], ArbiterEvent::GameCreated { .. }));
        assert!(matches!(kinds[1], ArbiterEvent::MoveCommitted { player, .. } if *player == t.alice));
        assert_eq!(kinds.len(), 2);
    }

    #[test]
    fn test_join_sets_deadline_and_commits_once() {
        let mut t = Table::new();
        let id = t.joined(Move::Rock, Move::Paper);

        let game = t.arbiter.game(id).unwrap();
        assert_eq!(game.state(), GameState::AwaitingReveal);
        assert_eq!(game.reveal_deadline(), Some(T0 + TIMEOUT));
        assert_eq!(game.created_at(), T0);

        let commits = t
            .arbiter
            .events_for(id)
            .filter(|r| matches!(r.event, ArbiterEvent::MoveCommitted { player, .. } if player == t.bob))
            .count();
        assert_eq!(commits, 1);
    }

    #[test]
    fn test_join_requires_invited_player_and_right_state() {
        let mut t = Table::new();
        let id = t
            .arbiter
            .start_game(&t.alice, &t.bob, Commitment::for_move(Move::Rock, &t.salt_a), T0)
            .unwrap();
        let mallory = AccountId::new();
        let commitment = Commitment::for_move(Move::Paper, &t.salt_b);

        assert!(matches!(
            t.arbiter.join_game(&mallory, id, commitment, T0),
            Err(ArbiterError::NotParticipant { .. })
        ));
        assert!(matches!(
            t.arbiter.join_game(&t.alice, id, commitment, T0),
            Err(ArbiterError::NotParticipant { .. })
        ));
        assert_eq!(
            t.arbiter.join_game(&t.bob, id, Commitment::empty(), T0),
            Err(ArbiterError::EmptyCommitment)
        );

        t.arbiter.join_game(&t.bob, id, commitment, T0).unwrap();
        assert!(matches!(
            t.arbiter.join_game(&t.bob, id, commitment, T0),
            Err(ArbiterError::StateMismatch {
                expected: GameState::AwaitingOpponent,
                actual: GameState::AwaitingReveal,
                ..
            })
        ));
        assert_eq!(
            t.arbiter.join_game(&t.bob, GameId::new(99), commitment, T0),
            Err(ArbiterError::GameNotFound(GameId::new(99)))
        );
    }

    #[test]
    fn test_bet_before_join_is_rejected() {
        let mut t = Table::new();
        let id = t
            .arbiter
            .start_game(&t.alice, &t.bob, Commitment::for_move(Move::Rock, &t.salt_a), T0)
            .unwrap();

        assert!(matches!(
            t.arbiter.send_bet(&t.alice, id, 10, T0),
            Err(ArbiterError::StateMismatch { .. })
        ));
        assert_eq!(t.arbiter.ledger().balance(&t.alice), 1000);
    }

    #[test]
    fn test_second_bet_fails_without_side_effects() {
        let mut t = Table::new();
        let id = t.joined(Move::Rock, Move::Paper);

        t.arbiter.send_bet(&t.alice, id, 10, T0).unwrap();
        let log_len = t.arbiter.events().len();

        assert_eq!(
            t.arbiter.send_bet(&t.alice, id, 20, T0),
            Err(ArbiterError::AlreadyBet(t.alice))
        );
        assert_eq!(t.arbiter.bet_amounts(id).unwrap(), BetAmounts { bet1: 10, bet2: 0 });
        assert_eq!(t.arbiter.ledger().balance(&t.alice), 990);
        assert_eq!(t.arbiter.events().len(), log_len);
    }

    #[test]
    fn test_bet_validation() {
        let mut t = Table::new();
        let id = t.joined(Move::Rock, Move::Paper);

        assert!(matches!(
            t.arbiter.send_bet(&AccountId::new(), id, 10, T0),
            Err(ArbiterError::NotParticipant { .. })
        ));
        assert_eq!(t.arbiter.send_bet(&t.bob, id, 0, T0), Err(ArbiterError::ZeroBet));
        assert!(matches!(
            t.arbiter.send_bet(&t.bob, id, 5000, T0),
            Err(ArbiterError::Transfer(_))
        ));
        assert_eq!(t.arbiter.bet_amounts(id).unwrap(), BetAmounts::default());
        assert_eq!(t.arbiter.ledger().escrow_balance(), 0);
    }

    #[test]
    fn test_bet_overflowing_pool_is_rejected() {
        let mut t = Table::new();
        let id = t.joined(Move::Rock, Move::Paper);
        t.arbiter.send_bet(&t.alice, id, 10, T0).unwrap();
        let before = t.arbiter.game(id).unwrap().clone();
        let log_len = t.arbiter.events().len();

        assert_eq!(
            t.arbiter.send_bet(&t.bob, id, u64::MAX, T0),
            Err(ArbiterError::PoolOverflow)
        );
        assert_eq!(t.arbiter.game(id).unwrap(), &before);
        assert_eq!(t.arbiter.ledger().escrow_balance(), 10);
        assert_eq!(t.arbiter.ledger().balance(&t.bob), 1000);
        assert_eq!(t.arbiter.events().len(), log_len);
    }

    #[test]
    fn test_reveal_validation() {
        let mut t = Table::new();
        let id = t.joined(Move::Rock, Move::Paper);
        let salt_a = t.salt_a.clone();

        assert_eq!(
            t.arbiter.reveal_move(&t.alice, id, Move::None, &salt_a, T0),
            Err(ArbiterError::InvalidMove)
        );
        assert_eq!(
            t.arbiter.reveal_move(&t.alice, id, Move::Paper, &salt_a, T0),
            Err(ArbiterError::BadCommitment)
        );
        assert_eq!(
            t.arbiter.reveal_move(&t.alice, id, Move::Rock, &Salt::random(), T0),
            Err(ArbiterError::BadCommitment)
        );
        assert!(matches!(
            t.arbiter
                .reveal_move(&AccountId::new(), id, Move::Rock, &salt_a, T0),
            Err(ArbiterError::NotParticipant { .. })
        ));

        assert_eq!(
            t.arbiter.reveal_move(&t.alice, id, Move::Rock, &salt_a, T0),
            Ok(RevealStatus::AwaitingOpponentReveal)
        );
        assert_eq!(
            t.arbiter.reveal_move(&t.alice, id, Move::Rock, &salt_a, T0),
            Err(ArbiterError::AlreadyRevealed(t.alice))
        );
        assert_eq!(
            t.arbiter.game(id).unwrap().revealed_move(Seat::Player1),
            Move::Rock
        );
    }

    #[test]
    fn test_reveal_deadline_boundary() {
        let mut t = Table::new();
        let id = t.joined(Move::Rock, Move::Paper);
        let deadline = T0 + TIMEOUT;
        let (salt_a, salt_b) = (t.salt_a.clone(), t.salt_b.clone());

        assert_eq!(
            t.arbiter
                .reveal_move(&t.alice, id, Move::Rock, &salt_a, deadline),
            Ok(RevealStatus::AwaitingOpponentReveal)
        );
        assert_eq!(
            t.arbiter
                .reveal_move(&t.bob, id, Move::Paper, &salt_b, deadline + 1),
            Err(ArbiterError::StaleReveal {
                deadline,
                now: deadline + 1
            })
        );
    }

    #[test]
    fn test_abort_deadline_boundary() {
        let mut t = Table::new();
        let id = t.joined(Move::Rock, Move::Paper);
        let deadline = T0 + TIMEOUT;
        let stranger = AccountId::new();

        assert_eq!(
            t.arbiter.abort_game(&stranger, id, deadline),
            Err(ArbiterError::DeadlineNotReached {
                deadline,
                now: deadline
            })
        );
        t.arbiter.abort_game(&stranger, id, deadline + 1).unwrap();
        assert_eq!(t.arbiter.game_state(id).unwrap(), GameState::Settled);
        assert_eq!(
            t.arbiter.game(id).unwrap().resolution(),
            Some(Resolution::Aborted)
        );
    }

    #[test]
    fn test_abort_before_join_is_state_mismatch() {
        let mut t = Table::new();
        let id = t
            .arbiter
            .start_game(&t.alice, &t.bob, Commitment::for_move(Move::Rock, &t.salt_a), T0)
            .unwrap();

        assert!(matches!(
            t.arbiter.abort_game(&t.alice, id, u64::MAX),
            Err(ArbiterError::StateMismatch { .. })
        ));
    }

    #[test]
    fn test_settled_game_rejects_everything() {
        let mut t = Table::new();
        let id = t.joined(Move::Rock, Move::Rock);
        let (salt_a, salt_b) = (t.salt_a.clone(), t.salt_b.clone());
        t.arbiter
            .reveal_move(&t.alice, id, Move::Rock, &salt_a, T0)
            .unwrap();
        assert_eq!(
            t.arbiter.reveal_move(&t.bob, id, Move::Rock, &salt_b, T0),
            Ok(RevealStatus::Settled(Outcome::Tie))
        );

        let settled = |r: Result<_, ArbiterError>| {
            matches!(
                r,
                Err(ArbiterError::StateMismatch {
                    actual: GameState::Settled,
                    ..
                })
            )
        };
        assert!(settled(t.arbiter.send_bet(&t.alice, id, 1, T0).map(|_| ())));
        assert!(settled(
            t.arbiter
                .reveal_move(&t.bob, id, Move::Rock, &salt_b, T0)
                .map(|_| ())
        ));
        assert!(settled(t.arbiter.abort_game(&t.bob, id, u64::MAX)));
    }
}
