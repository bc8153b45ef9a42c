//! Payout planning and two-phase execution against the ledger.

use super::game::Game;
use crate::games::Outcome;
use crate::ledger::{AccountId, Ledger, LedgerError, PayoutHold};
use crate::protocol::{ArbiterEvent, GameId, Seat};
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PayoutKind {
    /// Winner takes the pool
    Distributed,
    /// A player's own bet comes back
    Returned,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Payout {
    to: AccountId,
    amount: u64,
    kind: PayoutKind,
}

/// Every transfer a settlement makes. The amounts always sum to the pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SettlementPlan {
    game_id: GameId,
    payouts: Vec<Payout>,
}

impl SettlementPlan {
    /// Payouts for a judged game: the whole pool to the winner, or each bet
    /// back to its owner on a tie.
    pub(crate) fn for_outcome(game: &Game, outcome: Outcome) -> Self {
        match outcome.winner() {
            Some(seat) => Self {
                game_id: game.id(),
                payouts: vec![Payout {
                    to: game.player(seat),
                    amount: game.pool(),
                    kind: PayoutKind::Distributed,
                }],
            },
            None => Self::refund_each(game),
        }
    }

    /// Each player's own bet back, not pooled
    pub(crate) fn refund_each(game: &Game) -> Self {
        let payouts = [Seat::Player1, Seat::Player2]
            .into_iter()
            .map(|seat| Payout {
                to: game.player(seat),
                amount: game.bet(seat),
                kind: PayoutKind::Returned,
            })
            .collect();
        Self {
            game_id: game.id(),
            payouts,
        }
    }

    pub(crate) fn total(&self) -> u64 {
        self.payouts.iter().map(|p| p.amount).sum()
    }

    /// Fund records this plan produces once executed
    pub(crate) fn events(&self) -> Vec<ArbiterEvent> {
        self.payouts
            .iter()
            .map(|p| match p.kind {
                PayoutKind::Distributed => ArbiterEvent::FundsDistributed {
                    game_id: self.game_id,
                    to: p.to,
                    amount: p.amount,
                },
                PayoutKind::Returned => ArbiterEvent::FundsReturned {
                    game_id: self.game_id,
                    to: p.to,
                    amount: p.amount,
                },
            })
            .collect()
    }

    /// Hold every nonzero payout, then release them all.
    ///
    /// If any hold fails the holds already taken are cancelled in reverse
    /// order and the ledger ends exactly where it started.
    pub(crate) fn execute<L: Ledger>(&self, ledger: &mut L) -> Result<(), LedgerError> {
        let mut holds: Vec<PayoutHold> = Vec::with_capacity(self.payouts.len());

        for payout in self.payouts.iter().filter(|p| p.amount > 0) {
            match ledger.hold_payout(&payout.to, payout.amount) {
                Ok(hold) => holds.push(hold),
                Err(e) => {
                    warn!(
                        game_id = %self.game_id,
                        to = %payout.to,
                        amount = payout.amount,
                        error = %e,
                        "payout refused, rolling back settlement"
                    );
                    for hold in holds.into_iter().rev() {
                        ledger.cancel_payout(hold);
                    }
                    return Err(e);
                }
            }
        }

        for hold in holds {
            ledger.release_payout(hold);
        }
        Ok(())
    }
}
