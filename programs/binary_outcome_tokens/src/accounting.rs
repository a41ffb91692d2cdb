// Collateral bookkeeping: each movement computes the next ledger as a pure
// function, and `commit` keeps it only if the backing still holds exactly.

use anchor_lang::prelude::*;

use crate::constants::TICKET_REDEMPTION_AFTER_RESOLUTION;
use crate::error::ConditionError;
use crate::state::{Condition, WinningOutcome};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct LedgerState {
    pub collateral_locked: u64,
    pub ticket_supply: u64,
    pub outcome_supply: [u64; 2],
}

/// A token movement requested by one instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movement {
    MintTickets(u64),
    RedeemTickets(u64),
    Split(u64),
    Merge(u64),
    Payout { outcome: WinningOutcome, amount: u64 },
}

/// Result of settling a [`Movement`] against a condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub next: LedgerState,
    // collateral entering (mint) or leaving (redeem, payout) the vault
    pub collateral: u64,
}

pub fn collateral_for(tickets: u64, conversion_rate: u64) -> Result<u64> {
    tickets
        .checked_mul(conversion_rate)
        .ok_or_else(|| error!(ConditionError::Overflow))
}

pub fn require_balance(balance: u64, needed: u64, shortfall: ConditionError) -> Result<()> {
    if balance < needed {
        return Err(shortfall.into());
    }
    Ok(())
}

impl LedgerState {
    /// Collateral the outstanding tickets and redeemable outcome tokens are entitled to.
    pub fn required_backing(&self, condition: &Condition) -> Result<u64> {
        let redeemable_outcomes = match condition.winning_outcome {
            Some(winner) => self.outcome_supply[winner.index()],
            None => self.outcome_supply[0],
        };
        let claims = self
            .ticket_supply
            .checked_add(redeemable_outcomes)
            .ok_or(ConditionError::Overflow)?;
        collateral_for(claims, condition.conversion_rate)
    }

    pub fn check_backing(&self, condition: &Condition) -> Result<()> {
        if !condition.resolved {
            require!(
                self.outcome_supply[0] == self.outcome_supply[1],
                ConditionError::SupplyMismatch
            );
        }
        require!(
            self.collateral_locked == self.required_backing(condition)?,
            ConditionError::BackingInvariantViolated
        );
        Ok(())
    }

    /// The vault may hold more than the ledger accounts for (direct transfers into it),
    /// never less.
    pub fn require_vault_covers(&self, vault_amount: u64) -> Result<()> {
        require!(
            vault_amount >= self.collateral_locked,
            ConditionError::BackingInvariantViolated
        );
        Ok(())
    }

    /// Holders can burn their own tokens outside this program, so a live supply may
    /// fall below the tracked one but must never exceed it.
    pub fn require_ticket_supply_within(&self, live_supply: u64) -> Result<()> {
        require!(
            live_supply <= self.ticket_supply,
            ConditionError::SupplyMismatch
        );
        Ok(())
    }

    pub fn require_outcome_supply_within(
        &self,
        outcome: WinningOutcome,
        live_supply: u64,
    ) -> Result<()> {
        require!(
            live_supply <= self.outcome_supply[outcome.index()],
            ConditionError::SupplyMismatch
        );
        Ok(())
    }
}

impl Condition {
    /// Computes the ledger after `movement` without touching `self`.
    pub fn settle(&self, movement: Movement) -> Result<Settlement> {
        let mut next = self.ledger;

        let collateral = match movement {
            Movement::MintTickets(amount) => {
                require!(amount > 0, ConditionError::InvalidAmount);
                let cost = collateral_for(amount, self.conversion_rate)?;
                next.collateral_locked = next
                    .collateral_locked
                    .checked_add(cost)
                    .ok_or(ConditionError::Overflow)?;
                next.ticket_supply = next
                    .ticket_supply
                    .checked_add(amount)
                    .ok_or(ConditionError::Overflow)?;
                cost
            }
            Movement::RedeemTickets(amount) => {
                require!(
                    !self.resolved || TICKET_REDEMPTION_AFTER_RESOLUTION,
                    ConditionError::AlreadyResolved
                );
                require!(amount > 0, ConditionError::InvalidAmount);
                next.ticket_supply = next
                    .ticket_supply
                    .checked_sub(amount)
                    .ok_or(ConditionError::InsufficientTicketBalance)?;
                let refund = collateral_for(amount, self.conversion_rate)?;
                next.collateral_locked = next
                    .collateral_locked
                    .checked_sub(refund)
                    .ok_or(ConditionError::BackingInvariantViolated)?;
                refund
            }
            Movement::Split(amount) => {
                require!(!self.resolved, ConditionError::AlreadyResolved);
                require!(amount > 0, ConditionError::InvalidAmount);
                next.ticket_supply = next
                    .ticket_supply
                    .checked_sub(amount)
                    .ok_or(ConditionError::InsufficientTicketBalance)?;
                for supply in next.outcome_supply.iter_mut() {
                    *supply = supply.checked_add(amount).ok_or(ConditionError::Overflow)?;
                }
                0
            }
            Movement::Merge(amount) => {
                require!(!self.resolved, ConditionError::AlreadyResolved);
                require!(amount > 0, ConditionError::InvalidAmount);
                for supply in next.outcome_supply.iter_mut() {
                    *supply = supply
                        .checked_sub(amount)
                        .ok_or(ConditionError::InsufficientOutcomeBalance)?;
                }
                next.ticket_supply = next
                    .ticket_supply
                    .checked_add(amount)
                    .ok_or(ConditionError::Overflow)?;
                0
            }
            Movement::Payout { outcome, amount } => {
                let winner = match (self.resolved, self.winning_outcome) {
                    (true, Some(winner)) => winner,
                    _ => return err!(ConditionError::ConditionNotResolved),
                };
                // checked before the amount: the losing token never pays, whatever the amount
                require!(outcome == winner, ConditionError::WrongOutcomeToken);
                require!(amount > 0, ConditionError::InvalidAmount);

                let supply = &mut next.outcome_supply[winner.index()];
                *supply = supply
                    .checked_sub(amount)
                    .ok_or(ConditionError::InsufficientOutcomeBalance)?;
                let payout = collateral_for(amount, self.conversion_rate)?;
                next.collateral_locked = next
                    .collateral_locked
                    .checked_sub(payout)
                    .ok_or(ConditionError::BackingInvariantViolated)?;
                payout
            }
        };

        Ok(Settlement { next, collateral })
    }

    /// Verifies the conservation invariant on the settled ledger and stores it.
    pub fn commit(&mut self, settlement: &Settlement) -> Result<()> {
        settlement.next.check_backing(self)?;
        self.ledger = settlement.next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ConditionParams;

    fn condition(conversion_rate: u64) -> Condition {
        Condition::new(ConditionParams {
            title: "BTC above 100k on Jan 1".to_string(),
            description: String::new(),
            outcome_labels: ["YES".to_string(), "NO".to_string()],
            conversion_rate,
            ticket_mint: Pubkey::new_unique(),
            outcome_mints: [Pubkey::new_unique(), Pubkey::new_unique()],
            collateral_mint: Pubkey::new_unique(),
            collateral_vault: Pubkey::new_unique(),
            resolver: Pubkey::new_unique(),
            authority_bump: 255,
        })
        .unwrap()
    }

    fn apply(condition: &mut Condition, movement: Movement) -> Result<u64> {
        let settlement = condition.settle(movement)?;
        condition.commit(&settlement)?;
        Ok(settlement.collateral)
    }

    fn assert_code(result: Result<impl std::fmt::Debug>, expected: ConditionError) {
        match result {
            Err(Error::AnchorError(e)) => assert_eq!(e.error_code_number, u32::from(expected)),
            other => panic!("expected {:?}, got {:?}", expected, other),
        }
    }

    #[test]
    fn collateral_for_multiplies_or_overflows() {
        assert_eq!(collateral_for(5, 100).unwrap(), 500);
        assert_eq!(collateral_for(0, 100).unwrap(), 0);
        assert_code(collateral_for(u64::MAX / 2 + 1, 2), ConditionError::Overflow);
    }

    #[test]
    fn require_balance_reports_given_shortfall() {
        assert!(require_balance(10, 10, ConditionError::InsufficientCollateral).is_ok());
        assert_code(
            require_balance(9, 10, ConditionError::InsufficientOutcomeBalance),
            ConditionError::InsufficientOutcomeBalance,
        );
    }

    #[test]
    fn walkthrough_with_rate_100() {
        let mut c = condition(100);

        assert_eq!(apply(&mut c, Movement::MintTickets(5)).unwrap(), 500);
        assert_eq!(c.ledger.collateral_locked, 500);
        assert_eq!(c.ledger.ticket_supply, 5);

        assert_eq!(apply(&mut c, Movement::Split(5)).unwrap(), 0);
        assert_eq!(c.ledger.ticket_supply, 0);
        assert_eq!(c.ledger.outcome_supply, [5, 5]);

        apply(&mut c, Movement::Merge(2)).unwrap();
        assert_eq!(c.ledger.outcome_supply, [3, 3]);
        assert_eq!(c.ledger.ticket_supply, 2);

        assert_eq!(apply(&mut c, Movement::RedeemTickets(2)).unwrap(), 200);
        assert_eq!(c.ledger.ticket_supply, 0);
        assert_eq!(c.ledger.collateral_locked, 300);

        c.resolve(WinningOutcome::from_index(0).unwrap(), 1).unwrap();
        c.ledger.check_backing(&c).unwrap();

        let payout = Movement::Payout {
            outcome: WinningOutcome::Outcome1,
            amount: 3,
        };
        assert_eq!(apply(&mut c, payout).unwrap(), 300);
        assert_eq!(c.ledger.outcome_supply, [0, 3]);
        assert_eq!(c.ledger.collateral_locked, 0);
        c.ledger.check_backing(&c).unwrap();
    }

    #[test]
    fn zero_amounts_are_rejected() {
        let mut c = condition(10);
        apply(&mut c, Movement::MintTickets(4)).unwrap();
        apply(&mut c, Movement::Split(2)).unwrap();
        let before = c.ledger;

        for movement in [
            Movement::MintTickets(0),
            Movement::RedeemTickets(0),
            Movement::Split(0),
            Movement::Merge(0),
        ] {
            assert_code(c.settle(movement), ConditionError::InvalidAmount);
        }

        c.resolve(WinningOutcome::Outcome2, 7).unwrap();
        assert_code(
            c.settle(Movement::Payout {
                outcome: WinningOutcome::Outcome2,
                amount: 0,
            }),
            ConditionError::InvalidAmount,
        );
        assert_eq!(c.ledger, before);
    }

    #[test]
    fn mint_overflow_leaves_ledger_untouched() {
        let mut c = condition(1_000);
        apply(&mut c, Movement::MintTickets(1)).unwrap();
        let before = c.ledger;

        assert_code(
            c.settle(Movement::MintTickets(u64::MAX / 1_000 + 1)),
            ConditionError::Overflow,
        );
        assert_eq!(c.ledger, before);
    }

    #[test]
    fn split_then_merge_restores_supplies() {
        let mut c = condition(3);
        apply(&mut c, Movement::MintTickets(10)).unwrap();
        apply(&mut c, Movement::Split(4)).unwrap();
        let before = c.ledger;

        for amount in [1, 3, 6] {
            apply(&mut c, Movement::Split(amount)).unwrap();
            apply(&mut c, Movement::Merge(amount)).unwrap();
            assert_eq!(c.ledger, before);
        }
    }

    #[test]
    fn split_and_merge_cannot_exceed_supply() {
        let mut c = condition(3);
        apply(&mut c, Movement::MintTickets(2)).unwrap();
        assert_code(c.settle(Movement::Split(3)), ConditionError::InsufficientTicketBalance);

        apply(&mut c, Movement::Split(2)).unwrap();
        assert_code(c.settle(Movement::Merge(3)), ConditionError::InsufficientOutcomeBalance);
        assert_code(
            c.settle(Movement::RedeemTickets(1)),
            ConditionError::InsufficientTicketBalance,
        );
    }

    #[test]
    fn split_and_merge_close_after_resolution() {
        let mut c = condition(3);
        apply(&mut c, Movement::MintTickets(4)).unwrap();
        apply(&mut c, Movement::Split(2)).unwrap();
        c.resolve(WinningOutcome::Outcome1, 9).unwrap();

        assert_code(c.settle(Movement::Split(1)), ConditionError::AlreadyResolved);
        assert_code(c.settle(Movement::Merge(1)), ConditionError::AlreadyResolved);
    }

    #[test]
    fn tickets_stay_mintable_and_redeemable_after_resolution() {
        let mut c = condition(25);
        apply(&mut c, Movement::MintTickets(4)).unwrap();
        apply(&mut c, Movement::Split(1)).unwrap();
        c.resolve(WinningOutcome::Outcome2, 9).unwrap();

        assert_eq!(apply(&mut c, Movement::MintTickets(2)).unwrap(), 50);
        assert_eq!(apply(&mut c, Movement::RedeemTickets(5)).unwrap(), 125);
        assert_eq!(c.ledger.ticket_supply, 0);
        assert_eq!(c.ledger.collateral_locked, 25);
    }

    #[test]
    fn payout_requires_resolution_and_the_winning_outcome() {
        let mut c = condition(7);
        apply(&mut c, Movement::MintTickets(3)).unwrap();
        apply(&mut c, Movement::Split(3)).unwrap();

        let winning = Movement::Payout {
            outcome: WinningOutcome::Outcome1,
            amount: 1,
        };
        assert_code(c.settle(winning), ConditionError::ConditionNotResolved);

        c.resolve(WinningOutcome::Outcome1, 2).unwrap();
        for amount in [0, 1, 3, u64::MAX] {
            assert_code(
                c.settle(Movement::Payout {
                    outcome: WinningOutcome::Outcome2,
                    amount,
                }),
                ConditionError::WrongOutcomeToken,
            );
        }
        assert_code(
            c.settle(Movement::Payout {
                outcome: WinningOutcome::Outcome1,
                amount: 4,
            }),
            ConditionError::InsufficientOutcomeBalance,
        );
        assert_eq!(apply(&mut c, winning).unwrap(), 7);
    }

    #[test]
    fn full_payout_leaves_only_ticket_backing() {
        let mut c = condition(11);
        apply(&mut c, Movement::MintTickets(9)).unwrap();
        apply(&mut c, Movement::Split(6)).unwrap();
        c.resolve(WinningOutcome::Outcome2, 5).unwrap();

        apply(
            &mut c,
            Movement::Payout {
                outcome: WinningOutcome::Outcome2,
                amount: 6,
            },
        )
        .unwrap();

        assert_eq!(c.ledger.collateral_locked, 11 * c.ledger.ticket_supply);
        assert_eq!(c.ledger.outcome_supply[WinningOutcome::Outcome1.index()], 6);
    }

    #[test]
    fn commit_refuses_unbacked_ledger() {
        let mut c = condition(5);
        apply(&mut c, Movement::MintTickets(2)).unwrap();

        let mut forged = c.settle(Movement::MintTickets(1)).unwrap();
        forged.next.collateral_locked -= 1;
        assert_code(c.commit(&forged), ConditionError::BackingInvariantViolated);

        let mut lopsided = c.settle(Movement::Split(1)).unwrap();
        lopsided.next.outcome_supply[1] += 1;
        assert_code(c.commit(&lopsided), ConditionError::SupplyMismatch);

        assert_eq!(c.ledger.ticket_supply, 2);
        assert_eq!(c.ledger.collateral_locked, 10);
    }

    #[test]
    fn observed_balances_must_stay_within_ledger() {
        let ledger = LedgerState {
            collateral_locked: 300,
            ticket_supply: 2,
            outcome_supply: [1, 1],
        };

        assert!(ledger.require_vault_covers(300).is_ok());
        assert!(ledger.require_vault_covers(301).is_ok());
        assert_code(
            ledger.require_vault_covers(299),
            ConditionError::BackingInvariantViolated,
        );

        assert!(ledger.require_ticket_supply_within(1).is_ok());
        assert_code(
            ledger.require_ticket_supply_within(3),
            ConditionError::SupplyMismatch,
        );
        assert!(ledger
            .require_outcome_supply_within(WinningOutcome::Outcome2, 1)
            .is_ok());
        assert_code(
            ledger.require_outcome_supply_within(WinningOutcome::Outcome1, 2),
            ConditionError::SupplyMismatch,
        );
    }
}
