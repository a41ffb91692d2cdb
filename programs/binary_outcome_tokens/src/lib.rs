use anchor_lang::prelude::*;

pub mod accounting;
pub mod authority;
pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod state;

use accounting::{require_balance, Movement};
use authority::{burn_from_holder, deposit_collateral, derive_condition_authority, ConditionAuthority};
use error::ConditionError;
use events::*;
use instructions::*;
use state::{Condition, ConditionParams, WinningOutcome};

declare_id!("5c5A6f6HQNhgaSmwuKCkCcgEJWk9UoskR9S2Fp5ig6v1");

#[program]
pub mod binary_outcome_tokens {
    use super::*;

    pub fn initialize_condition(
        ctx: Context<InitializeCondition>,
        title: String,
        description: String,
        outcome_1_label: String,
        outcome_2_label: String,
        conversion_rate: u64,
    ) -> Result<()> {
        let accounts = ctx.accounts;

        let condition_key = accounts.condition.key();
        let (expected_authority, authority_bump) = derive_condition_authority(&condition_key);
        require_keys_eq!(
            accounts.condition_authority.key(),
            expected_authority,
            ConditionError::AuthorityMismatch
        );

        accounts.condition.set_inner(Condition::new(ConditionParams {
            title,
            description,
            outcome_labels: [outcome_1_label, outcome_2_label],
            conversion_rate,
            ticket_mint: accounts.ticket_mint.key(),
            outcome_mints: [accounts.outcome_1_mint.key(), accounts.outcome_2_mint.key()],
            collateral_mint: accounts.collateral_mint.key(),
            collateral_vault: accounts.collateral_vault.key(),
            resolver: accounts.signer.key(),
            authority_bump,
        })?);

        let authority =
            ConditionAuthority::verify(&accounts.condition, &accounts.condition_authority)?;
        for mint in [
            &accounts.ticket_mint,
            &accounts.outcome_1_mint,
            &accounts.outcome_2_mint,
        ] {
            authority.require_registrable_mint(mint)?;
        }
        authority.require_unfunded_vault(&accounts.collateral_vault)?;

        msg!(
            "Condition {} initialized, {} collateral per ticket",
            condition_key,
            conversion_rate
        );
        emit!(ConditionInitialized {
            condition: condition_key,
            resolver: accounts.condition.resolver,
            ticket_mint: accounts.condition.ticket_mint,
            outcome_mints: [
                accounts.condition.outcomes[0].mint,
                accounts.condition.outcomes[1].mint,
            ],
            collateral_mint: accounts.condition.collateral_mint,
            collateral_vault: accounts.condition.collateral_vault,
            conversion_rate,
        });
        Ok(())
    }

    // Deposits `amount * conversion_rate` collateral and mints `amount` tickets
    pub fn mint_ticket(ctx: Context<MintTicket>, amount: u64) -> Result<()> {
        let accounts = ctx.accounts;

        let authority =
            ConditionAuthority::verify(&accounts.condition, &accounts.condition_authority)?;
        authority.require_vault_owner(&accounts.collateral_vault)?;
        authority.require_mint_authority(&accounts.ticket_mint, ConditionError::AuthorityMismatch)?;

        let settlement = accounts.condition.settle(Movement::MintTickets(amount))?;
        require_balance(
            accounts.payer.amount,
            settlement.collateral,
            ConditionError::InsufficientCollateral,
        )?;

        // Collateral must be in the vault before any ticket exists
        deposit_collateral(
            &accounts.token_program,
            &accounts.payer,
            &accounts.collateral_vault,
            &accounts.signer,
            settlement.collateral,
        )?;
        msg!("transferred {} to the vault", settlement.collateral);

        authority.mint_to(
            &accounts.token_program,
            &accounts.ticket_mint,
            &accounts.receiver,
            amount,
        )?;
        msg!("minted {} tickets to the receiver", amount);

        accounts.condition.commit(&settlement)?;

        accounts.collateral_vault.reload()?;
        accounts.ticket_mint.reload()?;
        let ledger = accounts.condition.ledger;
        ledger.require_vault_covers(accounts.collateral_vault.amount)?;
        ledger.require_ticket_supply_within(accounts.ticket_mint.supply)?;

        emit!(TicketsMinted {
            condition: accounts.condition.key(),
            receiver: accounts.receiver.key(),
            tickets: amount,
            collateral_deposited: settlement.collateral,
            collateral_locked: ledger.collateral_locked,
            ticket_supply: ledger.ticket_supply,
        });
        Ok(())
    }

    // Burns tickets and returns their collateral
    pub fn redeem_ticket(ctx: Context<RedeemTicket>, amount: u64) -> Result<()> {
        let accounts = ctx.accounts;

        let authority =
            ConditionAuthority::verify(&accounts.condition, &accounts.condition_authority)?;
        authority.require_vault_owner(&accounts.collateral_vault)?;
        authority.require_mint_authority(&accounts.ticket_mint, ConditionError::AuthorityMismatch)?;

        let settlement = accounts.condition.settle(Movement::RedeemTickets(amount))?;
        require_balance(
            accounts.payer.amount,
            amount,
            ConditionError::InsufficientTicketBalance,
        )?;

        burn_from_holder(
            &accounts.token_program,
            &accounts.ticket_mint,
            &accounts.payer,
            &accounts.signer,
            amount,
        )?;

        authority.release_collateral(
            &accounts.token_program,
            &accounts.collateral_vault,
            &accounts.receiver,
            settlement.collateral,
        )?;
        msg!("burnt {} tickets for {}", amount, settlement.collateral);

        accounts.condition.commit(&settlement)?;

        accounts.collateral_vault.reload()?;
        accounts.ticket_mint.reload()?;
        let ledger = accounts.condition.ledger;
        ledger.require_vault_covers(accounts.collateral_vault.amount)?;
        ledger.require_ticket_supply_within(accounts.ticket_mint.supply)?;

        emit!(TicketsRedeemed {
            condition: accounts.condition.key(),
            receiver: accounts.receiver.key(),
            tickets: amount,
            collateral_released: settlement.collateral,
            collateral_locked: ledger.collateral_locked,
            ticket_supply: ledger.ticket_supply,
        });
        Ok(())
    }

    // One ticket becomes one token of each outcome. The vault is not touched.
    pub fn split_ticket(ctx: Context<SplitTicket>, amount: u64) -> Result<()> {
        let accounts = ctx.accounts;

        let authority =
            ConditionAuthority::verify(&accounts.condition, &accounts.condition_authority)?;
        authority.require_mint_authority(&accounts.outcome_1_mint, ConditionError::AuthorityMismatch)?;
        authority.require_mint_authority(&accounts.outcome_2_mint, ConditionError::AuthorityMismatch)?;

        let settlement = accounts.condition.settle(Movement::Split(amount))?;
        require_balance(
            accounts.payer.amount,
            amount,
            ConditionError::InsufficientTicketBalance,
        )?;

        burn_from_holder(
            &accounts.token_program,
            &accounts.ticket_mint,
            &accounts.payer,
            &accounts.signer,
            amount,
        )?;
        authority.mint_to(
            &accounts.token_program,
            &accounts.outcome_1_mint,
            &accounts.receiver_1,
            amount,
        )?;
        authority.mint_to(
            &accounts.token_program,
            &accounts.outcome_2_mint,
            &accounts.receiver_2,
            amount,
        )?;
        msg!("Split {} tickets successful", amount);

        accounts.condition.commit(&settlement)?;

        accounts.ticket_mint.reload()?;
        accounts.outcome_1_mint.reload()?;
        accounts.outcome_2_mint.reload()?;
        let ledger = accounts.condition.ledger;
        ledger.require_ticket_supply_within(accounts.ticket_mint.supply)?;
        ledger.require_outcome_supply_within(WinningOutcome::Outcome1, accounts.outcome_1_mint.supply)?;
        ledger.require_outcome_supply_within(WinningOutcome::Outcome2, accounts.outcome_2_mint.supply)?;

        emit!(TicketsSplit {
            condition: accounts.condition.key(),
            tickets: amount,
            ticket_supply: ledger.ticket_supply,
            outcome_supply: ledger.outcome_supply,
        });
        Ok(())
    }

    // One token of each outcome becomes one ticket again
    pub fn merge_ticket(ctx: Context<MergeTicket>, amount: u64) -> Result<()> {
        let accounts = ctx.accounts;

        let authority =
            ConditionAuthority::verify(&accounts.condition, &accounts.condition_authority)?;
        authority.require_mint_authority(&accounts.ticket_mint, ConditionError::AuthorityMismatch)?;

        let settlement = accounts.condition.settle(Movement::Merge(amount))?;
        require_balance(
            accounts.payer_1.amount,
            amount,
            ConditionError::InsufficientOutcomeBalance,
        )?;
        require_balance(
            accounts.payer_2.amount,
            amount,
            ConditionError::InsufficientOutcomeBalance,
        )?;

        burn_from_holder(
            &accounts.token_program,
            &accounts.outcome_1_mint,
            &accounts.payer_1,
            &accounts.signer,
            amount,
        )?;
        burn_from_holder(
            &accounts.token_program,
            &accounts.outcome_2_mint,
            &accounts.payer_2,
            &accounts.signer,
            amount,
        )?;
        authority.mint_to(
            &accounts.token_program,
            &accounts.ticket_mint,
            &accounts.receiver,
            amount,
        )?;
        msg!("Merged {} pairs of outcome tokens into tickets", amount);

        accounts.condition.commit(&settlement)?;

        accounts.ticket_mint.reload()?;
        accounts.outcome_1_mint.reload()?;
        accounts.outcome_2_mint.reload()?;
        let ledger = accounts.condition.ledger;
        ledger.require_ticket_supply_within(accounts.ticket_mint.supply)?;
        ledger.require_outcome_supply_within(WinningOutcome::Outcome1, accounts.outcome_1_mint.supply)?;
        ledger.require_outcome_supply_within(WinningOutcome::Outcome2, accounts.outcome_2_mint.supply)?;

        emit!(TicketsMerged {
            condition: accounts.condition.key(),
            tickets: amount,
            ticket_supply: ledger.ticket_supply,
            outcome_supply: ledger.outcome_supply,
        });
        Ok(())
    }

    // Called by the resolver to fix the winning outcome. Can only happen once.
    pub fn resolve_condition(ctx: Context<ResolveCondition>, outcome_index: u8) -> Result<()> {
        let accounts = ctx.accounts;

        let outcome = WinningOutcome::from_index(outcome_index)?;
        ConditionAuthority::verify(&accounts.condition, &accounts.condition_authority)?;

        let slot = Clock::get()?.slot;
        accounts.condition.resolve(outcome, slot)?;

        let condition: &Condition = &accounts.condition;
        condition.ledger.check_backing(condition)?;

        msg!("Winning outcome is set to be: {:?}", outcome);
        emit!(ConditionResolved {
            condition: accounts.condition.key(),
            resolver: accounts.signer.key(),
            winning_outcome: outcome,
            slot,
        });
        Ok(())
    }

    // Burns winning outcome tokens for their collateral. Losing tokens are never redeemable.
    pub fn redeem_payout(ctx: Context<RedeemPayout>, amount: u64) -> Result<()> {
        let accounts = ctx.accounts;

        let authority =
            ConditionAuthority::verify(&accounts.condition, &accounts.condition_authority)?;
        authority.require_vault_owner(&accounts.collateral_vault)?;

        require!(
            accounts.condition.resolved,
            ConditionError::ConditionNotResolved
        );
        let outcome = accounts
            .condition
            .outcome_of(&accounts.outcome_mint.key())
            .ok_or(ConditionError::InvalidTokenMint)?;

        let settlement = accounts
            .condition
            .settle(Movement::Payout { outcome, amount })?;
        require_balance(
            accounts.payer.amount,
            amount,
            ConditionError::InsufficientOutcomeBalance,
        )?;

        burn_from_holder(
            &accounts.token_program,
            &accounts.outcome_mint,
            &accounts.payer,
            &accounts.signer,
            amount,
        )?;
        authority.release_collateral(
            &accounts.token_program,
            &accounts.collateral_vault,
            &accounts.receiver,
            settlement.collateral,
        )?;
        msg!("redeemed {} for {}", amount, settlement.collateral);

        accounts.condition.commit(&settlement)?;

        accounts.collateral_vault.reload()?;
        accounts.outcome_mint.reload()?;
        let ledger = accounts.condition.ledger;
        ledger.require_vault_covers(accounts.collateral_vault.amount)?;
        ledger.require_outcome_supply_within(outcome, accounts.outcome_mint.supply)?;

        emit!(PayoutRedeemed {
            condition: accounts.condition.key(),
            receiver: accounts.receiver.key(),
            outcome,
            amount,
            collateral_released: settlement.collateral,
            collateral_locked: ledger.collateral_locked,
        });
        Ok(())
    }
}
