// Condition authority PDA `[CONDITION_AUTHORITY_SEED, condition]`: mint authority of
// the condition's mints and owner of its vault. Only `verify` hands one out.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token::{self, Burn, Mint, MintTo, Token, TokenAccount, Transfer};

use crate::constants::{CONDITION_AUTHORITY_SEED, TICKET_DECIMALS};
use crate::error::ConditionError;
use crate::state::Condition;

/// Canonical authority address and bump for `condition`.
pub fn derive_condition_authority(condition: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[CONDITION_AUTHORITY_SEED, condition.as_ref()], &crate::ID)
}

pub fn condition_authority_address(condition: &Pubkey, bump: u8) -> Result<Pubkey> {
    Pubkey::create_program_address(
        &[CONDITION_AUTHORITY_SEED, condition.as_ref(), &[bump]],
        &crate::ID,
    )
    .map_err(|_| error!(ConditionError::AuthorityMismatch))
}

pub struct ConditionAuthority<'info> {
    account: AccountInfo<'info>,
    condition: Pubkey,
    bump: u8,
}

impl<'info> ConditionAuthority<'info> {
    pub fn verify(
        condition: &Account<'info, Condition>,
        authority: &AccountInfo<'info>,
    ) -> Result<Self> {
        let condition_key = condition.key();
        let expected = condition_authority_address(&condition_key, condition.authority_bump)?;
        require_keys_eq!(authority.key(), expected, ConditionError::AuthorityMismatch);

        Ok(Self {
            account: authority.clone(),
            condition: condition_key,
            bump: condition.authority_bump,
        })
    }

    pub fn key(&self) -> Pubkey {
        self.account.key()
    }

    /// Fails with `mismatch` unless this authority can mint and burn `mint`.
    pub fn require_mint_authority(&self, mint: &Mint, mismatch: ConditionError) -> Result<()> {
        if mint.mint_authority != COption::Some(self.key()) {
            return Err(mismatch.into());
        }
        Ok(())
    }

    /// A ticket or outcome mint may only be registered while nothing has been minted
    /// from it, so no one holds claims the vault never received collateral for.
    pub fn require_registrable_mint(&self, mint: &Mint) -> Result<()> {
        self.require_mint_authority(mint, ConditionError::InvalidMintAuthority)?;
        require!(mint.decimals == TICKET_DECIMALS, ConditionError::InvalidMintDecimals);
        require!(mint.supply == 0, ConditionError::SupplyNotZero);
        Ok(())
    }

    pub fn require_vault_owner(&self, vault: &TokenAccount) -> Result<()> {
        require_keys_eq!(vault.owner, self.key(), ConditionError::AuthorityMismatch);
        Ok(())
    }

    // A new condition starts with nothing locked, so its vault must start empty too
    pub fn require_unfunded_vault(&self, vault: &TokenAccount) -> Result<()> {
        self.require_vault_owner(vault)?;
        require!(vault.amount == 0, ConditionError::VaultNotEmpty);
        Ok(())
    }

    pub fn mint_to(
        &self,
        token_program: &Program<'info, Token>,
        mint: &Account<'info, Mint>,
        to: &Account<'info, TokenAccount>,
        amount: u64,
    ) -> Result<()> {
        let bump = [self.bump];
        let seeds: &[&[u8]] = &[CONDITION_AUTHORITY_SEED, self.condition.as_ref(), &bump];

        token::mint_to(
            CpiContext::new_with_signer(
                token_program.to_account_info(),
                MintTo {
                    mint: mint.to_account_info(),
                    to: to.to_account_info(),
                    authority: self.account.clone(),
                },
                &[seeds],
            ),
            amount,
        )
    }

    /// Moves collateral out of the vault.
    #[allow(deprecated)]
    pub fn release_collateral(
        &self,
        token_program: &Program<'info, Token>,
        vault: &Account<'info, TokenAccount>,
        to: &Account<'info, TokenAccount>,
        amount: u64,
    ) -> Result<()> {
        let bump = [self.bump];
        let seeds: &[&[u8]] = &[CONDITION_AUTHORITY_SEED, self.condition.as_ref(), &bump];

        token::transfer(
            CpiContext::new_with_signer(
                token_program.to_account_info(),
                Transfer {
                    from: vault.to_account_info(),
                    to: to.to_account_info(),
                    authority: self.account.clone(),
                },
                &[seeds],
            ),
            amount,
        )
    }
}

// Holder-signed movements: the token program checks `owner` against the source account.

pub fn burn_from_holder<'info>(
    token_program: &Program<'info, Token>,
    mint: &Account<'info, Mint>,
    from: &Account<'info, TokenAccount>,
    owner: &Signer<'info>,
    amount: u64,
) -> Result<()> {
    token::burn(
        CpiContext::new(
            token_program.to_account_info(),
            Burn {
                mint: mint.to_account_info(),
                from: from.to_account_info(),
                authority: owner.to_account_info(),
            },
        ),
        amount,
    )
}

#[allow(deprecated)]
pub fn deposit_collateral<'info>(
    token_program: &Program<'info, Token>,
    from: &Account<'info, TokenAccount>,
    vault: &Account<'info, TokenAccount>,
    owner: &Signer<'info>,
    amount: u64,
) -> Result<()> {
    token::transfer(
        CpiContext::new(
            token_program.to_account_info(),
            Transfer {
                from: from.to_account_info(),
                to: vault.to_account_info(),
                authority: owner.to_account_info(),
            },
        ),
        amount,
    )
}
