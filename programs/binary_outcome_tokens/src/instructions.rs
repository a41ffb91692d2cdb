use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::error::ConditionError;
use crate::state::{Condition, WinningOutcome};

#[derive(Accounts)]
pub struct InitializeCondition<'info> {
    #[account(mut)]
    pub signer: Signer<'info>, // becomes the condition resolver

    #[account(
        init,
        payer = signer,
        space = 8 + Condition::INIT_SPACE
    )]
    pub condition: Box<Account<'info, Condition>>,

    /// CHECK: compared with the PDA derived from `condition` in the handler
    pub condition_authority: UncheckedAccount<'info>,

    // Mints are created by the client beforehand, with the condition authority
    // as mint authority, 0 decimals and nothing minted yet.
    pub ticket_mint: Box<Account<'info, Mint>>,
    pub outcome_1_mint: Box<Account<'info, Mint>>,
    pub outcome_2_mint: Box<Account<'info, Mint>>,

    pub collateral_mint: Box<Account<'info, Mint>>,

    #[account(
        init,
        payer = signer,
        token::mint = collateral_mint,
        token::authority = condition_authority
    )]
    pub collateral_vault: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
pub struct MintTicket<'info> {
    pub signer: Signer<'info>,

    #[account(mut)]
    pub condition: Box<Account<'info, Condition>>,

    #[account(
        mut,
        constraint = collateral_vault.key() == condition.collateral_vault @ ConditionError::InvalidCollateralVault
    )]
    pub collateral_vault: Box<Account<'info, TokenAccount>>,

    /// CHECK: verified against the derived condition authority in the handler
    pub condition_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = ticket_mint.key() == condition.ticket_mint @ ConditionError::InvalidTokenMint
    )]
    pub ticket_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        constraint = payer.mint == condition.collateral_mint @ ConditionError::InvalidTokenMint,
        constraint = payer.owner == signer.key()
    )]
    pub payer: Box<Account<'info, TokenAccount>>, // collateral source

    #[account(
        mut,
        constraint = receiver.mint == condition.ticket_mint @ ConditionError::InvalidTokenMint
    )]
    pub receiver: Box<Account<'info, TokenAccount>>, // ticket destination

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct SplitTicket<'info> {
    pub signer: Signer<'info>,

    #[account(mut)]
    pub condition: Box<Account<'info, Condition>>,

    /// CHECK: verified against the derived condition authority in the handler
    pub condition_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = ticket_mint.key() == condition.ticket_mint @ ConditionError::InvalidTokenMint
    )]
    pub ticket_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        constraint = outcome_1_mint.key() == condition.outcome_mint(WinningOutcome::Outcome1) @ ConditionError::InvalidTokenMint
    )]
    pub outcome_1_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        constraint = outcome_2_mint.key() == condition.outcome_mint(WinningOutcome::Outcome2) @ ConditionError::InvalidTokenMint
    )]
    pub outcome_2_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        constraint = payer.mint == condition.ticket_mint @ ConditionError::InvalidTokenMint,
        constraint = payer.owner == signer.key()
    )]
    pub payer: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = receiver_1.mint == outcome_1_mint.key() @ ConditionError::InvalidTokenMint
    )]
    pub receiver_1: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = receiver_2.mint == outcome_2_mint.key() @ ConditionError::InvalidTokenMint
    )]
    pub receiver_2: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct MergeTicket<'info> {
    pub signer: Signer<'info>,

    #[account(mut)]
    pub condition: Box<Account<'info, Condition>>,

    /// CHECK: verified against the derived condition authority in the handler
    pub condition_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = ticket_mint.key() == condition.ticket_mint @ ConditionError::InvalidTokenMint
    )]
    pub ticket_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        constraint = outcome_1_mint.key() == condition.outcome_mint(WinningOutcome::Outcome1) @ ConditionError::InvalidTokenMint
    )]
    pub outcome_1_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        constraint = outcome_2_mint.key() == condition.outcome_mint(WinningOutcome::Outcome2) @ ConditionError::InvalidTokenMint
    )]
    pub outcome_2_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        constraint = payer_1.mint == outcome_1_mint.key() @ ConditionError::InvalidTokenMint,
        constraint = payer_1.owner == signer.key()
    )]
    pub payer_1: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = payer_2.mint == outcome_2_mint.key() @ ConditionError::InvalidTokenMint,
        constraint = payer_2.owner == signer.key()
    )]
    pub payer_2: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = receiver.mint == condition.ticket_mint @ ConditionError::InvalidTokenMint
    )]
    pub receiver: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct RedeemTicket<'info> {
    pub signer: Signer<'info>,

    #[account(mut)]
    pub condition: Box<Account<'info, Condition>>,

    /// CHECK: verified against the derived condition authority in the handler
    pub condition_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = ticket_mint.key() == condition.ticket_mint @ ConditionError::InvalidTokenMint
    )]
    pub ticket_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        constraint = collateral_vault.key() == condition.collateral_vault @ ConditionError::InvalidCollateralVault
    )]
    pub collateral_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = payer.mint == condition.ticket_mint @ ConditionError::InvalidTokenMint,
        constraint = payer.owner == signer.key()
    )]
    pub payer: Box<Account<'info, TokenAccount>>, // tickets to burn

    #[account(
        mut,
        constraint = receiver.mint == condition.collateral_mint @ ConditionError::InvalidTokenMint
    )]
    pub receiver: Box<Account<'info, TokenAccount>>, // collateral destination

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct ResolveCondition<'info> {
    #[account(
        constraint = signer.key() == condition.resolver @ ConditionError::Unauthorized
    )]
    pub signer: Signer<'info>,

    #[account(mut)]
    pub condition: Box<Account<'info, Condition>>,

    /// CHECK: verified against the derived condition authority in the handler
    pub condition_authority: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct RedeemPayout<'info> {
    pub signer: Signer<'info>,

    #[account(mut)]
    pub condition: Box<Account<'info, Condition>>,

    /// CHECK: verified against the derived condition authority in the handler
    pub condition_authority: UncheckedAccount<'info>,

    // Either outcome mint; the handler decides whether it is the winner
    #[account(mut)]
    pub outcome_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        constraint = payer.mint == outcome_mint.key() @ ConditionError::InvalidTokenMint,
        constraint = payer.owner == signer.key()
    )]
    pub payer: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = collateral_vault.key() == condition.collateral_vault @ ConditionError::InvalidCollateralVault
    )]
    pub collateral_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = receiver.mint == condition.collateral_mint @ ConditionError::InvalidTokenMint
    )]
    pub receiver: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
