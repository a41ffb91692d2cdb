use anchor_lang::prelude::*;

use crate::state::WinningOutcome;

#[event]
pub struct ConditionInitialized {
    pub condition: Pubkey,
    pub resolver: Pubkey,
    pub ticket_mint: Pubkey,
    pub outcome_mints: [Pubkey; 2],
    pub collateral_mint: Pubkey,
    pub collateral_vault: Pubkey,
    pub conversion_rate: u64,
}

#[event]
pub struct TicketsMinted {
    pub condition: Pubkey,
    pub receiver: Pubkey,
    pub tickets: u64,
    pub collateral_deposited: u64,
    pub collateral_locked: u64,
    pub ticket_supply: u64,
}

#[event]
pub struct TicketsRedeemed {
    pub condition: Pubkey,
    pub receiver: Pubkey,
    pub tickets: u64,
    pub collateral_released: u64,
    pub collateral_locked: u64,
    pub ticket_supply: u64,
}

#[event]
pub struct TicketsSplit {
    pub condition: Pubkey,
    pub tickets: u64,
    pub ticket_supply: u64,
    pub outcome_supply: [u64; 2],
}

#[event]
pub struct TicketsMerged {
    pub condition: Pubkey,
    pub tickets: u64,
    pub ticket_supply: u64,
    pub outcome_supply: [u64; 2],
}

#[event]
pub struct ConditionResolved {
    pub condition: Pubkey,
    pub resolver: Pubkey,
    pub winning_outcome: WinningOutcome,
    pub slot: u64,
}

#[event]
pub struct PayoutRedeemed {
    pub condition: Pubkey,
    pub receiver: Pubkey,
    pub outcome: WinningOutcome,
    pub amount: u64,
    pub collateral_released: u64,
    pub collateral_locked: u64,
}
