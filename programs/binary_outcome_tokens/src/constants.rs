use anchor_lang::prelude::*;

// Seeds of the condition authority PDA: [CONDITION_AUTHORITY_SEED, condition.key()]
#[constant]
pub const CONDITION_AUTHORITY_SEED: &[u8] = b"condition_auth_pda_seed";

pub const MAX_TITLE_LEN: usize = 64;
pub const MAX_DESCRIPTION_LEN: usize = 256;
pub const MAX_OUTCOME_LABEL_LEN: usize = 25;

// Tickets and outcome tokens are indivisible
pub const TICKET_DECIMALS: u8 = 0;

// Whether tickets can still be turned back into collateral once the condition is resolved.
// A ticket is backed by the same collateral in both states, so redemption stays open.
pub const TICKET_REDEMPTION_AFTER_RESOLUTION: bool = true;
