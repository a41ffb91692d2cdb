use anchor_lang::prelude::*;

use crate::accounting::LedgerState;
use crate::constants::{MAX_DESCRIPTION_LEN, MAX_OUTCOME_LABEL_LEN, MAX_TITLE_LEN};
use crate::error::ConditionError;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum WinningOutcome {
    Outcome1,
    Outcome2,
}

impl WinningOutcome {
    pub fn from_index(index: u8) -> Result<Self> {
        match index {
            0 => Ok(WinningOutcome::Outcome1),
            1 => Ok(WinningOutcome::Outcome2),
            _ => err!(ConditionError::InvalidOutcome),
        }
    }

    pub fn index(self) -> usize {
        match self {
            WinningOutcome::Outcome1 => 0,
            WinningOutcome::Outcome2 => 1,
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct Outcome {
    #[max_len(25)]
    pub label: String,
    pub mint: Pubkey,
}

#[account]
#[derive(InitSpace, Debug)]
pub struct Condition {
    #[max_len(64)]
    pub title: String,
    #[max_len(256)]
    pub description: String,
    pub outcomes: [Outcome; 2],
    pub conversion_rate: u64, // collateral units locked per ticket
    pub ticket_mint: Pubkey,
    pub collateral_mint: Pubkey,
    pub collateral_vault: Pubkey,
    pub resolver: Pubkey, // signer of initialize_condition, the only one allowed to resolve
    pub resolved: bool,
    pub winning_outcome: Option<WinningOutcome>,
    pub resolved_at_slot: u64, // informative only
    pub ledger: LedgerState,
    pub authority_bump: u8,
}

/// Everything `initialize_condition` records about a new condition.
pub struct ConditionParams {
    pub title: String,
    pub description: String,
    pub outcome_labels: [String; 2],
    pub conversion_rate: u64,
    pub ticket_mint: Pubkey,
    pub outcome_mints: [Pubkey; 2],
    pub collateral_mint: Pubkey,
    pub collateral_vault: Pubkey,
    pub resolver: Pubkey,
    pub authority_bump: u8,
}

impl Condition {
    pub fn new(params: ConditionParams) -> Result<Self> {
        require!(params.conversion_rate > 0, ConditionError::InvalidConversionRate);
        require!(params.title.len() <= MAX_TITLE_LEN, ConditionError::TitleTooLong);
        require!(
            params.description.len() <= MAX_DESCRIPTION_LEN,
            ConditionError::DescriptionTooLong
        );
        for label in params.outcome_labels.iter() {
            require!(
                !label.is_empty() && label.len() <= MAX_OUTCOME_LABEL_LEN,
                ConditionError::InvalidOutcomeLabel
            );
        }

        let mints = [
            params.ticket_mint,
            params.outcome_mints[0],
            params.outcome_mints[1],
            params.collateral_mint,
        ];
        for (i, mint) in mints.iter().enumerate() {
            require!(!mints[i + 1..].contains(mint), ConditionError::DuplicateMint);
        }

        let [label_1, label_2] = params.outcome_labels;
        Ok(Condition {
            title: params.title,
            description: params.description,
            outcomes: [
                Outcome {
                    label: label_1,
                    mint: params.outcome_mints[0],
                },
                Outcome {
                    label: label_2,
                    mint: params.outcome_mints[1],
                },
            ],
            conversion_rate: params.conversion_rate,
            ticket_mint: params.ticket_mint,
            collateral_mint: params.collateral_mint,
            collateral_vault: params.collateral_vault,
            resolver: params.resolver,
            resolved: false,
            winning_outcome: None,
            resolved_at_slot: 0,
            ledger: LedgerState::default(),
            authority_bump: params.authority_bump,
        })
    }

    /// Which outcome a mint belongs to, if any.
    pub fn outcome_of(&self, mint: &Pubkey) -> Option<WinningOutcome> {
        if self.outcomes[0].mint == *mint {
            Some(WinningOutcome::Outcome1)
        } else if self.outcomes[1].mint == *mint {
            Some(WinningOutcome::Outcome2)
        } else {
            None
        }
    }

    pub fn outcome_mint(&self, outcome: WinningOutcome) -> Pubkey {
        self.outcomes[outcome.index()].mint
    }

    /// One-shot transition Unresolved -> Resolved(outcome).
    pub fn resolve(&mut self, outcome: WinningOutcome, slot: u64) -> Result<()> {
        require!(!self.resolved, ConditionError::AlreadyResolved);

        self.resolved = true;
        self.winning_outcome = Some(outcome);
        self.resolved_at_slot = slot;
        Ok(())
    }
}
