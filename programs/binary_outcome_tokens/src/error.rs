use anchor_lang::prelude::*;

#[error_code]
pub enum ConditionError {
    #[msg("Amount must be greater than zero")]
    InvalidAmount,
    #[msg("Conversion rate must be greater than zero")]
    InvalidConversionRate,
    #[msg("Outcome label must be between 1 and 25 bytes")]
    InvalidOutcomeLabel,
    #[msg("Condition title is too long")]
    TitleTooLong,
    #[msg("Condition description is too long")]
    DescriptionTooLong,
    #[msg("Condition authority must be the mint authority of the token")]
    InvalidMintAuthority,
    #[msg("Ticket and outcome mints must have 0 decimals")]
    InvalidMintDecimals,
    #[msg("Token supply should be 0 to initialize condition")]
    SupplyNotZero,
    #[msg("Ticket, outcome and collateral mints must all be different")]
    DuplicateMint,
    #[msg("Collateral vault must be empty")]
    VaultNotEmpty,
    #[msg("Account is not controlled by this condition's authority")]
    AuthorityMismatch,
    #[msg("Invalid collateral vault")]
    InvalidCollateralVault,
    #[msg("Invalid token mint")]
    InvalidTokenMint,
    #[msg("Signer is not the condition resolver")]
    Unauthorized,
    #[msg("Outcome should be either 0 or 1")]
    InvalidOutcome,
    #[msg("Condition already resolved")]
    AlreadyResolved,
    #[msg("Condition is not resolved yet")]
    ConditionNotResolved,
    #[msg("Outcome token is not for the winning outcome")]
    WrongOutcomeToken,
    #[msg("Not enough collateral")]
    InsufficientCollateral,
    #[msg("Not enough tickets")]
    InsufficientTicketBalance,
    #[msg("Not enough outcome tokens")]
    InsufficientOutcomeBalance,
    #[msg("Math overflow")]
    Overflow,
    #[msg("Token supply does not match the condition ledger")]
    SupplyMismatch,
    #[msg("Collateral does not back the outstanding tokens")]
    BackingInvariantViolated,
}
