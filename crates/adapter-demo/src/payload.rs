//! The fixed transaction and message the demo submits and signs.

use sol_tx::{AccountMeta, Instruction, Pubkey, SolError};

use crate::encoding::from_hex;

pub const PROGRAM_ID: &str = "D53iWCLobVZ9c3grAR19QFruvfieS39VubXUWdSsSWSW";

pub const INSTRUCTION_DATA_HEX: &str = "b712469c946da122";

/// `(address, is_signer, is_writable)` in instruction order.
pub const ACCOUNTS: [(&str, bool, bool); 11] = [
    ("4oSUX8WYDEobr6bbrjRHvpJW1Pas4Nx3aRnYVfdDryWH", false, true),
    ("5FJnNy8RT9hBLHD9RX5X97nqpVNfK8tgGy5JA5YXkSkY", false, false),
    ("4cNDeQwtZzeFABT9UZiJcT1HtgVnby6TTFQDvi7bLRZy", false, true),
    ("DTNWZMq7pJGGwkni4HfQuGJArTKQj7Q5ssLYLvAPBgrZ", false, true),
    ("BP5iZ7u7L6V2Sf89WNqqq8pqPFX1Xj6cAgA5qQ955PNB", false, true),
    ("CUY2VmyW7hG7wumtJdAfuFHht3AD96srQMcDHNhsqznc", true, true),
    ("GoyNqk3sbD1UWShS78t3h6f4XoCjLkwB2C2BtV8gsoxY", false, true),
    ("8w2nzeswedrRzCEQRtQsZBRBeJFUfGFkkKRnTFUfBbSm", false, true),
    ("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA", false, false),
    ("SysvarC1ock11111111111111111111111111111111", false, false),
    ("SysvarRent111111111111111111111111111111111", false, false),
];

/// The one account in [`ACCOUNTS`] that must sign.
pub const REQUIRED_SIGNER: &str = "CUY2VmyW7hG7wumtJdAfuFHht3AD96srQMcDHNhsqznc";

pub const PROOF_MESSAGE: &str = "Please sign this message for proof of address ownership.";

pub fn demo_instruction() -> Result<Instruction, SolError> {
    let accounts = ACCOUNTS
        .iter()
        .map(|(address, is_signer, is_writable)| {
            Ok(AccountMeta::new(address.parse()?, *is_signer, *is_writable))
        })
        .collect::<Result<Vec<_>, SolError>>()?;

    Ok(Instruction::new(
        PROGRAM_ID.parse::<Pubkey>()?,
        accounts,
        from_hex(INSTRUCTION_DATA_HEX)?,
    ))
}
