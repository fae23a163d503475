//! Per-command argument encodings and reference checks.
//!
//! Every command except `MoveCall` has a fixed encoding for each argument it
//! takes; `MoveCall` argument encodings come from the callee's normalized
//! signature during resolution.

use sui_tx_types::{Argument, Command};

use crate::error::{BuildError, BuildResult};
use crate::pure::PureType;

/// How an argument in a given command position must be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentEncoding {
    /// BCS pure value of this wire type.
    Pure(PureType),
    /// Object reference, resolved from the ledger.
    Object,
}

/// Fixed encodings of `command`'s arguments, in field order.
///
/// Returns `None` for `MoveCall`, whose encodings depend on the callee.
pub fn argument_encodings(command: &Command) -> Option<Vec<(Argument, ArgumentEncoding)>> {
    let object = |arg: &Argument| (*arg, ArgumentEncoding::Object);
    let encodings = match command {
        Command::MoveCall(_) => return None,
        Command::TransferObjects { objects, address } => {
            let mut args: Vec<_> = objects.iter().map(object).collect();
            args.push((*address, ArgumentEncoding::Pure(PureType::Address)));
            args
        }
        Command::SplitCoins { coin, amounts } => {
            let mut args = vec![object(coin)];
            args.extend(
                amounts
                    .iter()
                    .map(|amount| (*amount, ArgumentEncoding::Pure(PureType::U64))),
            );
            args
        }
        Command::MergeCoins {
            destination,
            sources,
        } => {
            let mut args = vec![object(destination)];
            args.extend(sources.iter().map(object));
            args
        }
        Command::MakeMoveVec { elements, .. } => elements.iter().map(object).collect(),
        Command::Upgrade { ticket, .. } => vec![object(ticket)],
        Command::Publish { .. } => Vec::new(),
    };
    Some(encodings)
}

/// Check that every argument of the command about to be appended at
/// `command_index` refers to a declared input or an earlier command.
pub fn validate_arguments(
    command: &Command,
    command_index: usize,
    num_inputs: usize,
) -> BuildResult<()> {
    for arg in command.arguments() {
        let reason = match arg {
            Argument::GasCoin => None,
            Argument::Input(idx) if (idx as usize) >= num_inputs => {
                Some(format!("only {} inputs declared", num_inputs))
            }
            Argument::Input(_) => None,
            Argument::Result(idx) | Argument::NestedResult(idx, _) => {
                let idx = idx as usize;
                if idx == command_index {
                    Some("command references its own result".to_string())
                } else if idx > command_index {
                    Some(format!("command {} has not been added yet", idx))
                } else {
                    None
                }
            }
        };
        if let Some(reason) = reason {
            return Err(BuildError::InvalidArgumentReference {
                argument: arg,
                reason,
            });
        }
    }
    Ok(())
}

/// Check a whole command list, as restored from a snapshot or bytes.
pub fn validate_commands(commands: &[Command], num_inputs: usize) -> BuildResult<()> {
    commands
        .iter()
        .enumerate()
        .try_for_each(|(index, command)| validate_arguments(command, index, num_inputs))
}
