//! Programmable transaction types.
//!
//! This module owns the transaction data: inputs, commands, gas configuration,
//! the portable JSON snapshot and the BCS encoding the ledger signs over.
//!
//! Every enum here keeps the ledger's variant order, so the derived serde impls
//! double as the BCS wire format. JSON (snapshot) output uses the same derives
//! with human-readable address and digest encodings.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::address::{ObjectDigest, ObjectId, SuiAddress, TransactionDigest};
use crate::encoding::{base64_bytes, base64_bytes_vec};
use crate::type_parsing::{parse_identifier, TypeTag};

/// Current portable snapshot version.
pub const SNAPSHOT_VERSION: u8 = 1;

/// Domain separator prepended to transaction bytes before hashing.
const TRANSACTION_DIGEST_INTENT: &[u8] = b"TransactionData::";

type Blake2b256 = Blake2b<U32>;

// =============================================================================
// Call arguments
// =============================================================================

/// Reference to a specific version of an owned or immutable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub object_id: ObjectId,
    pub version: u64,
    pub digest: ObjectDigest,
}

/// A fully resolved transaction input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
    /// BCS bytes of a pure value.
    Pure(#[serde(with = "base64_bytes")] Vec<u8>),
    Object(ObjectArg),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectArg {
    ImmOrOwnedObject(ObjectRef),
    SharedObject {
        id: ObjectId,
        #[serde(rename = "initialSharedVersion")]
        initial_shared_version: u64,
        mutable: bool,
    },
    Receiving(ObjectRef),
}

impl CallArg {
    /// The object this argument refers to, if any.
    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            CallArg::Pure(_) => None,
            CallArg::Object(arg) => Some(arg.id()),
        }
    }
}

impl ObjectArg {
    pub fn id(&self) -> ObjectId {
        match self {
            ObjectArg::ImmOrOwnedObject(r) | ObjectArg::Receiving(r) => r.object_id,
            ObjectArg::SharedObject { id, .. } => *id,
        }
    }
}

// =============================================================================
// Arguments and commands
// =============================================================================

/// Reference to a value available to a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Argument {
    /// The gas coin. Only usable by-reference, or by-value in `TransferObjects`.
    GasCoin,
    /// One of the transaction inputs.
    Input(u16),
    /// The whole result of an earlier command.
    Result(u16),
    /// One value out of a multi-value command result.
    NestedResult(u16, u16),
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::GasCoin => f.write_str("GasCoin"),
            Argument::Input(i) => write!(f, "Input({})", i),
            Argument::Result(i) => write!(f, "Result({})", i),
            Argument::NestedResult(i, j) => write!(f, "NestedResult({}, {})", i, j),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableMoveCall {
    pub package: ObjectId,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

impl ProgrammableMoveCall {
    pub fn target(&self) -> MoveCallTarget {
        MoveCallTarget {
            package: self.package,
            module: self.module.clone(),
            function: self.function.clone(),
        }
    }
}

/// A command in a Programmable Transaction Block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Move function call
    MoveCall(Box<ProgrammableMoveCall>),

    /// Transfer objects
    TransferObjects {
        objects: Vec<Argument>,
        address: Argument,
    },

    /// Split coins
    SplitCoins {
        coin: Argument,
        amounts: Vec<Argument>,
    },

    /// Merge coins
    MergeCoins {
        destination: Argument,
        sources: Vec<Argument>,
    },

    /// Publish new package
    Publish {
        #[serde(with = "base64_bytes_vec")]
        modules: Vec<Vec<u8>>,
        dependencies: Vec<ObjectId>,
    },

    /// Make move vector
    MakeMoveVec {
        type_arg: Option<TypeTag>,
        elements: Vec<Argument>,
    },

    /// Upgrade package
    Upgrade {
        #[serde(with = "base64_bytes_vec")]
        modules: Vec<Vec<u8>>,
        dependencies: Vec<ObjectId>,
        package: ObjectId,
        ticket: Argument,
    },
}

impl Command {
    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Command::MoveCall(_) => "MoveCall",
            Command::TransferObjects { .. } => "TransferObjects",
            Command::SplitCoins { .. } => "SplitCoins",
            Command::MergeCoins { .. } => "MergeCoins",
            Command::Publish { .. } => "Publish",
            Command::MakeMoveVec { .. } => "MakeMoveVec",
            Command::Upgrade { .. } => "Upgrade",
        }
    }

    /// Every argument this command reads, in field order.
    pub fn arguments(&self) -> Vec<Argument> {
        match self {
            Command::MoveCall(call) => call.arguments.clone(),
            Command::TransferObjects { objects, address } => {
                let mut args = objects.clone();
                args.push(*address);
                args
            }
            Command::SplitCoins { coin, amounts } => {
                let mut args = vec![*coin];
                args.extend_from_slice(amounts);
                args
            }
            Command::MergeCoins {
                destination,
                sources,
            } => {
                let mut args = vec![*destination];
                args.extend_from_slice(sources);
                args
            }
            Command::Publish { .. } => Vec::new(),
            Command::MakeMoveVec { elements, .. } => elements.clone(),
            Command::Upgrade { ticket, .. } => vec![*ticket],
        }
    }
}

/// Fully-qualified Move function, `package::module::function`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MoveCallTarget {
    pub package: ObjectId,
    pub module: String,
    pub function: String,
}

impl FromStr for MoveCallTarget {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split("::").collect();
        if parts.len() != 3 {
            bail!(
                "Invalid move call target '{}': expected package::module::function",
                s
            );
        }
        let package = parts[0]
            .parse()
            .with_context(|| format!("Invalid package in move call target '{}'", s))?;
        let module = parse_identifier(parts[1])
            .ok_or_else(|| anyhow!("Invalid module name in move call target '{}'", s))?;
        let function = parse_identifier(parts[2])
            .ok_or_else(|| anyhow!("Invalid function name in move call target '{}'", s))?;
        Ok(Self {
            package,
            module,
            function,
        })
    }
}

impl fmt::Display for MoveCallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.package.short(), self.module, self.function)
    }
}

// =============================================================================
// Inputs
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputKind {
    Object,
    Pure,
}

/// Input content: either what the caller supplied or the encoded call argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputValue {
    /// Caller-supplied value still awaiting resolution. Object inputs hold the
    /// object id as a hex string.
    Raw(Value),
    Resolved(CallArg),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub index: u16,
    pub kind: InputKind,
    pub value: InputValue,
}

impl TransactionInput {
    pub fn is_resolved(&self) -> bool {
        matches!(self.value, InputValue::Resolved(_))
    }

    pub fn call_arg(&self) -> Option<&CallArg> {
        match &self.value {
            InputValue::Resolved(arg) => Some(arg),
            InputValue::Raw(_) => None,
        }
    }

    /// Raw value, if the input has not been resolved yet.
    pub fn raw(&self) -> Option<&Value> {
        match &self.value {
            InputValue::Raw(value) => Some(value),
            InputValue::Resolved(_) => None,
        }
    }

    /// The object this input refers to, raw or resolved.
    pub fn object_id(&self) -> Option<ObjectId> {
        match &self.value {
            InputValue::Raw(Value::String(s)) if self.kind == InputKind::Object => s.parse().ok(),
            InputValue::Raw(_) => None,
            InputValue::Resolved(arg) => arg.object_id(),
        }
    }

    /// The owned object reference this input resolved to, if any.
    pub fn owned_object(&self) -> Option<&ObjectRef> {
        match &self.value {
            InputValue::Resolved(CallArg::Object(ObjectArg::ImmOrOwnedObject(r))) => Some(r),
            _ => None,
        }
    }

    pub fn resolve(&mut self, arg: CallArg) {
        self.value = InputValue::Resolved(arg);
    }
}

// =============================================================================
// Gas and expiration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasConfig {
    pub budget: Option<u64>,
    pub price: Option<u64>,
    pub payment: Option<Vec<ObjectRef>>,
    /// Gas owner for sponsored transactions; defaults to the sender.
    pub owner: Option<SuiAddress>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionExpiration {
    #[default]
    None,
    Epoch(u64),
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionData {
    V1(TransactionDataV1),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDataV1 {
    pub kind: TransactionKind,
    pub sender: SuiAddress,
    pub gas_data: GasData,
    pub expiration: TransactionExpiration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    ProgrammableTransaction(ProgrammableTransaction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableTransaction {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasData {
    pub payment: Vec<ObjectRef>,
    pub owner: SuiAddress,
    pub price: u64,
    pub budget: u64,
}

// =============================================================================
// Transaction data builder
// =============================================================================

/// Mutable transaction description, from first input declaration to encoding.
///
/// Fields are public: the resolution pipeline rewrites inputs and gas
/// configuration in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionDataBuilder {
    pub sender: Option<SuiAddress>,
    pub expiration: TransactionExpiration,
    pub gas_config: GasConfig,
    pub inputs: Vec<TransactionInput>,
    pub commands: Vec<Command>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    version: u8,
    sender: Option<SuiAddress>,
    expiration: TransactionExpiration,
    gas_config: GasConfig,
    inputs: Vec<TransactionInput>,
    commands: Vec<Command>,
}

impl TransactionDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize to the portable JSON snapshot.
    pub fn snapshot(&self) -> Result<String> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            sender: self.sender,
            expiration: self.expiration,
            gas_config: self.gas_config.clone(),
            inputs: self.inputs.clone(),
            commands: self.commands.clone(),
        };
        serde_json::to_string(&snapshot).context("Failed to serialize transaction snapshot")
    }

    /// Restore from a snapshot produced by [`snapshot`](Self::snapshot).
    pub fn restore(json: &str) -> Result<Self> {
        let snapshot: Snapshot =
            serde_json::from_str(json).context("Failed to parse transaction snapshot")?;
        if snapshot.version != SNAPSHOT_VERSION {
            bail!(
                "Unsupported transaction snapshot version {} (expected {})",
                snapshot.version,
                SNAPSHOT_VERSION
            );
        }
        for (position, input) in snapshot.inputs.iter().enumerate() {
            if input.index as usize != position {
                bail!(
                    "Snapshot input at position {} has index {}",
                    position,
                    input.index
                );
            }
        }
        Ok(Self {
            sender: snapshot.sender,
            expiration: snapshot.expiration,
            gas_config: snapshot.gas_config,
            inputs: snapshot.inputs,
            commands: snapshot.commands,
        })
    }

    /// Restore a fully resolved builder from BCS transaction bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let TransactionData::V1(data) =
            bcs::from_bytes(bytes).context("Failed to decode transaction bytes")?;
        let TransactionKind::ProgrammableTransaction(ptb) = data.kind;

        let inputs = ptb
            .inputs
            .into_iter()
            .enumerate()
            .map(|(i, arg)| {
                let index = u16::try_from(i).context("Too many inputs in transaction bytes")?;
                let kind = match arg {
                    CallArg::Pure(_) => InputKind::Pure,
                    CallArg::Object(_) => InputKind::Object,
                };
                Ok(TransactionInput {
                    index,
                    kind,
                    value: InputValue::Resolved(arg),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let owner = (data.gas_data.owner != data.sender).then_some(data.gas_data.owner);
        Ok(Self {
            sender: Some(data.sender),
            expiration: data.expiration,
            gas_config: GasConfig {
                budget: Some(data.gas_data.budget),
                price: Some(data.gas_data.price),
                payment: Some(data.gas_data.payment),
                owner,
            },
            inputs,
            commands: ptb.commands,
        })
    }

    /// Gas owner: the explicit sponsor, else the sender.
    pub fn gas_owner(&self) -> Option<SuiAddress> {
        self.gas_config.owner.or(self.sender)
    }

    /// Assemble the wire form. Fails on any missing field or unresolved input.
    pub fn to_transaction_data(&self) -> Result<TransactionData> {
        let sender = self
            .sender
            .ok_or_else(|| anyhow!("Missing transaction sender"))?;
        let price = self
            .gas_config
            .price
            .ok_or_else(|| anyhow!("Missing gas price"))?;
        let budget = self
            .gas_config
            .budget
            .ok_or_else(|| anyhow!("Missing gas budget"))?;
        let payment = self
            .gas_config
            .payment
            .clone()
            .ok_or_else(|| anyhow!("Missing gas payment"))?;

        let inputs = self
            .inputs
            .iter()
            .map(|input| {
                input
                    .call_arg()
                    .cloned()
                    .ok_or_else(|| anyhow!("Input {} is not resolved", input.index))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(TransactionData::V1(TransactionDataV1 {
            kind: TransactionKind::ProgrammableTransaction(ProgrammableTransaction {
                inputs,
                commands: self.commands.clone(),
            }),
            sender,
            gas_data: GasData {
                payment,
                owner: self.gas_config.owner.unwrap_or(sender),
                price,
                budget,
            },
            expiration: self.expiration,
        }))
    }

    /// BCS bytes of the transaction data.
    pub fn build(&self) -> Result<Vec<u8>> {
        let data = self.to_transaction_data()?;
        bcs::to_bytes(&data).context("Failed to encode transaction data")
    }

    pub fn digest(&self) -> Result<TransactionDigest> {
        Ok(Self::digest_from_bytes(&self.build()?))
    }

    /// Blake2b-256 over the intent-prefixed transaction bytes.
    pub fn digest_from_bytes(bytes: &[u8]) -> TransactionDigest {
        let mut hasher = Blake2b256::new();
        hasher.update(TRANSACTION_DIGEST_INTENT);
        hasher.update(bytes);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        TransactionDigest::new(out)
    }
}
