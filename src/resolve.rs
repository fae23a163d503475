//! Input and gas resolution.
//!
//! Turns a transaction with raw inputs into one that can be encoded:
//!
//! 1. Check sender and budget; fetch the reference gas price if unset.
//! 2. Check every argument reference, then classify command arguments.
//!    Pure arguments of commands with fixed encodings are encoded on the
//!    spot, object arguments are queued, and move calls with raw inputs are
//!    queued for their signatures.
//! 3. Fetch each distinct queued signature (concurrently) and encode or queue
//!    the call's raw arguments from the parameter types.
//! 4. Look up every queued object in batches and write its reference.
//!    Shared objects are mutable if any use of the input needs `&mut`.
//! 5. If no gas payment is set, pay with every gas coin of the gas owner that
//!    is not also an owned-object input, up to the ledger's payment limit.
//!    The coin listing runs concurrently with steps 3 and 4.
//!
//! Already resolved inputs are never touched, so running resolution again on
//! a resolved transaction changes nothing.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use futures::future::try_join_all;
use serde_json::Value;
use sui_tx_types::{
    Argument, CallArg, Command, InputKind, InputValue, MoveCallTarget, NormalizedFunction,
    NormalizedType, ObjectArg, ObjectData, ObjectId, ObjectResponse, TransactionDataBuilder,
    TransactionInput,
};
use sui_tx_transport::QueryService;
use tracing::{debug, trace};

use crate::commands::{argument_encodings, validate_arguments, ArgumentEncoding};
use crate::config::ResolverConfig;
use crate::error::{BuildError, BuildResult};
use crate::pure::{encode_pure, infer_pure_type, PureType};

/// An input waiting for its object reference.
#[derive(Debug, Clone)]
struct ObjectRequest {
    input: u16,
    id: ObjectId,
    /// Parameter type the input is passed as, for move-call arguments.
    param: Option<NormalizedType>,
}

impl ObjectRequest {
    fn needs_mutable(&self) -> bool {
        self.param
            .as_ref()
            .is_some_and(NormalizedType::is_mutable_reference)
    }
}

/// Resolve every input of `data` and fill in gas price and payment.
pub async fn resolve_transaction<Q>(
    data: &mut TransactionDataBuilder,
    client: &Q,
    config: &ResolverConfig,
) -> BuildResult<()>
where
    Q: QueryService + ?Sized,
{
    // Step 1: preconditions.
    let sender = data.sender.ok_or(BuildError::MissingSender)?;
    if data.gas_config.budget.is_none() {
        return Err(BuildError::MissingGasBudget);
    }
    if data.gas_config.price.is_none() {
        let price = client
            .get_reference_gas_price()
            .await
            .map_err(BuildError::Remote)?;
        debug!(price, "Fetched reference gas price");
        data.gas_config.price = Some(price);
    }

    // Step 2: classification.
    let mut requests = Vec::new();
    let move_calls = classify_commands(data, &mut requests)?;
    debug!(
        commands = data.commands.len(),
        move_calls = move_calls.len(),
        objects = requests.len(),
        "Classified command arguments"
    );

    // Steps 3-4, with the gas coin listing alongside.
    let coin_owner = data
        .gas_config
        .payment
        .is_none()
        .then(|| data.gas_owner().unwrap_or(sender));
    let coins = async {
        match coin_owner {
            Some(owner) => client
                .get_coins(&owner, &config.gas_coin_type)
                .await
                .map(Some),
            None => Ok(None),
        }
    };
    let inputs = async {
        resolve_move_calls(data, client, &move_calls, &mut requests).await?;
        resolve_objects(&mut data.inputs, client, config, &requests).await
    };
    let (inputs, coins) = futures::join!(inputs, coins);
    inputs?;
    let coins = coins.map_err(BuildError::Remote)?;

    // Step 5: gas payment.
    if let (Some(owner), Some(coins)) = (coin_owner, coins) {
        let used: HashSet<ObjectId> = data
            .inputs
            .iter()
            .filter_map(|input| input.owned_object().map(|r| r.object_id))
            .collect();
        let total = coins.len();
        let payment: Vec<_> = coins
            .iter()
            .filter(|coin| !used.contains(&coin.coin_object_id))
            .take(config.max_gas_payment_objects)
            .map(|coin| coin.object_ref())
            .collect();
        debug!(
            owner = %owner.short(),
            found = total,
            selected = payment.len(),
            "Selected gas payment"
        );
        if payment.is_empty() {
            return Err(BuildError::NoGasCoins { owner });
        }
        data.gas_config.payment = Some(payment);
    }

    if let Some(input) = data.inputs.iter().find(|input| !input.is_resolved()) {
        return Err(BuildError::UnexpectedInputFormat { input: input.index });
    }
    Ok(())
}

fn input_mut(inputs: &mut [TransactionInput], index: u16) -> BuildResult<&mut TransactionInput> {
    inputs
        .get_mut(index as usize)
        .ok_or(BuildError::MissingInput { index })
}

/// Raw value of an input, or `None` once resolved.
fn unresolved(inputs: &[TransactionInput], index: u16) -> BuildResult<Option<Value>> {
    inputs
        .get(index as usize)
        .map(|input| input.raw().cloned())
        .ok_or(BuildError::MissingInput { index })
}

fn resolve_pure(input: &mut TransactionInput, ty: &PureType, value: &Value) -> BuildResult<()> {
    let bytes = encode_pure(ty, value)?;
    trace!(input = input.index, wire_type = %ty, "Resolved pure input");
    input.kind = InputKind::Pure;
    input.resolve(CallArg::Pure(bytes));
    Ok(())
}

fn object_request(
    input: u16,
    value: &Value,
    param: Option<NormalizedType>,
) -> BuildResult<ObjectRequest> {
    let id = value
        .as_str()
        .and_then(|s| s.parse::<ObjectId>().ok())
        .ok_or_else(|| BuildError::ExpectedObjectId {
            input,
            value: value.clone(),
        })?;
    Ok(ObjectRequest { input, id, param })
}

/// Step 2. Returns the indexes of move calls that need their signature.
fn classify_commands(
    data: &mut TransactionDataBuilder,
    requests: &mut Vec<ObjectRequest>,
) -> BuildResult<Vec<usize>> {
    let mut move_calls = Vec::new();
    for (command_index, command) in data.commands.iter().enumerate() {
        validate_arguments(command, command_index, data.inputs.len())?;
        let Some(encodings) = argument_encodings(command) else {
            let mut needs_signature = false;
            for arg in command.arguments() {
                if let Argument::Input(index) = arg {
                    needs_signature |= unresolved(&data.inputs, index)?.is_some();
                }
            }
            if needs_signature {
                move_calls.push(command_index);
            }
            continue;
        };

        for (arg, encoding) in encodings {
            let Argument::Input(index) = arg else {
                continue;
            };
            let Some(value) = unresolved(&data.inputs, index)? else {
                continue;
            };
            match encoding {
                ArgumentEncoding::Pure(ty) => {
                    resolve_pure(input_mut(&mut data.inputs, index)?, &ty, &value)?
                }
                ArgumentEncoding::Object => {
                    requests.push(object_request(index, &value, None)?)
                }
            }
        }
    }
    Ok(move_calls)
}

/// Step 3.
async fn resolve_move_calls<Q>(
    data: &mut TransactionDataBuilder,
    client: &Q,
    move_calls: &[usize],
    requests: &mut Vec<ObjectRequest>,
) -> BuildResult<()>
where
    Q: QueryService + ?Sized,
{
    if move_calls.is_empty() {
        return Ok(());
    }

    let calls: Vec<(usize, MoveCallTarget, Vec<Argument>)> = move_calls
        .iter()
        .filter_map(|&index| match &data.commands[index] {
            Command::MoveCall(call) => Some((index, call.target(), call.arguments.clone())),
            _ => None,
        })
        .collect();

    let targets: Vec<MoveCallTarget> = calls
        .iter()
        .map(|(_, target, _)| target.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let functions = try_join_all(
        targets
            .iter()
            .map(|target| client.get_normalized_move_function(target)),
    )
    .await
    .map_err(BuildError::Remote)?;
    let signatures: HashMap<&MoveCallTarget, NormalizedFunction> =
        targets.iter().zip(functions).collect();
    debug!(
        calls = calls.len(),
        signatures = signatures.len(),
        "Fetched move call signatures"
    );

    for (command, target, arguments) in &calls {
        let Some(function) = signatures.get(target) else {
            continue;
        };
        let params = function.caller_parameters();
        if params.len() != arguments.len() {
            return Err(BuildError::ArgumentCountMismatch {
                command: *command,
                expected: params.len(),
                actual: arguments.len(),
            });
        }

        for (position, (arg, param)) in arguments.iter().zip(params).enumerate() {
            let Argument::Input(index) = *arg else {
                continue;
            };
            let Some(value) = unresolved(&data.inputs, index)? else {
                continue;
            };
            if let Some(ty) = infer_pure_type(param, Some(&value))? {
                resolve_pure(input_mut(&mut data.inputs, index)?, &ty, &value)?;
            } else if param.is_object_like() {
                requests.push(object_request(index, &value, Some(param.clone()))?);
            } else {
                return Err(BuildError::UnknownCallArgType {
                    command: *command,
                    argument: position,
                    param: param.to_string(),
                    value,
                });
            }
        }
    }
    Ok(())
}

/// Step 4.
async fn resolve_objects<Q>(
    inputs: &mut [TransactionInput],
    client: &Q,
    config: &ResolverConfig,
    requests: &[ObjectRequest],
) -> BuildResult<()>
where
    Q: QueryService + ?Sized,
{
    if requests.is_empty() {
        return Ok(());
    }

    let mut seen = HashSet::new();
    let ids: Vec<ObjectId> = requests
        .iter()
        .map(|request| request.id)
        .filter(|id| seen.insert(*id))
        .collect();

    let batches = try_join_all(
        ids.chunks(config.max_objects_per_fetch.max(1))
            .map(|chunk| client.multi_get_objects(chunk)),
    )
    .await
    .map_err(BuildError::Remote)?;
    let responses: Vec<ObjectResponse> = batches.into_iter().flatten().collect();
    debug!(
        requested = ids.len(),
        batches = ids.len().div_ceil(config.max_objects_per_fetch.max(1)),
        "Fetched objects"
    );

    let mut found: HashMap<ObjectId, ObjectData> = HashMap::new();
    for response in responses {
        if let ObjectResponse::Exists(data) = response {
            found.insert(data.object_id, data);
        }
    }
    let missing: Vec<ObjectId> = ids
        .iter()
        .filter(|id| !found.contains_key(id))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(BuildError::ObjectsNotFound { ids: missing });
    }

    // All uses of an input are decided together.
    let mut by_input: BTreeMap<u16, Vec<&ObjectRequest>> = BTreeMap::new();
    for request in requests {
        by_input.entry(request.input).or_default().push(request);
    }

    for (index, uses) in by_input {
        let id = uses[0].id;
        let object = &found[&id];
        let arg = match object.owner.initial_shared_version() {
            Some(initial_shared_version) => ObjectArg::SharedObject {
                id,
                initial_shared_version,
                mutable: uses.iter().any(|request| request.needs_mutable()),
            },
            None => ObjectArg::ImmOrOwnedObject(object.object_ref()),
        };
        trace!(input = index, object = %id.short(), ?arg, "Resolved object input");
        let input = input_mut(inputs, index)?;
        input.kind = InputKind::Object;
        input.value = InputValue::Resolved(CallArg::Object(arg));
    }
    Ok(())
}
