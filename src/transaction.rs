//! The transaction facade.

use serde::Serialize;
use serde_json::Value;
use sui_tx_types::{
    Argument, CallArg, Command, InputValue, MoveCallTarget, ObjectArg, ObjectId, ObjectRef,
    ProgrammableMoveCall, SuiAddress, TransactionDataBuilder, TransactionDigest,
    TransactionExpiration, TypeTag,
};
use sui_tx_transport::QueryService;
use tracing::{debug, trace};

use crate::commands::{validate_arguments, validate_commands};
use crate::config::ResolverConfig;
use crate::error::{BuildError, BuildResult};
use crate::inputs::InputRegistry;
use crate::pure::{encode_pure, PureType};
use crate::resolve::resolve_transaction;
use crate::result::ResultHandle;

/// A programmable transaction under construction.
///
/// Inputs are declared with [`object`](Self::object) and the `pure*` methods,
/// commands are appended with [`add`](Self::add) or one of the command
/// helpers, and [`build`](Self::build) resolves everything against a
/// [`QueryService`] before encoding.
///
/// Once the transaction has been encoded (by `build` or `digest`) its inputs
/// and commands are frozen; gas and sender setters remain available.
#[derive(Debug, Clone, Default)]
pub struct Transaction {
    data: TransactionDataBuilder,
    config: ResolverConfig,
    sealed: bool,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Restore a transaction from [`snapshot`](Self::snapshot) output.
    ///
    /// The snapshot does not carry a [`ResolverConfig`]; the restored
    /// transaction uses the default one. See
    /// [`from_snapshot_with_config`](Self::from_snapshot_with_config).
    pub fn from_snapshot(json: &str) -> BuildResult<Self> {
        Self::from_snapshot_with_config(json, ResolverConfig::default())
    }

    pub fn from_snapshot_with_config(json: &str, config: ResolverConfig) -> BuildResult<Self> {
        let data = TransactionDataBuilder::restore(json).map_err(BuildError::Encoding)?;
        Self::restored(data, config)
    }

    /// Restore a fully resolved transaction from its encoded bytes, with the
    /// default [`ResolverConfig`].
    pub fn from_bytes(bytes: &[u8]) -> BuildResult<Self> {
        Self::from_bytes_with_config(bytes, ResolverConfig::default())
    }

    pub fn from_bytes_with_config(bytes: &[u8], config: ResolverConfig) -> BuildResult<Self> {
        let data = TransactionDataBuilder::from_bytes(bytes).map_err(BuildError::Encoding)?;
        Self::restored(data, config)
    }

    fn restored(data: TransactionDataBuilder, config: ResolverConfig) -> BuildResult<Self> {
        validate_commands(&data.commands, data.inputs.len())?;
        Ok(Self {
            data,
            config,
            sealed: false,
        })
    }

    /// Portable JSON snapshot, including inputs that are still unresolved.
    pub fn snapshot(&self) -> BuildResult<String> {
        self.data.snapshot().map_err(BuildError::Encoding)
    }

    pub fn data(&self) -> &TransactionDataBuilder {
        &self.data
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ResolverConfig) {
        self.config = config;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    // =========================================================================
    // Sender and gas
    // =========================================================================

    pub fn set_sender(&mut self, sender: SuiAddress) {
        self.data.sender = Some(sender);
    }

    /// Set the sender unless one is already set.
    pub fn set_sender_if_not_set(&mut self, sender: SuiAddress) {
        self.data.sender.get_or_insert(sender);
    }

    pub fn set_expiration(&mut self, expiration: TransactionExpiration) {
        self.data.expiration = expiration;
    }

    pub fn set_gas_price(&mut self, price: u64) {
        self.data.gas_config.price = Some(price);
    }

    pub fn set_gas_budget(&mut self, budget: u64) {
        self.data.gas_config.budget = Some(budget);
    }

    /// Pay gas with exactly these coins; resolution then skips coin selection.
    pub fn set_gas_payment(&mut self, payment: Vec<ObjectRef>) {
        self.data.gas_config.payment = Some(payment);
    }

    /// Sponsor address paying for gas.
    pub fn set_gas_owner(&mut self, owner: SuiAddress) {
        self.data.gas_config.owner = Some(owner);
    }

    /// The gas coin, usable as a command argument.
    pub fn gas(&self) -> Argument {
        Argument::GasCoin
    }

    // =========================================================================
    // Inputs
    // =========================================================================

    fn ensure_open(&self) -> BuildResult<()> {
        if self.sealed {
            return Err(BuildError::Sealed);
        }
        Ok(())
    }

    fn registry(&mut self) -> BuildResult<InputRegistry<'_>> {
        self.ensure_open()?;
        Ok(InputRegistry::new(&mut self.data.inputs))
    }

    /// Object input by id. Declaring the same id again returns the same input.
    pub fn object(&mut self, id: ObjectId) -> BuildResult<Argument> {
        self.registry()?.declare_object_id(id).map(Argument::Input)
    }

    /// Object input with a known reference; skips the ledger lookup.
    pub fn object_arg(&mut self, arg: ObjectArg) -> BuildResult<Argument> {
        self.registry()?.declare_object_arg(arg).map(Argument::Input)
    }

    /// Shorthand for a shared object with a known initial shared version.
    pub fn shared_object(
        &mut self,
        id: ObjectId,
        initial_shared_version: u64,
        mutable: bool,
    ) -> BuildResult<Argument> {
        self.object_arg(ObjectArg::SharedObject {
            id,
            initial_shared_version,
            mutable,
        })
    }

    /// Pure input whose wire type is decided during resolution, from the
    /// command or Move parameter it is passed to.
    pub fn pure(&mut self, value: impl Into<Value>) -> BuildResult<Argument> {
        self.registry()?
            .declare_pure(InputValue::Raw(value.into()))
            .map(Argument::Input)
    }

    /// Pure input encoded right away as `ty`.
    pub fn pure_typed(&mut self, value: impl Into<Value>, ty: PureType) -> BuildResult<Argument> {
        self.ensure_open()?;
        let bytes = encode_pure(&ty, &value.into())?;
        self.pure_bytes(bytes)
    }

    /// Pure input from already BCS-encoded bytes.
    pub fn pure_bytes(&mut self, bytes: Vec<u8>) -> BuildResult<Argument> {
        self.registry()?
            .declare_pure(InputValue::Resolved(CallArg::Pure(bytes)))
            .map(Argument::Input)
    }

    /// Pure input from any BCS-serializable value.
    pub fn pure_bcs<T: Serialize + ?Sized>(&mut self, value: &T) -> BuildResult<Argument> {
        let bytes = bcs::to_bytes(value).map_err(|e| BuildError::Encoding(e.into()))?;
        self.pure_bytes(bytes)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Append a command and return a handle to its result.
    pub fn add(&mut self, command: Command) -> BuildResult<ResultHandle> {
        self.ensure_open()?;
        let index = self.data.commands.len();
        let handle = u16::try_from(index)
            .map(ResultHandle::new)
            .map_err(|_| BuildError::TooManyCommands)?;
        validate_arguments(&command, index, self.data.inputs.len())?;
        trace!(index, command = command.name(), "Added command");
        self.data.commands.push(command);
        Ok(handle)
    }

    pub fn move_call(
        &mut self,
        target: MoveCallTarget,
        type_arguments: Vec<TypeTag>,
        arguments: Vec<Argument>,
    ) -> BuildResult<ResultHandle> {
        self.add(Command::MoveCall(Box::new(ProgrammableMoveCall {
            package: target.package,
            module: target.module,
            function: target.function,
            type_arguments,
            arguments,
        })))
    }

    pub fn transfer_objects(
        &mut self,
        objects: Vec<Argument>,
        address: Argument,
    ) -> BuildResult<ResultHandle> {
        self.add(Command::TransferObjects { objects, address })
    }

    pub fn split_coins(
        &mut self,
        coin: Argument,
        amounts: Vec<Argument>,
    ) -> BuildResult<ResultHandle> {
        self.add(Command::SplitCoins { coin, amounts })
    }

    pub fn merge_coins(
        &mut self,
        destination: Argument,
        sources: Vec<Argument>,
    ) -> BuildResult<ResultHandle> {
        self.add(Command::MergeCoins {
            destination,
            sources,
        })
    }

    pub fn make_move_vec(
        &mut self,
        type_arg: Option<TypeTag>,
        elements: Vec<Argument>,
    ) -> BuildResult<ResultHandle> {
        self.add(Command::MakeMoveVec { type_arg, elements })
    }

    pub fn publish(
        &mut self,
        modules: Vec<Vec<u8>>,
        dependencies: Vec<ObjectId>,
    ) -> BuildResult<ResultHandle> {
        self.add(Command::Publish {
            modules,
            dependencies,
        })
    }

    pub fn upgrade(
        &mut self,
        modules: Vec<Vec<u8>>,
        dependencies: Vec<ObjectId>,
        package: ObjectId,
        ticket: Argument,
    ) -> BuildResult<ResultHandle> {
        self.add(Command::Upgrade {
            modules,
            dependencies,
            package,
            ticket,
        })
    }

    // =========================================================================
    // Resolution and encoding
    // =========================================================================

    /// Resolve all inputs and gas configuration against `client`.
    pub async fn resolve<Q>(&mut self, client: &Q) -> BuildResult<()>
    where
        Q: QueryService + ?Sized,
    {
        resolve_transaction(&mut self.data, client, &self.config).await
    }

    /// Resolve, then encode to BCS transaction bytes.
    pub async fn build<Q>(&mut self, client: &Q) -> BuildResult<Vec<u8>>
    where
        Q: QueryService + ?Sized,
    {
        self.resolve(client).await?;
        let bytes = self.data.build().map_err(BuildError::Encoding)?;
        self.sealed = true;
        debug!(
            bytes = bytes.len(),
            inputs = self.data.inputs.len(),
            commands = self.data.commands.len(),
            "Built transaction"
        );
        Ok(bytes)
    }

    /// Resolve, encode, and return the transaction digest.
    pub async fn digest<Q>(&mut self, client: &Q) -> BuildResult<TransactionDigest>
    where
        Q: QueryService + ?Sized,
    {
        let bytes = self.build(client).await?;
        Ok(TransactionDataBuilder::digest_from_bytes(&bytes))
    }
}
