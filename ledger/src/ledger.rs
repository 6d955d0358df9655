//! The approval ledger: pre-approved transfers, consumed when they execute.
//!
//! A bound registry approves a `(from, to, amount)` transfer of its asset
//! before it happens. Approvals are counted, so approving the same tuple
//! twice allows two transfers. When the transfer executes the registry calls
//! [`ApprovalLedger::on_transfer`], which consumes one approval if there is
//! one and otherwise does nothing: forced or exempt transfers are never
//! blocked here. The gating decision itself is [`ApprovalLedger::check_approved`].
//!
//! Explicit revocation ([`ApprovalLedger::unapprove`]) is strict and fails
//! with [`LedgerError::NotApproved`] when there is nothing to revoke.

use tracing::{debug, info, trace, warn};

use permit_crypto::compute_key;
use permit_types::{Address, Amount, AssetId, RegistryId, TransferKey};

use crate::authority::RegistryAuthority;
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::event::{ApprovalEvent, EventBus};
use crate::snapshot::TableSnapshot;
use crate::table::{ApprovalBatch, ApprovalTable};

/// Summary statistics for the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerStats {
    /// Entries ever created, including those at zero.
    pub entries: usize,
    /// Sum of all outstanding approvals.
    pub outstanding: u128,
}

#[derive(Clone, Copy, Debug)]
enum Op {
    Approve,
    Unapprove,
}

/// Approval bookkeeping for every registry bound to this gate.
pub struct ApprovalLedger<A> {
    table: ApprovalTable,
    authority: A,
    events: EventBus,
    config: LedgerConfig,
}

impl<A: RegistryAuthority> ApprovalLedger<A> {
    /// Module identifier used by registries for discovery.
    pub const NAME: &'static str = "ApproveTransferModule";

    pub fn new(authority: A) -> Self {
        Self {
            table: ApprovalTable::new(),
            authority,
            events: EventBus::new(),
            config: LedgerConfig::default(),
        }
    }

    /// Build a ledger with an explicit config, rejecting invalid settings.
    pub fn with_config(authority: A, config: LedgerConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(authority)
        })
    }

    // ── Identity ────────────────────────────────────────────────────────

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// The module places no preconditions on the registries that bind it.
    pub fn can_bind(&self, _registry: &RegistryId) -> bool {
        true
    }

    /// The module needs no per-registry setup before use.
    pub fn is_plug_and_play(&self) -> bool {
        true
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn authority(&self) -> &A {
        &self.authority
    }

    pub fn authority_mut(&mut self) -> &mut A {
        &mut self.authority
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn table(&self) -> &ApprovalTable {
        &self.table
    }

    /// Register a listener for approval events.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&ApprovalEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Record one approval of `from → to` for `amount` of the caller's asset.
    pub fn approve(
        &mut self,
        caller: &RegistryId,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let asset = self.authorize(caller)?;
        self.apply(caller, &asset, Op::Approve, &[*from], &[*to], &[amount])?;
        Ok(())
    }

    /// Revoke one outstanding approval.
    pub fn unapprove(
        &mut self,
        caller: &RegistryId,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let asset = self.authorize(caller)?;
        self.apply(caller, &asset, Op::Unapprove, &[*from], &[*to], &[amount])?;
        Ok(())
    }

    /// [`approve`](Self::approve) each `(froms[i], tos[i], amounts[i])` in
    /// order. Either every entry lands or none does.
    pub fn batch_approve(
        &mut self,
        caller: &RegistryId,
        froms: &[Address],
        tos: &[Address],
        amounts: &[Amount],
    ) -> Result<(), LedgerError> {
        let asset = self.authorize(caller)?;
        self.check_batch_shape(froms, tos, amounts)?;
        let applied = self.apply(caller, &asset, Op::Approve, froms, tos, amounts)?;
        info!(registry = %caller, entries = applied, "batch approval committed");
        Ok(())
    }

    /// [`unapprove`](Self::unapprove) each entry in order. The first entry
    /// with nothing to revoke fails the whole batch and nothing is committed.
    pub fn batch_unapprove(
        &mut self,
        caller: &RegistryId,
        froms: &[Address],
        tos: &[Address],
        amounts: &[Amount],
    ) -> Result<(), LedgerError> {
        let asset = self.authorize(caller)?;
        self.check_batch_shape(froms, tos, amounts)?;
        let applied = self.apply(caller, &asset, Op::Unapprove, froms, tos, amounts)?;
        info!(registry = %caller, entries = applied, "batch revocation committed");
        Ok(())
    }

    /// Transfer hook: consume one matching approval if present.
    ///
    /// A transfer with no outstanding approval succeeds without any state
    /// change, so exempt and forced transfers pass through.
    pub fn on_transfer(
        &mut self,
        caller: &RegistryId,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let asset = self.authorize(caller)?;
        let key = compute_key(from, to, amount, &asset);
        let mut batch = self.table.batch();
        match batch.decrement(caller, &key) {
            Some(remaining) => {
                debug!(registry = %caller, key = %key, remaining, "approval consumed by transfer");
                batch.record(ApprovalEvent::removed(*from, *to, amount, asset));
            }
            None => {
                debug!(registry = %caller, key = %key, "transfer executed without approval");
            }
        }
        let events = batch.commit();
        emit_all(&self.events, &events);
        Ok(())
    }

    /// Mint hook. Minting is not gated; only the caller is checked.
    pub fn on_mint(&self, caller: &RegistryId, to: &Address, amount: Amount) -> Result<(), LedgerError> {
        self.authorize(caller)?;
        trace!(registry = %caller, to = %to, amount = %amount, "mint ignored by approval gate");
        Ok(())
    }

    /// Burn hook. Burning is not gated; only the caller is checked.
    pub fn on_burn(&self, caller: &RegistryId, from: &Address, amount: Amount) -> Result<(), LedgerError> {
        self.authorize(caller)?;
        trace!(registry = %caller, from = %from, amount = %amount, "burn ignored by approval gate");
        Ok(())
    }

    /// Replace the table with the contents of a verified snapshot.
    pub fn restore(&mut self, snapshot: TableSnapshot) -> Result<(), LedgerError> {
        let table = snapshot.into_table()?;
        info!(entries = table.len(), "approval table restored from snapshot");
        self.table = table;
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Whether `registry` has an outstanding approval for this transfer.
    /// A registry with no bound asset has none.
    pub fn check_approved(
        &self,
        registry: &RegistryId,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> bool {
        self.transfer_key(registry, from, to, amount)
            .is_some_and(|key| self.table.is_approved(registry, &key))
    }

    /// The key `registry` would use for this transfer, if it is bound.
    pub fn transfer_key(
        &self,
        registry: &RegistryId,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Option<TransferKey> {
        self.authority
            .bound_asset(registry)
            .map(|asset| compute_key(from, to, amount, &asset))
    }

    pub fn is_approved(&self, registry: &RegistryId, key: &TransferKey) -> bool {
        self.table.is_approved(registry, key)
    }

    pub fn approval_count(&self, registry: &RegistryId, key: &TransferKey) -> u64 {
        self.table.count(registry, key)
    }

    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot::capture(&self.table)
    }

    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            entries: self.table.len(),
            outstanding: self.table.total_outstanding(),
        }
    }

    // ── Internals ───────────────────────────────────────────────────────

    /// Resolve the caller's asset, rejecting unauthorized or unbound callers.
    fn authorize(&self, caller: &RegistryId) -> Result<AssetId, LedgerError> {
        if !self.authority.is_authorized_caller(caller) {
            warn!(caller = %caller, "rejected unauthorized caller");
            return Err(LedgerError::Unauthorized(*caller));
        }
        self.authority.bound_asset(caller).ok_or_else(|| {
            warn!(caller = %caller, "rejected caller with no bound asset");
            LedgerError::Unauthorized(*caller)
        })
    }

    fn check_batch_shape(
        &self,
        froms: &[Address],
        tos: &[Address],
        amounts: &[Amount],
    ) -> Result<(), LedgerError> {
        if froms.len() != tos.len() || froms.len() != amounts.len() {
            return Err(LedgerError::LengthMismatch {
                froms: froms.len(),
                tos: tos.len(),
                amounts: amounts.len(),
            });
        }
        match self.config.max_batch_len {
            Some(max) if froms.len() > max => Err(LedgerError::BatchTooLarge {
                len: froms.len(),
                max,
            }),
            _ => Ok(()),
        }
    }

    /// Stage `op` for every entry, then commit and emit. Any failure drops
    /// the staged batch, leaving the table and the event stream untouched.
    fn apply(
        &mut self,
        caller: &RegistryId,
        asset: &AssetId,
        op: Op,
        froms: &[Address],
        tos: &[Address],
        amounts: &[Amount],
    ) -> Result<usize, LedgerError> {
        let mut batch = self.table.batch();
        for ((from, to), amount) in froms.iter().zip(tos).zip(amounts) {
            stage(&mut batch, caller, asset, op, from, to, *amount)?;
        }
        let events = batch.commit();
        emit_all(&self.events, &events);
        Ok(events.len())
    }
}

fn stage(
    batch: &mut ApprovalBatch<'_>,
    caller: &RegistryId,
    asset: &AssetId,
    op: Op,
    from: &Address,
    to: &Address,
    amount: Amount,
) -> Result<(), LedgerError> {
    let key = compute_key(from, to, amount, asset);
    match op {
        Op::Approve => {
            let count = batch.increment(caller, &key)?;
            debug!(registry = %caller, key = %key, count, "approval granted");
            batch.record(ApprovalEvent::granted(*from, *to, amount, *asset));
        }
        Op::Unapprove => {
            let count = batch.decrement(caller, &key).ok_or(LedgerError::NotApproved)?;
            debug!(registry = %caller, key = %key, count, "approval revoked");
            batch.record(ApprovalEvent::removed(*from, *to, amount, *asset));
        }
    }
    Ok(())
}

fn emit_all(bus: &EventBus, events: &[ApprovalEvent]) {
    for event in events {
        bus.emit(event);
    }
}
