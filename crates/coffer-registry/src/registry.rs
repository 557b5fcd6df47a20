//! The registry: committed state, audit journal and the commit path
//!
//! Mutating operations live in `operations.rs`, read-side queries in
//! `queries.rs`. Both are `impl Registry` blocks over the type defined here.

use coffer_core::{
    AccessRequirement, CallContext, ConfigError, EntityKind, OrdinalTime, RegistryConfig,
    RegistryError,
};

use crate::authorization::AccessResolution;
use crate::journal::AuditJournal;
use crate::staging::StagedWrites;
use crate::state::RegistryState;

/// Tiered access registry for vaults, assets and their revision history
///
/// The host serializes calls; the registry assumes no two calls overlap and
/// makes each call all-or-nothing. Wrap it in [`crate::SharedRegistry`] when
/// the host cannot provide that ordering.
#[derive(Debug, Clone)]
pub struct Registry {
    pub(crate) config: RegistryConfig,
    pub(crate) state: RegistryState,
    pub(crate) journal: AuditJournal,
    pub(crate) last_committed: OrdinalTime,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            config: RegistryConfig::default(),
            state: RegistryState::default(),
            journal: AuditJournal::default(),
            last_committed: OrdinalTime::ZERO,
        }
    }
}

impl Registry {
    /// Create an empty registry with a validated configuration
    pub fn new(config: RegistryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Active configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Committed state
    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    /// Audit journal
    pub fn journal(&self) -> &AuditJournal {
        &self.journal
    }

    /// Highest ordinal time of any committed call
    pub fn last_committed(&self) -> OrdinalTime {
        self.last_committed
    }

    /// Apply a fully-checked buffer and journal its facts
    pub(crate) fn commit(&mut self, ctx: &CallContext, staged: StagedWrites) {
        if ctx.at < self.last_committed {
            tracing::warn!(
                caller = %ctx.caller,
                at = %ctx.at,
                last_committed = %self.last_committed,
                "Host supplied an ordinal time behind the last committed call"
            );
        }
        let facts = staged.apply(&mut self.state);
        self.last_committed = self.last_committed.max(ctx.at);
        if !self.config.journal.enabled {
            return;
        }
        for fact in facts {
            let entry = self.journal.append(ctx, fact);
            tracing::trace!(
                sequence = entry.sequence,
                fact = entry.fact.kind(),
                "Journaled registry fact"
            );
        }
    }

    /// Fail with `NotAuthorized` unless `resolution` meets `required`
    pub(crate) fn require(
        ctx: &CallContext,
        kind: EntityKind,
        id: &str,
        resolution: AccessResolution,
        required: AccessRequirement,
    ) -> Result<(), RegistryError> {
        if resolution.satisfies(required) {
            return Ok(());
        }
        tracing::warn!(
            caller = %ctx.caller,
            entity = %kind,
            id,
            required = %required,
            effective = ?resolution.effective_tier(),
            "Authorization denied"
        );
        Err(RegistryError::not_authorized(kind, id, &ctx.caller, required))
    }

    /// Fail with `InvalidParams` when a text field is empty or too long
    pub(crate) fn check_text(
        &self,
        field: &str,
        value: &str,
        max_len: usize,
        allow_empty: bool,
    ) -> Result<(), RegistryError> {
        if !allow_empty && value.trim().is_empty() {
            return Err(RegistryError::invalid_params(format!(
                "{field} must not be empty"
            )));
        }
        let len = value.chars().count();
        if len > max_len {
            return Err(RegistryError::invalid_params(format!(
                "{field} is {len} chars, limit is {max_len}"
            )));
        }
        Ok(())
    }

    /// Fail with `InvalidParams` when an optional text field is too long
    pub(crate) fn check_optional_text(
        &self,
        field: &str,
        value: Option<&str>,
    ) -> Result<(), RegistryError> {
        match value {
            Some(value) => self.check_text(field, value, self.config.limits.max_text_len, true),
            None => Ok(()),
        }
    }
}
