use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use futures::future::AbortHandle;
use thiserror::Error;

use super::validation::ValidationError;
use crate::runtime::SharedSpawner;

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormId(pub u64);

impl FormId {
    pub fn next() -> Self {
        Self(FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(&'static str);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Identifies one submission attempt. Results and revert timers carrying an
/// older ticket are ignored.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SubmitTicket(pub u64);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Submitted,
    Failed,
}

impl SubmitState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SubmitState::Submitted | SubmitState::Failed)
    }
}

/// Why the form sits in [`SubmitState::Failed`]. The state itself stays a
/// single variant; this is kept alongside it for diagnostics and tests.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitFailure {
    Validation,
    Rejected,
    Transport,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationMode {
    OnChange,
    OnBlur,
    OnSubmit,
    /// Validate on blur, then on every change once the field has been touched.
    OnTouched,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FormOptions {
    pub validate_mode: ValidationMode,
    pub validate_first_error_only: bool,
    pub reset_on_success: bool,
    pub success_revert: Option<Duration>,
    pub failure_revert: Option<Duration>,
    pub validation_failure_revert: Option<Duration>,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validate_mode: ValidationMode::OnTouched,
            validate_first_error_only: true,
            reset_on_success: true,
            success_revert: Some(Duration::from_secs(15)),
            failure_revert: Some(Duration::from_secs(8)),
            validation_failure_revert: None,
        }
    }
}

impl FormOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate_mode(mut self, mode: ValidationMode) -> Self {
        self.validate_mode = mode;
        self
    }

    pub fn validate_first_error_only(mut self, value: bool) -> Self {
        self.validate_first_error_only = value;
        self
    }

    pub fn reset_on_success(mut self, value: bool) -> Self {
        self.reset_on_success = value;
        self
    }

    pub fn success_revert(mut self, delay: Option<Duration>) -> Self {
        self.success_revert = delay;
        self
    }

    pub fn failure_revert(mut self, delay: Option<Duration>) -> Self {
        self.failure_revert = delay;
        self
    }

    pub fn validation_failure_revert(mut self, delay: Option<Duration>) -> Self {
        self.validation_failure_revert = delay;
        self
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldMeta<E> {
    pub dirty: bool,
    pub touched: bool,
    pub errors: Vec<E>,
}

impl<E> Default for FieldMeta<E> {
    fn default() -> Self {
        Self {
            dirty: false,
            touched: false,
            errors: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FormSnapshot<T, E> {
    pub model: T,
    pub submit_state: SubmitState,
    pub last_failure: Option<SubmitFailure>,
    pub submit_count: u32,
    pub is_dirty: bool,
    pub is_valid: bool,
    pub field_meta: BTreeMap<FieldKey, FieldMeta<E>>,
}

impl<T, E> FormSnapshot<T, E> {
    pub fn errors(&self, key: FieldKey) -> &[E] {
        self.field_meta
            .get(&key)
            .map(|meta| meta.errors.as_slice())
            .unwrap_or_default()
    }

    pub fn is_touched(&self, key: FieldKey) -> bool {
        self.field_meta.get(&key).is_some_and(|meta| meta.touched)
    }

    pub fn touched_fields(&self) -> BTreeSet<FieldKey> {
        self.field_meta
            .iter()
            .filter_map(|(key, meta)| meta.touched.then_some(*key))
            .collect()
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum FormError {
    #[error("form state lock poisoned while {0}")]
    StatePoisoned(&'static str),
    #[error("invalid submit state transition: {from:?} -> {to:?}")]
    InvalidStateTransition { from: SubmitState, to: SubmitState },
    #[error("form submit is already in progress")]
    AlreadySubmitting,
    #[error("form has been torn down")]
    Detached,
}

pub type FormResult<T> = Result<T, FormError>;

pub(super) type SyncFieldValidatorFn<T, E> = Arc<dyn Fn(&T) -> Result<(), E> + Send + Sync>;

pub(super) struct PendingRevert {
    pub(super) ticket: SubmitTicket,
    pub(super) handle: AbortHandle,
}

pub(super) struct FormState<T, E> {
    pub(super) id: FormId,
    pub(super) initial_model: T,
    pub(super) model: T,
    pub(super) mounted: bool,
    pub(super) submit_state: SubmitState,
    pub(super) last_failure: Option<SubmitFailure>,
    pub(super) submit_count: u32,
    pub(super) ticket: SubmitTicket,
    pub(super) pending_revert: Option<PendingRevert>,
    pub(super) dirty_fields: BTreeSet<FieldKey>,
    pub(super) field_meta: BTreeMap<FieldKey, FieldMeta<E>>,
}

impl<T, E> FormState<T, E> {
    pub(super) fn ensure_meta(&mut self, key: FieldKey) -> &mut FieldMeta<E> {
        self.field_meta.entry(key).or_default()
    }

    pub(super) fn ensure_mounted(&self) -> FormResult<()> {
        if self.mounted {
            Ok(())
        } else {
            Err(FormError::Detached)
        }
    }

    pub(super) fn cancel_revert(&mut self) {
        if let Some(pending) = self.pending_revert.take() {
            pending.handle.abort();
        }
    }

    pub(super) fn clear_entries(&mut self)
    where
        T: Clone,
    {
        self.model = self.initial_model.clone();
        self.dirty_fields.clear();
        for meta in self.field_meta.values_mut() {
            meta.dirty = false;
            meta.touched = false;
            meta.errors.clear();
        }
    }
}

/// Owns a form model, its per-field metadata and the submission lifecycle.
///
/// Clones share state. All handlers run on one logical thread in practice;
/// the locks only make the controller shareable with spawned timer tasks.
#[derive(Clone)]
pub struct FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub(super) options: FormOptions,
    pub(super) state: Arc<RwLock<FormState<T, E>>>,
    pub(super) field_validators: Arc<RwLock<BTreeMap<FieldKey, Vec<SyncFieldValidatorFn<T, E>>>>>,
    pub(super) required_fields: Arc<RwLock<BTreeSet<FieldKey>>>,
    pub(super) spawner: Option<SharedSpawner>,
}

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub fn new(initial: T, options: FormOptions) -> Self {
        Self {
            options,
            state: Arc::new(RwLock::new(FormState {
                id: FormId::next(),
                initial_model: initial.clone(),
                model: initial,
                mounted: true,
                submit_state: SubmitState::Idle,
                last_failure: None,
                submit_count: 0,
                ticket: SubmitTicket(0),
                pending_revert: None,
                dirty_fields: BTreeSet::new(),
                field_meta: BTreeMap::new(),
            })),
            field_validators: Arc::new(RwLock::new(BTreeMap::new())),
            required_fields: Arc::new(RwLock::new(BTreeSet::new())),
            spawner: None,
        }
    }

    /// Revert timers are spawned here. Without a spawner terminal states stay
    /// until the next submit or reset.
    pub fn with_spawner(mut self, spawner: SharedSpawner) -> Self {
        self.spawner = Some(spawner);
        self
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn form_id(&self) -> FormResult<FormId> {
        Ok(read_lock(&self.state, "reading form id")?.id)
    }

    pub fn register_required_field<L>(&self, lens: L) -> FormResult<()>
    where
        L: super::validation::FieldLens<T>,
    {
        let mut required = write_lock(&self.required_fields, "registering required field")?;
        required.insert(lens.key());
        Ok(())
    }

    pub fn is_required<L>(&self, lens: L) -> FormResult<bool>
    where
        L: super::validation::FieldLens<T>,
    {
        Ok(read_lock(&self.required_fields, "reading required fields")?.contains(&lens.key()))
    }

    pub fn submit_state(&self) -> FormResult<SubmitState> {
        Ok(read_lock(&self.state, "reading submit state")?.submit_state)
    }

    /// The submit control must be disabled while a request is in flight.
    pub fn is_submit_enabled(&self) -> FormResult<bool> {
        let state = read_lock(&self.state, "reading submit availability")?;
        Ok(state.mounted && state.submit_state != SubmitState::Submitting)
    }

    pub fn is_mounted(&self) -> FormResult<bool> {
        Ok(read_lock(&self.state, "reading mount state")?.mounted)
    }

    /// Detaches the form: pending revert timers are cancelled and any result
    /// still in flight is discarded when it arrives.
    pub fn teardown(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "tearing down form")?;
        if !state.mounted {
            return Ok(());
        }
        state.mounted = false;
        state.cancel_revert();
        state.ticket = SubmitTicket(state.ticket.0 + 1);
        tracing::debug!(form_id = state.id.0, "form torn down");
        Ok(())
    }

    pub fn reset_to_initial(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "resetting form")?;
        state.ensure_mounted()?;
        state.cancel_revert();
        state.ticket = SubmitTicket(state.ticket.0 + 1);
        state.clear_entries();
        state.submit_state = SubmitState::Idle;
        state.last_failure = None;
        Ok(())
    }

    pub fn clear_errors(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "clearing all field errors")?;
        state.ensure_mounted()?;
        for meta in state.field_meta.values_mut() {
            meta.errors.clear();
        }
        Ok(())
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot<T, E>> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        let is_valid = state.field_meta.values().all(|meta| meta.errors.is_empty());
        Ok(FormSnapshot {
            model: state.model.clone(),
            submit_state: state.submit_state,
            last_failure: state.last_failure,
            submit_count: state.submit_count,
            is_dirty: !state.dirty_fields.is_empty(),
            is_valid,
            field_meta: state.field_meta.clone(),
        })
    }

    pub fn field_meta<L>(&self, lens: L) -> FormResult<Option<FieldMeta<E>>>
    where
        L: super::validation::FieldLens<T>,
    {
        Ok(read_lock(&self.state, "reading field meta")?
            .field_meta
            .get(&lens.key())
            .cloned())
    }
}

pub(super) fn transition_submit_state<T, E>(
    state: &mut FormState<T, E>,
    next: SubmitState,
) -> FormResult<()> {
    let current = state.submit_state;
    let allowed = matches!(
        (current, next),
        (SubmitState::Idle, SubmitState::Submitting)
            | (SubmitState::Idle, SubmitState::Failed)
            | (SubmitState::Submitting, SubmitState::Submitted)
            | (SubmitState::Submitting, SubmitState::Failed)
            | (SubmitState::Submitted, SubmitState::Submitting)
            | (SubmitState::Submitted, SubmitState::Failed)
            | (SubmitState::Failed, SubmitState::Submitting)
            | (SubmitState::Failed, SubmitState::Failed)
            | (_, SubmitState::Idle)
    );
    if !allowed {
        return Err(FormError::InvalidStateTransition {
            from: current,
            to: next,
        });
    }
    // Leaving a terminal state makes its pending revert obsolete.
    state.cancel_revert();
    state.submit_state = next;
    Ok(())
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
