use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures::future::{AbortHandle, Abortable};
use futures::task::SpawnExt;
use futures_timer::Delay;

use super::controller::{
    FormController, FormResult, FormState, PendingRevert, SubmitFailure, SubmitState,
    SubmitTicket, transition_submit_state, write_lock,
};
use super::validation::ValidationError;

/// Classifies a submit callback error into the failure reason kept next to
/// [`SubmitState::Failed`].
pub trait SubmitErrorKind {
    fn failure(&self) -> SubmitFailure;
}

#[derive(Debug)]
pub enum SubmitOutcome<R, X> {
    /// Validation failed; the callback was not invoked.
    Invalid,
    Accepted(R),
    Rejected(X),
    /// The form was torn down or reset while the callback was running.
    Discarded,
}

impl<R, X> SubmitOutcome<R, X> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted(_))
    }
}

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    /// Validates every field, then hands the model to `f` exactly once if no
    /// field has an error. Returns [`FormError::AlreadySubmitting`] without
    /// calling `f` while another submission is in flight.
    ///
    /// [`FormError::AlreadySubmitting`]: super::FormError::AlreadySubmitting
    pub async fn submit_with<F, Fut, R, X>(&self, f: F) -> FormResult<SubmitOutcome<R, X>>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<R, X>>,
        X: SubmitErrorKind,
    {
        let ticket = {
            let mut state = write_lock(&self.state, "preparing submit")?;
            state.ensure_mounted()?;
            if state.submit_state == SubmitState::Submitting {
                return Err(super::FormError::AlreadySubmitting);
            }
            state.cancel_revert();
            state.submit_count = state.submit_count.saturating_add(1);
            state.ticket = SubmitTicket(state.ticket.0 + 1);
            state.ticket
        };

        let errors = self.collect_errors()?;
        let required = super::controller::read_lock(
            &self.required_fields,
            "reading required fields for submit",
        )?
        .clone();

        let model = {
            let mut state = write_lock(&self.state, "applying submit validation")?;
            state.ensure_mounted()?;
            for key in &required {
                state.ensure_meta(*key).touched = true;
            }
            let mut valid = true;
            for (key, field_errors) in errors {
                valid &= field_errors.is_empty();
                let meta = state.ensure_meta(key);
                meta.touched = true;
                meta.errors = field_errors;
            }

            if !valid {
                transition_submit_state(&mut state, SubmitState::Failed)?;
                state.last_failure = Some(SubmitFailure::Validation);
                tracing::debug!(form_id = state.id.0, "submit blocked by validation errors");
                self.schedule_revert(&mut state, self.options.validation_failure_revert);
                return Ok(SubmitOutcome::Invalid);
            }

            transition_submit_state(&mut state, SubmitState::Submitting)?;
            state.last_failure = None;
            tracing::debug!(form_id = state.id.0, ticket = ticket.0, "submitting form");
            state.model.clone()
        };

        let result = f(model).await;

        let mut state = write_lock(&self.state, "completing submit")?;
        if !state.mounted || state.ticket != ticket {
            tracing::debug!(
                form_id = state.id.0,
                ticket = ticket.0,
                "discarding submit result for detached form"
            );
            return Ok(SubmitOutcome::Discarded);
        }

        match result {
            Ok(receipt) => {
                transition_submit_state(&mut state, SubmitState::Submitted)?;
                if self.options.reset_on_success {
                    state.clear_entries();
                }
                self.schedule_revert(&mut state, self.options.success_revert);
                Ok(SubmitOutcome::Accepted(receipt))
            }
            Err(error) => {
                transition_submit_state(&mut state, SubmitState::Failed)?;
                state.last_failure = Some(error.failure());
                self.schedule_revert(&mut state, self.options.failure_revert);
                Ok(SubmitOutcome::Rejected(error))
            }
        }
    }

    /// Arms the auto-revert for the terminal state just entered. The timer
    /// only holds a weak reference to the form and re-checks the ticket.
    fn schedule_revert(&self, state: &mut FormState<T, E>, delay: Option<Duration>) {
        let (Some(delay), Some(spawner)) = (delay, self.spawner.as_ref()) else {
            return;
        };

        let ticket = state.ticket;
        let shared = Arc::downgrade(&self.state);
        let (handle, registration) = AbortHandle::new_pair();
        let timer = Abortable::new(
            async move {
                Delay::new(delay).await;
                if let Some(shared) = shared.upgrade() {
                    revert_to_idle(&shared, ticket);
                }
            },
            registration,
        );

        match spawner.spawn(async move {
            let _ = timer.await;
        }) {
            Ok(()) => state.pending_revert = Some(PendingRevert { ticket, handle }),
            Err(error) => {
                tracing::warn!(%error, "failed to spawn auto-revert timer");
            }
        }
    }
}

fn revert_to_idle<T, E>(shared: &RwLock<FormState<T, E>>, ticket: SubmitTicket) {
    let mut state = match shared.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    let current = state
        .pending_revert
        .as_ref()
        .is_some_and(|pending| pending.ticket == ticket);
    if !state.mounted || !current || !state.submit_state.is_terminal() {
        return;
    }
    state.pending_revert = None;
    state.submit_state = SubmitState::Idle;
    state.last_failure = None;
    tracing::debug!(form_id = state.id.0, ticket = ticket.0, "submit banner reverted to idle");
}
