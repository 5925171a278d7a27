use gpui::SharedString;

use super::controller::{FieldKey, FormController, FormResult, read_lock};
use super::validation::{FieldLens, ValidationError};
use crate::i18n::I18nManager;

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    /// First error of the field, hidden until the field was blurred or a
    /// submit was attempted.
    pub fn field_error_for_display<L>(&self, lens: L) -> FormResult<Option<E>>
    where
        L: FieldLens<T>,
    {
        self.display_error(lens.key())
    }

    pub fn field_error_message<L>(
        &self,
        lens: L,
        i18n: &I18nManager,
    ) -> FormResult<Option<SharedString>>
    where
        L: FieldLens<T>,
    {
        Ok(self
            .display_error(lens.key())?
            .map(|error| error.message(i18n)))
    }

    pub(crate) fn display_error(&self, key: FieldKey) -> FormResult<Option<E>> {
        let state = read_lock(&self.state, "reading display error")?;
        let Some(meta) = state.field_meta.get(&key) else {
            return Ok(None);
        };
        if !meta.touched && state.submit_count == 0 {
            return Ok(None);
        }
        Ok(meta.errors.first().cloned())
    }
}
