use std::collections::BTreeMap;
use std::sync::Arc;

use gpui::SharedString;

use super::controller::{
    FieldKey, FormController, FormResult, SyncFieldValidatorFn, ValidationMode, read_lock,
    write_lock,
};
use crate::i18n::I18nManager;

/// A field-level validation failure that can be rendered in either locale.
pub trait ValidationError: Clone + Send + Sync + 'static {
    fn message_key(&self) -> &'static str;

    fn message_params(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn message(&self, i18n: &I18nManager) -> SharedString {
        let params = self.message_params();
        let borrowed = params
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .collect::<Vec<_>>();
        i18n.t_with(self.message_key(), &borrowed)
    }
}

pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    type Value: Clone + PartialEq + Send + Sync + 'static;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);
}

pub trait FormModel: Clone + Send + Sync + 'static {
    type Fields;

    fn fields() -> Self::Fields;
    fn field_keys() -> &'static [FieldKey];
}

pub trait FieldValidator<T, L, E>: Send + Sync
where
    L: FieldLens<T>,
    E: ValidationError,
{
    fn validate(&self, model: &T, value: &L::Value) -> Result<(), E>;
}

impl<T, L, E, F> FieldValidator<T, L, E> for F
where
    L: FieldLens<T>,
    E: ValidationError,
    F: for<'a> Fn(&'a T, &'a L::Value) -> Result<(), E> + Send + Sync,
{
    fn validate(&self, model: &T, value: &L::Value) -> Result<(), E> {
        (self)(model, value)
    }
}

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub fn register_field_validator<L, V>(&self, lens: L, validator: V) -> FormResult<()>
    where
        L: FieldLens<T>,
        V: FieldValidator<T, L, E> + 'static,
    {
        let key = lens.key();
        let validator = Arc::new(validator);
        let wrapped: SyncFieldValidatorFn<T, E> =
            Arc::new(move |model: &T| validator.validate(model, lens.get(model)));
        let mut validators = write_lock(&self.field_validators, "registering field validator")?;
        validators.entry(key).or_default().push(wrapped);
        Ok(())
    }

    /// Change handler: stores the value, then validates the field if the
    /// validation mode asks for it. Other fields' errors are left alone.
    pub fn set<L>(&self, lens: L, value: L::Value) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        let touched = {
            let mut state = write_lock(&self.state, "writing form model")?;
            state.ensure_mounted()?;
            lens.set(&mut state.model, value);
            let is_dirty = lens.get(&state.model) != lens.get(&state.initial_model);
            if is_dirty {
                state.dirty_fields.insert(key);
            } else {
                state.dirty_fields.remove(&key);
            }
            let meta = state.ensure_meta(key);
            meta.dirty = is_dirty;
            meta.touched
        };

        let live = match self.options.validate_mode {
            ValidationMode::OnChange => true,
            ValidationMode::OnTouched => touched,
            ValidationMode::OnBlur | ValidationMode::OnSubmit => false,
        };
        if live {
            let _ = self.validate_field_by_key(key)?;
        }
        Ok(())
    }

    /// Blur handler: marks the field touched and runs its validators.
    pub fn touch<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        {
            let mut state = write_lock(&self.state, "touching field")?;
            state.ensure_mounted()?;
            state.ensure_meta(key).touched = true;
        }

        if matches!(
            self.options.validate_mode,
            ValidationMode::OnBlur | ValidationMode::OnTouched | ValidationMode::OnChange
        ) {
            let _ = self.validate_field_by_key(key)?;
        }
        Ok(())
    }

    /// Blur with the value the input holds at blur time.
    pub fn blur<L>(&self, lens: L, value: L::Value) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        {
            let mut state = write_lock(&self.state, "writing blurred value")?;
            state.ensure_mounted()?;
            if lens.get(&state.model) != &value {
                lens.set(&mut state.model, value);
                let is_dirty = lens.get(&state.model) != lens.get(&state.initial_model);
                if is_dirty {
                    state.dirty_fields.insert(lens.key());
                } else {
                    state.dirty_fields.remove(&lens.key());
                }
                state.ensure_meta(lens.key()).dirty = is_dirty;
            }
        }
        self.touch(lens)
    }

    pub fn validate_field<L>(&self, lens: L) -> FormResult<bool>
    where
        L: FieldLens<T>,
    {
        self.validate_field_by_key(lens.key())
    }

    /// Runs every registered validator against the current model and replaces
    /// the errors of every field that has validators.
    pub fn validate_form(&self) -> FormResult<bool> {
        let errors = self.collect_errors()?;
        let mut state = write_lock(&self.state, "applying form validation result")?;
        state.ensure_mounted()?;
        let mut valid = true;
        for (key, field_errors) in errors {
            valid &= field_errors.is_empty();
            state.ensure_meta(key).errors = field_errors;
        }
        Ok(valid)
    }

    pub(super) fn collect_errors(&self) -> FormResult<BTreeMap<FieldKey, Vec<E>>> {
        let model = read_lock(&self.state, "reading model for form validation")?
            .model
            .clone();
        let validators = read_lock(
            &self.field_validators,
            "reading field validators for form validation",
        )?
        .clone();

        Ok(validators
            .into_iter()
            .map(|(key, validators)| (key, self.run_validators(&model, &validators)))
            .collect())
    }

    pub(super) fn validate_field_by_key(&self, key: FieldKey) -> FormResult<bool> {
        let model = read_lock(&self.state, "reading model for field validation")?
            .model
            .clone();
        let validators = read_lock(
            &self.field_validators,
            "reading field validators for key validation",
        )?
        .get(&key)
        .cloned()
        .unwrap_or_default();

        let errors = self.run_validators(&model, &validators);
        let valid = errors.is_empty();
        let mut state = write_lock(&self.state, "writing field validation result")?;
        state.ensure_mounted()?;
        state.ensure_meta(key).errors = errors;
        Ok(valid)
    }

    fn run_validators(&self, model: &T, validators: &[SyncFieldValidatorFn<T, E>]) -> Vec<E> {
        let mut errors = Vec::new();
        for validator in validators {
            if let Err(error) = validator(model) {
                errors.push(error);
                if self.options.validate_first_error_only {
                    break;
                }
            }
        }
        errors
    }
}
