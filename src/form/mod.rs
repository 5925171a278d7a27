mod controller;
mod display;
mod submit;
mod validation;


pub use controller::{
    FieldKey, FieldMeta, FormController, FormError, FormId, FormOptions, FormResult, FormSnapshot,
    SubmitFailure, SubmitState, SubmitTicket, ValidationMode,
};
pub use starkmind_form_derive::FormModel;
pub use submit::{SubmitErrorKind, SubmitOutcome};
pub use validation::{FieldLens, FieldValidator, FormModel, ValidationError};
