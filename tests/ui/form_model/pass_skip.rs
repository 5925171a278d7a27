use starkmind::form::{FieldLens, FormModel};

#[derive(Clone, starkmind::form::FormModel)]
struct SignupForm {
    name: String,
    #[form(skip)]
    #[allow(dead_code)]
    source: &'static str,
}

fn main() {
    let keys = SignupForm::field_keys()
        .iter()
        .map(|key| key.as_str())
        .collect::<Vec<_>>();
    assert_eq!(keys, ["name"]);
    assert_eq!(SignupForm::fields().name().key().as_str(), "name");
}
