use starkmind::form::{FieldLens, FormModel};

#[derive(Clone, starkmind::form::FormModel)]
struct InquiryForm {
    email: String,
    message: String,
}

fn main() {
    let fields = InquiryForm::fields();
    let lens = fields.email();
    let mut model = InquiryForm {
        email: "ana@starkmind.co".to_string(),
        message: String::new(),
    };
    lens.set(&mut model, "luis@starkmind.co".to_string());
    assert_eq!(lens.key().as_str(), "email");
    assert_eq!(lens.get(&model), "luis@starkmind.co");
    assert_eq!(fields.message().key().as_str(), "message");
}
