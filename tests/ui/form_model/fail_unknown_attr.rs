#[derive(Clone, starkmind::form::FormModel)]
struct SignupForm {
    #[form(hidden)]
    name: String,
}

fn main() {
    let form = SignupForm { name: String::new() };
    let _ = form.name;
}
