#[derive(Clone, starkmind::form::FormModel)]
enum Channel {
    Email,
    Phone,
}

fn main() {
    let _ = [Channel::Email, Channel::Phone];
}
