#[derive(Clone, starkmind::form::FormModel)]
struct Pair(String, String);

fn main() {
    let pair = Pair(String::new(), String::new());
    let _ = (pair.0, pair.1);
}
