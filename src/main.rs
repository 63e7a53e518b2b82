fn main() {
    if let Err(e) = scanlabel::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
