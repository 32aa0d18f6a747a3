fn main() {
    if let Err(err) = pliptab::run() {
        eprintln!("{}", pliptab::format_error(&err));
        std::process::exit(1);
    }
}
