fn main() {
    if let Err(err) = treemap_labels::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
