use campus_epi::run_with_args;

fn main() {
    if let Err(error) = run_with_args(|_, _| Ok(())) {
        eprintln!("campus-epi: {error}");
        std::process::exit(1);
    }
}
