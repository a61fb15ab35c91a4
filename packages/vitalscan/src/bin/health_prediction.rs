use vitalscan::cli::{self, HealthCommand};

fn main() {
    let code = cli::run::<HealthCommand, _, _>(std::env::args_os(), &mut std::io::stdout().lock());
    std::process::exit(code);
}
