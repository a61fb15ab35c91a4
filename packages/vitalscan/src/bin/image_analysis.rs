use vitalscan::cli::{self, ImageCommand};

fn main() {
    let code = cli::run::<ImageCommand, _, _>(std::env::args_os(), &mut std::io::stdout().lock());
    std::process::exit(code);
}
