//! glgen - render wrapper code for declaration-driven graphics APIs.

fn main() {
    glgen_cli::init_tracing();
    std::process::exit(glgen_cli::run_cli(std::env::args_os()));
}
