use impi_drv::{Config, USAGE};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::parse(&args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    if let Err(e) = impi_drv::run(&config) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
