use log::LevelFilter;

fn main() {
    // initialize logger
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    std::process::exit(match appicon::generate() {
        Ok(path) => {
            println!("{} created successfully", path.display());
            0
        }
        Err(e) => {
            eprintln!("error: {:?}", e);
            1
        }
    })
}
