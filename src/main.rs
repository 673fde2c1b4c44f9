use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    panelink::cli::main()
}
