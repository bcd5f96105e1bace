use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    companion::cli::main()
}
