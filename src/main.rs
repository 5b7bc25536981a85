fn main() -> Result<(), Box<dyn std::error::Error>> {
    matetutor::cli::main()
}
