fn main() -> Result<(), Box<dyn std::error::Error>> {
    medai_vision::cli::main()
}
