fn main() -> Result<(), Box<dyn std::error::Error>> {
    echo_chat::cli::main()
}
