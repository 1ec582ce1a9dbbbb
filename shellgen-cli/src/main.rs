fn main() -> anyhow::Result<()> {
    shellgen_cli::run()
}
