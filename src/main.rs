fn main() -> anyhow::Result<()> {
    bitvoyager_lib::run()
}
