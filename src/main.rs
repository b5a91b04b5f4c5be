fn main() -> anyhow::Result<()> {
    jsondb::run()
}
