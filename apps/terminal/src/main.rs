fn main() -> anyhow::Result<()> {
    code_drill::run()
}
