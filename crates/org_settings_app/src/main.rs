mod platform;

fn main() -> anyhow::Result<()> {
    platform::run_app(std::env::args().skip(1).collect())
}
