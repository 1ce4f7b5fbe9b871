use anyhow::Result;

mod demo;

fn main() -> Result<()> {
    pretty_env_logger::init();

    demo::run()?;

    Ok(())
}
