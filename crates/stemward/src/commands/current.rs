use crate::context::Context;
use colored::Colorize;

pub async fn handle(ctx: &Context) -> anyhow::Result<()> {
    match ctx.manager.find_current().await? {
        Some(stemcell) => {
            println!(
                "{}/{}  {}",
                stemcell.name().cyan(),
                stemcell.version().cyan(),
                stemcell.cid()
            );
        }
        None => println!("{}", "No current stemcell".yellow()),
    }
    Ok(())
}
