use crate::context::Context;
use colored::Colorize;

pub async fn handle(ctx: &Context) -> anyhow::Result<()> {
    let stemcells = ctx.manager.find_unused().await?;

    if stemcells.is_empty() {
        println!("{}", "No unused stemcells".green());
        return Ok(());
    }

    println!("{}", format!("Unused stemcells ({}):", stemcells.len()).bold());
    for stemcell in &stemcells {
        println!(
            "  • {}/{}  {}",
            stemcell.name().cyan(),
            stemcell.version().cyan(),
            stemcell.cid()
        );
    }
    Ok(())
}
