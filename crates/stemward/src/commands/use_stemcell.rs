use crate::context::Context;
use colored::Colorize;
use stemward_state::StemcellRepo;

pub async fn handle(ctx: &Context, name: &str, version: &str) -> anyhow::Result<()> {
    let record = ctx
        .repo
        .find(name, version)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Stemcell {}/{} has not been uploaded", name, version))?;

    ctx.repo.update_current(&record.id).await?;

    println!(
        "{} {}/{} ({})",
        "✓ Current stemcell:".green(),
        name.cyan(),
        version.cyan(),
        record.cid
    );
    Ok(())
}
