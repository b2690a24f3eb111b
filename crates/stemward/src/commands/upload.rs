use crate::context::Context;
use anyhow::Context as _;
use colored::Colorize;
use std::path::Path;
use stemward_core::ExtractedStemcell;

pub async fn handle(ctx: &Context, path: &Path) -> anyhow::Result<()> {
    let extracted = ExtractedStemcell::load(path)
        .with_context(|| format!("Reading extracted stemcell {}", path.display()))?;

    println!(
        "Stemcell: {}/{}",
        extracted.manifest().name.cyan(),
        extracted.manifest().version.cyan()
    );

    let stemcell = ctx.manager.upload(&extracted).await?;

    println!("CID: {}", stemcell.cid().green());
    Ok(())
}
