use crate::context::Context;

pub const STAGE_NAME: &str = "deleting unused stemcells";

pub async fn handle(ctx: &Context) -> anyhow::Result<()> {
    let stage = ctx.event_logger.new_stage(STAGE_NAME);
    stage.start();

    ctx.manager.delete_unused(&stage).await?;

    stage.finish();
    Ok(())
}
