//! Latest command: print the newest version in the changelog

use crate::core::context::PluginContext;
use crate::core::error::PluginCiResult;

pub fn run_latest(ctx: &PluginContext) -> PluginCiResult<()> {
  println!("{}", ctx.changelog.latest_version()?);
  Ok(())
}
