use std::path::Path;

use anyhow::Result;
use hopsim::{Config, Topology};

pub(super) fn gen_config(output: &Path) -> Result<()> {
    Topology::default().save(output)
}
