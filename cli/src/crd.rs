use anyhow::{Context, Result};
use backstage_model::Backstage;
use clap::Parser;
use kube::CustomResourceExt;

const HEADER: &str = "# This file is generated. Do not edit.\n";

/// Print the Backstage custom resource definition as YAML.
#[derive(Debug, Parser)]
pub(crate) struct Crd {}

impl Crd {
    pub(crate) fn run(self) -> Result<()> {
        let yaml = serde_yaml::to_string(&Backstage::crd())
            .context("Unable to serialize the Backstage CRD")?;
        print!("{}{}", HEADER, yaml);
        Ok(())
    }
}
