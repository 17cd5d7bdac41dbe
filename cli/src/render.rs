use anyhow::{Context, Result};
use backstage_model::{
    parse_manifests, Backstage, BackstageModel, DefaultConfig, ExternalConfig, OperatorSettings,
    Registry,
};
use clap::{value_parser, Parser};
use k8s_openapi::api::apps::v1::Deployment;
use kube::ResourceExt;
use log::info;
use std::path::{Path, PathBuf};

/// Run one pass for the instance in `--instance` and print the deployment followed by every
/// manifest the providers own.
#[derive(Debug, Parser)]
pub(crate) struct Render {
    /// Path to the Backstage instance YAML file.
    #[clap(long = "instance", short = 'i', value_parser = value_parser!(PathBuf))]
    instance: PathBuf,

    /// Path to the deployment descriptor YAML file.
    #[clap(long = "deployment", short = 'd', value_parser = value_parser!(PathBuf))]
    deployment: PathBuf,

    /// Directory holding the operator's default configuration files.
    #[clap(long = "default-config", value_parser = value_parser!(PathBuf))]
    default_config: Option<PathBuf>,

    /// YAML files with the ConfigMaps and PersistentVolumeClaims the instance refers to. May be
    /// given more than once.
    #[clap(long = "external", short = 'e', value_parser = value_parser!(PathBuf))]
    external: Vec<PathBuf>,
}

impl Render {
    pub(crate) fn run(self) -> Result<()> {
        let registry = Registry::initialize().context("Unable to initialize providers")?;
        let defaults = match &self.default_config {
            Some(dir) => DefaultConfig::load(dir, &registry).context(format!(
                "Unable to load default configuration from '{}'",
                dir.display()
            ))?,
            None => DefaultConfig::default(),
        };

        let backstage: Backstage = serde_yaml::from_str(&read(&self.instance)?)
            .context(format!("Unable to parse instance '{}'", self.instance.display()))?;
        let deployment: Deployment = serde_yaml::from_str(&read(&self.deployment)?).context(
            format!("Unable to parse deployment '{}'", self.deployment.display()),
        )?;

        let mut objects = Vec::new();
        for path in &self.external {
            let content = read(path)?;
            let key = path.display().to_string();
            objects.extend(
                parse_manifests(&key, &content)
                    .context(format!("Unable to parse external objects '{}'", key))?,
            );
        }
        let external = ExternalConfig::from_objects(&backstage, objects)
            .context("Unable to load external configuration")?;
        let settings =
            OperatorSettings::from_env().context("Unable to read operator settings")?;

        let mut model = BackstageModel::new(deployment).with_settings(settings);
        model
            .run_pass(&registry, &defaults, &backstage, external)
            .context(format!("Unable to build model for '{}'", backstage.name_any()))?;
        info!(
            "Rendered '{}' with {} provider(s)",
            backstage.name_any(),
            model.runtime_objects().len()
        );
        print!("{}", model.to_yaml().context("Unable to render manifests")?);
        Ok(())
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).context(format!("Unable to read file '{}'", path.display()))
}
