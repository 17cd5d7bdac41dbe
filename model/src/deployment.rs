use crate::constants::DEFAULT_MOUNT_DIR;
use crate::error::{self, Result};
use crate::utils::{upsert_volume, upsert_volume_mount};
use crate::Backstage;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Container, PodSpec, Volume, VolumeMount};
use snafu::OptionExt;

/// The deployment descriptor of one instance. Providers mutate it in place during a pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BackstageDeployment {
    deployment: Deployment,
}

impl BackstageDeployment {
    pub fn new(deployment: Deployment) -> Self {
        Self { deployment }
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    pub fn into_deployment(self) -> Deployment {
        self.deployment
    }

    pub fn pod_spec(&self) -> Option<&PodSpec> {
        self.deployment
            .spec
            .as_ref()
            .and_then(|spec| spec.template.spec.as_ref())
    }

    pub(crate) fn pod_spec_mut(&mut self) -> Result<&mut PodSpec> {
        self.deployment
            .spec
            .as_mut()
            .and_then(|spec| spec.template.spec.as_mut())
            .context(error::MissingPodSpecSnafu)
    }

    /// Finds the init container named `name`.
    pub fn init_container(&self, name: &str) -> Option<&Container> {
        self.pod_spec()
            .and_then(|spec| spec.init_containers.as_ref())
            .and_then(|containers| containers.iter().find(|c| c.name == name))
    }

    pub(crate) fn init_container_mut(&mut self, name: &str) -> Result<&mut Container> {
        self.pod_spec_mut()?
            .init_containers
            .as_mut()
            .and_then(|containers| containers.iter_mut().find(|c| c.name == name))
            .context(error::MissingInitContainerSnafu { name })
    }

    /// The Backstage application container is the first container of the pod.
    pub(crate) fn primary_container_mut(&mut self) -> Result<&mut Container> {
        self.pod_spec_mut()?
            .containers
            .first_mut()
            .context(error::MissingContainerSnafu)
    }

    /// The directory extra files are mounted under when nothing more specific is given.
    pub fn default_mount_path(&self, backstage: &Backstage) -> String {
        backstage
            .extra_files_mount_path()
            .unwrap_or(DEFAULT_MOUNT_DIR)
            .to_string()
    }

    pub(crate) fn add_volume(&mut self, volume: Volume) -> Result<()> {
        upsert_volume(self.pod_spec_mut()?, volume)
    }

    pub(crate) fn mount_primary(&mut self, mount: VolumeMount) -> Result<()> {
        upsert_volume_mount(self.primary_container_mut()?, mount);
        Ok(())
    }

    pub(crate) fn mount_init(&mut self, container: &str, mount: VolumeMount) -> Result<()> {
        upsert_volume_mount(self.init_container_mut(container)?, mount);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Error;
    use k8s_openapi::api::apps::v1::DeploymentSpec;
    use k8s_openapi::api::core::v1::PodTemplateSpec;

    fn deployment(init: &[&str]) -> BackstageDeployment {
        BackstageDeployment::new(Deployment {
            spec: Some(DeploymentSpec {
                template: PodTemplateSpec {
                    spec: Some(PodSpec {
                        containers: vec![Container {
                            name: "backstage-backend".to_string(),
                            ..Container::default()
                        }],
                        init_containers: Some(
                            init.iter()
                                .map(|name| Container {
                                    name: name.to_string(),
                                    ..Container::default()
                                })
                                .collect(),
                        ),
                        ..PodSpec::default()
                    }),
                    ..PodTemplateSpec::default()
                },
                ..DeploymentSpec::default()
            }),
            ..Deployment::default()
        })
    }

    #[test]
    fn finds_init_container_by_name() {
        let mut d = deployment(&["first", "install-dynamic-plugins"]);
        assert!(d.init_container("install-dynamic-plugins").is_some());
        assert!(d.init_container("missing").is_none());
        assert!(matches!(
            d.init_container_mut("missing"),
            Err(Error::MissingInitContainer { .. })
        ));
    }

    #[test]
    fn empty_deployment_has_no_pod_spec() {
        let mut d = BackstageDeployment::default();
        assert!(matches!(d.primary_container_mut(), Err(Error::MissingPodSpec)));
    }
}
