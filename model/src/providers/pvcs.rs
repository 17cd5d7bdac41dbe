use crate::constants::{
    CONFIGURED_NAME_ANNOTATION, DEFAULT_MOUNT_PATH_ANNOTATION, PVCS_FILE, PVCS_OBJECT,
};
use crate::error::{self, Result};
use crate::mount::{resolve_mount_path, MountInputs};
use crate::utils::{
    add_annotation, generate_runtime_object_name, set_meta_info, to_rfc1123_label,
};
use crate::{Backstage, BackstageModel, Manifest, MultiObject, RuntimeObject};
use k8s_openapi::api::core::v1::{
    PersistentVolumeClaim, PersistentVolumeClaimVolumeSource, Volume, VolumeMount,
};
use kube::core::DynamicObject;
use kube::ResourceExt;
use log::debug;
use snafu::OptionExt;

/// Provides PersistentVolumeClaims mounted into the Backstage container. Claims come from the
/// operator's default `pvcs.yaml` and from templates the instance requests by name.
#[derive(Debug, Default)]
pub struct BackstagePvcs {
    pvcs: MultiObject<PersistentVolumeClaim>,
    /// Per-claim mount information, index-aligned with `pvcs`.
    mounts: Vec<PvcMount>,
}

#[derive(Debug, Clone)]
struct PvcMount {
    /// Mount path given explicitly by the instance.
    specified: Option<String>,
    /// Whether the claim came from the operator's default configuration.
    from_default: bool,
}

/// The name of the claim the operator creates for `original_name` on behalf of instance
/// `backstage_name`.
pub fn pvcs_name(backstage_name: &str, original_name: &str) -> String {
    format!(
        "{}-{}",
        generate_runtime_object_name(backstage_name, PVCS_OBJECT),
        original_name
    )
}

impl BackstagePvcs {
    pub fn factory() -> Box<dyn RuntimeObject> {
        Box::new(Self::default())
    }

    pub fn pvcs(&self) -> &MultiObject<PersistentVolumeClaim> {
        &self.pvcs
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.pvcs
            .iter()
            .position(|pvc| pvc.metadata.name.as_deref() == Some(name))
    }

    fn push(&mut self, pvc: PersistentVolumeClaim, mount: PvcMount) {
        self.pvcs.push(pvc);
        self.mounts.push(mount);
    }
}

impl RuntimeObject for BackstagePvcs {
    fn key(&self) -> &'static str {
        PVCS_FILE
    }

    fn empty_object(&self) -> Manifest {
        Manifest::PersistentVolumeClaim(PersistentVolumeClaim::default())
    }

    fn object(&self) -> Vec<Manifest> {
        self.pvcs
            .iter()
            .cloned()
            .map(Manifest::PersistentVolumeClaim)
            .collect()
    }

    fn set_object(&mut self, objects: Vec<DynamicObject>) -> Result<()> {
        self.pvcs = MultiObject::from_dynamic(objects)?;
        self.mounts = vec![
            PvcMount {
                specified: None,
                from_default: true,
            };
            self.pvcs.len()
        ];
        Ok(())
    }

    fn add_to_model(&mut self, model: &BackstageModel, backstage: &Backstage) -> Result<bool> {
        for request in backstage.pvc_requests() {
            let specified = request.specified_mount_path().map(str::to_string);
            match model.external_config().pvc(&request.name) {
                Some(template) => {
                    let mount = PvcMount {
                        specified,
                        from_default: false,
                    };
                    // A template from the cluster replaces a default claim of the same name.
                    match self.position(&request.name) {
                        Some(index) => {
                            self.pvcs.items_mut()[index] = template.clone();
                            self.mounts[index] = mount;
                        }
                        None => self.push(template.clone(), mount),
                    }
                }
                None => match self.position(&request.name) {
                    Some(index) => self.mounts[index].specified = specified,
                    None => debug!(
                        "Skipping PersistentVolumeClaim '{}', no template found",
                        request.name
                    ),
                },
            }
        }
        Ok(!self.pvcs.is_empty())
    }

    fn update_and_validate(
        &mut self,
        model: &mut BackstageModel,
        backstage: &Backstage,
    ) -> Result<()> {
        let base = model.deployment().default_mount_path(backstage);
        let backstage_name = backstage.name_any();
        for (pvc, mount) in self.pvcs.iter().zip(self.mounts.iter()) {
            let name = pvc
                .metadata
                .name
                .as_deref()
                .filter(|name| !name.is_empty())
                .context(error::MissingNameSnafu {
                    kind: "PersistentVolumeClaim",
                    key: PVCS_FILE,
                })?;
            let volume_name = to_rfc1123_label(name);
            let (mount_path, source) = resolve_mount_path(MountInputs {
                specified: mount.specified.as_deref(),
                annotated: pvc
                    .annotations()
                    .get(DEFAULT_MOUNT_PATH_ANNOTATION)
                    .map(String::as_str),
                from_default: mount.from_default,
                base: &base,
                name,
            });
            debug!(
                "Mounting PersistentVolumeClaim '{}' at '{}' ({:?})",
                name, mount_path, source
            );

            let deployment = model.deployment_mut();
            deployment.add_volume(Volume {
                name: volume_name.clone(),
                persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                    claim_name: pvcs_name(&backstage_name, name),
                    ..PersistentVolumeClaimVolumeSource::default()
                }),
                ..Volume::default()
            })?;
            deployment.mount_primary(VolumeMount {
                name: volume_name,
                mount_path,
                ..VolumeMount::default()
            })?;
        }
        Ok(())
    }

    fn set_meta_info(&mut self, backstage: &Backstage) {
        let backstage_name = backstage.name_any();
        for pvc in self.pvcs.items_mut() {
            let original = pvc.name_any();
            pvc.metadata.name = Some(pvcs_name(&backstage_name, &original));
            add_annotation(&mut pvc.metadata, CONFIGURED_NAME_ANNOTATION, original);
            set_meta_info(&mut pvc.metadata, backstage);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn derived_name_is_instance_scoped() {
        assert_eq!(pvcs_name("bs1", "data"), "backstage-bs1-data");
        assert_ne!(pvcs_name("bs1", "data"), pvcs_name("bs2", "data"));
    }

    #[test]
    fn default_objects_are_flagged() {
        let object: DynamicObject = serde_yaml::from_str(
            "apiVersion: v1\nkind: PersistentVolumeClaim\nmetadata:\n  name: data\n",
        )
        .unwrap();
        let mut provider = BackstagePvcs::default();
        provider.set_object(vec![object]).unwrap();
        assert_eq!(provider.pvcs().len(), 1);
        assert!(provider.mounts[0].from_default);
        assert_eq!(provider.object()[0].kind(), "PersistentVolumeClaim");
    }

    #[test]
    fn empty_object_is_a_claim() {
        let provider = BackstagePvcs::default();
        assert_eq!(provider.key(), PVCS_FILE);
        assert_eq!(provider.empty_object().kind(), "PersistentVolumeClaim");
    }
}
