/*!

Decides where a volume is mounted in a container. Three inputs compete, in strict precedence:

1. a path specified on the instance, which overrides everything,
2. a `default-mount-path` annotation on the payload, honored only when the payload comes from the
   operator's default configuration,
3. the provider's base mount path joined with the RFC 1123 form of the payload's name.

!*/

use crate::utils::to_rfc1123_label;

/// The inputs to mount path resolution for one volume.
#[derive(Debug, Clone, Copy, Default)]
pub struct MountInputs<'a> {
    /// Path given explicitly by the instance.
    pub specified: Option<&'a str>,
    /// Value of the default mount path annotation on the payload, if any.
    pub annotated: Option<&'a str>,
    /// Whether the payload was built from the operator's default configuration.
    pub from_default: bool,
    /// Directory the volume is placed under when nothing more specific applies.
    pub base: &'a str,
    /// The payload's original (pre-rename) name.
    pub name: &'a str,
}

/// Which precedence tier produced a mount path.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MountSource {
    Specified,
    Annotation,
    Derived,
}

pub fn resolve_mount_path(inputs: MountInputs<'_>) -> (String, MountSource) {
    if let Some(path) = inputs.specified.filter(|p| !p.is_empty()) {
        return (path.to_string(), MountSource::Specified);
    }
    if inputs.from_default {
        if let Some(path) = inputs.annotated.filter(|p| !p.is_empty()) {
            return (path.to_string(), MountSource::Annotation);
        }
    }
    (
        join_path(inputs.base, &to_rfc1123_label(inputs.name)),
        MountSource::Derived,
    )
}

/// Joins a directory and a file name with exactly one `/` between them.
pub(crate) fn join_path(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name.trim_start_matches('/'))
}

#[cfg(test)]
mod test {
    use super::*;

    const BASE: &str = "/opt/app-root/src";

    #[test]
    fn specified_path_wins() {
        let (path, source) = resolve_mount_path(MountInputs {
            specified: Some("/opt/extra"),
            annotated: Some("/opt/app/data"),
            from_default: true,
            base: BASE,
            name: "data",
        });
        assert_eq!(path, "/opt/extra");
        assert_eq!(source, MountSource::Specified);
    }

    #[test]
    fn annotation_needs_default_source() {
        let inputs = MountInputs {
            specified: None,
            annotated: Some("/opt/app/data"),
            from_default: true,
            base: BASE,
            name: "data",
        };
        assert_eq!(resolve_mount_path(inputs).0, "/opt/app/data");

        let inputs = MountInputs {
            from_default: false,
            ..inputs
        };
        assert_eq!(resolve_mount_path(inputs).0, "/opt/app-root/src/data");
    }

    #[test]
    fn derived_path_uses_label_form() {
        let (path, source) = resolve_mount_path(MountInputs {
            base: "/opt/extra-files/",
            name: "My_Cache",
            ..MountInputs::default()
        });
        assert_eq!(path, "/opt/extra-files/my-cache");
        assert_eq!(source, MountSource::Derived);
    }
}
