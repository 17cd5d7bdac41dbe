use crate::error::{self, Result};
use serde::Deserialize;
use snafu::ResultExt;

/// Settings the operator takes from its own process environment. The caller reads them once per
/// pass.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct OperatorSettings {
    /// Image for the Backstage containers. When set, the dynamic plugins init container is run with
    /// this image as well.
    ///
    /// # Example
    ///
    /// ```text
    /// RELATED_IMAGE_backstage=quay.io/janus-idp/backstage-showcase:next
    /// ```
    #[serde(default)]
    related_image_backstage: Option<String>,
}

impl OperatorSettings {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self> {
        envy::from_env::<Self>().context(error::SettingsSnafu)
    }

    /// Reads the settings from the given variables instead of the process environment.
    pub fn from_iter<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Self>(vars).context(error::SettingsSnafu)
    }

    pub fn with_image_override<S>(mut self, image: S) -> Self
    where
        S: Into<String>,
    {
        self.related_image_backstage = Some(image.into());
        self
    }

    /// The image that overrides the dynamic plugins init container image, if any.
    pub fn image_override(&self) -> Option<&str> {
        self.related_image_backstage
            .as_deref()
            .filter(|image| !image.is_empty())
    }
}

#[test]
fn image_override_from_vars() {
    let settings = OperatorSettings::from_iter(vec![
        ("RELATED_IMAGE_backstage".to_string(), "quay.io/backstage:1".to_string()),
        ("UNRELATED".to_string(), "x".to_string()),
    ])
    .unwrap();
    assert_eq!(settings.image_override(), Some("quay.io/backstage:1"));

    let settings = OperatorSettings::from_iter(Vec::new()).unwrap();
    assert_eq!(settings.image_override(), None);

    let settings = OperatorSettings::from_iter(vec![(
        "RELATED_IMAGE_backstage".to_string(),
        String::new(),
    )])
    .unwrap();
    assert_eq!(settings.image_override(), None);
}
