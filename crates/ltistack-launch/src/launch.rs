//! Verified launch parameters.

use std::collections::BTreeMap;

/// Prefix of tool-specific custom parameters.
const CUSTOM_PREFIX: &str = "custom_";

/// The parameters of a verified LTI 1.x launch.
///
/// Keys are unique; when the source carried a name more than once, the last
/// value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LtiLaunch {
    parameters: BTreeMap<String, String>,
}

impl<K, V> FromIterator<(K, V)> for LtiLaunch
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            parameters: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl LtiLaunch {
    /// Value of any launch parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    /// All launch parameters.
    #[must_use]
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// Consume the launch, returning its parameters.
    #[must_use]
    pub fn into_parameters(self) -> BTreeMap<String, String> {
        self.parameters
    }

    /// `lti_message_type`, normally `basic-lti-launch-request`.
    #[must_use]
    pub fn message_type(&self) -> Option<&str> {
        self.get("lti_message_type")
    }

    /// `lti_version`, e.g. `LTI-1p0`.
    #[must_use]
    pub fn lti_version(&self) -> Option<&str> {
        self.get("lti_version")
    }

    /// `user_id`
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.get("user_id")
    }

    /// `roles`, split on commas with blanks dropped.
    #[must_use]
    pub fn roles(&self) -> Vec<&str> {
        self.get("roles")
            .map(|roles| {
                roles
                    .split(',')
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `context_id`
    #[must_use]
    pub fn context_id(&self) -> Option<&str> {
        self.get("context_id")
    }

    /// `context_title`
    #[must_use]
    pub fn context_title(&self) -> Option<&str> {
        self.get("context_title")
    }

    /// `resource_link_id`
    #[must_use]
    pub fn resource_link_id(&self) -> Option<&str> {
        self.get("resource_link_id")
    }

    /// `resource_link_title`
    #[must_use]
    pub fn resource_link_title(&self) -> Option<&str> {
        self.get("resource_link_title")
    }

    /// `tool_consumer_instance_guid`
    #[must_use]
    pub fn tool_consumer_instance_guid(&self) -> Option<&str> {
        self.get("tool_consumer_instance_guid")
    }

    /// `launch_presentation_return_url`
    #[must_use]
    pub fn return_url(&self) -> Option<&str> {
        self.get("launch_presentation_return_url")
    }

    /// `lis_person_name_full`
    #[must_use]
    pub fn person_name_full(&self) -> Option<&str> {
        self.get("lis_person_name_full")
    }

    /// `lis_person_contact_email_primary`
    #[must_use]
    pub fn person_email(&self) -> Option<&str> {
        self.get("lis_person_contact_email_primary")
    }

    /// `custom_*` parameters keyed by their name without the prefix.
    #[must_use]
    pub fn custom_parameters(&self) -> BTreeMap<&str, &str> {
        self.parameters
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(CUSTOM_PREFIX)
                    .filter(|name| !name.is_empty())
                    .map(|name| (name, v.as_str()))
            })
            .collect()
    }
}
