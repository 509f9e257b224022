//! Helpers over ordered parameter lists.

/// Return the first value for `name`, or `None` if no entry carries it.
///
/// Duplicate names are tolerated; the earliest entry wins.
///
/// # Examples
///
/// ```
/// use ltistack_launch::params::find_parameter;
///
/// let params = vec![
///     ("oauth_consumer_key".to_owned(), "first".to_owned()),
///     ("oauth_consumer_key".to_owned(), "second".to_owned()),
/// ];
/// assert_eq!(find_parameter(&params, "oauth_consumer_key"), Some("first"));
/// assert_eq!(find_parameter(&params, "user_id"), None);
/// ```
#[must_use]
pub fn find_parameter<'a>(parameters: &'a [(String, String)], name: &str) -> Option<&'a str> {
    parameters
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// Render parameters for diagnostics as `[name=value, name=value]`, in order.
///
/// # Examples
///
/// ```
/// use ltistack_launch::params::render_parameters;
///
/// let params = vec![
///     ("user_id".to_owned(), "42".to_owned()),
///     ("roles".to_owned(), "Learner".to_owned()),
/// ];
/// assert_eq!(render_parameters(&params), "[user_id=42, roles=Learner]");
/// assert_eq!(render_parameters(&[]), "[]");
/// ```
#[must_use]
pub fn render_parameters(parameters: &[(String, String)]) -> String {
    let rendered: Vec<String> = parameters.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("[{}]", rendered.join(", "))
}

/// Collect any key/value iterable into an owned, ordered list.
pub(crate) fn collect_parameters<I, K, V>(parameters: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    parameters
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
