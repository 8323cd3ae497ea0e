use std::env;

use crate::config::CloudBaseConfig;

/// Identity tuple registered with the remote service.
///
/// Detected once per client and never recomputed; the `uniq` field is the
/// value the server uses to tell calling installations apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub name: String,
    pub model: String,
    pub uniq: String,
    pub language: String,
}

impl DeviceIdentity {
    /// Detect the identity from the environment: host node name plus the
    /// configured user agent for `uniq` (falling back to the device name
    /// when unavailable), and the `LANG` variable's leading tag for
    /// `language`.
    pub fn detect(config: &CloudBaseConfig) -> Self {
        let name = config.device_name.clone();
        let model = config.device_model.clone();
        let language = detect_language();
        let uniq = match node_name() {
            Some(node) => format!("{node} - {}", config.resolved_user_agent()),
            None => name.clone(),
        };

        Self {
            name,
            model,
            uniq,
            language,
        }
    }
}

fn detect_language() -> String {
    env::var("LANG")
        .ok()
        .map(|raw| language_from_tag(&raw))
        .filter(|tag| !tag.is_empty())
        .unwrap_or_else(|| "en".to_string())
}

/// Leading language tag of a locale value: `en_US.UTF-8` yields `en_US`.
fn language_from_tag(raw: &str) -> String {
    raw.split('.').next().unwrap_or_default().trim().to_string()
}

#[cfg(unix)]
fn node_name() -> Option<String> {
    use std::ffi::CStr;
    use std::mem::MaybeUninit;

    let mut raw = MaybeUninit::<libc::utsname>::uninit();
    // SAFETY: `uname` initializes the provided `utsname` struct on success.
    let rc = unsafe { libc::uname(raw.as_mut_ptr()) };
    if rc != 0 {
        return None;
    }

    // SAFETY: We checked `uname` returned success, so `raw` is initialized.
    let raw = unsafe { raw.assume_init() };
    // SAFETY: `uname` provides NUL-terminated fixed-size C strings.
    let node = unsafe { CStr::from_ptr(raw.nodename.as_ptr()) }
        .to_string_lossy()
        .into_owned();

    if node.is_empty() {
        None
    } else {
        Some(node)
    }
}

#[cfg(not(unix))]
fn node_name() -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::language_from_tag;

    #[test]
    fn language_tag_strips_encoding_suffix() {
        assert_eq!(language_from_tag("en_US.UTF-8"), "en_US");
    }

    #[test]
    fn language_tag_passes_plain_values_through() {
        assert_eq!(language_from_tag("fr_FR"), "fr_FR");
    }

    #[test]
    fn language_tag_is_empty_for_empty_input() {
        assert_eq!(language_from_tag(""), "");
    }
}
