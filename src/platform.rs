//! Host platform classification
//!
//! Each capability question is answered with an `Option`: a probe that
//! cannot answer says so instead of failing, and [`detect_os`] simply moves
//! on to the next question.

use serde_json::json;
use tracing::debug;

use crate::jsonrpc::{self, JsonRpcTransport};
use crate::models::OsKind;

/// Host conditions checked in priority order
const PLATFORM_CONDITIONS: [(&str, OsKind); 5] = [
    ("system.platform.android", OsKind::Android),
    ("system.platform.linux", OsKind::Linux),
    ("system.platform.xbox", OsKind::Xbox),
    ("system.platform.windows", OsKind::Windows),
    ("system.platform.ios", OsKind::Ios),
];

/// Source of platform facts
#[cfg_attr(test, mockall::automock)]
pub trait PlatformProbe {
    /// Evaluate a host boolean condition such as `system.platform.linux`.
    fn condition(&self, name: &str) -> Option<bool>;
    /// OS name in the style of `uname -s` (`"Darwin"`, `"Linux"`, ...).
    fn system_name(&self) -> Option<String>;
    /// Free-form platform description.
    fn platform_string(&self) -> Option<String>;
}

/// Determine the OS the host runs on, or `None` if nothing matched.
pub fn detect_os(probe: &dyn PlatformProbe) -> Option<OsKind> {
    for (condition, os) in PLATFORM_CONDITIONS {
        if probe.condition(condition) == Some(true) {
            return Some(os);
        }
    }

    if probe.system_name().as_deref() == Some("Darwin") {
        return Some(OsKind::Darwin);
    }

    if probe.platform_string().is_some_and(|platform| platform.contains("AppleTV")) {
        return Some(OsKind::Ios);
    }

    debug!("No platform condition matched");
    None
}

/// Answers from the target this binary was compiled for
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeProbe;

impl PlatformProbe for NativeProbe {
    fn condition(&self, name: &str) -> Option<bool> {
        let answer = match name {
            "system.platform.android" => cfg!(target_os = "android"),
            // The host reports Android as Linux too; android is checked first.
            "system.platform.linux" => cfg!(target_os = "linux"),
            "system.platform.windows" => cfg!(target_os = "windows"),
            "system.platform.ios" => cfg!(any(target_os = "ios", target_os = "tvos")),
            "system.platform.xbox" => false,
            _ => return None,
        };
        Some(answer)
    }

    fn system_name(&self) -> Option<String> {
        let name = match std::env::consts::OS {
            "macos" => "Darwin",
            "linux" | "android" => "Linux",
            "windows" => "Windows",
            _ => return None,
        };
        Some(name.to_string())
    }

    fn platform_string(&self) -> Option<String> {
        Some(format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH))
    }
}

/// Asks the running host through `XBMC.GetInfoBooleans`
pub struct RpcPlatformProbe<T> {
    transport: T,
}

impl<T: JsonRpcTransport> RpcPlatformProbe<T> {
    /// Probe sending its queries over `transport`
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }
}

impl<T: JsonRpcTransport> PlatformProbe for RpcPlatformProbe<T> {
    fn condition(&self, name: &str) -> Option<bool> {
        let params = json!({ "booleans": [name] });
        match jsonrpc::call(&self.transport, "XBMC.GetInfoBooleans", Some(params)) {
            Ok(Some(result)) => result.get(name).and_then(serde_json::Value::as_bool),
            Ok(None) => None,
            Err(e) => {
                debug!(condition = name, error = %e, "Host could not evaluate condition");
                None
            }
        }
    }

    fn system_name(&self) -> Option<String> {
        None
    }

    fn platform_string(&self) -> Option<String> {
        None
    }
}

/// Preferred text encoding from the locale environment, `UTF-8` if unset.
///
/// Called once while loading configuration; the value is then carried in
/// `HostConfig::encoding`.
#[must_use]
pub fn preferred_encoding() -> String {
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .and_then(|locale| encoding_from_locale(&locale))
        .unwrap_or_else(|| "UTF-8".to_string())
}

/// Codeset part of a locale name such as `de_DE.ISO-8859-1@euro`.
fn encoding_from_locale(locale: &str) -> Option<String> {
    let (_, codeset) = locale.split_once('.')?;
    let codeset = codeset.split('@').next().unwrap_or(codeset);
    if codeset.is_empty() {
        return None;
    }
    if codeset.eq_ignore_ascii_case("utf8") || codeset.eq_ignore_ascii_case("utf-8") {
        return Some("UTF-8".to_string());
    }
    Some(codeset.to_string())
}
