//! Manifest placeholders for push notifications
//!
//! The Android manifest-merging step substitutes these values into the
//! final AndroidManifest.xml. Firebase Messaging reads the channel id and
//! icon from well-known `<meta-data>` keys.

use crate::error::{AndroidError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Manifest key for the default notification channel id
pub const CHANNEL_ID_KEY: &str =
    "com.google.firebase.messaging.default_notification_channel_id";

/// Manifest key for the default notification icon
pub const NOTIFICATION_ICON_KEY: &str =
    "com.google.firebase.messaging.default_notification_icon";

/// Notification channel used for all Hashtara pushes
pub const DEFAULT_CHANNEL_ID: &str = "hashtara_notifications";

/// Launcher icon doubles as the notification icon
pub const DEFAULT_NOTIFICATION_ICON: &str = "@mipmap/ic_launcher";

static CHANNEL_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap());

// Android resource reference: @<type>/<name>
static RESOURCE_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@[a-z]+/[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Placeholder values injected during manifest merging
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestPlaceholders {
    /// Notification channel identifier
    pub channel_id: String,
    /// Resource reference for the notification icon
    pub notification_icon: String,
}

impl Default for ManifestPlaceholders {
    fn default() -> Self {
        Self {
            channel_id: DEFAULT_CHANNEL_ID.to_string(),
            notification_icon: DEFAULT_NOTIFICATION_ICON.to_string(),
        }
    }
}

impl ManifestPlaceholders {
    /// Check that both values are well-formed before they reach the
    /// manifest merge, where a bad value only surfaces at runtime.
    pub fn validate(&self) -> Result<()> {
        if !CHANNEL_ID_RE.is_match(&self.channel_id) {
            return Err(AndroidError::InvalidPlaceholder {
                key: CHANNEL_ID_KEY.to_string(),
                reason: format!(
                    "'{}' is not a valid channel id (lowercase letters, digits, underscores)",
                    self.channel_id
                ),
            });
        }

        if !RESOURCE_REF_RE.is_match(&self.notification_icon) {
            return Err(AndroidError::InvalidPlaceholder {
                key: NOTIFICATION_ICON_KEY.to_string(),
                reason: format!(
                    "'{}' is not a resource reference like @mipmap/ic_launcher",
                    self.notification_icon
                ),
            });
        }

        Ok(())
    }

    /// The key/value map handed to the manifest merging step
    pub fn to_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (CHANNEL_ID_KEY.to_string(), self.channel_id.clone()),
            (
                NOTIFICATION_ICON_KEY.to_string(),
                self.notification_icon.clone(),
            ),
        ])
    }
}
