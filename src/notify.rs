//! Desktop notifications over the session D-Bus.
//!
//! Uses the standard `org.freedesktop.Notifications` interface through
//! zbus's blocking API. Delivery is best-effort: callers log failures and
//! never treat them as pass failures.

use anyhow::{Context, Result};
use std::collections::HashMap;
use zbus::blocking::Connection;
use zbus::zvariant::Value;

use crate::constants::NOTIFICATION_APP_NAME;

#[zbus::proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: &[&str],
        hints: HashMap<&str, &Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

/// Send one desktop notification.
pub fn send_notification(summary: &str, body: &str) -> Result<()> {
    let connection = Connection::session().context("Failed to connect to session D-Bus")?;
    let proxy = NotificationsProxyBlocking::new(&connection)
        .context("Failed to create notifications proxy")?;
    proxy
        .notify(
            NOTIFICATION_APP_NAME,
            0,
            "",
            summary,
            body,
            &[],
            HashMap::new(),
            -1,
        )
        .context("Notification delivery failed")?;
    Ok(())
}
