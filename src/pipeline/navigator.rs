/// Seam to whatever router the UI uses.
pub trait Navigator: Send + Sync {
    fn redirect(&self, route: &str);
}

/// Logs redirects instead of performing them; the CLI has no router.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn redirect(&self, route: &str) {
        tracing::info!(route = %route, "redirect");
    }
}
