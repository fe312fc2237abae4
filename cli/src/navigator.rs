//! Terminal stand-in for the browser's location.

use hotelsocial_session::Navigator;

/// Has no current route, and turns a forced sign-out into a warning.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn current_path(&self) -> Option<String> {
        None
    }

    fn redirect(&self, path: &str) {
        tracing::warn!(
            signin_path = path,
            "session rejected by the API; stored tokens were cleared, run `hotelsocial login`"
        );
    }
}
