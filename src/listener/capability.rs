// src/listener/capability.rs
//
// Listener capability contract and method selection.
//
// RULES:
// - A listener declares which named methods it handles
// - A listener may additionally expose a generic invoke capability
// - Method selection never fails at registration; a missing method is
//   recorded and reported when the event is dispatched

use std::fmt;

use anyhow::bail;

use super::EventArgs;

/// Name reported for the generic invoke capability.
pub const INVOKE_METHOD: &str = "__invoke";

/// A concrete event listener.
///
/// Implementors expose named methods through [`has_method`](Listener::has_method)
/// and [`call`](Listener::call), and may opt into a catch-all
/// [`invoke`](Listener::invoke) used when no method matches the event name.
pub trait Listener: Send + Sync {
    /// Human-readable name used in logs and errors.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    fn has_method(&self, _method: &str) -> bool {
        false
    }

    fn call(&self, method: &str, _args: &EventArgs) -> anyhow::Result<()> {
        bail!("{} has no method '{}'", self.describe(), method)
    }

    fn is_invocable(&self) -> bool {
        false
    }

    fn invoke(&self, _args: &EventArgs) -> anyhow::Result<()> {
        bail!("{} is not invocable", self.describe())
    }
}

/// How a registration invokes its listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeMethod {
    /// Call the named method.
    Named(String),
    /// Use the listener's generic invoke capability.
    Invoke,
    /// Neither the candidate method nor invoke exists.
    Missing(String),
}

impl InvokeMethod {
    /// Applies the capability rule for `candidate`.
    ///
    /// The exact method wins, then the invoke capability; otherwise the
    /// candidate is kept as [`InvokeMethod::Missing`].
    pub fn select(listener: &dyn Listener, candidate: &str) -> Self {
        if listener.has_method(candidate) {
            InvokeMethod::Named(candidate.to_string())
        } else if listener.is_invocable() {
            InvokeMethod::Invoke
        } else {
            InvokeMethod::Missing(candidate.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            InvokeMethod::Named(name) | InvokeMethod::Missing(name) => name,
            InvokeMethod::Invoke => INVOKE_METHOD,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, InvokeMethod::Missing(_))
    }
}

impl fmt::Display for InvokeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named;

    impl Listener for Named {
        fn has_method(&self, method: &str) -> bool {
            method == "postPersist"
        }

        fn call(&self, _method: &str, _args: &EventArgs) -> anyhow::Result<()> {
            Ok(())
        }

        fn is_invocable(&self) -> bool {
            true
        }
    }

    struct Bare;

    impl Listener for Bare {}

    #[test]
    fn test_exact_method_wins_over_invoke() {
        assert_eq!(
            InvokeMethod::select(&Named, "postPersist"),
            InvokeMethod::Named("postPersist".to_string())
        );
    }

    #[test]
    fn test_falls_back_to_invoke() {
        let method = InvokeMethod::select(&Named, "preRemove");
        assert_eq!(method, InvokeMethod::Invoke);
        assert_eq!(method.as_str(), INVOKE_METHOD);
    }

    #[test]
    fn test_missing_method_is_recorded_not_rejected() {
        let method = InvokeMethod::select(&Bare, "preRemove");
        assert!(method.is_missing());
        assert_eq!(method.to_string(), "preRemove");
    }

    #[test]
    fn test_default_call_reports_listener() {
        let err = Bare.call("preRemove", &EventArgs::empty()).unwrap_err();
        assert!(err.to_string().contains("preRemove"));
    }
}
