// src/registry/resolution.rs
//
// Lazy resolution of deferred listener handles.
//
// CRITICAL RULES:
// - Runs at most once per event (until a new deferred handle is added)
// - The registry lock is never held while the service resolver runs
// - Each resolved handle is written back immediately, in place, so nested
//   readers of the same event see a consistent partially-resolved state
// - Other events stay fully usable while a pass is running

use std::sync::Mutex;

use log::{debug, warn};

use super::{lock, RegistryState};
use crate::config::ResolutionFailure;
use crate::error::{EvmError, EvmResult};
use crate::services::ServiceResolver;

/// Resolves every deferred entry of `event` unless already done or running.
pub(crate) fn ensure_resolved(
    state: &Mutex<RegistryState>,
    event: &str,
    resolver: &dyn ServiceResolver,
    failure: ResolutionFailure,
) -> EvmResult<()> {
    {
        let mut guard = lock(state);
        let Some(event_state) = guard.events.get_mut(event) else {
            return Ok(());
        };
        if !event_state.begin_resolution() {
            return Ok(());
        }
    }

    let mut resolved = 0usize;
    loop {
        let next = lock(state)
            .events
            .get(event)
            .and_then(|event_state| event_state.next_deferred());
        let Some((old_key, service)) = next else {
            break;
        };

        match resolver.get_service(&service) {
            Ok(listener) => {
                let mut guard = lock(state);
                let Some(event_state) = guard.events.get_mut(event) else {
                    break;
                };
                match event_state.apply_resolved(event, &old_key, listener) {
                    Some(new_key) => {
                        resolved += 1;
                        debug!(
                            "resolved listener service '{}' for '{}' as {}",
                            service, event, new_key
                        );
                    }
                    None => debug!(
                        "listener service '{}' was removed from '{}' while resolving",
                        service, event
                    ),
                }
            }
            Err(source) => {
                if let Some(event_state) = lock(state).events.get_mut(event) {
                    event_state.fail_resolution(failure);
                }
                warn!(
                    "failed to resolve listener service '{}' for '{}' ({:?}): {}",
                    service, event, failure, source
                );
                return Err(EvmError::Resolution {
                    event: event.to_string(),
                    handle: service,
                    source,
                });
            }
        }
    }

    if let Some(event_state) = lock(state).events.get_mut(event) {
        event_state.finish_resolution();
    }
    debug!("event '{}' resolved ({} deferred listeners)", event, resolved);
    Ok(())
}
