/// Authorization state reported by the platform location collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    NotDetermined,
    Denied,
    Granted,
}

/// The engine's view of the platform location stack.
///
/// Implementations own the actual sensor. The engine only checks
/// authorization and starts/stops the stream; the implementation pushes
/// each fix into
/// [`SessionController::handle_sample`](crate::session::SessionController::handle_sample).
pub trait LocationProvider: Send + Sync {
    fn authorization(&self) -> PermissionStatus;
    fn start_updates(&self);
    fn stop_updates(&self);
}
