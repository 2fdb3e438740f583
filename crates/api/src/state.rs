use crate::service::PortfolioService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Technology and project operations.
    pub portfolio: PortfolioService,
}
