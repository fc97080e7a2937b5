//! Interactive lookup state: the selected place, the search box text and the
//! recent-history list.
//!
//! Every lookup takes a request token when it starts. When it completes, its
//! result is applied only if no newer lookup has started in the meantime, so
//! the most recently *requested* place always wins regardless of which
//! response arrives last. Observer and map notifications are delivered under
//! their own lock, so they arrive in token order even on a multi-threaded
//! runtime.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    error::LookupError,
    history::RecentHistory,
    model::{Coordinates, ResolvedLocation},
    resolver::Resolver,
};

/// Zoom used when centring on a clicked or located point.
pub const POINT_ZOOM: u8 = 12;
/// Zoom used when centring on a search result.
pub const SEARCH_ZOOM: u8 = 10;

/// Notification sink for lookup progress. All methods default to no-ops.
pub trait LookupObserver: Send + Sync {
    fn on_loading(&self, _loading: bool) {}
    fn on_success(&self, _location: &ResolvedLocation) {}
    fn on_error(&self, _error: &LookupError) {}
}

/// The map the session drives after a successful lookup.
pub trait MapSurface: Send + Sync {
    fn set_view(&self, coords: Coordinates, zoom: u8);

    /// Replace the single marker.
    fn place_marker(&self, coords: Coordinates, popup: Option<String>);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl LookupObserver for NoopObserver {}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMap;

impl MapSurface for NoopMap {
    fn set_view(&self, _coords: Coordinates, _zoom: u8) {}
    fn place_marker(&self, _coords: Coordinates, _popup: Option<String>) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Applied(ResolvedLocation),
    Failed(LookupError),
    /// A newer lookup started before this one finished; its result was dropped.
    Superseded,
    /// Nothing to look up (blank search).
    Skipped,
}

#[derive(Debug, Default)]
struct SessionState {
    selected: Option<ResolvedLocation>,
    search_text: String,
    history: RecentHistory,
    loading: bool,
    latest: u64,
}

pub struct Session {
    resolver: Resolver,
    state: Mutex<SessionState>,
    /// Held while notifying the observer and the map.
    delivery: Mutex<()>,
    observer: Arc<dyn LookupObserver>,
    map: Arc<dyn MapSurface>,
}

impl Session {
    pub fn new(
        resolver: Resolver,
        observer: Arc<dyn LookupObserver>,
        map: Arc<dyn MapSurface>,
    ) -> Self {
        Self {
            resolver,
            state: Mutex::new(SessionState::default()),
            delivery: Mutex::new(()),
            observer,
            map,
        }
    }

    pub fn selected(&self) -> Option<ResolvedLocation> {
        self.state.lock().selected.clone()
    }

    pub fn history(&self) -> RecentHistory {
        self.state.lock().history.clone()
    }

    pub fn search_text(&self) -> String {
        self.state.lock().search_text.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    /// A click on the map.
    pub async fn click(&self, latitude: f64, longitude: f64) -> LookupOutcome {
        match Coordinates::new(latitude, longitude) {
            Ok(coords) => self.show(coords, POINT_ZOOM).await,
            Err(e) => {
                self.observer.on_error(&e);
                LookupOutcome::Failed(e)
            }
        }
    }

    /// Submit the search box. Blank text is ignored without touching the network.
    pub async fn search(&self, text: &str) -> LookupOutcome {
        self.state.lock().search_text = text.to_string();

        if text.trim().is_empty() {
            return LookupOutcome::Skipped;
        }

        let token = self.begin();
        let result = match self.resolver.resolve_by_name(text).await {
            Ok(coords) => self.resolver.resolve_by_coordinates(coords).await,
            Err(e) => Err(e),
        };
        self.finish(token, result, SEARCH_ZOOM)
    }

    /// Centre on the device position.
    pub async fn locate(&self) -> LookupOutcome {
        let token = self.begin();
        let result = match self.resolver.resolve_by_device().await {
            Ok(coords) => self.resolver.resolve_by_coordinates(coords).await,
            Err(e) => Err(e),
        };
        self.finish(token, result, POINT_ZOOM)
    }

    /// Refresh a history entry. `None` if `index` is past the end of the list.
    pub async fn revisit(&self, index: usize) -> Option<LookupOutcome> {
        let coords = self.state.lock().history.get(index)?.coordinates;
        Some(self.show(coords, POINT_ZOOM).await)
    }

    async fn show(&self, coords: Coordinates, zoom: u8) -> LookupOutcome {
        let token = self.begin();
        let result = self.resolver.resolve_by_coordinates(coords).await;
        self.finish(token, result, zoom)
    }

    fn begin(&self) -> RequestToken {
        let _delivery = self.delivery.lock();
        let token = {
            let mut state = self.state.lock();
            state.latest += 1;
            state.loading = true;
            RequestToken(state.latest)
        };

        tracing::debug!(token = token.0, "lookup started");
        self.observer.on_loading(true);
        token
    }

    fn finish(
        &self,
        token: RequestToken,
        result: Result<ResolvedLocation, LookupError>,
        zoom: u8,
    ) -> LookupOutcome {
        let _delivery = self.delivery.lock();
        {
            let mut state = self.state.lock();
            if state.latest != token.0 {
                tracing::debug!(
                    token = token.0,
                    latest = state.latest,
                    "dropping superseded lookup"
                );
                return LookupOutcome::Superseded;
            }

            state.loading = false;
            if let Ok(location) = &result {
                state.selected = Some(location.clone());
                state.history = state.history.record(location.clone());
            }
        }

        self.observer.on_loading(false);

        match result {
            Ok(location) => {
                self.map.set_view(location.coordinates, zoom);
                self.map.place_marker(location.coordinates, Some(popup_text(&location)));
                self.observer.on_success(&location);
                LookupOutcome::Applied(location)
            }
            Err(e) => {
                if !e.is_silent() {
                    self.observer.on_error(&e);
                }
                LookupOutcome::Failed(e)
            }
        }
    }
}

fn popup_text(location: &ResolvedLocation) -> String {
    format!(
        "{}: {}°C, {}",
        location.display_name, location.current.temperature_c, location.current.condition
    )
}
