// Console routes and the token-presence route guard.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Root,
    Login,
    Dashboard,
    Teams,
    Tournaments,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::Teams => "/dashboard/equipos",
            Route::Tournaments => "/dashboard/torneos",
        }
    }

    /// Everything under `/dashboard`.
    pub fn is_protected(self) -> bool {
        matches!(self, Route::Dashboard | Route::Teams | Route::Tournaments)
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Root => "",
            Route::Login => "Iniciar Sesión",
            Route::Dashboard => "Dashboard",
            Route::Teams => "Equipos",
            Route::Tournaments => "Torneos",
        }
    }

    /// Sidebar entries, in display order.
    pub const NAVIGATION: [Route; 3] = [Route::Dashboard, Route::Tournaments, Route::Teams];
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

/// Decide a single navigation. Presence check only: an invalid token is
/// caught later by the 401 handling.
pub fn guard(route: Route, has_token: bool) -> GuardDecision {
    match route {
        Route::Root => GuardDecision::Redirect(Route::Login),
        Route::Login if has_token => GuardDecision::Redirect(Route::Dashboard),
        r if r.is_protected() && !has_token => GuardDecision::Redirect(Route::Login),
        _ => GuardDecision::Allow,
    }
}

/// Follow redirects until the guard allows a route.
pub fn resolve(route: Route, has_token: bool) -> Route {
    let mut current = route;
    // Root -> Login -> Dashboard is the longest chain.
    for _ in 0..3 {
        match guard(current, has_token) {
            GuardDecision::Allow => return current,
            GuardDecision::Redirect(next) => current = next,
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_with_token_redirects_to_dashboard() {
        assert_eq!(guard(Route::Login, true), GuardDecision::Redirect(Route::Dashboard));
        assert_eq!(guard(Route::Login, false), GuardDecision::Allow);
    }

    #[test]
    fn protected_routes_require_token() {
        for route in [Route::Dashboard, Route::Teams, Route::Tournaments] {
            assert_eq!(guard(route, false), GuardDecision::Redirect(Route::Login));
            assert_eq!(guard(route, true), GuardDecision::Allow);
        }
    }

    #[test]
    fn root_always_goes_to_login_first() {
        assert_eq!(guard(Route::Root, false), GuardDecision::Redirect(Route::Login));
        assert_eq!(resolve(Route::Root, false), Route::Login);
        assert_eq!(resolve(Route::Root, true), Route::Dashboard);
    }

    #[test]
    fn resolve_is_a_fixed_point() {
        for route in [Route::Root, Route::Login, Route::Dashboard, Route::Teams, Route::Tournaments] {
            for has_token in [true, false] {
                let landed = resolve(route, has_token);
                assert_eq!(guard(landed, has_token), GuardDecision::Allow);
            }
        }
    }
}
