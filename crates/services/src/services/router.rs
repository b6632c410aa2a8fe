//! Auth-gated route resolution.

use strum_macros::{Display, EnumIter};

use super::auth::AuthState;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Page {
    Landing,
    Login,
    Dashboard,
    Lapins,
    Enclos,
    Reproduction,
    Finances,
    Sante,
    Stocks,
    Personnel,
    Depenses,
    Tresorerie,
    Rapports,
    Parametres,
    NotFound,
}

pub const PUBLIC_ROUTES: &[(&str, Page)] = &[("/", Page::Landing), (LOGIN_PATH, Page::Login)];

pub const PROTECTED_ROUTES: &[(&str, Page)] = &[
    ("/", Page::Dashboard),
    ("/lapins", Page::Lapins),
    ("/enclos", Page::Enclos),
    ("/reproduction", Page::Reproduction),
    ("/finances", Page::Finances),
    ("/sante", Page::Sante),
    ("/stocks", Page::Stocks),
    ("/personnel", Page::Personnel),
    ("/depenses", Page::Depenses),
    ("/tresorerie", Page::Tresorerie),
    ("/rapports", Page::Rapports),
    ("/parametres", Page::Parametres),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Shown while the session check is in flight.
    Placeholder,
    Page(Page),
    Redirect { to: String },
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Placeholder => f.write_str("placeholder"),
            Self::Page(page) => write!(f, "page {page}"),
            Self::Redirect { to } => write!(f, "redirect {to}"),
        }
    }
}

/// Drops query string and fragment, and a trailing slash other than root.
pub fn normalize_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = path[..end].trim_end_matches('/');
    if path.is_empty() { "/" } else { path }
}

fn lookup(table: &[(&str, Page)], path: &str) -> Option<Page> {
    table
        .iter()
        .find_map(|(route, page)| (*route == path).then_some(*page))
}

/// Maps the auth state and a requested path to what should be rendered.
pub fn resolve(auth: &AuthState, path: &str) -> Resolution {
    let path = normalize_path(path);
    match auth {
        AuthState::Loading => Resolution::Placeholder,
        AuthState::Authenticated(_) => {
            Resolution::Page(lookup(PROTECTED_ROUTES, path).unwrap_or(Page::NotFound))
        }
        AuthState::Unauthenticated => match lookup(PUBLIC_ROUTES, path) {
            Some(page) => Resolution::Page(page),
            None => Resolution::Redirect {
                to: LOGIN_PATH.to_string(),
            },
        },
    }
}

/// Stateful wrapper over [`resolve`] that keeps the deep link requested
/// before the session was known, so it can be replayed once authenticated.
#[derive(Debug, Default)]
pub struct Navigator {
    pending: Option<String>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigate(&mut self, auth: &AuthState, path: &str) -> Resolution {
        let resolution = resolve(auth, path);
        let normalized = normalize_path(path);

        match (auth, &resolution) {
            (AuthState::Loading, _) | (AuthState::Unauthenticated, Resolution::Redirect { .. })
                if normalized != LOGIN_PATH && normalized != "/" =>
            {
                self.pending = Some(normalized.to_string());
            }
            (AuthState::Authenticated(_), _) => self.pending = None,
            _ => {}
        }

        resolution
    }

    /// Called whenever the auth state changes. Returns the path to navigate to
    /// when authentication just resolved and a deep link was waiting.
    pub fn on_auth_change(&mut self, auth: &AuthState) -> Option<String> {
        match auth {
            AuthState::Authenticated(_) => self.pending.take(),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }
}
