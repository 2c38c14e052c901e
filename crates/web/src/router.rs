//! Route table and router.
//!
//! The route table maps a path to the view that renders it and the page
//! title. The router resolves a [`Location`] against the table, falling back
//! to the `/404` route, and produces a [`RouteLoaded`] notification for the
//! page controller. It never decides page behavior.
//!
//! # Routes
//!
//! ```text
//! /              pages/home.html          Home Page
//! /home          pages/home.html          Home Page
//! /about         pages/about.html         About Page
//! /products      pages/products.html      Our Products
//! /services      pages/services.html      Our Services
//! /contact       pages/contact.html       Contact
//! /contact-list  pages/contact-list.html  Contact List
//! /edit          pages/edit.html          Edit Contact
//! /login         pages/login.html         Login Page
//! /register      pages/register.html      Register
//! /404           pages/404.html           Page Not Found
//! ```

use core::fmt;
use std::collections::HashMap;

/// Path of the fallback route.
pub const NOT_FOUND_PATH: &str = "/404";

/// Title used when a path has no title in the table.
pub const UNTITLED_PAGE: &str = "Untitled Page";

/// The closed set of page views, one per template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    About,
    Products,
    Services,
    Contact,
    ContactList,
    Edit,
    Login,
    Register,
    NotFound,
}

impl View {
    /// Template rendered into the main content region.
    #[must_use]
    pub const fn template(self) -> &'static str {
        match self {
            Self::Home => "pages/home.html",
            Self::About => "pages/about.html",
            Self::Products => "pages/products.html",
            Self::Services => "pages/services.html",
            Self::Contact => "pages/contact.html",
            Self::ContactList => "pages/contact-list.html",
            Self::Edit => "pages/edit.html",
            Self::Login => "pages/login.html",
            Self::Register => "pages/register.html",
            Self::NotFound => "pages/404.html",
        }
    }

    /// Whether the view requires a logged-in user.
    #[must_use]
    pub const fn is_protected(self) -> bool {
        matches!(self, Self::ContactList | Self::Edit)
    }
}

/// Static mapping from path to view and title.
///
/// Read-only once built; shared by every request.
#[derive(Debug, Clone)]
pub struct RouteTable {
    views: HashMap<&'static str, View>,
    titles: HashMap<&'static str, &'static str>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::empty()
            .with_route("/", View::Home, "Home Page")
            .with_route("/home", View::Home, "Home Page")
            .with_route("/about", View::About, "About Page")
            .with_route("/products", View::Products, "Our Products")
            .with_route("/services", View::Services, "Our Services")
            .with_route("/contact", View::Contact, "Contact")
            .with_route("/contact-list", View::ContactList, "Contact List")
            .with_route("/edit", View::Edit, "Edit Contact")
            .with_route("/login", View::Login, "Login Page")
            .with_route("/register", View::Register, "Register")
            .with_route(NOT_FOUND_PATH, View::NotFound, "Page Not Found")
    }
}

impl RouteTable {
    /// A table with no routes.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            views: HashMap::new(),
            titles: HashMap::new(),
        }
    }

    /// Add a route with a title.
    #[must_use]
    pub fn with_route(mut self, path: &'static str, view: View, title: &'static str) -> Self {
        self.views.insert(path, view);
        self.titles.insert(path, title);
        self
    }

    /// The view mapped to `path`, if any.
    #[must_use]
    pub fn view(&self, path: &str) -> Option<View> {
        self.views.get(path).copied()
    }

    /// The title for `path`, or [`UNTITLED_PAGE`].
    #[must_use]
    pub fn title(&self, path: &str) -> &'static str {
        self.titles.get(path).copied().unwrap_or(UNTITLED_PAGE)
    }

    /// Resolve `path` to a table path and view, falling back to `/404`.
    ///
    /// A table without a `/404` route still resolves unknown paths to
    /// [`View::NotFound`].
    #[must_use]
    pub fn resolve(&self, path: &str) -> (&'static str, View) {
        if let Some((&known, &view)) = self.views.get_key_value(path) {
            return (known, view);
        }
        (
            NOT_FOUND_PATH,
            self.view(NOT_FOUND_PATH).unwrap_or(View::NotFound),
        )
    }
}

/// A path plus an optional sub-parameter.
///
/// The fragment form `#/edit#contact_17` carries the sub-parameter after a
/// second `#`. Over HTTP the same location is `/edit/contact_17`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    path: String,
    param: Option<String>,
}

impl Location {
    /// A location without a sub-parameter.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: normalize_path(path.into()),
            param: None,
        }
    }

    /// Attach a sub-parameter. Empty parameters are dropped.
    #[must_use]
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        let param = param.into();
        self.param = (!param.is_empty()).then_some(param);
        self
    }

    /// Parse the fragment form, with or without the leading `#`.
    ///
    /// An empty fragment is the root path.
    ///
    /// ```
    /// use pocketbook_web::router::Location;
    ///
    /// let location = Location::parse("#/edit#contact_17");
    /// assert_eq!(location.path(), "/edit");
    /// assert_eq!(location.param(), Some("contact_17"));
    ///
    /// assert_eq!(Location::parse("").path(), "/");
    /// ```
    #[must_use]
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let mut parts = fragment.splitn(3, '#');

        let path = parts.next().unwrap_or_default();
        let location = Self::new(path);

        match parts.next() {
            Some(param) => location.with_param(param),
            None => location,
        }
    }

    /// The route path, always starting with `/`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The sub-parameter, if any.
    #[must_use]
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }

    /// The HTTP form of this location.
    #[must_use]
    pub fn href(&self) -> String {
        match &self.param {
            Some(param) if self.path == "/" => format!("/{param}"),
            Some(param) => format!("{}/{param}", self.path),
            None => self.path.clone(),
        }
    }

    /// The fragment form of this location.
    #[must_use]
    pub fn fragment(&self) -> String {
        match &self.param {
            Some(param) => format!("#{}#{param}", self.path),
            None => format!("#{}", self.path),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fragment())
    }
}

fn normalize_path(path: String) -> String {
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    }
}

/// Notification that a route finished loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLoaded {
    /// The location that was requested.
    pub location: Location,
    /// The table path the location resolved to (`/404` when unmapped).
    pub resolved: &'static str,
    /// The view to render into the main content region.
    pub view: View,
    /// Page title for the resolved path.
    pub title: &'static str,
}

/// Resolves locations against the route table.
#[derive(Debug, Clone, Default)]
pub struct Router {
    table: RouteTable,
}

impl Router {
    /// Create a router over `table`.
    #[must_use]
    pub const fn new(table: RouteTable) -> Self {
        Self { table }
    }

    /// The route table.
    #[must_use]
    pub const fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Move the visitor to `location`.
    ///
    /// Returns the location to redirect to; the follow-up request loads it.
    #[must_use]
    pub fn navigate(&self, location: Location) -> Location {
        tracing::debug!(to = %location, "Navigating");
        location
    }

    /// Resolve `location` and emit the route-loaded notification.
    #[must_use]
    pub fn load_route(&self, location: Location) -> RouteLoaded {
        let (resolved, view) = self.table.resolve(location.path());
        let title = self.table.title(resolved);

        if resolved != location.path() {
            tracing::debug!(path = %location.path(), "No route for path, using {NOT_FOUND_PATH}");
        }
        tracing::info!(path = %location.path(), template = view.template(), "New route loaded");

        RouteLoaded {
            location,
            resolved,
            view,
            title,
        }
    }
}
