//! Page controller.
//!
//! Handles the route-loaded notification: sets the title, enforces the auth
//! guard on protected views and builds the page for the view. Form actions
//! arrive as [`Command`]s and produce an [`Outcome`], which may also change
//! the session.
//!
//! Nothing here touches HTTP. The route handlers translate requests into
//! controller calls and outcomes into responses.

mod views;

pub use views::{
    ContactFormView, ContactListView, EditMode, EditView, FieldView, HomeView, LoginView, Page,
    PageBody, field_views,
};

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use pocketbook_core::{ContactForm, ContactKey, SessionUser};

use crate::contacts::ContactStoreError;
use crate::error::Result;
use crate::router::{Location, RouteLoaded, View};
use crate::services::AuthError;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/login";
pub const CONTACT_PATH: &str = "/contact";
pub const CONTACT_LIST_PATH: &str = "/contact-list";
pub const EDIT_PATH: &str = "/edit";

/// Title of the edit page in add mode.
pub const ADD_CONTACT_TITLE: &str = "Add Contact";

pub const LOGIN_FAILED_MESSAGE: &str = "Invalid username or password. Please try again";
pub const FEEDBACK_INVALID_MESSAGE: &str = "Please fix errors before submitting.";
pub const FEEDBACK_SENT_MESSAGE: &str = "Form successfully submitted";
pub const EDIT_INVALID_MESSAGE: &str = "Form contains errors. Please correct them before submitting";

/// What to send back to the visitor.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Render a page.
    Page(Page),
    /// Navigate to another location.
    Redirect(Location),
}

/// Change to apply to the visitor's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    SignIn(SessionUser),
    SignOut,
}

/// Result of dispatching a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub reply: Reply,
    pub session: Option<SessionUpdate>,
}

impl From<Reply> for Outcome {
    fn from(reply: Reply) -> Self {
        Self {
            reply,
            session: None,
        }
    }
}

/// A form action.
#[derive(Debug, Clone)]
pub enum Command {
    Login {
        username: String,
        password: SecretString,
    },
    Logout,
    /// Feedback form on the contact page.
    SubmitFeedback { form: ContactForm, subscribe: bool },
    /// Add (`target` is `add`) or save the contact under `target`.
    SaveContact { target: String, form: ContactForm },
    DeleteContact { key: String },
}

/// Require a signed-in user, or redirect to the login page.
///
/// # Errors
///
/// Returns the login location when `user` is `None`.
pub fn auth_guard(user: Option<&SessionUser>) -> std::result::Result<&SessionUser, Location> {
    user.ok_or_else(|| {
        tracing::info!("No session user, redirecting to login");
        Location::new(LOGIN_PATH)
    })
}

/// Builds pages and runs commands against the application state.
pub struct PageController<'a> {
    state: &'a AppState,
}

impl<'a> PageController<'a> {
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Load `location` and build its page.
    ///
    /// # Errors
    ///
    /// Returns an error if the contact store fails.
    #[instrument(skip(self, location, user), fields(location = %location))]
    pub async fn handle_route(
        &self,
        location: Location,
        user: Option<&SessionUser>,
    ) -> Result<Reply> {
        let loaded = self.state.router().load_route(location);
        self.route_loaded(loaded, user).await
    }

    async fn route_loaded(&self, loaded: RouteLoaded, user: Option<&SessionUser>) -> Result<Reply> {
        if loaded.view.is_protected()
            && let Err(login) = auth_guard(user)
        {
            return Ok(self.navigate(login));
        }

        let mut title = loaded.title;
        let body = match loaded.view {
            View::Home => PageBody::Home(self.home().await),
            View::About => PageBody::About,
            View::Products => PageBody::Products,
            View::Services => PageBody::Services,
            View::Register => PageBody::Register,
            View::Contact => PageBody::Contact(ContactFormView::default()),
            View::ContactList => PageBody::ContactList(self.contact_list()?),
            View::Edit => {
                let view = self.edit_view(loaded.location.param())?;
                if view.mode == EditMode::Add {
                    title = ADD_CONTACT_TITLE;
                }
                PageBody::Edit(view)
            }
            View::Login => {
                if user.is_some() {
                    return Ok(self.navigate(Location::new(CONTACT_LIST_PATH)));
                }
                PageBody::Login(LoginView::default())
            }
            View::NotFound => {
                tracing::warn!(path = %loaded.location.path(), "No page logic matching for path");
                PageBody::NotFound {
                    path: loaded.location.path().to_string(),
                }
            }
        };

        Ok(Reply::Page(Page {
            title: title.to_string(),
            user: user.cloned(),
            body,
        }))
    }

    /// Run a form action.
    ///
    /// # Errors
    ///
    /// Returns an error if the contact store fails.
    pub async fn dispatch(&self, command: Command, user: Option<&SessionUser>) -> Result<Outcome> {
        match command {
            Command::Login { username, password } => {
                Ok(self.login(&username, &password, user).await)
            }
            Command::Logout => {
                tracing::info!("User logged out");
                Ok(Outcome {
                    reply: self.navigate(Location::new(LOGIN_PATH)),
                    session: Some(SessionUpdate::SignOut),
                })
            }
            Command::SubmitFeedback { form, subscribe } => {
                self.submit_feedback(form, subscribe, user).map(Outcome::from)
            }
            Command::SaveContact { target, form } => {
                self.save_contact(&target, form, user).map(Outcome::from)
            }
            Command::DeleteContact { key } => self.delete_contact(&key, user).map(Outcome::from),
        }
    }

    fn navigate(&self, location: Location) -> Reply {
        Reply::Redirect(self.state.router().navigate(location))
    }

    fn page(&self, path: &str, user: Option<&SessionUser>, body: PageBody) -> Reply {
        Reply::Page(Page {
            title: self.state.router().table().title(path).to_string(),
            user: user.cloned(),
            body,
        })
    }

    async fn home(&self) -> HomeView {
        let Some(client) = self.state.weather() else {
            tracing::debug!("Weather client not configured");
            return HomeView { weather: None };
        };

        match client.current().await {
            Ok(report) => HomeView {
                weather: Some(report),
            },
            Err(e) => {
                tracing::error!(error = %e, "Error fetching weather data");
                HomeView { weather: None }
            }
        }
    }

    fn contact_list(&self) -> Result<ContactListView> {
        Ok(ContactListView {
            rows: self.state.contacts().list()?,
        })
    }

    /// The edit form for a sub-parameter: `add` or nothing adds, anything
    /// else edits the contact under that key.
    fn edit_view(&self, param: Option<&str>) -> Result<EditView> {
        let target = match param {
            None | Some("add") => return Ok(EditView::new(EditMode::Add, ContactForm::default())),
            Some(target) => target,
        };

        let mode = EditMode::Edit(target.to_string());
        let key = match ContactKey::parse(target) {
            Ok(key) => key,
            Err(e) => {
                tracing::error!(key = %target, error = %e, "Invalid contact key");
                return Ok(EditView::new(mode, ContactForm::default()));
            }
        };

        let form = match self.state.contacts().get(&key) {
            Ok(Some(contact)) => ContactForm::from(&contact),
            Ok(None) => {
                tracing::warn!(key = %key, "Contact not found");
                ContactForm::default()
            }
            Err(ContactStoreError::Contact(e)) => {
                tracing::error!(key = %key, error = %e, "Error deserializing contact data");
                ContactForm::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(EditView::new(mode, form))
    }

    #[instrument(skip(self, password, user))]
    async fn login(
        &self,
        username: &str,
        password: &SecretString,
        user: Option<&SessionUser>,
    ) -> Outcome {
        if user.is_some() {
            return self.navigate(Location::new(CONTACT_LIST_PATH)).into();
        }

        match self
            .state
            .auth()
            .login(username, password.expose_secret())
            .await
        {
            Ok(signed_in) => Outcome {
                reply: self.navigate(Location::new(CONTACT_LIST_PATH)),
                session: Some(SessionUpdate::SignIn(signed_in)),
            },
            Err(AuthError::InvalidCredentials) => {
                tracing::warn!("Login failed");
                let body = PageBody::Login(LoginView {
                    username: username.trim().to_string(),
                    error: Some(LOGIN_FAILED_MESSAGE),
                });
                self.page(LOGIN_PATH, None, body).into()
            }
            Err(e) => {
                tracing::error!(error = %e, "Failure to login");
                self.page(LOGIN_PATH, None, PageBody::Login(LoginView::default()))
                    .into()
            }
        }
    }

    fn submit_feedback(
        &self,
        form: ContactForm,
        subscribe: bool,
        user: Option<&SessionUser>,
    ) -> Result<Reply> {
        let contact = match form.validate() {
            Ok(contact) => contact,
            Err(errors) => {
                let body = PageBody::Contact(ContactFormView {
                    form,
                    errors: Some(errors),
                    subscribe,
                    notice: Some(FEEDBACK_INVALID_MESSAGE),
                });
                return Ok(self.page(CONTACT_PATH, user, body));
            }
        };

        if subscribe {
            self.state.contacts().add(&contact)?;
        }
        tracing::info!(subscribe, "Feedback form submitted");

        let body = PageBody::Contact(ContactFormView {
            notice: Some(FEEDBACK_SENT_MESSAGE),
            ..ContactFormView::default()
        });
        Ok(self.page(CONTACT_PATH, user, body))
    }

    #[instrument(skip(self, form, user))]
    fn save_contact(
        &self,
        target: &str,
        form: ContactForm,
        user: Option<&SessionUser>,
    ) -> Result<Reply> {
        if let Err(login) = auth_guard(user) {
            return Ok(self.navigate(login));
        }

        let mode = if target == "add" {
            EditMode::Add
        } else {
            EditMode::Edit(target.to_string())
        };

        let key = match &mode {
            EditMode::Add => None,
            EditMode::Edit(target) => match ContactKey::parse(target) {
                Ok(key) => Some(key),
                Err(e) => {
                    tracing::error!(error = %e, "Invalid contact key, nothing saved");
                    return Ok(self.navigate(Location::new(CONTACT_LIST_PATH)));
                }
            },
        };

        let contact = match form.validate() {
            Ok(contact) => contact,
            Err(errors) => {
                let title = match mode {
                    EditMode::Add => ADD_CONTACT_TITLE,
                    EditMode::Edit(_) => self.state.router().table().title(EDIT_PATH),
                };
                let body = PageBody::Edit(EditView {
                    mode,
                    form,
                    errors: Some(errors),
                    notice: Some(EDIT_INVALID_MESSAGE),
                });
                return Ok(Reply::Page(Page {
                    title: title.to_string(),
                    user: user.cloned(),
                    body,
                }));
            }
        };

        let contacts = self.state.contacts();
        match key {
            Some(key) => contacts.update(&key, &contact)?,
            None => {
                contacts.add(&contact)?;
            }
        }

        Ok(self.navigate(Location::new(CONTACT_LIST_PATH)))
    }

    #[instrument(skip(self, user))]
    fn delete_contact(&self, key: &str, user: Option<&SessionUser>) -> Result<Reply> {
        if let Err(login) = auth_guard(user) {
            return Ok(self.navigate(login));
        }

        match ContactKey::parse(key) {
            Ok(key) => self.state.contacts().remove(&key)?,
            Err(e) => tracing::error!(error = %e, "Invalid contact key, nothing deleted"),
        }

        Ok(self.navigate(Location::new(CONTACT_LIST_PATH)))
    }
}
