//! Application Session
//!
//! The auth token and the last selected subject, persisted wholesale to
//! browser local storage. One instance per running client: created at
//! sign-in, cleared at sign-out.

const TOKEN_KEY: &str = "sprout_token";
const SUBJECT_KEY: &str = "sprout_subject";

/// Signed-in session state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    subject_id: Option<String>,
}

impl Session {
    pub fn signed_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn subject_id(&self) -> Option<&str> {
        self.subject_id.as_deref()
    }

    /// Start a session with a freshly issued token. The previous token,
    /// if any, is overwritten; the subject selection is kept.
    pub fn sign_in(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Clear the whole session. Used for explicit sign-out and for any
    /// 401 response from an authenticated call.
    pub fn sign_out(&mut self) {
        *self = Session::default();
    }

    /// Remember the selected subject; `None` or an empty id clears it.
    pub fn select_subject(&mut self, subject_id: Option<String>) {
        self.subject_id = subject_id.filter(|id| !id.is_empty());
    }
}

/// Restore the session from local storage.
pub fn load() -> Session {
    let Some(storage) = storage() else {
        return Session::default();
    };
    Session {
        token: storage.get_item(TOKEN_KEY).ok().flatten(),
        subject_id: storage.get_item(SUBJECT_KEY).ok().flatten(),
    }
}

/// Persist the session wholesale; absent fields remove their keys.
pub fn store(session: &Session) {
    let Some(storage) = storage() else {
        return;
    };
    match session.token() {
        Some(token) => {
            let _ = storage.set_item(TOKEN_KEY, token);
        }
        None => {
            let _ = storage.remove_item(TOKEN_KEY);
        }
    }
    match session.subject_id() {
        Some(id) => {
            let _ = storage.set_item(SUBJECT_KEY, id);
        }
        None => {
            let _ = storage.remove_item(SUBJECT_KEY);
        }
    }
}

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}
