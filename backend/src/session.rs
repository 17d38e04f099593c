use std::{collections::HashMap, sync::Mutex};

use actix_web::{
    cookie::{Cookie, SameSite},
    HttpRequest,
};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "motor_session";

/// Server-side session store. The browser only ever holds the random token.
///
/// Only authenticated sessions are stored: a live entry is the "logged in" flag.
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Starts an authenticated session and returns its token.
    pub fn create(&self) -> String {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now();
        let cutoff = now - self.ttl;

        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.retain(|_, created_at| *created_at > cutoff);
            sessions.insert(token.clone(), now);
        }
        token
    }

    pub fn is_logged_in(&self, token: &str) -> bool {
        let cutoff = Utc::now() - self.ttl;
        let Ok(mut sessions) = self.sessions.lock() else {
            return false;
        };

        match sessions.get(token) {
            Some(created_at) if *created_at > cutoff => true,
            Some(_) => {
                sessions.remove(token);
                false
            }
            None => false,
        }
    }

    pub fn end(&self, token: &str) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.remove(token);
        }
    }

    pub fn token(req: &HttpRequest) -> Option<String> {
        req.cookie(SESSION_COOKIE).map(|c| c.value().to_owned())
    }

    pub fn request_is_logged_in(&self, req: &HttpRequest) -> bool {
        Self::token(req).is_some_and(|token| self.is_logged_in(&token))
    }

    /// Ends whatever session the request carries and returns the cookie that clears it.
    pub fn end_request(&self, req: &HttpRequest) -> Cookie<'static> {
        if let Some(token) = Self::token(req) {
            self.end(&token);
        }
        removal_cookie()
    }
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = session_cookie(String::new());
    cookie.make_removal();
    cookie
}
