use actix_web::{
    get,
    http::header,
    middleware::Logger,
    post,
    web::{self, Data},
    App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use common::{Reading, StatusTally, Thresholds};
use log::{info, warn};
use tera::Context;

use crate::{
    chart,
    config::Config,
    db::{Db, DbError},
    error::WebError,
    session::{self, SessionStore},
    views::Views,
};

const FIELDS_REQUIRED: &str = "All fields are required.";
const INVALID_CREDENTIALS: &str = "Invalid username or password.";

pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub views: Views,
}

impl AppState {
    pub fn new(config: Config) -> tera::Result<Self> {
        Ok(Self {
            sessions: SessionStore::new(config.session_ttl),
            views: Views::new()?,
            config,
        })
    }

    /// Runs `f` on a fresh connection off the async workers. The connection closes when `f` returns.
    async fn with_db<F, T>(&self, f: F) -> Result<T, WebError>
    where
        F: FnOnce(&mut Db) -> Result<T, DbError> + Send + 'static,
        T: Send + 'static,
    {
        let url = self.config.database.url();
        let res = web::block(move || {
            let mut db = Db::connect(&url)?;
            f(&mut db)
        })
        .await?;
        Ok(res?)
    }

    fn page(
        &self,
        req: &HttpRequest,
        template: &str,
        mut context: Context,
    ) -> Result<HttpResponse, WebError> {
        context.insert("logged_in", &self.sessions.request_is_logged_in(req));
        let body = self.views.render(template, &context)?;
        Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body))
    }

    fn page_with_message(
        &self,
        req: &HttpRequest,
        template: &str,
        message: &str,
    ) -> Result<HttpResponse, WebError> {
        let mut context = Context::new();
        context.insert("message", message);
        self.page(req, template, context)
    }
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Treats missing and empty fields alike.
fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

/// A body that is absent or not urlencoded counts as a form with every field missing.
fn form_or_empty<T: Default>(form: Option<web::Form<T>>) -> T {
    form.map(web::Form::into_inner).unwrap_or_default()
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, WebError> {
    value.trim().parse().map_err(|_| WebError::InvalidNumber {
        field,
        value: value.to_owned(),
    })
}

#[derive(serde::Deserialize, Debug, Default)]
struct LoginForm {
    username: Option<String>,
    password: Option<String>,
}

#[get("/login")]
async fn login_page(req: HttpRequest, state: Data<AppState>) -> Result<impl Responder, WebError> {
    state.page(&req, "login.html", Context::new())
}

#[post("/login")]
async fn login(
    req: HttpRequest,
    form: Option<web::Form<LoginForm>>,
    state: Data<AppState>,
) -> Result<impl Responder, WebError> {
    let form = form_or_empty(form);
    let username = form.username.as_deref().unwrap_or_default();
    let password = form.password.as_deref().unwrap_or_default();

    if form.username.is_some()
        && form.password.is_some()
        && state.config.credentials.matches(username, password)
    {
        if let Some(old) = SessionStore::token(&req) {
            state.sessions.end(&old);
        }
        let token = state.sessions.create();
        info!("Operator {username:?} logged in");

        return Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, "/set_conditions"))
            .cookie(session::session_cookie(token))
            .finish());
    }

    warn!("Rejected login attempt");
    state.page_with_message(&req, "login.html", INVALID_CREDENTIALS)
}

#[get("/logout")]
async fn logout(req: HttpRequest, state: Data<AppState>) -> impl Responder {
    let cookie = state.sessions.end_request(&req);
    info!("Operator logged out");
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .cookie(cookie)
        .finish()
}

#[get("/")]
async fn index(req: HttpRequest, state: Data<AppState>) -> Result<impl Responder, WebError> {
    let motors = state.with_db(|db| db.motors()).await?;

    let mut context = Context::new();
    context.insert("motors", &motors);
    state.page(&req, "index.html", context)
}

#[derive(serde::Deserialize, Debug, Default)]
struct ConditionsForm {
    current_threshold: Option<String>,
    temperature_threshold: Option<String>,
    vibration_threshold: Option<String>,
}

#[get("/set_conditions")]
async fn conditions_page(
    req: HttpRequest,
    state: Data<AppState>,
) -> Result<impl Responder, WebError> {
    if !state.sessions.request_is_logged_in(&req) {
        return Ok(redirect("/login"));
    }

    let conditions = state.with_db(|db| db.conditions()).await?;

    let mut context = Context::new();
    context.insert("conditions", &conditions);
    state.page(&req, "set_conditions.html", context)
}

#[post("/set_conditions")]
async fn set_conditions(
    req: HttpRequest,
    form: Option<web::Form<ConditionsForm>>,
    state: Data<AppState>,
) -> Result<impl Responder, WebError> {
    if !state.sessions.request_is_logged_in(&req) {
        return Ok(redirect("/login"));
    }

    let form = form_or_empty(form);
    let (Some(current), Some(temperature), Some(vibration)) = (
        required(&form.current_threshold),
        required(&form.temperature_threshold),
        required(&form.vibration_threshold),
    ) else {
        return state.page_with_message(&req, "set_conditions.html", FIELDS_REQUIRED);
    };

    let thresholds = Thresholds {
        current: parse_number("current_threshold", current)?,
        temperature: parse_number("temperature_threshold", temperature)?,
        vibration: parse_number("vibration_threshold", vibration)?,
    };

    state
        .with_db(move |db| db.update_conditions(&thresholds))
        .await?;
    info!("Thresholds updated to {thresholds:?}");

    // A successful update ends the operator session.
    let cookie = state.sessions.end_request(&req);
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .cookie(cookie)
        .finish())
}

#[derive(serde::Deserialize, Debug, Default)]
struct MotorForm {
    name: Option<String>,
    current: Option<String>,
    temperature: Option<String>,
    vibration: Option<String>,
}

#[get("/add_motor")]
async fn add_motor_page(
    req: HttpRequest,
    state: Data<AppState>,
) -> Result<impl Responder, WebError> {
    state.page(&req, "add_motor.html", Context::new())
}

#[post("/add_motor")]
async fn add_motor(
    req: HttpRequest,
    form: Option<web::Form<MotorForm>>,
    state: Data<AppState>,
) -> Result<impl Responder, WebError> {
    let form = form_or_empty(form);
    let (Some(name), Some(current), Some(temperature), Some(vibration)) = (
        required(&form.name),
        required(&form.current),
        required(&form.temperature),
        required(&form.vibration),
    ) else {
        return state.page_with_message(&req, "add_motor.html", FIELDS_REQUIRED);
    };

    let reading = Reading {
        current: parse_number("current", current)?,
        temperature: parse_number("temperature", temperature)?,
        vibration: parse_number("vibration", vibration)?,
    };
    let name = name.to_owned();

    let assessment = state
        .with_db(move |db| db.add_reading(&name, &reading))
        .await?;
    info!("Recorded motor reading {reading:?}: {assessment:?}");

    Ok(redirect("/"))
}

#[get("/analysis")]
async fn analysis(req: HttpRequest, state: Data<AppState>) -> Result<impl Responder, WebError> {
    let statuses = state.with_db(|db| db.statuses()).await?;
    let tally = StatusTally::from_rows(&statuses);

    let mut context = Context::new();
    context.insert("tally", &tally);
    context.insert("chart", &chart::status_pie(&tally));
    context.insert("chart_id", chart::CHART_ID);
    state.page(&req, "analysis.html", context)
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login_page)
        .service(login)
        .service(logout)
        .service(index)
        .service(conditions_page)
        .service(set_conditions)
        .service(add_motor_page)
        .service(add_motor)
        .service(analysis);
}

pub async fn new_http_server(state: Data<AppState>) -> std::io::Result<()> {
    let addr = (state.config.host.clone(), state.config.port);
    info!("Listening on http://{}:{}", addr.0, addr.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(routes)
    })
    .bind(addr)?
    .run()
    .await
}
