//! Wiki HTTP handlers — view, edit and save pages, plus the `/` redirect.
//!
//! Every request goes through the route table first; anything it doesn't
//! recognise is a 404 before any page is touched.

use actix_web::http::{header, Method};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::pages::{links, Page, FRONT_PAGE};
use crate::render::{EDIT_TEMPLATE, VIEW_TEMPLATE};
use crate::routes::Operation;
use crate::AppState;

/// Largest accepted save form (matches common form-post limits)
const MAX_FORM_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct SaveForm {
    #[serde(default)]
    body: String,
}

fn redirect(location: String) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn server_error(message: String) -> HttpResponse {
    HttpResponse::InternalServerError()
        .content_type("text/plain; charset=utf-8")
        .body(message)
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/plain; charset=utf-8")
        .body("404 page not found")
}

fn method_not_allowed(allow: &'static str) -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .insert_header((header::ALLOW, allow))
        .finish()
}

fn is_read(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD
}

/// Render a page template, turning a template failure into a 500
fn render(state: &AppState, template: &str, page: &Page) -> HttpResponse {
    match state.templates.render(template, page) {
        Ok(html) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(e) => {
            log::error!("Failed to render '{}' for {}: {}", template, page.title, e);
            server_error(e.to_string())
        }
    }
}

fn home() -> HttpResponse {
    redirect(format!("/view/{}", FRONT_PAGE))
}

fn view_page(state: &AppState, title: &str) -> HttpResponse {
    let mut page = match state.store.load(title) {
        Ok(page) => page,
        Err(e) => {
            log::debug!("No page to view for {} ({}), redirecting to edit", title, e);
            return redirect(format!("/edit/{}", title));
        }
    };

    page.display_body = links::display_body(&page.body);
    render(state, VIEW_TEMPLATE, &page)
}

fn edit_page(state: &AppState, title: &str) -> HttpResponse {
    let page = match state.store.load(title) {
        Ok(page) => page,
        Err(e) => {
            if !e.is_not_found() {
                log::warn!("Failed to load {} for editing: {}", title, e);
            }
            Page::empty(title)
        }
    };

    render(state, EDIT_TEMPLATE, &page)
}

fn save_page(state: &AppState, title: &str, body: String) -> HttpResponse {
    let is_new = !state.store.exists(title);
    let page = Page::new(title, body);

    if let Err(e) = state.store.save(&page) {
        log::error!("Failed to save page {}: {}", title, e);
        return server_error(e.to_string());
    }

    if is_new {
        log::info!("Created page {} ({} bytes)", title, page.body.len());
    } else {
        log::debug!("Saved page {} ({} bytes)", title, page.body.len());
    }

    redirect(format!("/view/{}", title))
}

/// Single entry point: resolve the path, then run the matching operation
async fn dispatch(
    data: web::Data<AppState>,
    req: HttpRequest,
    form: Result<web::Form<SaveForm>, actix_web::Error>,
) -> HttpResponse {
    let route = match data.routes.resolve(req.path()) {
        Some(route) => route,
        None => return not_found(),
    };

    match route.operation {
        Operation::Save => {
            if req.method() != Method::POST {
                return method_not_allowed("POST");
            }
            match form {
                Ok(form) => save_page(&data, &route.title, form.into_inner().body),
                Err(e) => HttpResponse::BadRequest()
                    .content_type("text/plain; charset=utf-8")
                    .body(e.to_string()),
            }
        }
        _ if !is_read(req.method()) => method_not_allowed("GET, HEAD"),
        Operation::Home => home(),
        Operation::View => view_page(&data, &route.title),
        Operation::Edit => edit_page(&data, &route.title),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().limit(MAX_FORM_BYTES))
        .default_service(web::to(dispatch));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::PageStore;
    use crate::render::Templates;
    use crate::routes::RouteTable;
    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use std::path::Path;
    use tempfile::tempdir;

    fn state_with(data_dir: &Path, templates: Templates) -> web::Data<AppState> {
        web::Data::new(AppState {
            store: PageStore::new(data_dir),
            templates,
            routes: RouteTable::new().unwrap(),
        })
    }

    fn state_for(data_dir: &Path) -> web::Data<AppState> {
        state_with(data_dir, Templates::new())
    }

    macro_rules! wiki_app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state).configure(config)).await
        };
    }

    fn location<B>(resp: &ServiceResponse<B>) -> &str {
        resp.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    #[actix_web::test]
    async fn test_home_redirects_to_front_page() {
        let dir = tempdir().unwrap();
        let app = wiki_app!(state_for(dir.path()));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/view/FrontPage");
    }

    #[actix_web::test]
    async fn test_view_missing_page_redirects_to_edit() {
        let dir = tempdir().unwrap();
        let app = wiki_app!(state_for(dir.path()));

        let req = test::TestRequest::get().uri("/view/FrontPage").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/edit/FrontPage");
    }

    #[actix_web::test]
    async fn test_edit_missing_page_renders_empty_form() {
        let dir = tempdir().unwrap();
        let app = wiki_app!(state_for(dir.path()));

        let req = test::TestRequest::get().uri("/edit/NewPage").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(html.contains("Editing NewPage"));
        assert!(html.contains(r#"action="/save/NewPage""#));
        assert!(html.contains("></textarea>"));
    }

    #[actix_web::test]
    async fn test_save_then_view_links_words() {
        let dir = tempdir().unwrap();
        let app = wiki_app!(state_for(dir.path()));

        let req = test::TestRequest::post()
            .uri("/save/Test")
            .set_form([("body", "Hello [World]")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/view/Test");
        assert_eq!(
            std::fs::read(dir.path().join("Test.txt")).unwrap(),
            b"Hello [World]"
        );

        let req = test::TestRequest::get().uri("/view/Test").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(html.contains(r#"Hello <a href="/view/World">World</a>"#));
    }

    #[actix_web::test]
    async fn test_view_escapes_markup() {
        let dir = tempdir().unwrap();
        let state = state_for(dir.path());
        state
            .store
            .save(&Page::new("Xss", "<script>alert(1)</script> [Safe]"))
            .unwrap();
        let app = wiki_app!(state);

        let req = test::TestRequest::get().uri("/view/Xss").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains(r#"<a href="/view/Safe">Safe</a>"#));
    }

    #[actix_web::test]
    async fn test_edit_shows_raw_body() {
        let dir = tempdir().unwrap();
        let state = state_for(dir.path());
        state.store.save(&Page::new("Draft", "see [Other] & more")).unwrap();
        let app = wiki_app!(state);

        let req = test::TestRequest::get().uri("/edit/Draft").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(html.contains("see [Other] &amp; more</textarea>"));
        assert!(!html.contains("/view/Other"));
    }

    #[actix_web::test]
    async fn test_save_missing_body_field_saves_empty_page() {
        let dir = tempdir().unwrap();
        let app = wiki_app!(state_for(dir.path()));

        let req = test::TestRequest::post()
            .uri("/save/Blank")
            .set_form([("other", "x")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert!(std::fs::read(dir.path().join("Blank.txt")).unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_save_failure_is_server_error() {
        let dir = tempdir().unwrap();
        let app = wiki_app!(state_for(&dir.path().join("missing")));

        let req = test::TestRequest::post()
            .uri("/save/Test")
            .set_form([("body", "content")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = test::read_body(resp).await;
        assert!(std::str::from_utf8(&body).unwrap().starts_with("IO error"));
    }

    #[actix_web::test]
    async fn test_render_failure_is_server_error() {
        let dir = tempdir().unwrap();
        let state = state_with(dir.path(), Templates::new().without(VIEW_TEMPLATE));
        state.store.save(&Page::new("Test", "content")).unwrap();
        let app = wiki_app!(state);

        let req = test::TestRequest::get().uri("/view/Test").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = test::read_body(resp).await;
        assert_eq!(std::str::from_utf8(&body).unwrap(), "Unknown template: view");

        // The edit template is still there
        let req = test::TestRequest::get().uri("/edit/Test").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_unknown_paths_are_not_found() {
        let dir = tempdir().unwrap();
        let state = state_for(dir.path());
        state.store.save(&Page::new("FrontPage", "hi")).unwrap();
        let app = wiki_app!(state);

        for uri in ["/bogus/path", "/view/", "/view/bad-title", "/view/a/b", "/edit/..%2Fx"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_wrong_methods() {
        let dir = tempdir().unwrap();
        let app = wiki_app!(state_for(dir.path()));

        let req = test::TestRequest::get().uri("/save/Test").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(!dir.path().join("Test.txt").exists());

        let req = test::TestRequest::delete().uri("/view/Test").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
