pub mod index;
pub mod redirect;
pub mod shorten;
pub mod stat;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;

pub use index::IndexService;
pub use redirect::RedirectService;
pub use shorten::ShortenService;
pub use stat::StatService;

/// 对外展示的站点信息
#[derive(Clone, Debug)]
pub struct SiteInfo {
    /// 不带结尾斜杠的基础地址，例如 `http://localhost:8077`
    pub public_url: String,
}

impl SiteInfo {
    pub fn new(public_url: impl Into<String>) -> Self {
        let public_url: String = public_url.into();
        Self {
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.public_url, code)
    }
}

/// 注册全部路由
///
/// `/{code}/stat` 先于 `/{code}` 注册
pub fn routes(cfg: &mut actix_web::web::ServiceConfig) {
    use actix_web::web;

    cfg.route("/", web::get().to(IndexService::index))
        .route("/set", web::post().to(ShortenService::set_url))
        .route("/{code}/stat", web::get().to(StatService::url_stat))
        .route("/{code}", web::get().to(RedirectService::handle_redirect))
        .route("/{code}", web::head().to(RedirectService::handle_redirect));
}

#[inline]
pub(crate) fn not_found_response() -> HttpResponse {
    HttpResponse::build(StatusCode::NOT_FOUND)
        .insert_header(("Content-Type", "text/plain; charset=utf-8"))
        .body("URL not found")
}

#[inline]
pub(crate) fn bad_request_response(message: &str) -> HttpResponse {
    HttpResponse::build(StatusCode::BAD_REQUEST)
        .insert_header(("Content-Type", "text/plain; charset=utf-8"))
        .body(message.to_string())
}

#[inline]
pub(crate) fn error_response() -> HttpResponse {
    HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
        .insert_header(("Content-Type", "text/plain; charset=utf-8"))
        .body("Server failure")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_info_trims_trailing_slash() {
        let site = SiteInfo::new("https://s.example.com/");
        assert_eq!(site.short_url("abcd"), "https://s.example.com/abcd");
    }
}
