use std::fmt::Write;
use std::sync::Arc;

use actix_web::http::header::{self, HeaderValue, InvalidHeaderValue};
use actix_web::{HttpResponse, web};
use tracing::{error, trace};

use super::{error_response, not_found_response};
use crate::services::Redirector;
use crate::utils::is_valid_short_code;

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        path: web::Path<String>,
        redirector: web::Data<Arc<Redirector>>,
    ) -> HttpResponse {
        let code = path.into_inner();

        if !is_valid_short_code(&code) {
            // 非法短码直接 404，不访问存储
            trace!("Invalid short code rejected: {}", &code);
            return not_found_response();
        }

        let lookup = redirector.get_ref().clone();
        let lookup_code = code.clone();
        let target = match web::block(move || lookup.resolve(&lookup_code)).await {
            Ok(Ok(target)) => target,
            Ok(Err(e)) if e.is_not_found() => return not_found_response(),
            Ok(Err(e)) => {
                error!("Failed to get URL: {}", e);
                return error_response();
            }
            Err(e) => {
                error!("Blocking task failed during redirect lookup: {}", e);
                return error_response();
            }
        };

        let location = match location_value(&target) {
            Ok(location) => location,
            Err(e) => {
                error!("Stored target for {} is not a valid Location: {}", code, e);
                return error_response();
            }
        };

        // 只有成功构造出 308 响应才计数
        redirector.record_hit(&code, &target);
        HttpResponse::PermanentRedirect()
            .insert_header((header::LOCATION, location))
            .finish()
    }
}

/// 将目标地址转换为 `Location` 头的值
///
/// 换行替换为空格，非 ASCII 与其余控制字节按 `%XX` 转义，首尾空白去除。
pub fn location_value(target: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut escaped = String::with_capacity(target.len());
    for byte in target.bytes() {
        match byte {
            b'\r' | b'\n' => escaped.push(' '),
            b'\t' | 0x20..=0x7e => escaped.push(byte as char),
            _ => {
                let _ = write!(escaped, "%{:02X}", byte);
            }
        }
    }
    HeaderValue::from_str(escaped.trim())
}
