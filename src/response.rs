//! Sending a rendered page: response headers plus the document.
//!
//! [`Page::render`] is pure; the functions here add the cache-control and
//! content-type headers a page is normally served with and write everything
//! to an output stream.

use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;

use crate::page::Page;
use crate::Result;

/// `Expires` value sent with pages that must not be cached.
pub const EXPIRED: &str = "Tue, 1 Jan 1980 12:00:00 GMT";

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Formats a time as an HTTP date (`Sun, 06 Nov 1994 08:49:37 GMT`).
/// Times before the Unix epoch are clamped to it.
pub fn http_date(time: SystemTime) -> String {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{}, {:02} {} {} {:02}:{:02}:{:02} GMT",
        WEEKDAYS[((days + 4) % 7) as usize],
        day,
        MONTHS[(month - 1) as usize],
        year,
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

/// Converts days since 1970-01-01 into a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

impl Page {
    /// Headers to send with the page. Non-cacheable pages get the
    /// `Expires`/`Last-Modified`/`Cache-Control`/`Pragma` set; every page gets
    /// `Content-Type` with its charset.
    pub fn response_headers(&self, now: SystemTime) -> Vec<(String, String)> {
        let mut headers = Vec::with_capacity(5);
        if !self.is_cacheable() {
            headers.push(("Expires".to_string(), EXPIRED.to_string()));
            headers.push(("Last-Modified".to_string(), http_date(now)));
            headers.push(("Cache-Control".to_string(), "no-cache".to_string()));
            headers.push(("Pragma".to_string(), "no-cache".to_string()));
        }
        headers.push((
            "Content-Type".to_string(),
            format!("text/html; charset={}", self.charset()),
        ));
        headers
    }

    /// Renders the page and writes headers, a blank line and the document.
    /// Nothing is written if rendering fails.
    pub fn send<W: Write>(&self, out: &mut W) -> Result<()> {
        self.send_at(out, SystemTime::now())
    }

    /// [`send`](Self::send) with an explicit clock for `Last-Modified`.
    pub fn send_at<W: Write>(&self, out: &mut W, now: SystemTime) -> Result<()> {
        let html = self.render()?;
        let headers = self.response_headers(now);
        debug!("sending page with {} headers", headers.len());
        for (name, value) in &headers {
            write!(out, "{}: {}\r\n", name, value)?;
        }
        out.write_all(b"\r\n")?;
        out.write_all(html.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
