use std::fmt::Write;

use crate::content::Content;
use crate::http::request::Request;
use crate::session::SessionStore;

/// Cookie carrying the visitor's session ID.
pub const SESSION_COOKIE: &str = "sar-session";

const VISITS_KEY: &str = "visits";

/// Plain-text page describing the request and the visitor's session.
///
/// Counts a visit on the visitor's session. A missing or unknown cookie
/// starts a new session, whose ID is shown so the client can send it back.
pub fn info_page(request: &Request, sessions: &SessionStore) -> Content {
    let session = sessions.find(request.cookie(SESSION_COOKIE).unwrap_or(""));
    let visits = session.with_data(|data| {
        let next = data
            .get(VISITS_KEY)
            .and_then(|v| v.downcast_ref::<u64>())
            .copied()
            .unwrap_or(0)
            + 1;
        data.insert(VISITS_KEY.to_string(), std::sync::Arc::new(next));
        next
    });

    let mut page = String::new();
    let _ = writeln!(page, "{:?} {} {}", request.method, request.full_url, request.version);
    let _ = writeln!(page, "server port: {}", request.server.port);

    let mut headers: Vec<_> = request.headers.iter().collect();
    headers.sort();
    for (key, value) in headers {
        let _ = writeln!(page, "{}: {}", key, value);
    }

    let _ = writeln!(page);
    let _ = writeln!(page, "session: {}", session.id());
    let _ = writeln!(page, "visits: {}", visits);
    let _ = writeln!(page, "live sessions: {}", sessions.len());

    Content::text(page)
}
