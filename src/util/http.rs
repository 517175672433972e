use std::process::Command;
use std::time::Duration;
use thiserror::Error;

pub const USER_AGENT: &str = concat!("gog-build-checker/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("not found")]
    NotFound,

    #[error("HTTP {0}")]
    Status(u16),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no builds listed")]
    NoBuilds,
}

#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Blocking GET. Implementations must respect `timeout`.
pub trait Fetch {
    fn get(&self, url: &str, accept: &str, timeout: Duration) -> Result<HttpResponse, FetchError>;
}

/// Fetches through the system curl binary, which ships with Windows 10+ and
/// every desktop Linux, so no TLS stack is linked into the binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct CurlFetch;

// curl appends the status code after this marker via `-w`.
const STATUS_MARKER: &str = "\n__HTTP_STATUS__:";

impl Fetch for CurlFetch {
    fn get(&self, url: &str, accept: &str, timeout: Duration) -> Result<HttpResponse, FetchError> {
        log::debug!("GET {url}");
        let mut cmd = Command::new("curl");
        cmd.args(["-sSL", "--max-time"])
            .arg(timeout.as_secs().max(1).to_string())
            .args(["-H", &format!("User-Agent: {USER_AGENT}")])
            .args(["-H", &format!("Accept: {accept}")])
            .args(["-w", &format!("{STATUS_MARKER}%{{http_code}}")])
            .arg(url);
        hide_console(&mut cmd);
        let output = cmd
            .output()
            .map_err(|e| FetchError::Transport(format!("couldn't run curl: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::Transport(stderr.trim().to_string()));
        }

        parse_curl_output(&String::from_utf8_lossy(&output.stdout))
    }
}

// Keeps curl from flashing a console window over the GUI.
#[cfg(windows)]
fn hide_console(cmd: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    cmd.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn hide_console(_cmd: &mut Command) {}

fn parse_curl_output(stdout: &str) -> Result<HttpResponse, FetchError> {
    let (body, status) = stdout
        .rsplit_once(STATUS_MARKER)
        .ok_or_else(|| FetchError::Transport("missing status line".to_string()))?;
    let status = status
        .trim()
        .parse::<u16>()
        .map_err(|_| FetchError::Transport(format!("bad status '{}'", status.trim())))?;
    Ok(HttpResponse {
        status,
        body: body.to_string(),
    })
}

/// Turns non-2xx responses into errors.
pub fn expect_ok(response: HttpResponse) -> Result<String, FetchError> {
    match response.status {
        200..=299 => Ok(response.body),
        404 => Err(FetchError::NotFound),
        code => Err(FetchError::Status(code)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_split_from_body() {
        let out = format!("{{\"a\":1}}{STATUS_MARKER}200");
        let resp = parse_curl_output(&out).unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, "{\"a\":1}");
    }

    #[test]
    fn missing_marker_is_transport_error() {
        assert!(matches!(
            parse_curl_output("<html>"),
            Err(FetchError::Transport(_))
        ));
    }

    #[test]
    fn expect_ok_maps_status_codes() {
        let ok = HttpResponse { status: 200, body: "x".into() };
        assert_eq!(expect_ok(ok).unwrap(), "x");
        let missing = HttpResponse { status: 404, body: String::new() };
        assert!(matches!(expect_ok(missing), Err(FetchError::NotFound)));
        let broken = HttpResponse { status: 503, body: String::new() };
        assert!(matches!(expect_ok(broken), Err(FetchError::Status(503))));
    }
}
