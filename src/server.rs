//! Authoring server — stdio transport, JSON-RPC 2.0, newline-delimited.
//!
//! Reads JSON-RPC requests from stdin (one per line), applies them to the
//! single in-process [`Session`], and writes responses to stdout. This is
//! the seam where an editor frontend attaches; the process holds exactly
//! one session and all mutation happens on this loop, so the store needs
//! no locking.
//!
//! Store-level failures (`NotFound`, `InvalidName`) are reported in-band on
//! the result object, never as protocol errors: from the frontend's point
//! of view a rename to a blank name is simply not applied.

use std::io::{BufRead, Read, Write};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::diff::DiffResult;
use crate::session::Session;

/// Maximum size of a single JSON-RPC line (1 MiB). Editor blobs are small;
/// anything larger is a framing bug in the client and treated as fatal.
const MAX_LINE_BYTES: u64 = 1024 * 1024;

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 types
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 request.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Method params and results
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SetTextParams {
    text: String,
}

#[derive(Debug, Deserialize)]
struct CaseIdParams {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RenameParams {
    id: u64,
    name: String,
}

/// Server identity returned by `initialize`.
#[derive(Debug, Serialize)]
struct ServerInfo {
    name: String,
    version: String,
}

/// Current editors and derived previews.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewState {
    pub input: String,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub struct_literal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<DiffResult>,
}

impl PreviewState {
    fn of(session: &Session) -> Self {
        Self {
            input: session.input().to_owned(),
            output: session.output().to_owned(),
            struct_literal: session.struct_preview().map(str::to_owned),
            diff: session.diff_preview().cloned(),
        }
    }
}

/// One row of `case/list`.
#[derive(Debug, Serialize)]
struct CaseSummary {
    id: u64,
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CaseListResult {
    cases: Vec<CaseSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selected_id: Option<u64>,
}

#[derive(Debug, Serialize)]
struct SaveResult {
    /// Id of the saved case; `None` when both editors were empty and
    /// nothing was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
}

/// Outcome of select/rename/delete, reported in-band.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OpResult {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl OpResult {
    const OK: Self = Self {
        ok: true,
        error: None,
    };

    fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Server main loop
// ---------------------------------------------------------------------------

/// Run the authoring server on stdin/stdout.
///
/// Reads JSON-RPC 2.0 requests line-by-line from stdin, applies them to the
/// session, and writes responses to stdout. Exits when stdin is closed.
///
/// # Errors
///
/// Returns an error if stdin/stdout I/O fails fatally or a request line
/// exceeds the size cap.
pub fn run_server() -> Result<()> {
    info!("casegen authoring server starting");

    let mut session = Session::new();
    let stdin = std::io::stdin();
    let mut reader = std::io::BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout().lock();
    let mut line_buf = String::new();

    loop {
        line_buf.clear();
        let bytes_read = read_request_line(&mut reader, &mut line_buf)?;

        // EOF — client closed stdin, clean exit.
        if bytes_read == 0 {
            info!("stdin closed, shutting down");
            break;
        }

        let trimmed = line_buf.trim();
        if trimmed.is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(trimmed) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "invalid JSON-RPC request");
                write_response(&mut stdout, &error_response(None, -32700, &format!("parse error: {e}")))?;
                continue;
            }
        };

        if request.jsonrpc != "2.0" {
            warn!(version = request.jsonrpc, "unsupported JSON-RPC version");
            write_response(
                &mut stdout,
                &error_response(
                    request.id.clone(),
                    -32600,
                    &format!("invalid request: jsonrpc must be \"2.0\", got \"{}\"", request.jsonrpc),
                ),
            )?;
            continue;
        }

        let is_notification = request.id.is_none();
        let response = dispatch(&mut session, &request);

        // Per JSON-RPC 2.0, notifications never receive a response.
        if is_notification {
            debug!(method = request.method, "notification handled");
            continue;
        }

        if let Some(resp) = response {
            write_response(&mut stdout, &resp)?;
        }
    }

    info!("casegen authoring server stopped");
    Ok(())
}

/// Dispatch a request to the session. Public so the protocol integration
/// tests can drive a session without spawning the binary.
pub fn dispatch(session: &mut Session, req: &JsonRpcRequest) -> Option<JsonRpcResponse> {
    debug!(method = req.method, "dispatching request");

    let id = req.id.clone();
    let response = match req.method.as_str() {
        "initialize" => success_response(
            id,
            &ServerInfo {
                name: "casegen".to_owned(),
                version: env!("CARGO_PKG_VERSION").to_owned(),
            },
        ),
        "ping" => success_response(id, &serde_json::json!({})),
        "input/set" => match parse_params::<SetTextParams>(req) {
            Ok(p) => {
                session.set_input(p.text);
                success_response(id, &PreviewState::of(session))
            }
            Err(resp) => resp,
        },
        "output/set" => match parse_params::<SetTextParams>(req) {
            Ok(p) => {
                session.set_output(p.text);
                success_response(id, &PreviewState::of(session))
            }
            Err(resp) => resp,
        },
        "preview/get" => success_response(id, &PreviewState::of(session)),
        "case/save" => success_response(id, &SaveResult { id: session.save() }),
        "case/list" => {
            let result = CaseListResult {
                cases: session
                    .store()
                    .cases()
                    .iter()
                    .map(|c| CaseSummary {
                        id: c.id,
                        name: c.name.clone(),
                    })
                    .collect(),
                selected_id: session.store().selected().map(|c| c.id),
            };
            success_response(id, &result)
        }
        "case/select" => match parse_params::<CaseIdParams>(req) {
            Ok(p) => {
                let result = if session.select_case(p.id).is_some() {
                    OpResult::OK
                } else {
                    OpResult::failed(format!("test case not found: id {}", p.id))
                };
                success_response(id, &result)
            }
            Err(resp) => resp,
        },
        "case/rename" => match parse_params::<RenameParams>(req) {
            Ok(p) => {
                let result = match session.rename_case(p.id, &p.name) {
                    Ok(()) => OpResult::OK,
                    Err(e) => OpResult::failed(e.to_string()),
                };
                success_response(id, &result)
            }
            Err(resp) => resp,
        },
        "case/delete" => match parse_params::<CaseIdParams>(req) {
            Ok(p) => {
                // Absent ids are a silent no-op, same as the store.
                session.delete_case(p.id);
                success_response(id, &OpResult::OK)
            }
            Err(resp) => resp,
        },
        _ => {
            warn!(method = req.method, "unknown method");
            error_response(id, -32601, &format!("method not found: {}", req.method))
        }
    };

    Some(response)
}

fn parse_params<T: serde::de::DeserializeOwned>(
    req: &JsonRpcRequest,
) -> Result<T, JsonRpcResponse> {
    serde_json::from_value(req.params.clone()).map_err(|e| {
        error_response(
            req.id.clone(),
            -32602,
            &format!("invalid params for {}: {e}", req.method),
        )
    })
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn success_response(id: Option<serde_json::Value>, result: &impl Serialize) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(v) => JsonRpcResponse {
            jsonrpc: "2.0".to_owned(),
            id,
            result: Some(v),
            error: None,
        },
        Err(e) => error_response(id, -32603, &format!("internal error: {e}")),
    }
}

fn error_response(id: Option<serde_json::Value>, code: i64, message: &str) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0".to_owned(),
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message: message.to_owned(),
        }),
    }
}

/// Write a response as a single line to `out`.
fn write_response(out: &mut impl Write, resp: &JsonRpcResponse) -> Result<()> {
    let json = serde_json::to_string(resp).context("failed to serialize response")?;
    out.write_all(json.as_bytes())
        .context("failed to write to stdout")?;
    out.write_all(b"\n")
        .context("failed to write newline to stdout")?;
    out.flush().context("failed to flush stdout")?;
    Ok(())
}

/// Read one request line into `buf`, capped at [`MAX_LINE_BYTES`].
///
/// Returns the number of bytes read (0 = EOF). An over-long line cannot be
/// reframed reliably, so it is a fatal error rather than a per-request one.
fn read_request_line(reader: &mut impl BufRead, buf: &mut String) -> Result<usize> {
    let mut limited = reader.by_ref().take(MAX_LINE_BYTES);
    let n = limited
        .read_line(buf)
        .context("failed to read from stdin")?;
    if n as u64 == MAX_LINE_BYTES && !buf.ends_with('\n') {
        anyhow::bail!("request line exceeds maximum size ({MAX_LINE_BYTES} bytes)");
    }
    Ok(n)
}
