//! Newline-delimited JSON-RPC over a byte stream (stdin/stdout in
//! production, an in-memory duplex in tests).
//!
//! Each request is handled on its own task so a handler awaiting a remote
//! call never stalls the read loop; responses funnel through an mpsc channel
//! into a single writer task and may complete out of request order. Clients
//! correlate by id. When the peer goes away the writer drops and in-flight
//! responses are abandoned, not errored.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::api::rpc::{self, AppState};
use crate::core::rpc::{parse_error, RpcResp, RpcReq};

pub async fn serve(state: AppState) -> anyhow::Result<()> {
    run_loop(tokio::io::stdin(), tokio::io::stdout(), state).await
}

pub async fn run_loop<R, W>(reader: R, writer: W, state: AppState) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel::<RpcResp>();
    let writer_task = tokio::spawn(write_responses(writer, rx));

    let mut lines = BufReader::new(reader).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<RpcReq>(&line) {
            Ok(req) => {
                let state = state.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(resp) = rpc::handle(&state, req).await {
                        // A closed channel means the peer is gone; the
                        // response is abandoned by design of the protocol.
                        let _ = tx.send(resp);
                    }
                });
            }
            Err(e) => {
                let _ = tx.send(parse_error(format!("parse error: {e}")));
            }
        }
    }

    // stdin closed: let pending responses drain, then stop the writer.
    drop(tx);
    writer_task.await??;
    Ok(())
}

async fn write_responses<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<RpcResp>) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(resp) = rx.recv().await {
        let mut frame = serde_json::to_vec(&resp)?;
        frame.push(b'\n');
        writer.write_all(&frame).await?;
        writer.flush().await?;
    }
    Ok(())
}

