use anyhow::Result;
use std::path::Path;
use vibeplan_server::state::AppState;

pub fn run(data_dir: &Path, port: u16, no_open: bool) -> Result<()> {
    let state = AppState::new(data_dir.to_path_buf())?;
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();
        println!(
            "vibeplan API → http://localhost:{actual_port}  (data: {})",
            data_dir.display()
        );

        tokio::select! {
            res = vibeplan_server::serve_on(state, listener, !no_open) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
