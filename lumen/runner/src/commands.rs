//! Subcommand implementations

use std::path::Path;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{info, warn};

use lumen_core::host::{self, discover_endpoint};
use lumen_core::{
    Color, Endpoint, GuiEvent, GuiScript, LumenConfig, LumenInstance, Script, ScriptKind, Vec2,
};

/// Launch the host, print the endpoint it announces and release it
pub async fn discover(config: &LumenConfig) -> Result<()> {
    let launch = config.launch_config()?;
    let (mut process, stdout) = host::spawn(&launch).context("Failed to launch host")?;

    let outcome = discover_endpoint(stdout, &config.discovery).await;

    if launch.kill_on_shutdown {
        if let Err(e) = process.terminate().await {
            warn!(error = %e, "Failed to terminate host");
        }
    } else {
        process.detach();
    }

    let found = outcome.context("Host did not announce an endpoint")?;
    println!("{}", found.endpoint.url());
    Ok(())
}

/// Send a Lua file as an executable script
pub async fn run_file(config: &LumenConfig, connect: Option<Endpoint>, file: &Path) -> Result<()> {
    let source = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read script: {file:?}"))?;
    let script = Script::from_source(ScriptKind::Executable, &source);

    let mut instance = open_instance(config, connect).await?;
    let result = instance.execute_script(&script).await.map_err(Into::into);
    if result.is_ok() {
        info!(file = ?file, statements = script.len(), "Script sent");
    }
    finish(instance, result).await
}

/// Draw the demonstration scene
pub async fn demo(config: &LumenConfig, connect: Option<Endpoint>) -> Result<()> {
    let script = demo_scene();

    let mut instance = open_instance(config, connect).await?;
    let result = instance.execute_script(&script).await.map_err(Into::into);
    finish(instance, result).await
}

/// Open a sample GUI window and log its callbacks until interrupted
pub async fn gui(config: &LumenConfig, connect: Option<Endpoint>, name: &str) -> Result<()> {
    let mut instance = open_instance(config, connect).await?;
    let result = serve_gui(&mut instance, name).await;
    finish(instance, result).await
}

async fn serve_gui(instance: &mut LumenInstance, name: &str) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let mut gui = sample_gui(name);
    gui.set_server_handler(move |message: &str| match GuiEvent::parse(message) {
        Some(event) => {
            let _ = event_tx.send(event);
        }
        None => info!(raw = message, "Unrecognised callback"),
    });

    let server = instance.start_server(&mut gui).await?;
    info!(addr = %server.local_addr(), "Waiting for GUI callbacks, press Ctrl+C to stop");

    let shutdown = wait_for_shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            signal = &mut shutdown => return signal,
            event = event_rx.recv() => match event {
                Some(GuiEvent::CloseButton { label }) => {
                    info!(label, "GUI window closed");
                    return Ok(());
                }
                Some(GuiEvent::ClearAwaitScriptButton { label }) => {
                    info!(label, "Host awaiting a new GUI script");
                    server.broadcast(gui.snapshot()).await?;
                }
                Some(event) => info!(event = ?event, "GUI callback"),
                None => return Ok(()),
            },
        }
    }
}

async fn open_instance(config: &LumenConfig, connect: Option<Endpoint>) -> Result<LumenInstance> {
    let instance = match connect {
        Some(endpoint) => {
            info!(endpoint = %endpoint, "Attaching to running host");
            LumenInstance::attach(endpoint, config.instance_config()).await?
        }
        None => {
            let launch = config.launch_config()?;
            LumenInstance::launch(&launch, config.instance_config()).await?
        }
    };
    Ok(instance)
}

/// Shut the instance down, keeping the first error
async fn finish(mut instance: LumenInstance, result: Result<()>) -> Result<()> {
    let shutdown = instance.shutdown().await;
    result?;
    shutdown.context("Shutdown failed")
}

async fn wait_for_shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
        let mut sigint =
            signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?;

        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
            _ = sigint.recv() => info!("Received SIGINT, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl+C")?;
        info!("Received Ctrl+C, shutting down");
    }

    Ok(())
}

/// Red quad, magenta edge line and a translucent rotated quad
fn demo_scene() -> Script {
    let thickness = 0.01;

    let mut script = Script::executable();
    script
        .begin_scene_2d("Demo")
        .draw_quad_2d(
            (0.0, 0.0, 0.0).into(),
            (1.0, 1.0, 0.0).into(),
            Color::rgb(1.0, 0.0, 0.0),
        )
        .draw_line_2d(
            (-thickness, 0.0, 0.0).into(),
            (-thickness, 1.0, 0.0).into(),
            thickness,
            Color::rgb(1.0, 0.0, 1.0),
        )
        .draw_rotated_quad_2d(
            (0.0, 0.0, 0.98).into(),
            (1.0, 1.0, 0.98).into(),
            Color::rgba(1.0, 1.0, 0.0, 0.6),
            45.0,
        );
    script
}

fn sample_gui(name: &str) -> GuiScript {
    let button = Vec2::new(120.0, 24.0);

    let mut gui = GuiScript::new(name);
    gui.text("Callbacks are logged by lumen-runner")
        .separator()
        .button("Ping", button)
        .same_line(0.0)
        .checkbox("Wireframe", false)
        .input_text("Label", "")
        .combo("Mode", 0, ["2D", "3D"], 2)
        .table(
            "Scene",
            120.0,
            [("Primitive", vec!["Quad", "Line"]), ("Count", vec!["1", "1"])],
        )
        .separator()
        .clear_await_script_button("Reload", button)
        .same_line(0.0)
        .close_button("Close", button);
    gui
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_scene() {
        let script = demo_scene();
        let text = script.snapshot();

        assert!(text.starts_with("-- LUA_EXECUTABLE_SCRIPT\n"));
        assert_eq!(script.len(), 4);
        assert!(text.contains("BeginScene2D(\"Demo\")"));
        assert!(text.contains("DrawRotatedQuad2D("));
    }

    #[test]
    fn test_sample_gui_has_exit_paths() {
        let gui = sample_gui("Panel");
        let text = gui.snapshot();

        assert!(text.contains("-- Gui Name: 'Panel'"));
        assert!(text.contains("CloseButton(\"Close\""));
        assert!(text.contains("ClearAwaitScriptButton(\"Reload\""));
    }
}
