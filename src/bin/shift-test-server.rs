use shift_tools::logging::init_tracing;
use shift_tools::server::{self, BindError, PORT};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
  init_tracing("shift_tools=info,tower_http=info");

  let listener = match server::bind(server::default_addr()).await {
    Ok(listener) => listener,
    Err(err @ BindError::PortInUse(_)) => {
      println!("❌ {}", err);
      std::process::exit(1);
    }
    Err(BindError::Io(err)) => return Err(err.into()),
  };

  println!("🚀 Test server running at http://localhost:{}", PORT);
  println!("📋 Test codes are available at the root URL");
  println!("🔔 Add this URL to your extension settings:");
  println!("   http://localhost:{}", PORT);
  println!("\n⚠️  Press Ctrl+C to stop the server");

  let static_root = std::env::current_dir()?;
  server::serve(listener, &static_root).await?;

  println!("\n🛑 Server stopped");
  Ok(())
}
