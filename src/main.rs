mod cli;
mod compat;
mod error;
mod ingest;
mod normalize;
mod setlist;
mod tools;
mod types;
mod wheel;

use rmcp::ServiceExt;
use rmcp::transport::stdio;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // With arguments, run as a CLI; bare invocation serves MCP over stdio.
    if std::env::args().len() > 1 {
        return cli::main();
    }

    let server = tools::CamflowServer::new();
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
