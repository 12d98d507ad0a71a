use std::env;
use std::path::PathBuf;
use visit_report::app;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Parse command line arguments for port and data directory
    let args: Vec<String> = env::args().collect();

    let mut port = 3000;
    let mut data_dir = PathBuf::from("data");

    if args.len() >= 2 {
        port = args[1].parse().unwrap_or(3000);
    }
    if args.len() >= 3 {
        data_dir = PathBuf::from(&args[2]);
    }

    println!("Starting visit report server on port {}", port);
    app::run(port, data_dir).await
}
