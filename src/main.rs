#[tokio::main]
async fn main() {
    if let Err(e) = hospital_dashboard_lib::run().await {
        eprintln!("hospital-dashboard: {e}");
        std::process::exit(1);
    }
}
