use medfit_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("medfit error: {err}");
        std::process::exit(1);
    }
}
